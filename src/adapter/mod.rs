//! Concrete implementations of the node traits.

pub mod lotus;

pub use lotus::LotusClient;
