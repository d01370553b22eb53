//! Progress narration for the preserve workflow.
//!
//! The orchestrator reports each major step to a sink as a declare/resolve
//! pair, plus free-form messages. The sink is a collaborator owned by the
//! caller (a CLI spinner, a pipeline logger); [`TracingSink`] narrates via
//! `tracing` for library use.

use tracing::info;

/// A declared step that is later resolved with a label.
pub trait ProgressStep: Send + Sync {
    /// Mark the step finished, with a human-readable result label.
    fn resolve(&self, label: &str);
}

/// Receives workflow narration.
pub trait ProgressSink: Send + Sync {
    /// Emit a free-form message.
    fn log(&self, message: &str);

    /// Declare a step by identifier; the returned handle resolves it.
    fn declare(&self, identifier: &str) -> Box<dyn ProgressStep>;
}

/// Sink that narrates steps as structured `tracing` events.
#[derive(Debug, Default)]
pub struct TracingSink;

impl TracingSink {
    pub fn new() -> Self {
        Self
    }
}

impl ProgressSink for TracingSink {
    fn log(&self, message: &str) {
        info!("{message}");
    }

    fn declare(&self, identifier: &str) -> Box<dyn ProgressStep> {
        info!(step = identifier, "Step started");
        Box::new(TracingStep {
            identifier: identifier.to_string(),
        })
    }
}

struct TracingStep {
    identifier: String,
}

impl ProgressStep for TracingStep {
    fn resolve(&self, label: &str) {
        info!(step = %self.identifier, label = label, "Step resolved");
    }
}
