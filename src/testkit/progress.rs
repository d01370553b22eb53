//! Recording progress sink for assertions on workflow narration.

use std::sync::{Arc, Mutex};

use crate::progress::{ProgressSink, ProgressStep};

/// One recorded narration event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    Log(String),
    Declared(String),
    Resolved { step: String, label: String },
}

/// Sink that records every event in order.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<ProgressEvent>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the recorded events.
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Identifiers of declared steps, in order.
    pub fn declared_steps(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ProgressEvent::Declared(id) => Some(id),
                _ => None,
            })
            .collect()
    }

    /// True when every declared step was later resolved.
    pub fn all_steps_resolved(&self) -> bool {
        let events = self.events();
        let declared = events
            .iter()
            .filter(|e| matches!(e, ProgressEvent::Declared(_)))
            .count();
        let resolved = events
            .iter()
            .filter(|e| matches!(e, ProgressEvent::Resolved { .. }))
            .count();
        declared == resolved
    }
}

impl ProgressSink for RecordingSink {
    fn log(&self, message: &str) {
        self.events
            .lock()
            .unwrap()
            .push(ProgressEvent::Log(message.to_string()));
    }

    fn declare(&self, identifier: &str) -> Box<dyn ProgressStep> {
        self.events
            .lock()
            .unwrap()
            .push(ProgressEvent::Declared(identifier.to_string()));
        Box::new(RecordingStep {
            identifier: identifier.to_string(),
            events: self.events.clone(),
        })
    }
}

struct RecordingStep {
    identifier: String,
    events: Arc<Mutex<Vec<ProgressEvent>>>,
}

impl ProgressStep for RecordingStep {
    fn resolve(&self, label: &str) {
        self.events.lock().unwrap().push(ProgressEvent::Resolved {
            step: self.identifier.clone(),
            label: label.to_string(),
        });
    }
}
