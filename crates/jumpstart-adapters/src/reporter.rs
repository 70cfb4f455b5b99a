//! Reporter adapters.

use std::sync::{Mutex, PoisonError};

use tracing::{debug, info, warn};

use jumpstart_core::application::{EventLevel, ScaffoldEvent, ports::Reporter};

/// Forwards every event to `tracing` at the event's level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl TracingReporter {
    pub fn new() -> Self {
        Self
    }
}

impl Reporter for TracingReporter {
    fn report(&self, event: &ScaffoldEvent) {
        match event {
            ScaffoldEvent::StepCompleted {
                template,
                index,
                stdout,
            } => debug!(target: "jumpstart::events", %template, index, stdout = %stdout.trim_end(), "{event}"),
            ScaffoldEvent::UnsubstitutedVariables { occurrences } => {
                for occurrence in occurrences {
                    warn!(target: "jumpstart::events", "unsubstituted placeholder at {occurrence}");
                }
                warn!(target: "jumpstart::events", count = occurrences.len(), "{event}");
            }
            _ => match event.level() {
                EventLevel::Debug => debug!(target: "jumpstart::events", "{event}"),
                EventLevel::Info => info!(target: "jumpstart::events", "{event}"),
                EventLevel::Warn => warn!(target: "jumpstart::events", "{event}"),
            },
        }
    }
}

/// Keeps every event in memory, in order.
#[derive(Debug, Default)]
pub struct CollectingReporter {
    events: Mutex<Vec<ScaffoldEvent>>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ScaffoldEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Reporter for CollectingReporter {
    fn report(&self, event: &ScaffoldEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
    }
}
