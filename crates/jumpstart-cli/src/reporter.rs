//! Console rendering of scaffold events.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use jumpstart_adapters::TracingReporter;
use jumpstart_core::{
    application::{ScaffoldEvent, ports::Reporter},
    domain::PlannedAction,
};

use crate::output::OutputManager;

/// Logs every event through [`TracingReporter`] and prints step progress
/// for humans.  Run steps get a spinner when stdout is a terminal.
pub struct ConsoleReporter {
    output: OutputManager,
    tracing: TracingReporter,
    current: Mutex<Option<CurrentStep>>,
}

struct CurrentStep {
    label: String,
    spinner: Option<ProgressBar>,
}

impl ConsoleReporter {
    pub fn new(output: OutputManager) -> Self {
        Self {
            output,
            tracing: TracingReporter::new(),
            current: Mutex::new(None),
        }
    }

    fn start(&self, label: String, action: &PlannedAction) {
        let spinner = (matches!(action, PlannedAction::Run { .. }) && self.output.is_interactive())
            .then(|| spinner(&label));
        if spinner.is_none() {
            let _ = self.output.print(&format!("  \u{2192} {label}"));
        }
        *self.lock() = Some(CurrentStep { label, spinner });
    }

    fn finish(&self, failure: Option<&str>) {
        let Some(step) = self.lock().take() else {
            return;
        };
        if let Some(spinner) = step.spinner {
            spinner.finish_and_clear();
            // the spinner replaced the start line
            if failure.is_none() {
                let _ = self.output.success(&step.label);
            }
        }
        if let Some(reason) = failure {
            let _ = self.output.warning(&format!("{} failed: {reason}", step.label));
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<CurrentStep>> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn spinner(label: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("  {spinner:.cyan} {msg} {elapsed:.dim}") {
        bar.set_style(style);
    }
    bar.set_message(label.to_string());
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

impl Reporter for ConsoleReporter {
    fn report(&self, event: &ScaffoldEvent) {
        self.tracing.report(event);

        match event {
            ScaffoldEvent::StepStarted {
                template,
                index,
                action,
            } => self.start(format!("[{template} #{index}] {action}"), action),
            ScaffoldEvent::StepCompleted { .. } => self.finish(None),
            ScaffoldEvent::StepFailed { reason, .. } => self.finish(Some(reason)),
            ScaffoldEvent::VcsInitialized { path } => {
                let _ = self
                    .output
                    .info(&format!("Initialized git repository in {}", path.display()));
            }
            _ => {}
        }
    }
}
