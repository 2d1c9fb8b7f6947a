use crate::upload::classifier::Classifier;
use crate::upload::error::{IntakeError, SimulationError};
use crate::upload::intake::admit_batch;
use crate::upload::notify::{Notification, Notifier};
use crate::upload::queue::{QueueSummary, WorkQueue};
use crate::upload::simulator::{SimulationConfig, Simulator};
use crate::upload::types::{
    EventKind, ScanFile, SimulationEvent, Transition, UnitId, UnitOfWork,
};
use derivative::Derivative;
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use tokio::runtime::Handle;

/// What happened to a submitted batch.
#[derive(Debug, Default)]
pub struct IntakeReport {
    pub accepted: Vec<UnitId>,
    pub rejected: Vec<IntakeError>,
}

/// Owner of one work queue and the timers feeding it.
///
/// All queue mutations happen on the thread that owns the session: timer
/// tasks only send events, which [`UploadSession::pump`] applies. Dropping
/// the session cancels every outstanding timer.
#[derive(Derivative)]
#[derivative(Debug)]
pub struct UploadSession {
    queue: WorkQueue,
    simulator: Simulator,
    #[derivative(Debug = "ignore")]
    events: Receiver<SimulationEvent>,
    #[derivative(Debug = "ignore")]
    notifier: Arc<dyn Notifier>,
}

impl UploadSession {
    pub fn new(
        runtime: Handle,
        config: SimulationConfig,
        classifier: Arc<dyn Classifier>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, SimulationError> {
        let (sender, events) = mpsc::channel();
        Ok(Self {
            queue: WorkQueue::new(),
            simulator: Simulator::new(runtime, config, classifier, sender)?,
            events,
            notifier,
        })
    }

    /// Validates a batch, enqueues accepted files in order and starts a
    /// timer for each. Every rejected file produces one notification.
    pub fn submit(&mut self, files: impl IntoIterator<Item = ScanFile>) -> IntakeReport {
        let batch = admit_batch(files);

        for rejection in &batch.rejected {
            self.notifier
                .notify(Notification::error("Unsupported Format", rejection.to_string()));
        }

        let mut accepted = Vec::with_capacity(batch.admitted.len());
        for unit in batch.admitted {
            let id = unit.id();
            let scan = unit.scan_file();
            tracing::info!("Queued {} as unit {}", unit.name(), id);
            self.queue.push(unit);
            self.simulator.start(id, scan);
            accepted.push(id);
        }

        IntakeReport {
            accepted,
            rejected: batch.rejected,
        }
    }

    /// Applies every pending timer event. Returns how many changed a unit.
    ///
    /// A timer that ended without delivering a terminal event (its task
    /// panicked) fails its unit here, after the events it did send.
    pub fn pump(&mut self) -> usize {
        let exited = self.simulator.exited();
        let mut changed = 0;
        while let Ok(event) = self.events.try_recv() {
            changed += self.apply(event.id, event.kind);
        }
        for id in exited {
            self.simulator.release(id);
            if self.queue.get(id).is_some_and(|u| !u.status().is_terminal()) {
                tracing::error!("Simulation for unit {} stopped unexpectedly", id);
                let reason = "simulation stopped unexpectedly".to_string();
                changed += self.apply(id, EventKind::Failed(reason));
            }
        }
        changed
    }

    fn apply(&mut self, id: UnitId, kind: EventKind) -> usize {
        let Some(transition) = self.queue.apply(id, kind) else {
            // Unit was removed; its timer was already cancelled.
            return 0;
        };
        match transition {
            Transition::Ignored => {
                tracing::warn!("Ignored out-of-order event for unit {}", id);
                return 0;
            }
            Transition::EnteredProcessing => {
                tracing::debug!("Unit {} entered processing", id);
            }
            Transition::Completed => {
                self.simulator.release(id);
                self.notify_completed(id);
            }
            Transition::Failed => {
                self.simulator.release(id);
                self.notify_failed(id);
            }
            Transition::Advanced => {}
        }
        1
    }

    /// Cancels the unit's timer, then drops it from the queue.
    pub fn remove(&mut self, id: UnitId) -> Option<UnitOfWork> {
        self.simulator.cancel(id);
        let removed = self.queue.remove(id);
        if let Some(unit) = &removed {
            tracing::info!("Removed {} (unit {})", unit.name(), id);
        }
        removed
    }

    pub fn get(&self, id: UnitId) -> Option<&UnitOfWork> {
        self.queue.get(id)
    }

    pub fn units(&self) -> &[UnitOfWork] {
        self.queue.as_slice()
    }

    pub fn snapshot(&self) -> Vec<UnitOfWork> {
        self.queue.snapshot()
    }

    pub fn summary(&self) -> QueueSummary {
        self.queue.summary()
    }

    /// Whether any unit is still uploading or processing.
    pub fn has_active(&self) -> bool {
        self.summary().in_flight() > 0
    }

    pub fn active_timers(&self) -> usize {
        self.simulator.active()
    }

    /// Cancels every timer. The queue stays readable.
    pub fn shutdown(&mut self) {
        self.simulator.cancel_all();
    }

    fn notify_completed(&self, id: UnitId) {
        let Some(result) = self.queue.get(id).and_then(|u| u.result()) else {
            return;
        };
        self.notifier.notify(Notification::info(
            "Analysis Complete",
            format!(
                "{} detected with {:.1}% confidence.",
                result.classification, result.confidence_score
            ),
        ));
    }

    fn notify_failed(&self, id: UnitId) {
        let Some(unit) = self.queue.get(id) else {
            return;
        };
        self.notifier.notify(Notification::error(
            "Analysis Failed",
            format!("{}: {}", unit.name(), unit.error().unwrap_or("unknown error")),
        ));
    }
}

impl Drop for UploadSession {
    fn drop(&mut self) {
        self.shutdown();
    }
}
