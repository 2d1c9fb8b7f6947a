use crate::upload::types::{EventKind, Transition, UnitId, UnitOfWork, UnitStatus};
use std::collections::HashMap;

/// Counts per status, rendered as the queue's status line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueSummary {
    pub total: usize,
    pub uploading: usize,
    pub processing: usize,
    pub completed: usize,
    pub errored: usize,
}

impl QueueSummary {
    pub fn in_flight(&self) -> usize {
        self.uploading + self.processing
    }

    /// Share of units that reached a terminal state, in `[0, 1]`.
    pub fn finished_fraction(&self) -> f32 {
        if self.total == 0 {
            0.0
        } else {
            (self.completed + self.errored) as f32 / self.total as f32
        }
    }

    pub fn status_text(&self) -> String {
        format!(
            "Queue: {} files | ⏳ Uploading: {} | 🧠 Processing: {} | ✅ Completed: {} | ❌ Failed: {}",
            self.total, self.uploading, self.processing, self.completed, self.errored
        )
    }
}

/// Units in submission order, with an id index for constant-time lookup.
#[derive(Debug, Default)]
pub struct WorkQueue {
    units: Vec<UnitOfWork>,
    index: HashMap<UnitId, usize>,
}

impl WorkQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, unit: UnitOfWork) {
        self.index.insert(unit.id(), self.units.len());
        self.units.push(unit);
    }

    pub fn get(&self, id: UnitId) -> Option<&UnitOfWork> {
        self.index.get(&id).map(|&pos| &self.units[pos])
    }

    /// Applies a timer event to the unit with `id`. Unknown ids (already
    /// removed) yield `None` and leave the queue untouched.
    pub fn apply(&mut self, id: UnitId, kind: EventKind) -> Option<Transition> {
        let pos = *self.index.get(&id)?;
        Some(self.units[pos].apply(kind))
    }

    pub fn remove(&mut self, id: UnitId) -> Option<UnitOfWork> {
        let pos = self.index.remove(&id)?;
        let unit = self.units.remove(pos);
        for later in &self.units[pos..] {
            if let Some(slot) = self.index.get_mut(&later.id()) {
                *slot -= 1;
            }
        }
        Some(unit)
    }

    pub fn iter(&self) -> impl Iterator<Item = &UnitOfWork> {
        self.units.iter()
    }

    pub fn as_slice(&self) -> &[UnitOfWork] {
        &self.units
    }

    pub fn snapshot(&self) -> Vec<UnitOfWork> {
        self.units.clone()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn summary(&self) -> QueueSummary {
        let mut summary = QueueSummary {
            total: self.units.len(),
            ..QueueSummary::default()
        };
        for unit in &self.units {
            match unit.status() {
                UnitStatus::Uploading => summary.uploading += 1,
                UnitStatus::Processing => summary.processing += 1,
                UnitStatus::Completed => summary.completed += 1,
                UnitStatus::Errored => summary.errored += 1,
            }
        }
        summary
    }
}
