use crate::upload::classifier::Classifier;
use crate::upload::error::SimulationError;
use crate::upload::types::{EventKind, Phase, ScanFile, SimulationEvent, UnitId};
use derivative::Derivative;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

/// Half-open range `[min, max)` a per-tick progress increment is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IncrementRange {
    pub min: f32,
    pub max: f32,
}

impl IncrementRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// A strictly positive minimum is what guarantees every phase ends.
    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min > 0.0 && self.max > self.min
    }

    fn draw(&self, rng: &mut impl Rng) -> f32 {
        rng.random_range(self.min..self.max)
    }
}

/// Timing of the simulated pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub upload_tick_ms: u64,
    pub processing_tick_ms: u64,
    pub phase_delay_ms: u64,
    pub upload_increment: IncrementRange,
    pub processing_increment: IncrementRange,
    /// Fixes every random draw when set.
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            upload_tick_ms: 200,
            processing_tick_ms: 300,
            phase_delay_ms: 500,
            upload_increment: IncrementRange::new(5.0, 25.0),
            processing_increment: IncrementRange::new(3.0, 18.0),
            seed: None,
        }
    }
}

impl SimulationConfig {
    pub fn upload_tick(&self) -> Duration {
        Duration::from_millis(self.upload_tick_ms)
    }

    pub fn processing_tick(&self) -> Duration {
        Duration::from_millis(self.processing_tick_ms)
    }

    pub fn phase_delay(&self) -> Duration {
        Duration::from_millis(self.phase_delay_ms)
    }

    /// Rejects settings under which a phase could never reach 100.
    pub fn validate(&self) -> Result<(), SimulationError> {
        for (field, ms) in [
            ("upload_tick_ms", self.upload_tick_ms),
            ("processing_tick_ms", self.processing_tick_ms),
        ] {
            if ms == 0 {
                return Err(SimulationError::ZeroTick { field });
            }
        }
        for (field, range) in [
            ("upload_increment", self.upload_increment),
            ("processing_increment", self.processing_increment),
        ] {
            if !range.is_valid() {
                return Err(SimulationError::InvalidIncrement {
                    field,
                    min: range.min,
                    max: range.max,
                });
            }
        }
        Ok(())
    }
}

/// Adds `delta` to `progress`, clamped at 100.
pub fn advance(progress: f32, delta: f32) -> f32 {
    (progress + delta).min(100.0)
}

/// Owns one timer task per unit, all spawned on the simulation runtime.
#[derive(Derivative)]
#[derivative(Debug)]
pub struct Simulator {
    #[derivative(Debug = "ignore")]
    runtime: Handle,
    config: SimulationConfig,
    #[derivative(Debug = "ignore")]
    classifier: Arc<dyn Classifier>,
    #[derivative(Debug = "ignore")]
    events: Sender<SimulationEvent>,
    #[derivative(Debug = "ignore")]
    seeds: StdRng,
    #[derivative(Debug = "ignore")]
    timers: HashMap<UnitId, JoinHandle<()>>,
}

impl Simulator {
    pub fn new(
        runtime: Handle,
        config: SimulationConfig,
        classifier: Arc<dyn Classifier>,
        events: Sender<SimulationEvent>,
    ) -> Result<Self, SimulationError> {
        config.validate()?;
        let seeds = StdRng::seed_from_u64(config.seed.unwrap_or_else(rand::random));
        Ok(Self {
            runtime,
            config,
            classifier,
            events,
            seeds,
            timers: HashMap::new(),
        })
    }

    /// Starts the timer for a freshly admitted unit.
    pub fn start(&mut self, id: UnitId, scan: ScanFile) {
        let driver = UnitDriver {
            id,
            scan,
            config: self.config.clone(),
            classifier: Arc::clone(&self.classifier),
            events: self.events.clone(),
            rng: StdRng::seed_from_u64(self.seeds.random()),
        };
        tracing::debug!("Starting simulation for unit {}", id);
        let handle = self.runtime.spawn(driver.run());
        if let Some(stale) = self.timers.insert(id, handle) {
            stale.abort();
        }
    }

    /// Stops the unit's timer. Returns whether a timer was registered.
    pub fn cancel(&mut self, id: UnitId) -> bool {
        match self.timers.remove(&id) {
            Some(handle) => {
                handle.abort();
                tracing::debug!("Cancelled simulation for unit {}", id);
                true
            }
            None => false,
        }
    }

    /// Forgets the handle of a unit whose timer ran to the end.
    pub fn release(&mut self, id: UnitId) {
        self.timers.remove(&id);
    }

    pub fn cancel_all(&mut self) {
        let count = self.timers.len();
        for (_, handle) in self.timers.drain() {
            handle.abort();
        }
        if count > 0 {
            tracing::info!("Cancelled {} running simulations", count);
        }
    }

    /// Units whose task has ended without its handle being released or
    /// cancelled. Once their events are drained, any of these that is
    /// not terminal stopped abnormally.
    pub fn exited(&self) -> Vec<UnitId> {
        self.timers
            .iter()
            .filter(|(_, handle)| handle.is_finished())
            .map(|(id, _)| *id)
            .collect()
    }

    /// Timers that are registered and have not finished yet.
    pub fn active(&self) -> usize {
        self.timers.values().filter(|h| !h.is_finished()).count()
    }
}

impl Drop for Simulator {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

/// State carried by one unit's timer task.
struct UnitDriver {
    id: UnitId,
    scan: ScanFile,
    config: SimulationConfig,
    classifier: Arc<dyn Classifier>,
    events: Sender<SimulationEvent>,
    rng: StdRng,
}

impl UnitDriver {
    async fn run(mut self) {
        let upload = self.config.upload_increment;
        let upload_tick = self.config.upload_tick();
        if self.run_phase(Phase::Uploading, upload_tick, upload).await.is_err() {
            return;
        }

        time::sleep(self.config.phase_delay()).await;
        if self.send(EventKind::ProcessingStarted).is_err() {
            return;
        }

        let processing = self.config.processing_increment;
        let processing_tick = self.config.processing_tick();
        if self
            .run_phase(Phase::Processing, processing_tick, processing)
            .await
            .is_err()
        {
            return;
        }

        let outcome = self.classifier.classify(&self.scan);
        time::sleep(self.config.phase_delay()).await;
        let kind = match outcome {
            Ok(result) => EventKind::Completed(result),
            Err(e) => {
                tracing::warn!("Analysis of {} failed: {}", self.scan.name, e);
                EventKind::Failed(e.to_string())
            }
        };
        let _ = self.send(kind);
    }

    /// Ticks until progress reaches 100. The first tick fires one full
    /// period after the phase starts.
    async fn run_phase(
        &mut self,
        phase: Phase,
        period: Duration,
        increment: IncrementRange,
    ) -> Result<(), Disconnected> {
        let mut ticker = time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut progress = 0.0;
        while progress < 100.0 {
            ticker.tick().await;
            progress = advance(progress, increment.draw(&mut self.rng));
            self.send(EventKind::Progress { phase, progress })?;
        }
        Ok(())
    }

    fn send(&self, kind: EventKind) -> Result<(), Disconnected> {
        self.events
            .send(SimulationEvent { id: self.id, kind })
            .map_err(|_| {
                tracing::debug!("Session gone, stopping unit {}", self.id);
                Disconnected
            })
    }
}

/// The receiving session was torn down.
#[derive(Debug)]
struct Disconnected;
