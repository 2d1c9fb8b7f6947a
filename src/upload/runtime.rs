use std::thread::JoinHandle;
use tokio::runtime::{Builder, Handle};
use tokio::sync::oneshot;

/// A single-threaded tokio runtime driven from a background thread.
///
/// Every unit timer is multiplexed onto this one event loop; the UI thread
/// only spawns onto it through [`SimulationRuntime::handle`].
pub struct SimulationRuntime {
    handle: Handle,
    shutdown: Option<oneshot::Sender<()>>,
    thread: Option<JoinHandle<()>>,
}

impl SimulationRuntime {
    pub fn start() -> std::io::Result<Self> {
        let rt = Builder::new_current_thread().enable_time().build()?;
        let handle = rt.handle().clone();
        let (shutdown, stopped) = oneshot::channel::<()>();

        let thread = std::thread::Builder::new()
            .name("neurovision-simulation".into())
            .spawn(move || {
                tracing::debug!("Simulation runtime started");
                rt.block_on(async {
                    let _ = stopped.await;
                });
                tracing::debug!("Simulation runtime stopped");
            })?;

        Ok(Self {
            handle,
            shutdown: Some(shutdown),
            thread: Some(thread),
        })
    }

    pub fn handle(&self) -> Handle {
        self.handle.clone()
    }
}

impl Drop for SimulationRuntime {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                tracing::error!("Simulation runtime thread panicked");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::time::Duration;

    #[test]
    fn spawned_tasks_run_on_the_background_loop() {
        let runtime = SimulationRuntime::start().expect("runtime");
        let (tx, rx) = mpsc::channel();
        runtime.handle().spawn(async move {
            tokio::time::sleep(Duration::from_millis(5)).await;
            let _ = tx.send(std::thread::current().name().map(str::to_string));
        });
        let name = rx.recv_timeout(Duration::from_secs(5)).expect("task ran");
        assert_eq!(name.as_deref(), Some("neurovision-simulation"));
    }
}
