//! Dedicated thread owning the tokio runtime used by the UI.

use std::thread;

use anyhow::{anyhow, Context};
use crossbeam_channel::bounded;
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;

pub struct BackendRuntime {
    handle: Handle,
    shutdown: CancellationToken,
    worker: Option<thread::JoinHandle<()>>,
}

impl BackendRuntime {
    pub fn handle(&self) -> Handle {
        self.handle.clone()
    }
}

impl Drop for BackendRuntime {
    fn drop(&mut self) {
        self.shutdown.cancel();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                tracing::error!("backend worker panicked during shutdown");
            }
        }
    }
}

pub fn launch() -> anyhow::Result<BackendRuntime> {
    let (handle_tx, handle_rx) = bounded::<Result<Handle, String>>(1);
    let shutdown = CancellationToken::new();
    let worker_shutdown = shutdown.clone();

    let worker = thread::Builder::new()
        .name("askpdf-backend".to_string())
        .spawn(move || {
            let runtime = match tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => runtime,
                Err(err) => {
                    tracing::error!("failed to build backend runtime: {err}");
                    let _ = handle_tx.send(Err(err.to_string()));
                    return;
                }
            };
            let _ = handle_tx.send(Ok(runtime.handle().clone()));
            runtime.block_on(worker_shutdown.cancelled());
            tracing::info!("backend worker stopped");
        })
        .context("failed to spawn backend worker thread")?;

    let handle = handle_rx
        .recv()
        .context("backend worker exited during startup")?
        .map_err(|err| anyhow!("backend worker startup failure: {err}"))?;

    Ok(BackendRuntime {
        handle,
        shutdown,
        worker: Some(worker),
    })
}
