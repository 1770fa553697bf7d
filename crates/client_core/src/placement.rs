use std::{sync::Arc, time::Duration};

use shared::domain::ScreenPoint;
use tokio::{runtime::Handle, task::JoinHandle};
use tracing::debug;

/// Element that accepts a one-time offset from its laid-out position.
pub trait Placeable: Send + Sync {
    fn apply_offset(&self, offset: ScreenPoint);
}

/// One-shot offset applied after a short delay once the host view mounts.
///
/// Dropping the handle before the delay elapses cancels the pending callback,
/// so a torn-down view is never touched.
pub struct DelayedPlacement {
    task: Option<JoinHandle<()>>,
}

impl DelayedPlacement {
    pub fn schedule(
        runtime: &Handle,
        target: Arc<dyn Placeable>,
        offset: ScreenPoint,
        delay: Duration,
    ) -> Self {
        let task = runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            target.apply_offset(offset);
            debug!(x = offset.x, y = offset.y, "mount placement applied");
        });
        Self { task: Some(task) }
    }

    pub fn is_pending(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            if !task.is_finished() {
                task.abort();
                debug!("mount placement cancelled before it fired");
            }
        }
    }
}

impl Drop for DelayedPlacement {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
#[path = "tests/placement_tests.rs"]
mod tests;
