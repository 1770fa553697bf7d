//! Decorative element that glides after the pointer.
//!
//! Once triggered, a frame loop moves the element a fixed fraction of the
//! remaining distance toward the pointer target on every tick. Pointer events
//! update the target independently of the loop.

use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use shared::domain::{ScreenPoint, ScreenRect};
use tokio::{
    runtime::Handle,
    task::JoinHandle,
    time::{interval, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::{config::Settings, controller::FollowTrigger, error::FollowError};

/// Handle to the on-screen element the follower moves.
pub trait FollowSurface: Send + Sync {
    /// Current on-screen rectangle, or `None` if the element is not laid out.
    fn bounds(&self) -> Option<ScreenRect>;
    /// Take the element out of normal layout so it can be positioned freely.
    fn detach_from_layout(&self);
    fn move_to(&self, position: ScreenPoint);
}

/// Maps a raw pointer position to the element's top-left target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerOffset {
    pub height_factor: f32,
    pub vertical_bias: f32,
}

impl Default for PointerOffset {
    fn default() -> Self {
        Self {
            height_factor: 2.0,
            vertical_bias: 0.0,
        }
    }
}

impl PointerOffset {
    pub fn target_for(&self, pointer: ScreenPoint, element: ScreenRect) -> ScreenPoint {
        ScreenPoint::new(
            pointer.x - element.width / 2.0,
            pointer.y - element.height * self.height_factor + self.vertical_bias,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FollowerConfig {
    acceleration: f32,
    frame_interval: Duration,
    offset: PointerOffset,
}

impl Default for FollowerConfig {
    fn default() -> Self {
        Self {
            acceleration: Self::DEFAULT_ACCELERATION,
            frame_interval: Self::DEFAULT_FRAME_INTERVAL,
            offset: PointerOffset::default(),
        }
    }
}

impl FollowerConfig {
    pub const DEFAULT_ACCELERATION: f32 = 0.03;
    pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(16);

    /// Acceleration must lie strictly between 0 and 1; anything else falls
    /// back to the default.
    pub fn new(acceleration: f32, frame_interval: Duration, offset: PointerOffset) -> Self {
        let acceleration = if acceleration > 0.0 && acceleration < 1.0 {
            acceleration
        } else {
            warn!(
                acceleration,
                "follow acceleration outside (0, 1); using default"
            );
            Self::DEFAULT_ACCELERATION
        };
        Self {
            acceleration,
            frame_interval: frame_interval.max(Duration::from_millis(1)),
            offset,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            settings.follow_acceleration,
            settings.follow_frame_interval(),
            PointerOffset {
                height_factor: settings.follow_height_factor,
                vertical_bias: settings.follow_vertical_bias,
            },
        )
    }

    pub fn acceleration(&self) -> f32 {
        self.acceleration
    }

    pub fn frame_interval(&self) -> Duration {
        self.frame_interval
    }

    pub fn offset(&self) -> PointerOffset {
        self.offset
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CursorFollowState {
    pub current: ScreenPoint,
    pub target: ScreenPoint,
}

impl CursorFollowState {
    pub fn at(position: ScreenPoint) -> Self {
        Self {
            current: position,
            target: position,
        }
    }

    /// Advances `current` toward `target` by `acceleration` of the gap on
    /// each axis and returns the new position.
    pub fn step(&mut self, acceleration: f32) -> ScreenPoint {
        self.current.x += acceleration * (self.target.x - self.current.x);
        self.current.y += acceleration * (self.target.y - self.current.y);
        self.current
    }
}

struct ActiveLoop {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

type SharedFollowState = Arc<Mutex<Option<CursorFollowState>>>;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct PointerFollower {
    surface: Arc<dyn FollowSurface>,
    config: FollowerConfig,
    runtime: Handle,
    state: SharedFollowState,
    active: Mutex<Option<ActiveLoop>>,
}

impl PointerFollower {
    pub fn new(surface: Arc<dyn FollowSurface>, config: FollowerConfig, runtime: Handle) -> Self {
        Self {
            surface,
            config,
            runtime,
            state: Arc::new(Mutex::new(None)),
            active: Mutex::new(None),
        }
    }

    /// Starts following. Does nothing if a loop is already running; a missing
    /// element is logged and otherwise ignored.
    pub fn trigger(&self) {
        if let Err(err) = self.start() {
            warn!("pointer follower not started: {err}");
        }
    }

    fn start(&self) -> Result<(), FollowError> {
        let mut active = lock(&self.active);
        if active.as_ref().is_some_and(|running| !running.task.is_finished()) {
            debug!("pointer follower already active");
            return Ok(());
        }

        let bounds = self.surface.bounds().ok_or(FollowError::TargetMissing)?;
        self.surface.detach_from_layout();
        *lock(&self.state) = Some(CursorFollowState::at(bounds.origin));

        let cancel = CancellationToken::new();
        let task = self.runtime.spawn(run_follow_loop(
            Arc::clone(&self.surface),
            Arc::clone(&self.state),
            self.config,
            cancel.clone(),
        ));
        *active = Some(ActiveLoop { cancel, task });
        info!(
            x = bounds.origin.x,
            y = bounds.origin.y,
            "pointer follower started"
        );
        Ok(())
    }

    /// Feeds a raw pointer position. Ignored until the follower is triggered.
    pub fn pointer_moved(&self, pointer: ScreenPoint) {
        let mut state = lock(&self.state);
        let Some(follow) = state.as_mut() else {
            return;
        };
        if let Some(bounds) = self.surface.bounds() {
            follow.target = self.config.offset.target_for(pointer, bounds);
        }
    }

    pub fn is_active(&self) -> bool {
        lock(&self.active)
            .as_ref()
            .is_some_and(|running| !running.task.is_finished())
    }

    pub fn position(&self) -> Option<ScreenPoint> {
        lock(&self.state).map(|follow| follow.current)
    }

    pub fn target(&self) -> Option<ScreenPoint> {
        lock(&self.state).map(|follow| follow.target)
    }

    pub fn stop(&self) {
        if let Some(running) = lock(&self.active).take() {
            running.cancel.cancel();
            debug!("pointer follower stop requested");
        }
    }
}

impl FollowTrigger for PointerFollower {
    fn trigger(&self) {
        PointerFollower::trigger(self);
    }
}

impl Drop for PointerFollower {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn run_follow_loop(
    surface: Arc<dyn FollowSurface>,
    state: SharedFollowState,
    config: FollowerConfig,
    cancel: CancellationToken,
) {
    let mut frames = interval(config.frame_interval);
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);
    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = frames.tick() => {
                let next = lock(&state).as_mut().map(|follow| follow.step(config.acceleration));
                let Some(position) = next else {
                    break;
                };
                surface.move_to(position);
            }
        }
    }
    debug!("pointer follower loop exited");
}

#[cfg(test)]
#[path = "tests/follower_tests.rs"]
mod tests;
