use super::*;
use std::sync::atomic::{AtomicUsize, Ordering};

const FRAME: Duration = Duration::from_millis(16);

struct RecordingSurface {
    bounds: Mutex<Option<ScreenRect>>,
    detach_calls: AtomicUsize,
    moves: Mutex<Vec<ScreenPoint>>,
}

impl RecordingSurface {
    fn laid_out_at(x: f32, y: f32) -> Arc<Self> {
        Arc::new(Self {
            bounds: Mutex::new(Some(ScreenRect::new(ScreenPoint::new(x, y), 40.0, 20.0))),
            detach_calls: AtomicUsize::new(0),
            moves: Mutex::new(Vec::new()),
        })
    }

    fn missing() -> Arc<Self> {
        Arc::new(Self {
            bounds: Mutex::new(None),
            detach_calls: AtomicUsize::new(0),
            moves: Mutex::new(Vec::new()),
        })
    }

    fn move_count(&self) -> usize {
        self.moves.lock().expect("moves").len()
    }

    fn last_move(&self) -> Option<ScreenPoint> {
        self.moves.lock().expect("moves").last().copied()
    }
}

impl FollowSurface for RecordingSurface {
    fn bounds(&self) -> Option<ScreenRect> {
        *self.bounds.lock().expect("bounds")
    }

    fn detach_from_layout(&self) {
        self.detach_calls.fetch_add(1, Ordering::SeqCst);
    }

    fn move_to(&self, position: ScreenPoint) {
        let mut bounds = self.bounds.lock().expect("bounds");
        if let Some(rect) = bounds.as_mut() {
            rect.origin = position;
        }
        self.moves.lock().expect("moves").push(position);
    }
}

fn follower(surface: Arc<RecordingSurface>) -> PointerFollower {
    PointerFollower::new(
        surface,
        FollowerConfig::new(0.25, FRAME, PointerOffset::default()),
        Handle::current(),
    )
}

#[test]
fn smoothing_converges_without_overshoot() {
    for acceleration in [0.03_f32, 0.25, 0.5, 0.99] {
        let mut state = CursorFollowState::at(ScreenPoint::new(0.0, 0.0));
        state.target = ScreenPoint::new(300.0, -120.0);

        let mut previous_gap = state.current.distance_to(state.target);
        for _ in 0..200 {
            let position = state.step(acceleration);
            let gap = position.distance_to(state.target);
            assert!(gap <= previous_gap, "gap grew at acceleration {acceleration}");
            assert!(position.x <= 300.0, "overshot x at acceleration {acceleration}");
            assert!(position.y >= -120.0, "overshot y at acceleration {acceleration}");
            previous_gap = gap;
        }
    }
}

#[test]
fn step_moves_fixed_fraction_of_gap() {
    let mut state = CursorFollowState::at(ScreenPoint::new(100.0, 50.0));
    state.target = ScreenPoint::new(200.0, 150.0);

    let position = state.step(0.1);

    assert!((position.x - 110.0).abs() < 1e-4);
    assert!((position.y - 60.0).abs() < 1e-4);
}

#[test]
fn pointer_offset_centers_horizontally_and_lifts_by_height() {
    let element = ScreenRect::new(ScreenPoint::default(), 40.0, 20.0);
    let offset = PointerOffset {
        height_factor: 2.0,
        vertical_bias: 780.0,
    };

    let target = offset.target_for(ScreenPoint::new(300.0, 200.0), element);

    assert_eq!(target, ScreenPoint::new(280.0, 940.0));
}

#[test]
fn out_of_range_acceleration_falls_back_to_default() {
    for bad in [0.0_f32, 1.0, 1.5, -0.2, f32::NAN] {
        let config = FollowerConfig::new(bad, FRAME, PointerOffset::default());
        assert_eq!(config.acceleration(), FollowerConfig::DEFAULT_ACCELERATION);
    }
    let config = FollowerConfig::new(0.4, FRAME, PointerOffset::default());
    assert_eq!(config.acceleration(), 0.4);
}

#[tokio::test(start_paused = true)]
async fn repeated_trigger_runs_a_single_loop() {
    let surface = RecordingSurface::laid_out_at(100.0, 100.0);
    let follower = follower(surface.clone());

    follower.trigger();
    follower.trigger();
    assert!(follower.is_active());
    assert_eq!(surface.detach_calls.load(Ordering::SeqCst), 1);

    tokio::time::sleep(FRAME * 20).await;
    follower.trigger();
    tokio::time::sleep(FRAME * 20).await;

    let moves = surface.move_count();
    assert!(
        (39..=43).contains(&moves),
        "expected one frame per tick from a single loop, got {moves}"
    );
    assert_eq!(surface.detach_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn missing_element_is_swallowed() {
    let surface = RecordingSurface::missing();
    let follower = follower(surface.clone());

    follower.trigger();

    assert!(!follower.is_active());
    assert!(follower.position().is_none());
    assert_eq!(surface.detach_calls.load(Ordering::SeqCst), 0);

    *surface.bounds.lock().expect("bounds") =
        Some(ScreenRect::new(ScreenPoint::new(5.0, 5.0), 40.0, 20.0));
    follower.trigger();
    assert!(follower.is_active());
    assert_eq!(follower.position(), Some(ScreenPoint::new(5.0, 5.0)));
}

#[tokio::test(start_paused = true)]
async fn pointer_moves_before_trigger_are_ignored() {
    let surface = RecordingSurface::laid_out_at(100.0, 100.0);
    let follower = follower(surface.clone());

    follower.pointer_moved(ScreenPoint::new(500.0, 500.0));
    assert!(follower.target().is_none());

    follower.trigger();
    assert_eq!(follower.target(), Some(ScreenPoint::new(100.0, 100.0)));
}

#[tokio::test(start_paused = true)]
async fn element_glides_toward_offset_pointer_target() {
    let surface = RecordingSurface::laid_out_at(100.0, 100.0);
    let follower = follower(surface.clone());
    follower.trigger();

    follower.pointer_moved(ScreenPoint::new(300.0, 200.0));
    assert_eq!(follower.target(), Some(ScreenPoint::new(280.0, 160.0)));

    tokio::time::sleep(FRAME * 3).await;
    let early = surface.last_move().expect("moved");
    assert!(early.x > 100.0 && early.x < 280.0);
    assert!(early.y > 100.0 && early.y < 160.0);

    tokio::time::sleep(FRAME * 100).await;
    let settled = surface.last_move().expect("moved");
    assert!((settled.x - 280.0).abs() < 0.5);
    assert!((settled.y - 160.0).abs() < 0.5);
}

#[tokio::test(start_paused = true)]
async fn stop_halts_frames_and_allows_restart() {
    let surface = RecordingSurface::laid_out_at(0.0, 0.0);
    let follower = follower(surface.clone());
    follower.trigger();
    tokio::time::sleep(FRAME * 5).await;

    follower.stop();
    assert!(!follower.is_active());
    tokio::task::yield_now().await;
    let frozen = surface.move_count();
    tokio::time::sleep(FRAME * 10).await;
    assert_eq!(surface.move_count(), frozen);

    follower.trigger();
    assert!(follower.is_active());
    assert_eq!(surface.detach_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn dropping_follower_ends_the_loop() {
    let surface = RecordingSurface::laid_out_at(0.0, 0.0);
    let follower = follower(surface.clone());
    follower.trigger();
    tokio::time::sleep(FRAME * 5).await;

    drop(follower);
    tokio::task::yield_now().await;
    let frozen = surface.move_count();
    tokio::time::sleep(FRAME * 10).await;

    assert_eq!(surface.move_count(), frozen);
}

#[tokio::test(start_paused = true)]
async fn works_as_controller_trigger() {
    let surface = RecordingSurface::laid_out_at(10.0, 10.0);
    let follower: Arc<dyn FollowTrigger> = Arc::new(follower(surface.clone()));

    follower.trigger();
    follower.trigger();

    assert_eq!(surface.detach_calls.load(Ordering::SeqCst), 1);
}
