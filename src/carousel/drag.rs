use crate::carousel::config::CarouselConfig;
use crate::carousel::geometry::ViewportGeometry;
use crate::carousel::navigation::NavigationState;

/// Seconds of release velocity folded into the drag offset, so fast flicks
/// count as larger swipes than slow drags of the same distance.
pub const VELOCITY_PROJECTION_SECONDS: f64 = 0.15;

/// Result of settling a finished drag gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureOutcome {
    /// Geometry not ready; the gesture carries no meaning.
    Ignored,
    /// Below the swipe threshold: animate back to the current index.
    Cancelled,
    /// Swipe recognized: settle at this index.
    MoveTo(usize),
}

/// True when a pointer drag should be recognized at all.
///
/// Dragging is off when disabled by configuration, when the container has no
/// measured width yet, and when looping is off while every item already fits
/// on one page.
pub fn drag_allowed(
    config: &CarouselConfig,
    state: &NavigationState,
    geometry: &ViewportGeometry,
) -> bool {
    config.drag_enabled
        && geometry.is_measured()
        && state.item_count() > 0
        && (config.loop_enabled || state.item_count() > state.effective_visible())
}

/// Offset the gesture "would have" reached with momentum.
pub fn projected_offset(offset_px: f64, velocity_px_per_s: f64) -> f64 {
    offset_px + velocity_px_per_s * VELOCITY_PROJECTION_SECONDS
}

/// Convert a finished drag (offset + release velocity, in pointer space where
/// negative means the content moved left) into a discrete index outcome.
pub fn settle(
    offset_px: f64,
    velocity_px_per_s: f64,
    state: &NavigationState,
    geometry: &ViewportGeometry,
    loop_enabled: bool,
) -> GestureOutcome {
    let step = geometry.step();
    if step <= 0.0 || state.item_count() == 0 {
        return GestureOutcome::Ignored;
    }

    let projected = projected_offset(offset_px, velocity_px_per_s);
    if projected.abs() <= step / 2.0 {
        return GestureOutcome::Cancelled;
    }

    // Dragging content left (negative offset) advances the index.
    let magnitude = ((projected.abs() / step).round() as i64).max(1);
    let moved = -projected.signum() as i64 * magnitude;
    let target = state.current_index() as i64 + moved;

    let max_index = state.max_index() as i64;
    let settled = if loop_enabled {
        let wrapped = target.rem_euclid(state.item_count() as i64);
        wrapped.min(max_index)
    } else {
        target.clamp(0, max_index)
    };
    GestureOutcome::MoveTo(settled as usize)
}

/// Release-velocity estimator fed with `(offset, time)` samples while a drag
/// is in progress.
#[derive(Debug, Default)]
pub struct VelocityTracker {
    prev: Option<(f64, u32)>,
    last: Option<(f64, u32)>,
}

impl VelocityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget all samples; called on drag begin.
    pub fn reset(&mut self) {
        self.prev = None;
        self.last = None;
    }

    /// Record the current drag offset at an event timestamp (milliseconds).
    /// Samples with a repeated timestamp replace the previous one.
    pub fn sample(&mut self, offset_px: f64, time_ms: u32) {
        match self.last {
            Some((_, t)) if t == time_ms => {
                self.last = Some((offset_px, time_ms));
            }
            Some(last) => {
                self.prev = Some(last);
                self.last = Some((offset_px, time_ms));
            }
            None => {
                self.last = Some((offset_px, time_ms));
            }
        }
    }

    /// Release velocity in px/s over the most recent sample pair; 0 when
    /// fewer than two distinct-timestamp samples exist.
    pub fn velocity(&self) -> f64 {
        let (Some((prev_offset, prev_t)), Some((last_offset, last_t))) = (self.prev, self.last)
        else {
            return 0.0;
        };
        let dt_ms = last_t.wrapping_sub(prev_t);
        if dt_ms == 0 {
            return 0.0;
        }
        (last_offset - prev_offset) / (dt_ms as f64 / 1000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry(item_width: f64, gap: f64) -> ViewportGeometry {
        ViewportGeometry {
            visible_count: 3,
            item_width_px: item_width,
            gap_px: gap,
        }
    }

    #[test]
    fn test_swipe_threshold() {
        // step = 300, threshold = 150
        let state = NavigationState::new(5, 3);
        let geo = geometry(300.0, 0.0);

        // Just past the threshold moves exactly one item back.
        assert_eq!(
            settle(151.0, 0.0, &state, &geo, false),
            GestureOutcome::MoveTo(0)
        );
        let mut advanced = NavigationState::new(5, 3);
        advanced.go_to(1);
        assert_eq!(
            settle(151.0, 0.0, &advanced, &geo, false),
            GestureOutcome::MoveTo(0)
        );

        // Below the threshold cancels.
        assert_eq!(
            settle(140.0, 0.0, &state, &geo, false),
            GestureOutcome::Cancelled
        );
        // Exactly at the threshold cancels too.
        assert_eq!(
            settle(150.0, 0.0, &state, &geo, false),
            GestureOutcome::Cancelled
        );
    }

    #[test]
    fn test_drag_left_advances() {
        let state = NavigationState::new(5, 3);
        let geo = geometry(300.0, 0.0);
        assert_eq!(
            settle(-200.0, 0.0, &state, &geo, false),
            GestureOutcome::MoveTo(1)
        );
    }

    #[test]
    fn test_velocity_projection_turns_slow_drag_into_swipe() {
        let state = NavigationState::new(5, 3);
        let geo = geometry(300.0, 0.0);
        // 100px drag alone cancels; with a -500px/s flick it projects to
        // -175px and advances.
        assert_eq!(
            settle(-100.0, 0.0, &state, &geo, false),
            GestureOutcome::Cancelled
        );
        assert_eq!(
            settle(-100.0, -500.0, &state, &geo, false),
            GestureOutcome::MoveTo(1)
        );
    }

    #[test]
    fn test_fast_flick_moves_multiple_items() {
        let state = NavigationState::new(8, 3);
        let geo = geometry(300.0, 0.0);
        // Projected -650px rounds to two steps.
        assert_eq!(
            settle(-650.0, 0.0, &state, &geo, false),
            GestureOutcome::MoveTo(2)
        );
    }

    #[test]
    fn test_loop_wraps_backward_to_last_page() {
        // 5 items, 3 visible, at index 0: swiping back wraps to max_index.
        let state = NavigationState::new(5, 3);
        let geo = geometry(300.0, 0.0);
        assert_eq!(
            settle(400.0, 0.0, &state, &geo, true),
            GestureOutcome::MoveTo(2)
        );
    }

    #[test]
    fn test_loop_forward_wrap_clamps_to_reachable_page() {
        // At the last page, one more forward step wraps modulo the item
        // count and clamps into the reachable range.
        let mut state = NavigationState::new(5, 3);
        state.go_to(2);
        let geo = geometry(300.0, 0.0);
        let GestureOutcome::MoveTo(index) = settle(-400.0, 0.0, &state, &geo, true) else {
            panic!("expected a move");
        };
        assert!(index <= state.max_index());
    }

    #[test]
    fn test_no_loop_clamps_at_edges() {
        let state = NavigationState::new(5, 3);
        let geo = geometry(300.0, 0.0);
        // Huge backward swipe at index 0 stays at 0.
        assert_eq!(
            settle(2000.0, 0.0, &state, &geo, false),
            GestureOutcome::MoveTo(0)
        );
        // Huge forward swipe clamps at max_index.
        assert_eq!(
            settle(-2000.0, 0.0, &state, &geo, false),
            GestureOutcome::MoveTo(2)
        );
    }

    #[test]
    fn test_unmeasured_geometry_ignores_gesture() {
        let state = NavigationState::new(5, 3);
        assert_eq!(
            settle(300.0, 0.0, &state, &ViewportGeometry::unmeasured(), true),
            GestureOutcome::Ignored
        );
    }

    #[test]
    fn test_drag_allowed_gating() {
        let config = CarouselConfig::default();
        let geo = geometry(300.0, 20.0);

        assert!(drag_allowed(&config, &NavigationState::new(5, 3), &geo));
        assert!(!drag_allowed(
            &config,
            &NavigationState::new(5, 3),
            &ViewportGeometry::unmeasured()
        ));
        assert!(!drag_allowed(&config, &NavigationState::new(0, 1), &geo));

        let no_drag = CarouselConfig {
            drag_enabled: false,
            ..CarouselConfig::default()
        };
        assert!(!drag_allowed(&no_drag, &NavigationState::new(5, 3), &geo));

        // Loop off + everything fits on one page: nothing to drag.
        let no_loop = CarouselConfig {
            loop_enabled: false,
            ..CarouselConfig::default()
        };
        assert!(!drag_allowed(&no_loop, &NavigationState::new(3, 3), &geo));
        assert!(drag_allowed(&no_loop, &NavigationState::new(5, 3), &geo));
    }

    #[test]
    fn test_velocity_tracker() {
        let mut tracker = VelocityTracker::new();
        assert_eq!(tracker.velocity(), 0.0);

        tracker.sample(0.0, 1000);
        assert_eq!(tracker.velocity(), 0.0);

        tracker.sample(-30.0, 1016);
        // -30px over 16ms = -1875 px/s
        assert!((tracker.velocity() + 1875.0).abs() < 0.001);

        tracker.sample(-60.0, 1048);
        assert!((tracker.velocity() + 937.5).abs() < 0.001);

        // Repeated timestamp replaces the sample instead of dividing by zero.
        tracker.sample(-70.0, 1048);
        assert!(tracker.velocity().is_finite());

        tracker.reset();
        assert_eq!(tracker.velocity(), 0.0);
    }
}
