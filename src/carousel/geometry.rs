use crate::carousel::config::CarouselConfig;

/// Window width below which the `narrow` visible-count override applies.
pub const NARROW_BREAKPOINT_PX: f64 = 768.0;
/// Window width below which the `medium` visible-count override applies.
pub const MEDIUM_BREAKPOINT_PX: f64 = 1024.0;
/// Fallback root font size when the pango context is not measurable yet.
pub const DEFAULT_ROOT_FONT_PX: f64 = 16.0;

/// Derived per-layout geometry for the carousel strip.
///
/// Recomputed whenever the container resizes or the visible-count or item
/// list changes. Invariant (when measured):
/// `item_width_px * visible_count + gap_px * (visible_count - 1)` fills the
/// container width, within rounding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportGeometry {
    pub visible_count: usize,
    pub item_width_px: f64,
    pub gap_px: f64,
}

impl ViewportGeometry {
    /// Geometry for a container that has not been measured yet. Consuming
    /// code must tolerate zero width without animating.
    pub fn unmeasured() -> Self {
        Self {
            visible_count: 1,
            item_width_px: 0.0,
            gap_px: 0.0,
        }
    }

    /// Distance between the leading edges of two adjacent items.
    pub fn step(&self) -> f64 {
        self.item_width_px + self.gap_px
    }

    /// False until a real container width has produced nonzero item widths.
    pub fn is_measured(&self) -> bool {
        self.item_width_px > 0.0
    }

    /// Resting strip offset for a given index.
    pub fn offset_for_index(&self, index: usize) -> f64 {
        index as f64 * self.step()
    }
}

/// Resolve the effective visible-item count for the current window width.
///
/// Resolution order: below the narrow breakpoint the `narrow` override wins;
/// below the medium breakpoint the smaller of the `medium` override and the
/// configured count wins; otherwise the configured count. The result is
/// always clamped to the item count and floors at 1 while items exist.
pub fn resolve_visible_count(
    window_width_px: f64,
    config: &CarouselConfig,
    item_count: usize,
) -> usize {
    let target = if window_width_px < NARROW_BREAKPOINT_PX {
        config.responsive.narrow
    } else if window_width_px < MEDIUM_BREAKPOINT_PX {
        config.responsive.medium.min(config.visible_count)
    } else {
        config.visible_count
    };
    target.max(1).min(item_count.max(1))
}

/// Convert the configured em gap to pixels via the root font size.
pub fn gap_px(gap_em: f64, root_font_px: f64) -> f64 {
    let font = if root_font_px > 0.0 {
        root_font_px
    } else {
        DEFAULT_ROOT_FONT_PX
    };
    (gap_em * font).max(0.0)
}

/// Per-item width for a container, after subtracting inter-item gaps.
pub fn item_width(container_width_px: f64, gap_px: f64, visible_count: usize) -> f64 {
    let visible = visible_count.max(1);
    if container_width_px <= 0.0 {
        return 0.0;
    }
    let total_gap = gap_px * (visible - 1) as f64;
    ((container_width_px - total_gap) / visible as f64).max(0.0)
}

/// Compute the full geometry for one layout pass.
pub fn compute(
    container_width_px: f64,
    window_width_px: f64,
    config: &CarouselConfig,
    item_count: usize,
    root_font_px: f64,
) -> ViewportGeometry {
    let visible_count = resolve_visible_count(window_width_px, config, item_count);
    let gap = gap_px(config.gap_em, root_font_px);
    ViewportGeometry {
        visible_count,
        item_width_px: item_width(container_width_px, gap, visible_count),
        gap_px: gap,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with(visible: usize, narrow: usize, medium: usize) -> CarouselConfig {
        CarouselConfig {
            visible_count: visible,
            responsive: crate::carousel::config::ResponsiveVisible { narrow, medium },
            ..CarouselConfig::default()
        }
    }

    #[test]
    fn test_item_width_wide_window() {
        // 1200px container, 3 visible, 24px gap: (1200 - 2*24) / 3 = 384
        let w = item_width(1200.0, 24.0, 3);
        assert!((w - 384.0).abs() < 0.001);
    }

    #[test]
    fn test_fill_invariant() {
        let config = config_with(4, 1, 2);
        let geometry = compute(1280.0, 1280.0, &config, 10, 16.0);
        let filled = geometry.item_width_px * geometry.visible_count as f64
            + geometry.gap_px * (geometry.visible_count - 1) as f64;
        assert!((filled - 1280.0).abs() < 0.001);
    }

    #[test]
    fn test_narrow_breakpoint_recompute() {
        let config = config_with(3, 1, 2);
        // Window narrowed below 768 while the container keeps its width:
        // one item fills the whole container, the gap term drops out.
        assert_eq!(resolve_visible_count(767.0, &config, 5), 1);
        let geometry = compute(1200.0, 767.0, &config, 5, 16.0);
        assert_eq!(geometry.visible_count, 1);
        assert!((geometry.item_width_px - 1200.0).abs() < 0.001);
    }

    #[test]
    fn test_medium_breakpoint_takes_min_with_configured() {
        let config = config_with(3, 1, 2);
        assert_eq!(resolve_visible_count(1000.0, &config, 5), 2);
        // Configured target below the medium override wins.
        let low_target = config_with(1, 1, 4);
        assert_eq!(resolve_visible_count(1000.0, &low_target, 5), 1);
    }

    #[test]
    fn test_visible_count_clamped_to_item_count() {
        let config = config_with(3, 1, 2);
        assert_eq!(resolve_visible_count(1920.0, &config, 2), 2);
        assert_eq!(resolve_visible_count(1920.0, &config, 1), 1);
        // No items still resolves to 1; callers suppress navigation anyway.
        assert_eq!(resolve_visible_count(1920.0, &config, 0), 1);
    }

    #[test]
    fn test_unmeasured_container() {
        let config = config_with(3, 1, 2);
        let geometry = compute(0.0, 1920.0, &config, 5, 16.0);
        assert!(!geometry.is_measured());
        assert_eq!(geometry.item_width_px, 0.0);
        assert_eq!(ViewportGeometry::unmeasured().step(), 0.0);
    }

    #[test]
    fn test_gap_conversion() {
        assert!((gap_px(1.5, 16.0) - 24.0).abs() < 0.001);
        // Unmeasurable root font falls back to 16px.
        assert!((gap_px(1.5, 0.0) - 24.0).abs() < 0.001);
        assert_eq!(gap_px(-1.0, 16.0), 0.0);
    }

    #[test]
    fn test_gap_wider_than_container() {
        assert_eq!(item_width(100.0, 60.0, 3), 0.0);
    }

    #[test]
    fn test_offset_for_index() {
        let geometry = ViewportGeometry {
            visible_count: 3,
            item_width_px: 300.0,
            gap_px: 20.0,
        };
        assert!((geometry.offset_for_index(2) - 640.0).abs() < 0.001);
    }
}
