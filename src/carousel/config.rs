/// Spring parameters for the position animation.
///
/// A plain `Copy` value: each widget instance gets its own copy, so there is
/// no shared animation state between carousels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringParams {
    pub stiffness: f64,
    pub damping: f64,
    pub mass: f64,
}

impl Default for SpringParams {
    fn default() -> Self {
        Self {
            stiffness: 300.0,
            damping: 30.0,
            mass: 1.0,
        }
    }
}

/// Visible-count overrides applied below the narrow/medium window-width
/// breakpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponsiveVisible {
    /// Items shown below the narrow breakpoint (< 768 px).
    pub narrow: usize,
    /// Items shown below the medium breakpoint (< 1024 px).
    pub medium: usize,
}

impl Default for ResponsiveVisible {
    fn default() -> Self {
        Self { narrow: 1, medium: 2 }
    }
}

/// Configuration for a carousel instance.
///
/// Fixed at widget creation; callers replace it wholesale via
/// `CarouselView::set_config` rather than mutating fields piecemeal.
#[derive(Debug, Clone)]
pub struct CarouselConfig {
    /// Target items shown at once on a wide window (default: 3)
    pub visible_count: usize,
    /// Breakpoint overrides for narrower windows
    pub responsive: ResponsiveVisible,
    /// Spacing between items in em units (default: 1.5)
    pub gap_em: f64,
    /// Wrap from the last page to the first and back (default: true)
    pub loop_enabled: bool,
    /// Recognize pointer drags as swipes (default: true)
    pub drag_enabled: bool,
    /// Render the previous/next overlay buttons (default: true)
    pub show_navigation_buttons: bool,
    /// Spring parameters for the position animation
    pub animation: SpringParams,
    /// Message shown when the item list is empty
    pub empty_state_message: String,
    /// Accessible name announced for the carousel region
    pub carousel_label: String,
    /// Fixed height of the slide image area in pixels
    pub image_height_px: i32,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            visible_count: 3,
            responsive: ResponsiveVisible::default(),
            gap_em: 1.5,
            loop_enabled: true,
            drag_enabled: true,
            show_navigation_buttons: true,
            animation: SpringParams::default(),
            empty_state_message: "No portfolio items to display at the moment.".to_string(),
            carousel_label: "Portfolio highlights".to_string(),
            image_height_px: 256,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CarouselConfig::default();
        assert_eq!(config.visible_count, 3);
        assert_eq!(config.responsive, ResponsiveVisible { narrow: 1, medium: 2 });
        assert!((config.gap_em - 1.5).abs() < f64::EPSILON);
        assert!(config.loop_enabled);
        assert!(config.drag_enabled);
        assert!(config.show_navigation_buttons);
        assert_eq!(
            config.animation,
            SpringParams {
                stiffness: 300.0,
                damping: 30.0,
                mass: 1.0
            }
        );
        assert!(!config.empty_state_message.is_empty());
    }
}
