use crate::carousel::config::CarouselConfig;

/// Paged navigation state for the carousel.
///
/// The carousel advances in discrete pages of `effective_visible` items;
/// `max_index` is the last valid starting index. All transitions clamp or
/// wrap defensively — there are no error states and out-of-range requests
/// are never rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationState {
    current_index: usize,
    item_count: usize,
    effective_visible: usize,
}

impl NavigationState {
    pub fn new(item_count: usize, effective_visible: usize) -> Self {
        Self {
            current_index: 0,
            item_count,
            effective_visible: effective_visible.max(1),
        }
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn item_count(&self) -> usize {
        self.item_count
    }

    pub fn effective_visible(&self) -> usize {
        self.effective_visible
    }

    /// Last valid starting index.
    pub fn max_index(&self) -> usize {
        self.item_count.saturating_sub(self.effective_visible)
    }

    /// Number of reachable pages (one dot per page).
    pub fn pages(&self) -> usize {
        self.max_index() + 1
    }

    /// True when any movement is possible: either the pages wrap, or there
    /// are more items than fit at once.
    pub fn can_navigate(&self, loop_enabled: bool) -> bool {
        self.item_count > 0 && (loop_enabled || self.item_count > self.effective_visible)
    }

    /// Move one page forward. Wraps to the first page at the end when
    /// looping. Returns true if the index changed.
    pub fn advance(&mut self, loop_enabled: bool) -> bool {
        if self.item_count == 0 {
            return false;
        }
        let old = self.current_index;
        if loop_enabled && self.current_index >= self.max_index() {
            self.current_index = 0;
        } else {
            self.current_index = (self.current_index + 1).min(self.max_index());
        }
        old != self.current_index
    }

    /// Move one page back. Jumps to the last page from the start when
    /// looping. Returns true if the index changed.
    pub fn retreat(&mut self, loop_enabled: bool) -> bool {
        if self.item_count == 0 {
            return false;
        }
        let old = self.current_index;
        if loop_enabled && self.current_index == 0 {
            self.current_index = self.max_index();
        } else {
            self.current_index = self.current_index.saturating_sub(1);
        }
        old != self.current_index
    }

    /// Jump to a page, clamped into `[0, max_index]`. Used by the dot
    /// indicators. Returns true if the index changed.
    pub fn go_to(&mut self, index: usize) -> bool {
        let old = self.current_index;
        self.current_index = index.min(self.max_index());
        old != self.current_index
    }

    /// Set the index directly without clamping checks beyond `max_index`;
    /// used by the drag interpreter which has already wrapped/clamped.
    pub fn settle_at(&mut self, index: usize) {
        self.current_index = index.min(self.max_index());
    }

    /// Adopt a new item count and visible count after a geometry or list
    /// change, clamping the index back into range. Returns true when the
    /// index moved and the position animation must re-run.
    pub fn reconcile(&mut self, item_count: usize, effective_visible: usize) -> bool {
        self.item_count = item_count;
        self.effective_visible = effective_visible.max(1);
        if self.current_index > self.max_index() {
            self.current_index = self.max_index();
            return true;
        }
        false
    }
}

/// Which navigation affordances should render for the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlVisibility {
    pub prev_button: bool,
    pub next_button: bool,
    /// Number of dot indicators to render; 0 hides the dot strip.
    pub dots: usize,
    /// Whether arrow keys should act (and the widget accept focus).
    pub keyboard: bool,
}

impl ControlVisibility {
    /// Resolve visibility from the navigation state and configuration.
    /// An empty item list suppresses every control.
    pub fn resolve(state: &NavigationState, config: &CarouselConfig) -> Self {
        let looping = config.loop_enabled;
        let can_navigate = state.can_navigate(looping);
        let buttons = config.show_navigation_buttons && can_navigate;
        Self {
            prev_button: buttons && (looping || state.current_index() > 0),
            next_button: buttons && (looping || state.current_index() < state.max_index()),
            dots: if can_navigate && state.pages() > 1 {
                state.pages()
            } else {
                0
            },
            keyboard: can_navigate,
        }
    }

    pub fn none() -> Self {
        Self {
            prev_button: false,
            next_button: false,
            dots: 0,
            keyboard: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loop_wraparound() {
        // 5 items, 3 visible: max_index = 2.
        let mut nav = NavigationState::new(5, 3);
        assert_eq!(nav.max_index(), 2);

        nav.go_to(2);
        assert!(nav.advance(true));
        assert_eq!(nav.current_index(), 0);

        assert!(nav.retreat(true));
        assert_eq!(nav.current_index(), 2);
    }

    #[test]
    fn test_no_loop_clamping() {
        let mut nav = NavigationState::new(5, 3);
        nav.go_to(2);
        assert!(!nav.advance(false));
        assert_eq!(nav.current_index(), 2);

        nav.go_to(0);
        assert!(!nav.retreat(false));
        assert_eq!(nav.current_index(), 0);
    }

    #[test]
    fn test_go_to_clamps() {
        let mut nav = NavigationState::new(5, 2);
        assert!(nav.go_to(99));
        assert_eq!(nav.current_index(), nav.max_index());
        assert!(nav.go_to(1));
        assert_eq!(nav.current_index(), 1);
    }

    #[test]
    fn test_clamping_invariant_over_random_walk() {
        let mut nav = NavigationState::new(7, 3);
        let moves: [usize; 12] = [0, 5, 99, 1, 2, 3, 0, 4, 6, 2, 1, 50];
        for (i, m) in moves.iter().enumerate() {
            match i % 3 {
                0 => {
                    nav.go_to(*m);
                }
                1 => {
                    nav.advance(i % 2 == 0);
                }
                _ => {
                    nav.retreat(i % 2 == 0);
                }
            }
            assert!(nav.current_index() <= nav.max_index());
        }
    }

    #[test]
    fn test_pages_and_dot_count() {
        // 5 items, 2 visible: maxIndex = 3, dots = 4.
        let nav = NavigationState::new(5, 2);
        assert_eq!(nav.pages(), 4);

        // All items fit: a single page.
        let nav = NavigationState::new(3, 3);
        assert_eq!(nav.pages(), 1);
    }

    #[test]
    fn test_reconcile_clamps_after_widening() {
        let mut nav = NavigationState::new(6, 2);
        nav.go_to(4);
        // Viewport widened: 4 now visible, max_index drops to 2.
        assert!(nav.reconcile(6, 4));
        assert_eq!(nav.current_index(), 2);
        // Already in range: no re-animation needed.
        assert!(!nav.reconcile(6, 4));
    }

    #[test]
    fn test_empty_list_is_inert() {
        let mut nav = NavigationState::new(0, 1);
        assert!(!nav.advance(true));
        assert!(!nav.retreat(true));
        assert_eq!(nav.current_index(), 0);
        assert!(!nav.can_navigate(true));
    }

    #[test]
    fn test_control_visibility_empty_list() {
        let nav = NavigationState::new(0, 1);
        let visibility = ControlVisibility::resolve(&nav, &CarouselConfig::default());
        assert_eq!(visibility, ControlVisibility::none());
    }

    #[test]
    fn test_control_visibility_single_page_no_loop() {
        let nav = NavigationState::new(3, 3);
        let config = CarouselConfig {
            loop_enabled: false,
            ..CarouselConfig::default()
        };
        let visibility = ControlVisibility::resolve(&nav, &config);
        assert!(!visibility.prev_button);
        assert!(!visibility.next_button);
        assert_eq!(visibility.dots, 0);
        assert!(!visibility.keyboard);
    }

    #[test]
    fn test_control_visibility_edges_without_loop() {
        let mut nav = NavigationState::new(5, 3);
        let config = CarouselConfig {
            loop_enabled: false,
            ..CarouselConfig::default()
        };
        let at_start = ControlVisibility::resolve(&nav, &config);
        assert!(!at_start.prev_button);
        assert!(at_start.next_button);

        nav.go_to(2);
        let at_end = ControlVisibility::resolve(&nav, &config);
        assert!(at_end.prev_button);
        assert!(!at_end.next_button);
        assert_eq!(at_end.dots, 3);
    }

    #[test]
    fn test_control_visibility_respects_button_toggle() {
        let nav = NavigationState::new(5, 3);
        let config = CarouselConfig {
            show_navigation_buttons: false,
            ..CarouselConfig::default()
        };
        let visibility = ControlVisibility::resolve(&nav, &config);
        assert!(!visibility.prev_button);
        assert!(!visibility.next_button);
        // Dots and keyboard are independent of the button toggle.
        assert_eq!(visibility.dots, 3);
        assert!(visibility.keyboard);
    }
}
