// Carousel widget: a draggable, optionally looping, responsively sized image
// slider with spring position animation.
//
// All carousel behavior lives in the pure state machines under
// crate::carousel; this widget owns instances of them, feeds them input
// events (resize, drag, clicks, key presses) and renders the results. The
// strip sits in a scrollbar-less ScrolledWindow whose horizontal Adjustment
// is the single rendered offset value; the spring drives that Adjustment.

use glib::Object;
use gtk4::prelude::*;
use gtk4::subclass::prelude::*;
use gtk4::{
    glib, Align, Button, Label, Orientation, Overlay, PolicyType, ScrolledWindow, Stack,
    StackTransitionType,
};
use std::cell::{Cell, RefCell};
use std::time::{Duration, Instant};

use crate::carousel::{
    self, CarouselConfig, ControlVisibility, GestureOutcome, NavigationState, Spring,
    VelocityTracker, ViewportGeometry,
};
use crate::models::PortfolioItem;

use super::slide::Slide;

/// Trailing debounce applied to container resizes before geometry recompute.
const RESIZE_DEBOUNCE: Duration = Duration::from_millis(150);
/// Spring animation frame interval.
const ANIMATION_FRAME: Duration = Duration::from_millis(16);

// GObject subclass for CarouselView
mod imp {
    use super::*;

    pub struct CarouselViewInner {
        // Widget tree, assembled in constructed()
        pub stack: Stack,
        pub scroller: ScrolledWindow,
        pub strip: gtk4::Box,
        pub overlay: Overlay,
        pub prev_button: Button,
        pub next_button: Button,
        pub dots_box: gtk4::Box,
        pub dot_buttons: RefCell<Vec<Button>>,
        pub empty_page: gtk4::Box,
        pub empty_label: Label,

        // Data + derived state
        pub config: RefCell<CarouselConfig>,
        pub items: RefCell<Vec<PortfolioItem>>,
        pub slides: RefCell<Vec<Slide>>,
        pub nav: RefCell<NavigationState>,
        pub geometry: Cell<ViewportGeometry>,
        pub spring: RefCell<Spring>,

        // Deferred work owned by the widget; both removed on dispose
        pub tick_source: RefCell<Option<glib::SourceId>>,
        pub resize_source: RefCell<Option<glib::SourceId>>,
        pub last_tick: Cell<Option<Instant>>,

        // Drag gesture bookkeeping
        pub velocity: RefCell<VelocityTracker>,
        pub drag_base: Cell<f64>,
        pub dragging: Cell<bool>,
    }

    impl Default for CarouselViewInner {
        fn default() -> Self {
            let config = CarouselConfig::default();
            Self {
                stack: Stack::new(),
                scroller: ScrolledWindow::new(),
                strip: gtk4::Box::new(Orientation::Horizontal, 0),
                overlay: Overlay::new(),
                prev_button: Button::from_icon_name("go-previous-symbolic"),
                next_button: Button::from_icon_name("go-next-symbolic"),
                dots_box: gtk4::Box::new(Orientation::Horizontal, 8),
                dot_buttons: RefCell::new(Vec::new()),
                empty_page: gtk4::Box::new(Orientation::Vertical, 8),
                empty_label: Label::new(None),
                spring: RefCell::new(Spring::new(0.0, config.animation)),
                config: RefCell::new(config),
                items: RefCell::new(Vec::new()),
                slides: RefCell::new(Vec::new()),
                nav: RefCell::new(NavigationState::new(0, 1)),
                geometry: Cell::new(ViewportGeometry::unmeasured()),
                tick_source: RefCell::new(None),
                resize_source: RefCell::new(None),
                last_tick: Cell::new(None),
                velocity: RefCell::new(VelocityTracker::new()),
                drag_base: Cell::new(0.0),
                dragging: Cell::new(false),
            }
        }
    }

    #[glib::object_subclass]
    impl ObjectSubclass for CarouselViewInner {
        const NAME: &'static str = "VitrinCarouselView";
        type Type = super::CarouselView;
        type ParentType = gtk4::Box;
    }

    impl ObjectImpl for CarouselViewInner {
        fn constructed(&self) {
            self.parent_constructed();

            let obj = self.obj();
            obj.set_orientation(Orientation::Vertical);
            obj.set_spacing(16);
            obj.add_css_class("carousel");

            self.strip.add_css_class("carousel-strip");

            self.scroller.set_hscrollbar_policy(PolicyType::External);
            self.scroller.set_vscrollbar_policy(PolicyType::Never);
            self.scroller.set_kinetic_scrolling(false);
            self.scroller.set_propagate_natural_height(true);
            self.scroller.set_hexpand(true);
            self.scroller.set_child(Some(&self.strip));

            self.prev_button.set_halign(Align::Start);
            self.prev_button.set_valign(Align::Center);
            self.prev_button.add_css_class("carousel-nav");
            self.prev_button.set_visible(false);
            self.prev_button
                .update_property(&[gtk4::accessible::Property::Label("Previous slide")]);

            self.next_button.set_halign(Align::End);
            self.next_button.set_valign(Align::Center);
            self.next_button.add_css_class("carousel-nav");
            self.next_button.set_visible(false);
            self.next_button
                .update_property(&[gtk4::accessible::Property::Label("Next slide")]);

            self.overlay.set_child(Some(&self.scroller));
            self.overlay.add_overlay(&self.prev_button);
            self.overlay.add_overlay(&self.next_button);

            self.empty_page.set_valign(Align::Center);
            self.empty_page.set_halign(Align::Center);
            self.empty_page.add_css_class("carousel-empty");
            self.empty_label
                .set_text(&self.config.borrow().empty_state_message);
            self.empty_label.set_wrap(true);
            self.empty_page.append(&self.empty_label);

            self.stack.set_transition_type(StackTransitionType::Crossfade);
            self.stack.add_named(&self.overlay, Some("strip"));
            self.stack.add_named(&self.empty_page, Some("empty"));
            self.stack.set_visible_child_name("empty");
            self.stack.set_vexpand(false);

            obj.append(&self.stack);

            self.dots_box.set_halign(Align::Center);
            self.dots_box.add_css_class("carousel-dots");
            self.dots_box.set_visible(false);
            self.dots_box
                .update_property(&[gtk4::accessible::Property::Label("Slide indicators")]);
            obj.append(&self.dots_box);

            obj.update_property(&[
                gtk4::accessible::Property::Label(&self.config.borrow().carousel_label),
                gtk4::accessible::Property::RoleDescription("carousel"),
            ]);

            // Navigation buttons
            let widget = obj.downgrade();
            self.prev_button.connect_clicked(move |_| {
                if let Some(widget) = widget.upgrade() {
                    widget.go_previous();
                }
            });
            let widget = obj.downgrade();
            self.next_button.connect_clicked(move |_| {
                if let Some(widget) = widget.upgrade() {
                    widget.go_next();
                }
            });

            // Keyboard arrows mirror the buttons. Capture phase, so focus
            // navigation between the overlay buttons cannot swallow them.
            let keys = gtk4::EventControllerKey::new();
            keys.set_propagation_phase(gtk4::PropagationPhase::Capture);
            let widget = obj.downgrade();
            keys.connect_key_pressed(move |_, keyval, _keycode, _state| {
                let Some(widget) = widget.upgrade() else {
                    return glib::Propagation::Proceed;
                };
                if !widget.keyboard_enabled() {
                    return glib::Propagation::Proceed;
                }
                match keyval {
                    gdk4::Key::Left => {
                        widget.go_previous();
                        glib::Propagation::Stop
                    }
                    gdk4::Key::Right => {
                        widget.go_next();
                        glib::Propagation::Stop
                    }
                    _ => glib::Propagation::Proceed,
                }
            });
            obj.add_controller(keys);

            // Pointer drags over the strip
            let drag = gtk4::GestureDrag::new();
            drag.set_button(1);
            let widget = obj.downgrade();
            drag.connect_drag_begin(move |gesture, _x, _y| {
                let Some(widget) = widget.upgrade() else {
                    return;
                };
                if !widget.drag_allowed() {
                    gesture.set_state(gtk4::EventSequenceState::Denied);
                    return;
                }
                widget.on_drag_begin(gesture.current_event_time());
            });
            let widget = obj.downgrade();
            drag.connect_drag_update(move |gesture, offset_x, _y| {
                if let Some(widget) = widget.upgrade() {
                    widget.on_drag_update(offset_x, gesture.current_event_time());
                }
            });
            let widget = obj.downgrade();
            drag.connect_drag_end(move |gesture, offset_x, _y| {
                if let Some(widget) = widget.upgrade() {
                    widget.on_drag_end(offset_x, gesture.current_event_time());
                }
            });
            self.scroller.add_controller(drag);

            // The viewport width lands in the adjustment's page size, so a
            // notify there covers both window resizes and the initial map.
            let widget = obj.downgrade();
            self.scroller
                .hadjustment()
                .connect_page_size_notify(move |_| {
                    if let Some(widget) = widget.upgrade() {
                        widget.schedule_relayout();
                    }
                });
        }

        fn dispose(&self) {
            // Both deferred sources act on this widget; never let them fire
            // after disposal.
            if let Some(source) = self.tick_source.borrow_mut().take() {
                source.remove();
            }
            if let Some(source) = self.resize_source.borrow_mut().take() {
                source.remove();
            }
            // Parent dispose is chained automatically by the glib subclass glue.
        }
    }

    impl WidgetImpl for CarouselViewInner {}
    impl BoxImpl for CarouselViewInner {}
}

glib::wrapper! {
    pub struct CarouselView(ObjectSubclass<imp::CarouselViewInner>)
        @extends gtk4::Box, gtk4::Widget,
        @implements gtk4::Accessible, gtk4::Buildable, gtk4::ConstraintTarget, gtk4::Orientable;
}

impl CarouselView {
    pub fn new(config: CarouselConfig) -> Self {
        let obj: Self = Object::builder()
            .property("accessible-role", gtk4::AccessibleRole::Group)
            .build();
        obj.set_config(config);
        obj
    }

    /// Replace the item list. The current index is kept where the new list
    /// allows and clamped otherwise.
    pub fn set_items(&self, items: Vec<PortfolioItem>) {
        let imp = self.imp();
        *imp.items.borrow_mut() = items;
        self.rebuild_slides();
        self.refresh_layout();
    }

    /// Replace the configuration wholesale.
    pub fn set_config(&self, config: CarouselConfig) {
        let imp = self.imp();
        imp.spring.borrow_mut().set_params(config.animation);
        imp.empty_label.set_text(&config.empty_state_message);
        self.update_property(&[
            gtk4::accessible::Property::Label(&config.carousel_label),
            gtk4::accessible::Property::RoleDescription("carousel"),
        ]);
        *imp.config.borrow_mut() = config;
        // Slide chrome (image height, captions) depends on the config.
        self.rebuild_slides();
        self.refresh_layout();
    }

    pub fn current_index(&self) -> usize {
        self.imp().nav.borrow().current_index()
    }

    pub fn item_count(&self) -> usize {
        self.imp().items.borrow().len()
    }

    pub fn go_previous(&self) {
        let loop_enabled = self.imp().config.borrow().loop_enabled;
        let changed = self.imp().nav.borrow_mut().retreat(loop_enabled);
        if changed {
            self.after_index_change();
        }
    }

    pub fn go_next(&self) {
        let loop_enabled = self.imp().config.borrow().loop_enabled;
        let changed = self.imp().nav.borrow_mut().advance(loop_enabled);
        if changed {
            self.after_index_change();
        }
    }

    pub fn go_to(&self, index: usize) {
        let changed = self.imp().nav.borrow_mut().go_to(index);
        if changed {
            self.after_index_change();
        }
    }

    fn keyboard_enabled(&self) -> bool {
        let imp = self.imp();
        let visibility = ControlVisibility::resolve(&imp.nav.borrow(), &imp.config.borrow());
        visibility.keyboard
    }

    fn drag_allowed(&self) -> bool {
        let imp = self.imp();
        carousel::drag::drag_allowed(&imp.config.borrow(), &imp.nav.borrow(), &imp.geometry.get())
    }

    // -- drag gesture -----------------------------------------------------

    fn on_drag_begin(&self, time_ms: u32) {
        let imp = self.imp();
        imp.dragging.set(true);
        // Take over from any in-flight animation at the rendered position.
        self.stop_animation();
        let adjustment = imp.scroller.hadjustment();
        imp.drag_base.set(adjustment.value());
        imp.spring.borrow_mut().snap_to(adjustment.value());
        let mut velocity = imp.velocity.borrow_mut();
        velocity.reset();
        velocity.sample(0.0, time_ms);
    }

    fn on_drag_update(&self, offset_x: f64, time_ms: u32) {
        let imp = self.imp();
        if !imp.dragging.get() {
            return;
        }
        imp.velocity.borrow_mut().sample(offset_x, time_ms);
        // Dragging content left moves the viewport right through the strip.
        let adjustment = imp.scroller.hadjustment();
        adjustment.set_value(imp.drag_base.get() - offset_x);
    }

    fn on_drag_end(&self, offset_x: f64, time_ms: u32) {
        let imp = self.imp();
        if !imp.dragging.replace(false) {
            return;
        }
        imp.velocity.borrow_mut().sample(offset_x, time_ms);
        let release_velocity = imp.velocity.borrow().velocity();

        let loop_enabled = imp.config.borrow().loop_enabled;
        let outcome = {
            let nav = imp.nav.borrow();
            carousel::drag::settle(
                offset_x,
                release_velocity,
                &nav,
                &imp.geometry.get(),
                loop_enabled,
            )
        };
        match outcome {
            GestureOutcome::Ignored => {}
            GestureOutcome::Cancelled => self.animate_to_current(),
            GestureOutcome::MoveTo(index) => {
                imp.nav.borrow_mut().settle_at(index);
                self.after_index_change();
            }
        }
    }

    // -- layout -----------------------------------------------------------

    /// Debounced geometry recompute; the pending source is replaced on every
    /// call and removed on dispose.
    fn schedule_relayout(&self) {
        let imp = self.imp();
        if let Some(source) = imp.resize_source.borrow_mut().take() {
            source.remove();
        }
        let widget = self.downgrade();
        let source = glib::timeout_add_local(RESIZE_DEBOUNCE, move || {
            if let Some(widget) = widget.upgrade() {
                *widget.imp().resize_source.borrow_mut() = None;
                widget.refresh_layout();
            }
            glib::ControlFlow::Break
        });
        *imp.resize_source.borrow_mut() = Some(source);
    }

    /// Recompute geometry from the current container and window widths and
    /// apply it to the strip, then reconcile the navigation state.
    fn refresh_layout(&self) {
        let imp = self.imp();
        let item_count = imp.items.borrow().len();
        let config = imp.config.borrow().clone();

        let container_width = self.container_width();
        let window_width = self.window_width().unwrap_or(container_width);
        let geometry = carousel::geometry::compute(
            container_width,
            window_width,
            &config,
            item_count,
            self.root_font_px(),
        );
        imp.geometry.set(geometry);
        tracing::debug!(
            container_width,
            window_width,
            visible = geometry.visible_count,
            item_width = geometry.item_width_px,
            "Carousel layout"
        );

        imp.strip.set_spacing(geometry.gap_px.round() as i32);
        let width = geometry.item_width_px.round() as i32;
        for slide in imp.slides.borrow().iter() {
            slide.set_width(width);
        }

        imp.nav
            .borrow_mut()
            .reconcile(item_count, geometry.visible_count);
        self.update_controls();

        if item_count == 0 {
            self.animate_to_offset(0.0);
        } else {
            self.animate_to_current();
        }
    }

    fn container_width(&self) -> f64 {
        let imp = self.imp();
        let page_size = imp.scroller.hadjustment().page_size();
        if page_size > 0.0 {
            page_size
        } else {
            imp.scroller.width().max(0) as f64
        }
    }

    /// Toplevel width for breakpoint resolution; the container width is the
    /// fallback before the widget is rooted.
    fn window_width(&self) -> Option<f64> {
        let root = self.root()?;
        let width = root.width();
        (width > 0).then_some(width as f64)
    }

    fn root_font_px(&self) -> f64 {
        // Font sizes come back in points; pango resolves points at 96 dpi.
        let font_size = self
            .pango_context()
            .font_description()
            .map(|desc| desc.size() as f64 / gtk4::pango::SCALE as f64 * 96.0 / 72.0)
            .unwrap_or(0.0);
        if font_size > 0.0 {
            font_size
        } else {
            carousel::geometry::DEFAULT_ROOT_FONT_PX
        }
    }

    // -- slides and controls ----------------------------------------------

    fn rebuild_slides(&self) {
        let imp = self.imp();
        {
            let slides = imp.slides.borrow();
            for slide in slides.iter() {
                slide.unbind();
                imp.strip.remove(slide.widget());
            }
        }
        let config = imp.config.borrow().clone();
        let items = imp.items.borrow();
        let mut slides = Vec::with_capacity(items.len());
        for (position, item) in items.iter().enumerate() {
            let slide = Slide::new(&config);
            slide.bind(item, position, items.len());
            imp.strip.append(slide.widget());
            slides.push(slide);
        }
        *imp.slides.borrow_mut() = slides;

        imp.stack.set_visible_child_name(if items.is_empty() {
            "empty"
        } else {
            "strip"
        });
    }

    fn update_controls(&self) {
        let imp = self.imp();
        let visibility = ControlVisibility::resolve(&imp.nav.borrow(), &imp.config.borrow());

        imp.prev_button.set_visible(visibility.prev_button);
        imp.next_button.set_visible(visibility.next_button);
        self.set_focusable(visibility.keyboard);

        if imp.dot_buttons.borrow().len() != visibility.dots {
            self.rebuild_dots(visibility.dots);
        }
        imp.dots_box.set_visible(visibility.dots > 0);
        self.update_active_dot();
    }

    fn rebuild_dots(&self, count: usize) {
        let imp = self.imp();
        let mut dots = imp.dot_buttons.borrow_mut();
        for dot in dots.iter() {
            imp.dots_box.remove(dot);
        }
        dots.clear();

        for index in 0..count {
            let dot = Button::new();
            dot.add_css_class("carousel-dot");
            let label = format!("Go to slide {}", index + 1);
            dot.update_property(&[gtk4::accessible::Property::Label(&label)]);
            let widget = self.downgrade();
            dot.connect_clicked(move |_| {
                if let Some(widget) = widget.upgrade() {
                    widget.go_to(index);
                }
            });
            imp.dots_box.append(&dot);
            dots.push(dot);
        }
    }

    fn update_active_dot(&self) {
        let imp = self.imp();
        let current = imp.nav.borrow().current_index();
        for (index, dot) in imp.dot_buttons.borrow().iter().enumerate() {
            if index == current {
                dot.add_css_class("active");
            } else {
                dot.remove_css_class("active");
            }
        }
    }

    fn after_index_change(&self) {
        self.update_controls();
        self.animate_to_current();
    }

    // -- position animation -----------------------------------------------

    fn animate_to_current(&self) {
        let imp = self.imp();
        let geometry = imp.geometry.get();
        let index = imp.nav.borrow().current_index();
        self.animate_to_offset(geometry.offset_for_index(index));
    }

    fn animate_to_offset(&self, target: f64) {
        let imp = self.imp();
        let geometry = imp.geometry.get();
        if !geometry.is_measured() && target != 0.0 {
            return;
        }
        if !geometry.is_measured() {
            // Nothing to tween against yet; just rest at the origin.
            self.stop_animation();
            imp.spring.borrow_mut().snap_to(0.0);
            imp.scroller.hadjustment().set_value(0.0);
            return;
        }
        imp.spring.borrow_mut().set_target(target);
        self.ensure_tick();
    }

    fn ensure_tick(&self) {
        let imp = self.imp();
        if imp.tick_source.borrow().is_some() {
            return;
        }
        imp.last_tick.set(Some(Instant::now()));
        let widget = self.downgrade();
        let source = glib::timeout_add_local(ANIMATION_FRAME, move || {
            let Some(widget) = widget.upgrade() else {
                return glib::ControlFlow::Break;
            };
            if widget.on_animation_frame() {
                *widget.imp().tick_source.borrow_mut() = None;
                glib::ControlFlow::Break
            } else {
                glib::ControlFlow::Continue
            }
        });
        *imp.tick_source.borrow_mut() = Some(source);
    }

    /// One spring step; returns true when the animation settled.
    fn on_animation_frame(&self) -> bool {
        let imp = self.imp();
        let now = Instant::now();
        let dt = imp
            .last_tick
            .replace(Some(now))
            .map(|last| now.duration_since(last).as_secs_f64())
            .unwrap_or(0.0);

        let settled = imp.spring.borrow_mut().step(dt);
        let position = imp.spring.borrow().position();
        imp.scroller.hadjustment().set_value(position);
        settled
    }

    fn stop_animation(&self) {
        let imp = self.imp();
        if let Some(source) = imp.tick_source.borrow_mut().take() {
            source.remove();
        }
        imp.last_tick.set(None);
    }
}

impl Default for CarouselView {
    fn default() -> Self {
        Self::new(CarouselConfig::default())
    }
}
