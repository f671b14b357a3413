// Main window for the vitrin portfolio showcase
// GTK4 ApplicationWindow hosting a heading, one carousel and a status line.
// Directory scans run on a background thread and are polled from the main
// loop; a generation counter discards results from superseded scans.

use gdk4::Display;
use gtk4::prelude::*;
use gtk4::{
    Align, Application, ApplicationWindow, Box as GtkBox, CssProvider, Label, Orientation,
    STYLE_PROVIDER_PRIORITY_APPLICATION,
};
use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};
use std::rc::{Rc, Weak};
use std::time::Duration;

use super::carousel_view::CarouselView;
use crate::carousel::CarouselConfig;
use crate::models::PortfolioItem;
use crate::scanner::{self, ScanConfig, ScanError};

const WINDOW_MARGIN: i32 = 24;

const FALLBACK_CSS: &str = r#"
window {
    background-color: #f8fafc;
    color: #1f2937;
}

.showcase-heading {
    font-size: 24px;
    font-weight: 500;
    color: #111827;
}

.carousel-strip {
    padding: 2px 0;
}

.slide-card {
    background-color: #ffffff;
    border: 1px solid #e5e7eb;
    border-radius: 8px;
}

.slide-image {
    border-radius: 8px 8px 0 0;
}

.slide-caption {
    padding: 12px;
}

.slide-title {
    font-weight: 600;
}

.slide-description {
    font-size: 13px;
    color: #4b5563;
}

.carousel-nav {
    background-color: rgba(255, 255, 255, 0.9);
    border: 1px solid #d1d5db;
    border-radius: 9999px;
    margin: 0 8px;
}

.carousel-nav:hover {
    background-color: #f3f4f6;
}

.carousel-dot {
    background-color: #d1d5db;
    border: none;
    border-radius: 9999px;
    min-width: 10px;
    min-height: 10px;
    padding: 0;
}

.carousel-dot.active {
    background-color: #2563eb;
}

.carousel-empty {
    background-color: #f1f5f9;
    border: 1px solid #e5e7eb;
    border-radius: 8px;
    padding: 48px;
    color: #6b7280;
}

.status-label {
    font-size: 12px;
    color: #6b7280;
}
"#;

/// Load and apply the showcase stylesheet
fn load_css() {
    let provider = CssProvider::new();

    // Try to load from file first, fall back to embedded CSS
    let css_path = concat!(env!("CARGO_MANIFEST_DIR"), "/src/style.css");

    if Path::new(css_path).exists() {
        provider.load_from_path(css_path);
        tracing::info!("Loaded CSS from: {}", css_path);
    } else {
        provider.load_from_string(FALLBACK_CSS);
        tracing::info!("Loaded fallback embedded CSS");
    }

    if let Some(display) = Display::default() {
        gtk4::style_context_add_provider_for_display(
            &display,
            &provider,
            STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    }
}

fn default_pictures_dir() -> Option<PathBuf> {
    directories::UserDirs::new().and_then(|dirs| dirs.picture_dir().map(|p| p.to_path_buf()))
}

/// Main window for the portfolio showcase
pub struct MainWindow {
    self_weak: RefCell<Weak<MainWindow>>,
    window: ApplicationWindow,
    carousel: CarouselView,
    status_label: Label,
    current_path: RefCell<Option<PathBuf>>,
    scan_generation: Cell<u64>,
}

impl MainWindow {
    pub fn new(app: &Application, initial_path: Option<&Path>) -> Rc<Self> {
        load_css();

        let window = ApplicationWindow::builder()
            .application(app)
            .title("vitrin")
            .default_width(1100)
            .default_height(680)
            .build();

        let root = GtkBox::new(Orientation::Vertical, 16);
        root.set_margin_top(WINDOW_MARGIN);
        root.set_margin_bottom(WINDOW_MARGIN);
        root.set_margin_start(WINDOW_MARGIN);
        root.set_margin_end(WINDOW_MARGIN);

        let config = CarouselConfig::default();

        let heading = Label::new(Some(&config.carousel_label));
        heading.set_halign(Align::Center);
        heading.add_css_class("showcase-heading");
        root.append(&heading);

        let carousel = CarouselView::new(config);
        carousel.set_valign(Align::Start);
        root.append(&carousel);

        let status_label = Label::new(None);
        status_label.set_halign(Align::Start);
        status_label.set_valign(Align::End);
        status_label.set_vexpand(true);
        status_label.add_css_class("status-label");
        root.append(&status_label);

        window.set_child(Some(&root));

        let main_window = Rc::new(Self {
            self_weak: RefCell::new(Weak::new()),
            window,
            carousel,
            status_label,
            current_path: RefCell::new(None),
            scan_generation: Cell::new(0),
        });
        *main_window.self_weak.borrow_mut() = Rc::downgrade(&main_window);

        let resolved_path = initial_path
            .map(Path::to_path_buf)
            .or_else(default_pictures_dir);
        match resolved_path {
            Some(path) => main_window.load_directory(&path),
            None => main_window.set_status("No directory specified. Use: vitrin <path>"),
        }

        main_window
    }

    /// Present the window
    pub fn present(&self) {
        self.window.present();
    }

    pub fn current_path(&self) -> Option<PathBuf> {
        self.current_path.borrow().clone()
    }

    fn set_status(&self, text: &str) {
        self.status_label.set_text(text);
    }

    /// Scan a directory on a background thread and show its images.
    pub fn load_directory(&self, path: &Path) {
        let generation = self.scan_generation.get() + 1;
        self.scan_generation.set(generation);
        *self.current_path.borrow_mut() = Some(path.to_path_buf());
        self.set_status(&format!("Scanning {} ...", path.display()));

        let (tx, rx) = flume::unbounded::<Result<Vec<PortfolioItem>, ScanError>>();
        let scan_path = path.to_path_buf();
        std::thread::spawn(move || {
            let result = scanner::scan_directory(&scan_path, &ScanConfig::default());
            let _ = tx.send(result);
        });

        let weak_self = self.self_weak.borrow().clone();
        let shown_path = path.to_path_buf();
        glib::timeout_add_local(Duration::from_millis(16), move || match rx.try_recv() {
            Ok(result) => {
                if let Some(window) = weak_self.upgrade() {
                    if window.scan_generation.get() == generation {
                        window.apply_scan_result(&shown_path, result);
                    }
                }
                glib::ControlFlow::Break
            }
            Err(flume::TryRecvError::Empty) => glib::ControlFlow::Continue,
            Err(flume::TryRecvError::Disconnected) => glib::ControlFlow::Break,
        });
    }

    fn apply_scan_result(&self, path: &Path, result: Result<Vec<PortfolioItem>, ScanError>) {
        match result {
            Ok(items) => {
                let dir_name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| path.display().to_string());
                self.window.set_title(Some(&format!("vitrin - {}", dir_name)));
                self.set_status(&format!("{} images | {}", items.len(), path.display()));
                tracing::info!(count = items.len(), path = %path.display(), "Showing directory");
                self.carousel.set_items(items);
            }
            Err(err) => {
                tracing::warn!(error = %err, "Directory scan failed");
                self.set_status(&format!("Scan failed: {}", err));
                self.carousel.set_items(Vec::new());
            }
        }
    }
}
