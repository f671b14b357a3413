// Slide cards for the carousel strip.
// Images decode on background threads; every card shows a placeholder until
// its texture arrives, and keeps the placeholder (with substituted alt text)
// when the file cannot be decoded.

use gdk4::Texture;
use gtk4::prelude::*;
use gtk4::{gdk, glib, Align, ContentFit, Label, Orientation, Picture};
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;
use std::time::Duration;

use crate::carousel::CarouselConfig;
use crate::models::PortfolioItem;

const SLIDE_DECODE_EDGE: u32 = 1024;
const SLIDE_LOADER_THREADS: usize = 2;
const SLIDE_LOADER_QUEUE: usize = 256;
const SLIDE_CACHE_ENTRIES: usize = 256;

/// Alt text substituted when an image fails to decode.
const PLACEHOLDER_ALT_TEXT: &str = "Image unavailable";

// Placeholder texture - generated once and reused
fn placeholder_texture() -> &'static Texture {
    static PLACEHOLDER: OnceLock<Texture> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| {
        // Soft light-gray placeholder (64x64) matching the card background
        let width = 64usize;
        let height = 64usize;
        let mut pixels = vec![0u8; width * height * 4];

        for chunk in pixels.chunks_exact_mut(4) {
            chunk[0] = 0xe2; // R
            chunk[1] = 0xe8; // G
            chunk[2] = 0xf0; // B
            chunk[3] = 0xff; // A
        }

        let bytes = glib::Bytes::from_owned(pixels);
        gdk::MemoryTexture::new(
            width as i32,
            height as i32,
            gdk::MemoryFormat::R8g8b8a8,
            &bytes,
            width * 4,
        )
        .upcast()
    })
}

#[derive(Debug)]
struct SlideDecodeRequest {
    path: PathBuf,
}

#[derive(Debug)]
struct SlideDecodeResult {
    path: PathBuf,
    rgba: Option<Vec<u8>>,
    width: u32,
    height: u32,
}

#[derive(Clone)]
struct SlideWaiter {
    picture: glib::WeakRef<Picture>,
    alt_text: String,
    token_cell: Rc<Cell<u64>>,
    token: u64,
}

struct SlideLoaderState {
    pending_paths: HashSet<PathBuf>,
    waiters: HashMap<PathBuf, Vec<SlideWaiter>>,
    cache: lru::LruCache<PathBuf, Texture>,
}

struct SlideImageLoader {
    request_tx: flume::Sender<SlideDecodeRequest>,
    result_rx: flume::Receiver<SlideDecodeResult>,
    state: RefCell<SlideLoaderState>,
}

static NEXT_LOAD_TOKEN: AtomicU64 = AtomicU64::new(1);

thread_local! {
    static SLIDE_IMAGE_LOADER: Rc<SlideImageLoader> = SlideImageLoader::new();
}

impl SlideImageLoader {
    fn new() -> Rc<Self> {
        let (request_tx, request_rx) = flume::bounded::<SlideDecodeRequest>(SLIDE_LOADER_QUEUE);
        let (result_tx, result_rx) = flume::unbounded::<SlideDecodeResult>();

        for _ in 0..SLIDE_LOADER_THREADS {
            let rx = request_rx.clone();
            let tx = result_tx.clone();
            std::thread::spawn(move || {
                while let Ok(req) = rx.recv() {
                    let decoded = crate::image_loader::decode_slide_rgba(&req.path, SLIDE_DECODE_EDGE);
                    let (rgba, width, height) = match decoded {
                        Ok((data, w, h)) => (Some(data), w, h),
                        Err(err) => {
                            tracing::debug!(error = ?err, "Slide decode failed");
                            (None, 0, 0)
                        }
                    };
                    let _ = tx.send(SlideDecodeResult {
                        path: req.path,
                        rgba,
                        width,
                        height,
                    });
                }
            });
        }

        let loader = Rc::new(Self {
            request_tx,
            result_rx,
            state: RefCell::new(SlideLoaderState {
                pending_paths: HashSet::new(),
                waiters: HashMap::new(),
                cache: lru::LruCache::new(NonZeroUsize::new(SLIDE_CACHE_ENTRIES).unwrap()),
            }),
        });

        let loader_weak = Rc::downgrade(&loader);
        glib::timeout_add_local(Duration::from_millis(16), move || {
            if let Some(loader) = loader_weak.upgrade() {
                loader.process_results();
                glib::ControlFlow::Continue
            } else {
                glib::ControlFlow::Break
            }
        });

        loader
    }

    fn request(&self, waiter: SlideWaiter, path: &Path) {
        let mut state = self.state.borrow_mut();

        if let Some(texture) = state.cache.get(path).cloned() {
            glib::idle_add_local_once(move || {
                apply_result(&waiter, Some(&texture));
            });
            return;
        }

        state
            .waiters
            .entry(path.to_path_buf())
            .or_default()
            .push(waiter);

        if state.pending_paths.insert(path.to_path_buf()) {
            if self
                .request_tx
                .try_send(SlideDecodeRequest {
                    path: path.to_path_buf(),
                })
                .is_err()
            {
                state.pending_paths.remove(path);
                state.waiters.remove(path);
            }
        }
    }

    fn process_results(&self) {
        while let Ok(result) = self.result_rx.try_recv() {
            let texture = result
                .rgba
                .and_then(|rgba| create_texture_from_rgba(rgba, result.width, result.height));

            let waiters = {
                let mut state = self.state.borrow_mut();
                state.pending_paths.remove(&result.path);
                if let Some(ref texture) = texture {
                    state.cache.put(result.path.clone(), texture.clone());
                }
                state.waiters.remove(&result.path).unwrap_or_default()
            };

            for waiter in waiters {
                apply_result(&waiter, texture.as_ref());
            }
        }
    }
}

fn apply_result(waiter: &SlideWaiter, texture: Option<&Texture>) {
    // A rebind bumped the token: this result belongs to a previous item.
    if waiter.token_cell.get() != waiter.token {
        return;
    }
    let Some(picture) = waiter.picture.upgrade() else {
        return;
    };
    match texture {
        Some(texture) => {
            picture.set_paintable(Some(texture));
            picture.set_alternative_text(Some(&waiter.alt_text));
        }
        None => {
            picture.set_paintable(Some(placeholder_texture()));
            picture.set_alternative_text(Some(PLACEHOLDER_ALT_TEXT));
        }
    }
}

fn create_texture_from_rgba(rgba: Vec<u8>, width: u32, height: u32) -> Option<Texture> {
    if width == 0 || height == 0 {
        return None;
    }
    let expected = (width as usize)
        .saturating_mul(height as usize)
        .saturating_mul(4);
    if rgba.len() < expected {
        return None;
    }
    let bytes = glib::Bytes::from_owned(rgba);
    let texture = gdk::MemoryTexture::new(
        width as i32,
        height as i32,
        gdk::MemoryFormat::R8g8b8a8,
        &bytes,
        (width * 4) as usize,
    );
    Some(texture.upcast())
}

/// One card in the carousel strip: image area above an optional caption.
pub struct Slide {
    root: gtk4::Box,
    picture: Picture,
    title_label: Label,
    description_label: Label,
    load_token: Rc<Cell<u64>>,
}

impl Slide {
    pub fn new(config: &CarouselConfig) -> Self {
        let root = gtk4::Box::builder()
            .orientation(Orientation::Vertical)
            .accessible_role(gtk4::AccessibleRole::Group)
            .build();
        root.add_css_class("slide-card");

        let picture = Picture::new();
        picture.set_can_shrink(true);
        picture.set_content_fit(ContentFit::Cover);
        picture.set_size_request(-1, config.image_height_px);
        picture.add_css_class("slide-image");
        root.append(&picture);

        let caption = gtk4::Box::new(Orientation::Vertical, 4);
        caption.add_css_class("slide-caption");

        let title_label = Label::new(None);
        title_label.set_halign(Align::Start);
        title_label.set_ellipsize(gtk4::pango::EllipsizeMode::End);
        title_label.add_css_class("slide-title");
        title_label.set_visible(false);
        caption.append(&title_label);

        let description_label = Label::new(None);
        description_label.set_halign(Align::Start);
        description_label.set_wrap(true);
        description_label.set_lines(4);
        description_label.set_ellipsize(gtk4::pango::EllipsizeMode::End);
        description_label.set_xalign(0.0);
        description_label.add_css_class("slide-description");
        description_label.set_visible(false);
        caption.append(&description_label);

        root.append(&caption);

        Self {
            root,
            picture,
            title_label,
            description_label,
            load_token: Rc::new(Cell::new(0)),
        }
    }

    pub fn widget(&self) -> &gtk4::Widget {
        self.root.upcast_ref()
    }

    /// Bind an item to this slide and start loading its image.
    pub fn bind(&self, item: &PortfolioItem, position: usize, total: usize) {
        let accessible_label = match &item.title {
            Some(title) => format!("{}, slide {} of {}", title, position + 1, total),
            None => format!("Slide {} of {}", position + 1, total),
        };
        self.root.update_property(&[
            gtk4::accessible::Property::Label(&accessible_label),
            gtk4::accessible::Property::RoleDescription("slide"),
        ]);

        match &item.title {
            Some(title) => {
                self.title_label.set_text(title);
                self.title_label.set_visible(true);
            }
            None => self.title_label.set_visible(false),
        }
        match &item.description {
            Some(description) => {
                self.description_label.set_text(description);
                self.description_label.set_visible(true);
            }
            None => self.description_label.set_visible(false),
        }

        self.picture.set_paintable(Some(placeholder_texture()));
        self.picture.set_alternative_text(Some(&item.alt_text));

        let token = NEXT_LOAD_TOKEN.fetch_add(1, Ordering::Relaxed);
        self.load_token.set(token);
        let waiter = SlideWaiter {
            picture: self.picture.downgrade(),
            alt_text: item.alt_text.clone(),
            token_cell: self.load_token.clone(),
            token,
        };
        SLIDE_IMAGE_LOADER.with(|loader| {
            loader.request(waiter, &item.image_path);
        });
    }

    /// Invalidate any in-flight load and reset to the placeholder.
    pub fn unbind(&self) {
        self.load_token.set(0);
        self.picture.set_paintable(Some(placeholder_texture()));
    }

    /// Apply the responsive per-item width.
    pub fn set_width(&self, width_px: i32) {
        self.root.set_size_request(width_px.max(0), -1);
    }
}
