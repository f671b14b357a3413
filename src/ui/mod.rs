pub mod carousel_view;
pub mod slide;
pub mod window;

pub use carousel_view::CarouselView;
pub use window::MainWindow;
