use std::io::Cursor;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use image::codecs::gif::GifDecoder;
use image::{AnimationDecoder, DynamicImage, GenericImageView, ImageFormat};

pub fn open_image(path: &Path) -> Result<DynamicImage> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read image: {:?}", path))?;
    let format = image::guess_format(&bytes).ok();

    // Animated GIFs decode through the frame API; a plain load only sees the
    // first frame's palette incorrectly on some files.
    if format == Some(ImageFormat::Gif) {
        let decoder = GifDecoder::new(Cursor::new(bytes))
            .with_context(|| format!("Failed to decode GIF: {:?}", path))?;
        let mut frames = decoder.into_frames();
        if let Some(frame) = frames.next() {
            let frame = frame.context("Failed to decode GIF frame")?;
            return Ok(DynamicImage::ImageRgba8(frame.into_buffer()));
        }
        return Err(anyhow!("GIF has no frames: {:?}", path));
    }

    match format {
        Some(fmt) => image::load_from_memory_with_format(&bytes, fmt)
            .with_context(|| format!("Failed to decode image: {:?}", path)),
        None => image::load_from_memory(&bytes)
            .with_context(|| format!("Failed to decode image: {:?}", path)),
    }
}

/// Decode an image and scale it down to fit a bounding box, returning raw
/// RGBA bytes ready for a `gdk::MemoryTexture`.
pub fn decode_slide_rgba(path: &Path, max_edge: u32) -> Result<(Vec<u8>, u32, u32)> {
    let img = open_image(path)?;
    let resized = img.thumbnail(max_edge, max_edge);
    let (width, height) = resized.dimensions();
    let rgba = resized.to_rgba8().into_raw();
    Ok((rgba, width.max(1), height.max(1)))
}
