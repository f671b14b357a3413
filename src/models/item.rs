use std::path::{Path, PathBuf};

/// Returns true for file extensions the showcase can decode and display.
pub fn is_image_extension(ext: &str) -> bool {
    matches!(
        ext.to_lowercase().as_str(),
        "jpg" | "jpeg" | "png" | "webp" | "gif" | "bmp" | "tiff" | "tif"
    )
}

/// One captioned image in the carousel.
///
/// Items are immutable for the lifetime of a widget instance. Identity is the
/// explicit `id`; there is no positional fallback, so reordering the list can
/// never silently change which slide an id refers to.
#[derive(Debug, Clone)]
pub struct PortfolioItem {
    pub id: String,
    pub image_path: PathBuf,
    pub alt_text: String,
    pub title: Option<String>,
    pub description: Option<String>,
}

impl PortfolioItem {
    pub fn new(
        id: impl Into<String>,
        image_path: impl Into<PathBuf>,
        alt_text: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            image_path: image_path.into(),
            alt_text: alt_text.into(),
            title: None,
            description: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Build an item for an on-disk image, deriving the id from the path and
    /// the title from the prettified file stem.
    pub fn from_path(path: &Path) -> Self {
        let id = path.to_string_lossy().to_string();
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("untitled");
        let title = prettify_stem(stem);
        let alt_text = format!("Photograph: {}", title);
        Self::new(id, path, alt_text).with_title(title)
    }

    /// True if a caption block should render under the image.
    pub fn has_caption(&self) -> bool {
        self.title.is_some() || self.description.is_some()
    }
}

/// "grand-canyon_2024" -> "Grand canyon 2024"
fn prettify_stem(stem: &str) -> String {
    let spaced: String = stem
        .chars()
        .map(|c| if c == '-' || c == '_' { ' ' } else { c })
        .collect();
    let trimmed = spaced.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut chars = trimmed.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_image_extension_detection() {
        assert!(is_image_extension("jpg"));
        assert!(is_image_extension("JPEG"));
        assert!(is_image_extension("webp"));
        assert!(!is_image_extension("mp4"));
        assert!(!is_image_extension("txt"));
        assert!(!is_image_extension(""));
    }

    #[test]
    fn test_from_path_derives_caption() {
        let item = PortfolioItem::from_path(&PathBuf::from("/photos/grand-canyon_sunset.jpg"));
        assert_eq!(item.id, "/photos/grand-canyon_sunset.jpg");
        assert_eq!(item.title.as_deref(), Some("Grand canyon sunset"));
        assert!(item.alt_text.contains("Grand canyon sunset"));
        assert!(item.has_caption());
    }

    #[test]
    fn test_item_without_caption() {
        let item = PortfolioItem::new("a", "/photos/a.jpg", "alt");
        assert!(!item.has_caption());
        assert!(item.with_description("seen from the rim").has_caption());
    }
}
