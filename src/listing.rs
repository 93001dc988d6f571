//! Image catalog for the background and wheel-fill pickers.
//!
//! Images live under `<assets>/images/<category>/`. Listing a category returns
//! the file names with a known image extension; the picker then loads a
//! selection through [`image_path`].

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::IMAGE_EXTENSIONS;

/// The two image folders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageCategory {
    /// Whole-page backgrounds
    Fullpage,
    /// Images that fill the wheel
    Wheel,
}

impl ImageCategory {
    /// Folder name under `images/`.
    pub fn dir_name(self) -> &'static str {
        match self {
            ImageCategory::Fullpage => "fullpage",
            ImageCategory::Wheel => "wheel",
        }
    }
}

/// Result of listing one category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageListing {
    /// File names, sorted
    pub images: Vec<String>,
}

/// Whether `name` has one of the accepted image extensions.
pub fn is_image_file(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            let ext = ext.to_ascii_lowercase();
            IMAGE_EXTENSIONS.contains(&ext.as_str())
        })
}

/// Folder holding a category's images.
pub fn category_dir(assets_dir: &Path, category: ImageCategory) -> PathBuf {
    assets_dir.join("images").join(category.dir_name())
}

/// Path of one image in a category.
pub fn image_path(assets_dir: &Path, category: ImageCategory, name: &str) -> PathBuf {
    category_dir(assets_dir, category).join(name)
}

/// Lists the images of a category. A missing or unreadable folder lists as
/// empty.
pub fn list_images(assets_dir: &Path, category: ImageCategory) -> ImageListing {
    let dir = category_dir(assets_dir, category);
    let read = match std::fs::read_dir(&dir) {
        Ok(read) => read,
        Err(e) => {
            log::error!("failed to read {} images from {}: {}", category.dir_name(), dir.display(), e);
            return ImageListing::default();
        }
    };

    let mut images: Vec<String> = read
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| is_image_file(name))
        .collect();
    images.sort();
    log::debug!("found {} {} images", images.len(), category.dir_name());
    ImageListing { images }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_assets(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("spin_wheel_listing_{}_{}", tag, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(category_dir(&dir, ImageCategory::Wheel)).unwrap();
        dir
    }

    #[test]
    fn test_extension_filter() {
        assert!(is_image_file("cat.PNG"));
        assert!(is_image_file("a.b.webp"));
        assert!(is_image_file("logo.svg"));
        assert!(!is_image_file("notes.txt"));
        assert!(!is_image_file("png"));
    }

    #[test]
    fn test_lists_only_images_sorted() {
        let assets = temp_assets("sorted");
        let wheel = category_dir(&assets, ImageCategory::Wheel);
        for name in ["zebra.jpg", "apple.png", "readme.md", "mid.svg"] {
            std::fs::write(wheel.join(name), b"x").unwrap();
        }
        std::fs::create_dir_all(wheel.join("nested.png")).unwrap();

        let listing = list_images(&assets, ImageCategory::Wheel);
        assert_eq!(listing.images, vec!["apple.png", "mid.svg", "zebra.jpg"]);
        let _ = std::fs::remove_dir_all(&assets);
    }

    #[test]
    fn test_missing_folder_lists_empty() {
        let assets = temp_assets("missing");
        assert!(list_images(&assets, ImageCategory::Fullpage).images.is_empty());
        let _ = std::fs::remove_dir_all(&assets);
    }

    #[test]
    fn test_json_shape() {
        let listing = ImageListing {
            images: vec!["a.png".into()],
        };
        assert_eq!(serde_json::to_string(&listing).unwrap(), r#"{"images":["a.png"]}"#);
        let empty: ImageListing = serde_json::from_str(r#"{"images":[]}"#).unwrap();
        assert_eq!(empty, ImageListing::default());
    }

    #[test]
    fn test_image_path() {
        let path = image_path(Path::new("assets"), ImageCategory::Fullpage, "sky.png");
        assert_eq!(path, Path::new("assets/images/fullpage/sky.png"));
    }
}
