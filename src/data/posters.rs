use std::path::{Path, PathBuf};

use crate::models::ItemId;

/// URL prefix under which the assets directory is served
pub const ASSETS_URL_PREFIX: &str = "/assets/images";

/// Maps movies to poster images found on disk
#[derive(Debug, Clone)]
pub struct PosterResolver {
    images_dir: PathBuf,
}

impl PosterResolver {
    pub fn new(assets_dir: &Path) -> Self {
        Self {
            images_dir: assets_dir.join("images"),
        }
    }

    /// `/assets/images/{id}.jpg` if that file exists
    pub fn resolve(&self, item_id: ItemId) -> Option<String> {
        let file_name = format!("{}.jpg", item_id.0);
        self.images_dir
            .join(&file_name)
            .is_file()
            .then(|| format!("{ASSETS_URL_PREFIX}/{file_name}"))
    }
}
