use anyhow::{Context, Result};
use image::RgbImage;
use std::path::Path;

/// The reference stair icon, loaded once at startup.
#[derive(Debug, Clone)]
pub struct StairTemplate {
    image: RgbImage,
}

impl StairTemplate {
    pub fn load(path: &Path) -> Result<Self> {
        let image = image::open(path)
            .context(format!("Failed to load stair template: {}", path.display()))?
            .to_rgb8();
        Ok(Self::from_image(image))
    }

    pub fn from_image(image: RgbImage) -> Self {
        Self { image }
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}
