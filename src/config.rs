//! Configuration for the staircase finder.
//!
//! Loaded from config.json at startup and passed by reference to the
//! pipeline and the batch. Every field has a default, so a partial file
//! only overrides what it names.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::segment::{ChannelOrder, ColorRange};
use crate::stairs::OutlineStyle;

/// Picks the destination label to look for in one input file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRule {
    /// Input file name, e.g. "神田.png"
    pub file_name: String,
    /// Destination label searched for in that file, e.g. "高尾"
    pub query: String,
}

/// Complete configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StairsConfig {
    /// Lowest platform fill color (inclusive)
    #[serde(default = "default_platform_color_min")]
    pub platform_color_min: [u8; 3],
    /// Highest platform fill color (inclusive)
    #[serde(default = "default_platform_color_max")]
    pub platform_color_max: [u8; 3],
    /// Exact color of the line stripe
    #[serde(default = "default_line_color")]
    pub line_color: [u8; 3],
    /// Channel order the colors above are written in
    #[serde(default)]
    pub color_order: ChannelOrder,
    /// Margin added around the all-platforms bounding box (pixels)
    #[serde(default = "default_region_buffer")]
    pub region_buffer: u32,
    /// Minimum correlation score for a stair match (-1.0 to 1.0)
    #[serde(default = "default_match_threshold")]
    pub match_threshold: f32,
    /// Path to the stair icon reference image. A relative path is tried in the
    /// working directory, then next to the executable. The icon is not bundled
    /// and must be provided.
    #[serde(default = "default_template_path")]
    pub template_path: PathBuf,
    /// Tesseract language code
    #[serde(default = "default_ocr_language")]
    pub ocr_language: String,
    /// Tesseract executable, searched for when unset
    #[serde(default)]
    pub tesseract_path: Option<PathBuf>,
    /// Tesseract language data directory, searched for when unset
    #[serde(default)]
    pub tessdata_dir: Option<PathBuf>,
    #[serde(default = "default_input_dir")]
    pub input_dir: PathBuf,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Only files with this extension are processed
    #[serde(default = "default_input_extension")]
    pub input_extension: String,
    #[serde(default = "default_query_rules")]
    pub query_rules: Vec<QueryRule>,
    /// Query for files no rule names
    #[serde(default = "default_query")]
    pub default_query: String,
    /// Worker threads for the batch (1 = sequential)
    #[serde(default = "default_workers")]
    pub workers: usize,
    /// When set, masks of each image are written here as PNG
    #[serde(default)]
    pub debug_dir: Option<PathBuf>,
    #[serde(default = "default_rectangle_thickness")]
    pub rectangle_thickness: u32,
    #[serde(default = "default_rectangle_color")]
    pub rectangle_color: [u8; 3],
}

fn default_platform_color_min() -> [u8; 3] {
    [182, 220, 241]
}

fn default_platform_color_max() -> [u8; 3] {
    [185, 227, 249]
}

fn default_line_color() -> [u8; 3] {
    [235, 92, 2] // Chuo line orange
}

fn default_region_buffer() -> u32 {
    50
}

fn default_match_threshold() -> f32 {
    0.35
}

fn default_template_path() -> PathBuf {
    PathBuf::from("resources/template/escalator_left.png")
}

fn default_ocr_language() -> String {
    "jpn".to_string()
}

fn default_input_dir() -> PathBuf {
    PathBuf::from("maps")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("stairs")
}

fn default_input_extension() -> String {
    "png".to_string()
}

fn default_query_rules() -> Vec<QueryRule> {
    vec![QueryRule {
        file_name: "神田.png".to_string(),
        query: "高尾".to_string(),
    }]
}

fn default_query() -> String {
    "立川".to_string()
}

fn default_workers() -> usize {
    1
}

fn default_rectangle_thickness() -> u32 {
    2
}

fn default_rectangle_color() -> [u8; 3] {
    [255, 0, 0]
}

impl Default for StairsConfig {
    fn default() -> Self {
        Self {
            platform_color_min: default_platform_color_min(),
            platform_color_max: default_platform_color_max(),
            line_color: default_line_color(),
            color_order: ChannelOrder::Rgb,
            region_buffer: default_region_buffer(),
            match_threshold: default_match_threshold(),
            template_path: default_template_path(),
            ocr_language: default_ocr_language(),
            tesseract_path: None,
            tessdata_dir: None,
            input_dir: default_input_dir(),
            output_dir: default_output_dir(),
            input_extension: default_input_extension(),
            query_rules: default_query_rules(),
            default_query: default_query(),
            workers: default_workers(),
            debug_dir: None,
            rectangle_thickness: default_rectangle_thickness(),
            rectangle_color: default_rectangle_color(),
        }
    }
}

impl StairsConfig {
    pub fn platform_range(&self) -> ColorRange {
        ColorRange::between(self.platform_color_min, self.platform_color_max, self.color_order)
    }

    pub fn line_range(&self) -> ColorRange {
        ColorRange::exact(self.line_color, self.color_order)
    }

    /// Query for `file_name`: the first matching rule, else the default query.
    pub fn query_for(&self, file_name: &str) -> &str {
        self.query_rules
            .iter()
            .find(|rule| rule.file_name == file_name)
            .map(|rule| rule.query.as_str())
            .unwrap_or(&self.default_query)
    }

    pub fn outline(&self) -> OutlineStyle {
        let color = self
            .color_order
            .convert(self.rectangle_color, ChannelOrder::Rgb);
        OutlineStyle {
            color: image::Rgb(color),
            thickness: self.rectangle_thickness,
        }
    }
}

/// Loads configuration from `config_path` or returns defaults.
pub fn load_config(config_path: &Path) -> StairsConfig {
    crate::log(&format!("Looking for config at: {}", config_path.display()));

    if config_path.exists() {
        match fs::read_to_string(config_path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    crate::log("Config loaded from config.json");
                    return config;
                }
                Err(e) => {
                    crate::log(&format!(
                        "Failed to parse config.json: {}. Using defaults.",
                        e
                    ));
                }
            },
            Err(e) => {
                crate::log(&format!(
                    "Failed to read config.json: {}. Using defaults.",
                    e
                ));
            }
        }
    } else {
        crate::log("config.json not found. Using default config.");
    }

    StairsConfig::default()
}
