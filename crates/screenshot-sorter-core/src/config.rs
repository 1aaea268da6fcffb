use crate::error::Error;
use config::builder::{ConfigBuilder, DefaultState};
use config::{Config, Environment, File as ConfigFile};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_SOURCE_FOLDER: &str = "screenshots";
pub const MAX_FILES_PER_FOLDER: usize = 50;
pub const BAR_HEIGHT: u32 = 50;
pub const FONT_SIZE: f32 = 16.0;
pub const TEXT_PADDING: i32 = 10;
pub const DATE_TEXT_RIGHT_OFFSET: i32 = 100;
pub const PACKAGE_NAME_OFFSET: i32 = 50;
pub const DEFAULT_FONT: &str = "arial.ttf";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub source_folder: PathBuf,
    /// Package folders holding more files than this are split by month.
    pub max_files_per_folder: usize,
    pub status_bar: StatusBarConfig,
}

/// Geometry and font of the bar stamped on top of each screenshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusBarConfig {
    pub bar_height: u32,
    pub font: String,
    pub font_size: f32,
    pub text_padding: i32,
    pub date_text_right_offset: i32,
    pub package_name_offset: i32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            source_folder: PathBuf::from(DEFAULT_SOURCE_FOLDER),
            max_files_per_folder: MAX_FILES_PER_FOLDER,
            status_bar: StatusBarConfig::default(),
        }
    }
}

impl Default for StatusBarConfig {
    fn default() -> Self {
        Self {
            bar_height: BAR_HEIGHT,
            font: DEFAULT_FONT.to_string(),
            font_size: FONT_SIZE,
            text_padding: TEXT_PADDING,
            date_text_right_offset: DATE_TEXT_RIGHT_OFFSET,
            package_name_offset: PACKAGE_NAME_OFFSET,
        }
    }
}

/// Loads `ScreenshotSorter.toml` (optional) and `SCREENSHOT_SORTER_*` overrides on top of
/// the built-in defaults.
pub fn load_configuration() -> Result<AppConfig, Error> {
    let builder = Config::builder()
        .add_source(ConfigFile::with_name("ScreenshotSorter").required(false))
        .add_source(
            Environment::with_prefix("SCREENSHOT_SORTER")
                .separator("__")
                .try_parsing(true),
        );
    build_configuration(builder)
}

fn build_configuration(builder: ConfigBuilder<DefaultState>) -> Result<AppConfig, Error> {
    let config = builder.build()?.try_deserialize::<AppConfig>()?;
    Ok(config)
}
