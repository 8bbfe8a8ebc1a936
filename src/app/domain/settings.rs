use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use super::registry::{CodeTheme, Language};
use crate::app::infrastructure::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum FontChoice {
    ScreenBold,
    Courier,
    HelveticaMono,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_line_numbers")]
    pub line_numbers_enabled: bool,

    #[serde(default = "default_word_wrap")]
    pub word_wrap_enabled: bool,

    #[serde(default = "default_font")]
    pub font: FontChoice,

    #[serde(default = "default_font_size")]
    pub font_size: u32,

    /// Tab size in spaces (default 4)
    #[serde(default = "default_tab_size")]
    pub tab_size: u32,

    /// Width of the capture area in pixels, padding included.
    #[serde(default = "default_surface_width")]
    pub surface_width: i32,

    /// Where exported images are written. `None` means the download directory.
    #[serde(default)]
    pub export_dir: Option<PathBuf>,

    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,

    #[serde(default)]
    pub initial_language: Language,

    #[serde(default)]
    pub initial_theme: CodeTheme,
}

fn default_line_numbers() -> bool {
    true
}

fn default_word_wrap() -> bool {
    true
}

fn default_font() -> FontChoice {
    FontChoice::Courier
}

fn default_font_size() -> u32 {
    13
}

fn default_tab_size() -> u32 {
    4
}

fn default_surface_width() -> i32 {
    840
}

fn default_jpeg_quality() -> u8 {
    92
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            line_numbers_enabled: default_line_numbers(),
            word_wrap_enabled: default_word_wrap(),
            font: default_font(),
            font_size: default_font_size(),
            tab_size: default_tab_size(),
            surface_width: default_surface_width(),
            export_dir: None,
            jpeg_quality: default_jpeg_quality(),
            initial_language: Language::default(),
            initial_theme: CodeTheme::default(),
        }
    }
}

impl AppSettings {
    /// Load settings from disk, or create default if not exists
    pub fn load() -> Self {
        Self::load_from(&Self::get_config_path())
    }

    pub fn load_from(config_path: &PathBuf) -> Self {
        match fs::read_to_string(config_path) {
            Ok(contents) => match serde_json::from_str::<AppSettings>(&contents) {
                Ok(settings) => settings.sanitized(),
                Err(e) => {
                    log::warn!("Failed to parse settings: {}. Using defaults.", e);
                    Self::default()
                }
            },
            Err(_) => {
                let default = Self::default();
                if let Err(e) = default.save_to(config_path) {
                    log::debug!("Could not write default settings: {}", e);
                }
                default
            }
        }
    }

    /// Save settings to disk
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path())
    }

    pub fn save_to(&self, config_path: &PathBuf) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self)?;
        fs::write(config_path, json)?;

        Ok(())
    }

    /// Get config file path (cross-platform)
    pub fn get_config_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("codeshot");
        path.push("settings.json");
        path
    }

    /// Directory exported images land in.
    pub fn resolved_export_dir(&self) -> PathBuf {
        self.export_dir
            .clone()
            .or_else(dirs::download_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Clamp hand-edited values into ranges the surface and encoder accept.
    fn sanitized(mut self) -> Self {
        self.font_size = self.font_size.clamp(8, 48);
        self.tab_size = self.tab_size.clamp(1, 16);
        self.surface_width = self.surface_width.clamp(320, 4000);
        self.jpeg_quality = self.jpeg_quality.clamp(1, 100);
        self
    }
}
