//! Persisted user settings: a flat JSON object on disk.
//!
//! Loading never fails. A missing, unreadable or malformed file yields the
//! defaults, so a broken settings file can never block catalog generation.

use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::schema::{
    FontFamily, FontSpec, LayoutConfig, LogoPlacement, LogoPosition, Margins, Orientation,
    PageFormat, Rgb, DEFAULT_BODY_COLOR, DEFAULT_TITLE_COLOR,
};
use crate::error::ConfigError;
use crate::processor::DEFAULT_LANGUAGE;

pub const DEFAULT_SETTINGS_PATH: &str = "config/user_settings.json";
pub const DEFAULT_LOGO_PATH: &str = "assets/logo.png";

pub const LOGO_WIDTH_RANGE: (f64, f64) = (10.0, 80.0);
pub const FONT_SIZE_RANGE: (f32, f32) = (8.0, 36.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogoMode {
    /// The bundled logo at [`DEFAULT_LOGO_PATH`].
    #[default]
    Default,
    /// The user's own logo at `logo_path`.
    Custom,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    pub logo_mode: LogoMode,
    pub logo_path: String,
    pub logo_width_mm: f64,
    pub logo_position_key: String,
    pub page_format: String,
    pub orientation: String,
    pub title_font_family: String,
    pub title_font_size: f32,
    pub body_font_family: String,
    pub body_font_size: f32,
    pub title_color_hex: String,
    pub body_color_hex: String,
    pub ocr_language: String,
    pub show_file_name: bool,
    /// Keys this version does not know about, written back untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            logo_mode: LogoMode::Default,
            logo_path: DEFAULT_LOGO_PATH.to_string(),
            logo_width_mm: 25.0,
            logo_position_key: LogoPosition::TopLeft.key().to_string(),
            page_format: PageFormat::A4.name().to_string(),
            orientation: Orientation::Portrait.code().to_string(),
            title_font_family: FontFamily::Helvetica.to_string(),
            title_font_size: 14.0,
            body_font_family: FontFamily::Helvetica.to_string(),
            body_font_size: 11.0,
            title_color_hex: DEFAULT_TITLE_COLOR.to_hex(),
            body_color_hex: DEFAULT_BODY_COLOR.to_hex(),
            ocr_language: DEFAULT_LANGUAGE.to_string(),
            show_file_name: false,
            extra: Map::new(),
        }
    }
}

pub fn load_settings<P: AsRef<Path>>(path: P) -> UserSettings {
    let path = path.as_ref();
    if !path.is_file() {
        debug!("No settings at {}, using defaults", path.display());
        return UserSettings::default();
    }

    match read_settings(path) {
        Ok(settings) => settings,
        Err(e) => {
            warn!("Could not load settings, using defaults: {}", e);
            UserSettings::default()
        }
    }
}

pub fn read_settings<P: AsRef<Path>>(path: P) -> Result<UserSettings, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    settings_from_str(&content)
}

pub fn settings_from_str(content: &str) -> Result<UserSettings, ConfigError> {
    let value: Value = serde_json::from_str(content)?;
    if !value.is_object() {
        return Err(ConfigError::InvalidValue {
            key: "<root>".to_string(),
            reason: "settings must be a JSON object".to_string(),
        });
    }

    Ok(serde_json::from_value(value)?)
}

/// Writes the settings as pretty JSON, creating parent directories.
pub fn save_settings<P: AsRef<Path>>(path: P, settings: &UserSettings) -> Result<(), ConfigError> {
    let path = path.as_ref();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::CreateDirectory {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let json = serde_json::to_string_pretty(settings)?;
    std::fs::write(path, json).map_err(|e| ConfigError::WriteFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    debug!("Saved settings to {}", path.display());
    Ok(())
}

impl UserSettings {
    /// Logo file for the current mode, `None` when no path is set.
    pub fn logo_file(&self) -> Option<PathBuf> {
        let path = match self.logo_mode {
            LogoMode::Default => DEFAULT_LOGO_PATH,
            LogoMode::Custom => self.logo_path.trim(),
        };
        (!path.is_empty()).then(|| PathBuf::from(path))
    }

    pub fn language(&self) -> &str {
        let lang = self.ocr_language.trim();
        if lang.is_empty() {
            DEFAULT_LANGUAGE
        } else {
            lang
        }
    }

    /// Resolves the flat stored values into a layout configuration. Values
    /// that do not parse fall back to their defaults with a warning.
    pub fn to_layout_config(&self) -> LayoutConfig {
        let page_format = PageFormat::from_name(&self.page_format).unwrap_or_else(|| {
            warn!("Unknown page format '{}', using A4", self.page_format);
            PageFormat::A4
        });
        let orientation = Orientation::from_name(&self.orientation).unwrap_or_else(|| {
            warn!("Unknown orientation '{}', using portrait", self.orientation);
            Orientation::Portrait
        });

        let logo_width = clamp_f64(self.logo_width_mm, LOGO_WIDTH_RANGE);
        let position = self
            .logo_position_key
            .parse::<LogoPosition>()
            .unwrap_or_else(|e| {
                warn!("{}, using top-left", e);
                LogoPosition::TopLeft
            });
        let logo = self.logo_file().map(|path| {
            LogoPlacement::at_preset(path, position, page_format, orientation, logo_width)
        });

        LayoutConfig {
            page_format,
            orientation,
            logo,
            title_font: font_spec(&self.title_font_family, self.title_font_size),
            body_font: font_spec(&self.body_font_family, self.body_font_size),
            title_color: color_or(&self.title_color_hex, DEFAULT_TITLE_COLOR),
            body_color: color_or(&self.body_color_hex, DEFAULT_BODY_COLOR),
            show_file_name: self.show_file_name,
            margins: Margins::default(),
        }
    }
}

fn font_spec(family: &str, size: f32) -> FontSpec {
    let family = FontFamily::from_name(family).unwrap_or_else(|| {
        warn!("Unsupported font family '{}', using Arial", family);
        FontFamily::Helvetica
    });
    let size = if size.is_finite() {
        size.clamp(FONT_SIZE_RANGE.0, FONT_SIZE_RANGE.1)
    } else {
        FONT_SIZE_RANGE.0
    };
    FontSpec::new(family, size)
}

fn color_or(hex: &str, fallback: Rgb) -> Rgb {
    Rgb::from_hex(hex).unwrap_or_else(|e| {
        warn!("{}, using {}", e, fallback.to_hex());
        fallback
    })
}

fn clamp_f64(value: f64, (min, max): (f64, f64)) -> f64 {
    if value.is_finite() {
        value.clamp(min, max)
    } else {
        min
    }
}
