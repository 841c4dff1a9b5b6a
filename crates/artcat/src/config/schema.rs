use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Distance of a logo preset from the page edges, in mm.
pub const LOGO_EDGE_MARGIN: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PageFormat {
    #[default]
    #[serde(alias = "a4")]
    A4,
    #[serde(alias = "letter", alias = "LETTER")]
    Letter,
}

impl PageFormat {
    /// Portrait (width, height) in mm.
    pub fn dimensions_mm(&self) -> (f64, f64) {
        match self {
            PageFormat::A4 => (210.0, 297.0),
            PageFormat::Letter => (215.9, 279.4),
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "a4" => Some(PageFormat::A4),
            "letter" | "us letter" => Some(PageFormat::Letter),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PageFormat::A4 => "A4",
            PageFormat::Letter => "letter",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    #[serde(alias = "P")]
    Portrait,
    #[serde(alias = "L")]
    Landscape,
}

impl Orientation {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "p" | "portrait" => Some(Orientation::Portrait),
            "l" | "landscape" => Some(Orientation::Landscape),
            _ => None,
        }
    }

    /// Single-letter code used by the persisted settings.
    pub fn code(&self) -> &'static str {
        match self {
            Orientation::Portrait => "P",
            Orientation::Landscape => "L",
        }
    }
}

/// Physical page size in mm after applying the orientation.
pub fn page_size(format: PageFormat, orientation: Orientation) -> (f64, f64) {
    let (w, h) = format.dimensions_mm();
    match orientation {
        Orientation::Portrait => (w, h),
        Orientation::Landscape => (h, w),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#RRGGBB` (the leading `#` is optional).
    pub fn from_hex(value: &str) -> Result<Self, ConfigError> {
        let invalid = || ConfigError::InvalidColor {
            value: value.to_string(),
        };
        let hex = value.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(invalid());
        }

        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Components scaled to 0.0–1.0 for PDF colour operators.
    pub fn as_unit(&self) -> (f32, f32, f32) {
        (
            f32::from(self.r) / 255.0,
            f32::from(self.g) / 255.0,
            f32::from(self.b) / 255.0,
        )
    }
}

/// The three standard PDF font families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum FontFamily {
    #[default]
    #[serde(alias = "Arial", alias = "arial", alias = "helvetica")]
    Helvetica,
    #[serde(alias = "times", alias = "Times-Roman")]
    Times,
    #[serde(alias = "courier")]
    Courier,
}

impl FontFamily {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "arial" | "helvetica" => Some(FontFamily::Helvetica),
            "times" | "times-roman" | "times new roman" => Some(FontFamily::Times),
            "courier" | "courier new" => Some(FontFamily::Courier),
            _ => None,
        }
    }

    /// PostScript name of the regular face.
    pub fn base_font(&self) -> &'static str {
        match self {
            FontFamily::Helvetica => "Helvetica",
            FontFamily::Times => "Times-Roman",
            FontFamily::Courier => "Courier",
        }
    }
}

impl fmt::Display for FontFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FontFamily::Helvetica => "Arial",
            FontFamily::Times => "Times",
            FontFamily::Courier => "Courier",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FontSpec {
    pub family: FontFamily,
    /// Size in points.
    pub size: f32,
}

impl FontSpec {
    pub const fn new(family: FontFamily, size: f32) -> Self {
        Self { family, size }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LogoPosition {
    #[default]
    TopLeft,
    TopCenter,
    TopRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

impl LogoPosition {
    pub const ALL: [LogoPosition; 6] = [
        LogoPosition::TopLeft,
        LogoPosition::TopCenter,
        LogoPosition::TopRight,
        LogoPosition::BottomLeft,
        LogoPosition::BottomCenter,
        LogoPosition::BottomRight,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            LogoPosition::TopLeft => "top-left",
            LogoPosition::TopCenter => "top-center",
            LogoPosition::TopRight => "top-right",
            LogoPosition::BottomLeft => "bottom-left",
            LogoPosition::BottomCenter => "bottom-center",
            LogoPosition::BottomRight => "bottom-right",
        }
    }

    fn is_top(&self) -> bool {
        matches!(
            self,
            LogoPosition::TopLeft | LogoPosition::TopCenter | LogoPosition::TopRight
        )
    }

    /// Resolves the preset into the logo's top-left corner (x, y) in mm.
    /// The logo is treated as square for the vertical offset.
    pub fn resolve(
        &self,
        format: PageFormat,
        orientation: Orientation,
        logo_width: f64,
    ) -> (f64, f64) {
        let (page_w, page_h) = page_size(format, orientation);

        let y = if self.is_top() {
            LOGO_EDGE_MARGIN
        } else {
            page_h - logo_width - LOGO_EDGE_MARGIN
        };

        let x = match self {
            LogoPosition::TopLeft | LogoPosition::BottomLeft => LOGO_EDGE_MARGIN,
            LogoPosition::TopRight | LogoPosition::BottomRight => {
                page_w - logo_width - LOGO_EDGE_MARGIN
            }
            LogoPosition::TopCenter | LogoPosition::BottomCenter => (page_w - logo_width) / 2.0,
        };

        (x, y)
    }
}

impl FromStr for LogoPosition {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase().replace([' ', '_'], "-");
        LogoPosition::ALL
            .into_iter()
            .find(|p| p.key() == key)
            .ok_or_else(|| ConfigError::InvalidValue {
                key: "logo_position_key".to_string(),
                reason: format!("unknown logo position '{}'", s),
            })
    }
}

/// Where the logo goes on every page, in mm from the top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogoPlacement {
    pub path: PathBuf,
    pub x: f64,
    pub y: f64,
    pub width: f64,
}

impl LogoPlacement {
    pub fn at_preset(
        path: impl Into<PathBuf>,
        position: LogoPosition,
        format: PageFormat,
        orientation: Orientation,
        width: f64,
    ) -> Self {
        let (x, y) = position.resolve(format, orientation, width);
        Self {
            path: path.into(),
            x,
            y,
            width,
        }
    }
}

/// Page margins in mm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    /// Text below this distance from the bottom edge is cut off.
    pub bottom: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            left: 10.0,
            right: 10.0,
            top: 10.0,
            bottom: 15.0,
        }
    }
}

pub const DEFAULT_TITLE_COLOR: Rgb = Rgb::new(0x1E, 0x40, 0xAF);
pub const DEFAULT_BODY_COLOR: Rgb = Rgb::new(0x0F, 0x17, 0x2A);

/// Everything the layout engine needs for one document build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    #[serde(default)]
    pub page_format: PageFormat,
    #[serde(default)]
    pub orientation: Orientation,
    #[serde(default)]
    pub logo: Option<LogoPlacement>,
    #[serde(default = "default_title_font")]
    pub title_font: FontSpec,
    #[serde(default = "default_body_font")]
    pub body_font: FontSpec,
    #[serde(default = "default_title_color")]
    pub title_color: Rgb,
    #[serde(default = "default_body_color")]
    pub body_color: Rgb,
    /// Print the image file name under the demo notice.
    #[serde(default)]
    pub show_file_name: bool,
    #[serde(default)]
    pub margins: Margins,
}

fn default_title_font() -> FontSpec {
    FontSpec::new(FontFamily::Helvetica, 14.0)
}

fn default_body_font() -> FontSpec {
    FontSpec::new(FontFamily::Helvetica, 11.0)
}

fn default_title_color() -> Rgb {
    DEFAULT_TITLE_COLOR
}

fn default_body_color() -> Rgb {
    DEFAULT_BODY_COLOR
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            page_format: PageFormat::default(),
            orientation: Orientation::default(),
            logo: None,
            title_font: default_title_font(),
            body_font: default_body_font(),
            title_color: DEFAULT_TITLE_COLOR,
            body_color: DEFAULT_BODY_COLOR,
            show_file_name: false,
            margins: Margins::default(),
        }
    }
}

impl LayoutConfig {
    pub fn page_size(&self) -> (f64, f64) {
        page_size(self.page_format, self.orientation)
    }

    /// Page width minus the left and right margins.
    pub fn text_width(&self) -> f64 {
        self.page_size().0 - self.margins.left - self.margins.right
    }
}
