//! Placement rules for the catalog page template. All values are in mm
//! measured from the top-left corner of the page.

use crate::config::LogoPlacement;

/// Vertical start of the content when no logo is on the page.
pub const NO_LOGO_TOP: f64 = 20.0;
/// Space between the logo's (square) footprint and the demo notice.
pub const LOGO_GAP: f64 = 2.0;
pub const LINE_HEIGHT: f64 = 6.0;
pub const NOTICE_GAP: f64 = 2.0;
pub const ARTWORK_GAP: f64 = 4.0;
pub const MAX_ARTWORK_WIDTH: f64 = 120.0;
pub const ARTWORK_WIDTH_RATIO: f64 = 0.8;

const POINTS_PER_MM: f64 = 72.0 / 25.4;

pub fn mm_to_pt(mm: f64) -> f64 {
    mm * POINTS_PER_MM
}

pub fn pt_to_mm(pt: f64) -> f64 {
    pt / POINTS_PER_MM
}

/// Offset that centers an element inside a container.
pub fn center_offset(container: f64, element: f64) -> f64 {
    (container - element) / 2.0
}

/// `height = width * pixel_height / pixel_width`
pub fn scaled_height(width: f64, width_px: u32, height_px: u32) -> f64 {
    if width_px == 0 {
        return 0.0;
    }
    width * f64::from(height_px) / f64::from(width_px)
}

/// Rendered artwork width: 80% of the text width, capped at 120 mm.
pub fn artwork_width(text_width: f64) -> f64 {
    MAX_ARTWORK_WIDTH.min(text_width * ARTWORK_WIDTH_RATIO)
}

/// True when the logo sits in the upper half of the page.
pub fn is_top_logo(logo: &LogoPlacement, page_height: f64) -> bool {
    logo.y + logo.width / 2.0 < page_height / 2.0
}

/// Where the demo notice starts. A top logo is assumed to be roughly square,
/// so its width doubles as its height. Bottom logos leave the anchor alone.
pub fn content_top(logo: Option<&LogoPlacement>, page_height: f64) -> f64 {
    match logo {
        Some(logo) if is_top_logo(logo, page_height) => logo.y + logo.width + LOGO_GAP,
        _ => NO_LOGO_TOP,
    }
}

/// Lowest point page content may reach: the bottom margin, or just above a
/// bottom logo when that is higher.
pub fn content_bottom(logo: Option<&LogoPlacement>, page_height: f64, bottom_margin: f64) -> f64 {
    let limit = page_height - bottom_margin;
    match logo {
        Some(logo) if !is_top_logo(logo, page_height) => limit.min(logo.y - LOGO_GAP),
        _ => limit,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Artwork rectangle: horizontally centered on the page, top edge at `top`.
pub fn artwork_rect(page_width: f64, text_width: f64, top: f64, width_px: u32, height_px: u32) -> Rect {
    let width = artwork_width(text_width);
    Rect {
        x: center_offset(page_width, width),
        y: top,
        width,
        height: scaled_height(width, width_px, height_px),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_center_offset() {
        assert_eq!(center_offset(190.0, 150.0), 20.0);
        assert_eq!(center_offset(210.0, 120.0), 45.0);
        assert_eq!(center_offset(100.0, 100.0), 0.0);
    }

    #[test]
    fn test_aspect_ratio_is_preserved() {
        assert!((scaled_height(120.0, 400, 200) - 60.0).abs() < EPS);
        assert!((scaled_height(120.0, 200, 400) - 240.0).abs() < EPS);
        assert_eq!(scaled_height(120.0, 0, 200), 0.0);
    }

    #[test]
    fn test_artwork_width_is_capped() {
        assert_eq!(artwork_width(190.0), 120.0);
        assert!((artwork_width(100.0) - 80.0).abs() < EPS);
    }

    fn logo(y: f64) -> LogoPlacement {
        LogoPlacement {
            path: PathBuf::from("logo.png"),
            x: 10.0,
            y,
            width: 25.0,
        }
    }

    #[test]
    fn test_content_top() {
        assert_eq!(content_top(None, 297.0), 20.0);
        assert_eq!(content_top(Some(&logo(8.0)), 297.0), 35.0);
    }

    #[test]
    fn test_bottom_logo_keeps_default_anchor() {
        // A4 bottom preset: 297 - 25 - 10
        let bottom = logo(262.0);
        assert!(!is_top_logo(&bottom, 297.0));
        assert_eq!(content_top(Some(&bottom), 297.0), 20.0);
    }

    #[test]
    fn test_content_bottom() {
        assert_eq!(content_bottom(None, 297.0, 15.0), 282.0);
        assert_eq!(content_bottom(Some(&logo(10.0)), 297.0, 15.0), 282.0);
        assert_eq!(content_bottom(Some(&logo(262.0)), 297.0, 15.0), 260.0);
    }

    #[test]
    fn test_artwork_rect_on_a4() {
        let rect = artwork_rect(210.0, 190.0, 28.0, 400, 200);
        assert_eq!(rect.x, 45.0);
        assert_eq!(rect.y, 28.0);
        assert_eq!(rect.width, 120.0);
        assert!((rect.height - 60.0).abs() < EPS);
    }

    #[test]
    fn test_unit_conversion() {
        assert!((mm_to_pt(25.4) - 72.0).abs() < EPS);
        assert!((pt_to_mm(mm_to_pt(210.0)) - 210.0).abs() < EPS);
    }
}
