//! Page Layout Engine: turns extraction results into the catalog PDF.
//!
//! Every result becomes exactly one page, in ascending file-name order.
//! A page always carries the demo notice and the text block; the logo and
//! the artwork image are optional assets whose failures are recorded in
//! the page report instead of aborting the build.

use log::{debug, info, warn};

use crate::config::{LayoutConfig, LogoPlacement, Rgb};
use crate::error::{LayoutError, RenderError};
use crate::layout::canvas::{ImageHandle, PdfCanvas};
use crate::layout::geometry::{
    artwork_rect, content_bottom, content_top, ARTWORK_GAP, LINE_HEIGHT, NOTICE_GAP,
};
use crate::processor::PdfImage;
use crate::record::{sort_by_name, ExtractionResult};

pub const DEMO_NOTICE: &str = "This is a demo. Please contact the developer for full access.";
pub const NOTICE_COLOR: Rgb = Rgb::new(200, 0, 0);
pub const NO_TEXT_PLACEHOLDER: &str = "[No text detected]";
pub const DOCUMENT_TITLE: &str = "Artwork Catalog";

/// What happened to an optional asset on one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetOutcome {
    Drawn,
    Skipped { reason: String },
    NotConfigured,
}

impl AssetOutcome {
    fn skipped(err: &RenderError) -> Self {
        AssetOutcome::Skipped {
            reason: err.to_string(),
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, AssetOutcome::Skipped { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageReport {
    /// Zero-based page index.
    pub index: usize,
    pub name: String,
    pub logo: AssetOutcome,
    pub artwork: AssetOutcome,
    /// Some of the notice or body text did not fit on the page.
    pub text_truncated: bool,
}

impl PageReport {
    pub fn is_degraded(&self) -> bool {
        self.logo.is_skipped() || self.artwork.is_skipped() || self.text_truncated
    }
}

/// A finished catalog and what was drawn on each page.
#[derive(Debug, Clone)]
pub struct CatalogDocument {
    pub bytes: Vec<u8>,
    pub pages: Vec<PageReport>,
}

impl CatalogDocument {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn is_degraded(&self) -> bool {
        self.pages.iter().any(PageReport::is_degraded)
    }

    pub fn degraded_pages(&self) -> impl Iterator<Item = &PageReport> {
        self.pages.iter().filter(|p| p.is_degraded())
    }
}

/// The logo as prepared once for the whole document.
enum LogoAsset {
    None,
    Ready(ImageHandle, LogoPlacement),
    /// The file exists but could not be used; the anchor still follows it.
    Broken(String, LogoPlacement),
    Missing(String),
}

impl LogoAsset {
    fn anchor(&self) -> Option<&LogoPlacement> {
        match self {
            LogoAsset::Ready(_, placement) | LogoAsset::Broken(_, placement) => Some(placement),
            LogoAsset::None | LogoAsset::Missing(_) => None,
        }
    }
}

fn validate(config: &LayoutConfig) -> Result<(), LayoutError> {
    for (label, font) in [("title", &config.title_font), ("body", &config.body_font)] {
        if !(font.size.is_finite() && font.size > 0.0) {
            return Err(LayoutError::InvalidConfig(format!(
                "{} font size must be positive, got {}",
                label, font.size
            )));
        }
    }
    if let Some(logo) = &config.logo {
        if !(logo.width.is_finite() && logo.width > 0.0) {
            return Err(LayoutError::InvalidConfig(format!(
                "logo width must be positive, got {}",
                logo.width
            )));
        }
    }
    Ok(())
}

fn prepare_logo(canvas: &mut PdfCanvas, placement: Option<&LogoPlacement>) -> LogoAsset {
    let Some(placement) = placement else {
        return LogoAsset::None;
    };

    match PdfImage::from_path(&placement.path) {
        Ok(image) => LogoAsset::Ready(canvas.register_image(image), placement.clone()),
        Err(e @ RenderError::MissingAsset(_)) => {
            warn!("Logo not drawn: {}", e);
            LogoAsset::Missing(e.to_string())
        }
        Err(e) => {
            warn!("Logo not drawn: {}", e);
            LogoAsset::Broken(e.to_string(), placement.clone())
        }
    }
}

/// Lays out one page per result, sorted by name, and serializes the PDF.
pub fn build_document(
    results: &[ExtractionResult],
    config: &LayoutConfig,
) -> Result<CatalogDocument, LayoutError> {
    validate(config)?;

    let span = tracing::info_span!("layout.document", pages = results.len());
    let _guard = span.enter();

    let mut ordered = results.to_vec();
    sort_by_name(&mut ordered);

    let mut canvas = PdfCanvas::new(config.page_size(), config.margins);
    let logo = prepare_logo(&mut canvas, config.logo.as_ref());

    let mut pages = Vec::with_capacity(ordered.len());
    for (index, result) in ordered.iter().enumerate() {
        pages.push(draw_page(&mut canvas, config, &logo, index, result)?);
    }

    let bytes = canvas.finish(DOCUMENT_TITLE)?;

    let degraded = pages.iter().filter(|p| p.is_degraded()).count();
    info!(
        "Built catalog: {} pages, {} degraded, {} bytes",
        pages.len(),
        degraded,
        bytes.len()
    );

    Ok(CatalogDocument { bytes, pages })
}

fn draw_page(
    canvas: &mut PdfCanvas,
    config: &LayoutConfig,
    logo: &LogoAsset,
    index: usize,
    result: &ExtractionResult,
) -> Result<PageReport, LayoutError> {
    let span = tracing::info_span!("layout.page", index, name = %result.name);
    let _guard = span.enter();

    canvas.add_page()?;
    let text_width = config.text_width();
    let (page_width, page_height) = config.page_size();

    let logo_outcome = match logo {
        LogoAsset::None => AssetOutcome::NotConfigured,
        LogoAsset::Ready(handle, placement) => {
            canvas.place_image(handle, placement.x, placement.y, placement.width);
            AssetOutcome::Drawn
        }
        LogoAsset::Broken(reason, _) | LogoAsset::Missing(reason) => AssetOutcome::Skipped {
            reason: reason.clone(),
        },
    };

    canvas.set_y(content_top(logo.anchor(), page_height));
    canvas.set_content_bottom(content_bottom(
        logo.anchor(),
        page_height,
        config.margins.bottom,
    ));

    canvas.set_font(config.body_font);
    canvas.set_text_color(NOTICE_COLOR);
    let notice = canvas.write_centered(text_width, LINE_HEIGHT, DEMO_NOTICE);
    canvas.line_break(NOTICE_GAP);
    let mut text_truncated = notice.truncated;

    if config.show_file_name {
        canvas.set_font(config.title_font);
        canvas.set_text_color(config.title_color);
        text_truncated |= canvas
            .write_centered(text_width, LINE_HEIGHT, &result.name)
            .truncated;
        canvas.line_break(NOTICE_GAP);
    }

    let artwork = if result.has_image() {
        match PdfImage::from_bytes(&result.raw_bytes) {
            Ok(image) => {
                let rect = artwork_rect(
                    page_width,
                    text_width,
                    canvas.y(),
                    image.width_px,
                    image.height_px,
                );
                if rect.y >= canvas.content_bottom() {
                    let reason = format!(
                        "no room for artwork: it would start at {:.1} mm, content ends at {:.1} mm",
                        rect.y,
                        canvas.content_bottom()
                    );
                    warn!("Artwork for {} not drawn: {}", result.name, reason);
                    AssetOutcome::Skipped { reason }
                } else {
                    let handle = canvas.register_image(image);
                    canvas.place_image(&handle, rect.x, rect.y, rect.width);
                    canvas.line_break(rect.height + ARTWORK_GAP);
                    AssetOutcome::Drawn
                }
            }
            Err(e) => {
                warn!("Artwork for {} not drawn: {}", result.name, e);
                AssetOutcome::skipped(&e)
            }
        }
    } else {
        AssetOutcome::NotConfigured
    };

    let text = if result.has_text() {
        result.text.as_str()
    } else {
        NO_TEXT_PLACEHOLDER
    };
    canvas.set_font(config.body_font);
    canvas.set_text_color(config.body_color);
    let block = canvas.write_centered(text_width, LINE_HEIGHT, text);
    if block.truncated {
        warn!("Text for {} truncated to {} lines", result.name, block.lines);
    }
    text_truncated |= block.truncated;

    debug!("Page {} laid out for {}", index + 1, result.name);

    Ok(PageReport {
        index,
        name: result.name.clone(),
        logo: logo_outcome,
        artwork,
        text_truncated,
    })
}
