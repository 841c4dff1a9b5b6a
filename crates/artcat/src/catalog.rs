use log::info;

use crate::config::LayoutConfig;
use crate::error::Result;
use crate::layout::{build_document, CatalogDocument};
use crate::record::ImageRecord;
use crate::worker::BatchExtractor;

/// File name offered for the finished catalog.
pub const OUTPUT_FILE_NAME: &str = "artwork_catalog_demo.pdf";

/// Extracts text from every image, then lays the results out as a catalog.
///
/// A failed extraction fails the whole call before any page is drawn.
/// Missing or broken assets only degrade the affected pages.
pub fn generate_catalog(
    extractor: &BatchExtractor,
    images: Vec<ImageRecord>,
    config: &LayoutConfig,
) -> Result<CatalogDocument> {
    let results = extractor.extract_batch(images)?;
    let document = build_document(&results, config)?;

    if document.is_degraded() {
        info!(
            "Catalog generated with {} degraded pages",
            document.degraded_pages().count()
        );
    }

    Ok(document)
}
