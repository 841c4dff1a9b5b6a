pub mod catalog;
pub mod config;
pub mod error;
pub mod layout;
pub mod processor;
pub mod record;
pub mod worker;

pub use catalog::{generate_catalog, OUTPUT_FILE_NAME};
pub use config::{load_settings, save_settings, LayoutConfig, UserSettings};
pub use error::{
    BatchError, CatalogError, ConfigError, LayoutError, OcrError, RenderError, Result, ScanError,
};
pub use layout::{build_document, AssetOutcome, CatalogDocument, PageReport};
pub use processor::{OcrEngine, OcrExtractor, TesseractEngine};
pub use record::{ExtractionResult, ImageRecord};
pub use worker::{collect_images, extract_batch, BatchConfig, BatchExtractor};
