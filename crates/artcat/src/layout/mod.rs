pub mod canvas;
pub mod engine;
pub mod geometry;
pub mod text;

pub use canvas::{ImageHandle, PdfCanvas, TextBlock};
pub use engine::{
    build_document, AssetOutcome, CatalogDocument, PageReport, DEMO_NOTICE, NO_TEXT_PLACEHOLDER,
};
