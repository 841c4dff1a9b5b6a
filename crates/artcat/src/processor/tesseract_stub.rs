//! Stand-in Tesseract backend used when the "tesseract" feature is disabled.
//!
//! Keeps the public API identical so callers compile either way; every
//! recognition attempt reports an engine error.

use image::DynamicImage;

use crate::error::OcrError;
use crate::processor::ocr::OcrEngine;

#[derive(Debug, Clone, Default)]
pub struct TesseractEngine {
    data_path: Option<String>,
}

impl TesseractEngine {
    pub fn new() -> Self {
        Self { data_path: None }
    }

    pub fn with_data_path(data_path: impl Into<String>) -> Self {
        Self {
            data_path: Some(data_path.into()),
        }
    }
}

impl OcrEngine for TesseractEngine {
    fn recognize(&self, _image: &DynamicImage, language: &str) -> Result<String, OcrError> {
        log::debug!(
            "Tesseract unavailable (language {}, data path {:?})",
            language,
            self.data_path
        );
        Err(OcrError::Engine(
            "Tesseract support not enabled; rebuild with the `tesseract` feature".to_string(),
        ))
    }
}
