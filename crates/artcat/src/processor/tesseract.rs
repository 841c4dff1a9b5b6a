//! Tesseract backend through `leptess` (compiled with the "tesseract" feature).

use std::io::Cursor;

use image::DynamicImage;

use crate::error::OcrError;
use crate::processor::ocr::OcrEngine;

/// Creates a fresh Tesseract handle per call; `LepTess` is not `Sync`, so
/// worker threads never share one.
#[derive(Debug, Clone, Default)]
pub struct TesseractEngine {
    data_path: Option<String>,
}

impl TesseractEngine {
    pub fn new() -> Self {
        Self { data_path: None }
    }

    /// Uses an explicit tessdata directory instead of the system default.
    pub fn with_data_path(data_path: impl Into<String>) -> Self {
        Self {
            data_path: Some(data_path.into()),
        }
    }
}

impl OcrEngine for TesseractEngine {
    fn recognize(&self, image: &DynamicImage, language: &str) -> Result<String, OcrError> {
        // leptess reads encoded images, not pixel buffers
        let mut png_data = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut png_data), image::ImageFormat::Png)
            .map_err(|e| OcrError::Engine(format!("Failed to convert image: {}", e)))?;

        let mut lt = leptess::LepTess::new(self.data_path.as_deref(), language).map_err(|e| {
            OcrError::Engine(format!("Failed to initialize Tesseract: {}", e))
        })?;

        lt.set_image_from_mem(&png_data)
            .map_err(|e| OcrError::Engine(format!("Failed to set image for OCR: {}", e)))?;

        lt.get_utf8_text()
            .map_err(|e| OcrError::Engine(format!("OCR failed: {}", e)))
    }
}
