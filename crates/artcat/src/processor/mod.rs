pub mod image;
pub mod ocr;

#[cfg(feature = "tesseract")]
pub mod tesseract;

#[cfg(not(feature = "tesseract"))]
pub mod tesseract_stub;

pub use self::image::PdfImage;
pub use ocr::{OcrEngine, OcrExtractor, DEFAULT_LANGUAGE};

#[cfg(feature = "tesseract")]
pub use tesseract::TesseractEngine;

#[cfg(not(feature = "tesseract"))]
pub use tesseract_stub::TesseractEngine;
