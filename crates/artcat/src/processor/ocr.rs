use std::sync::Arc;

use image::DynamicImage;

use crate::error::OcrError;

pub const DEFAULT_LANGUAGE: &str = "eng";

/// Text recognition backend. Implementations must be callable from several
/// worker threads at once.
pub trait OcrEngine: Send + Sync {
    fn recognize(&self, image: &DynamicImage, language: &str) -> Result<String, OcrError>;
}

/// Decodes raw upload bytes and runs them through an [`OcrEngine`].
#[derive(Clone)]
pub struct OcrExtractor {
    inner: Arc<OcrExtractorInner>,
}

struct OcrExtractorInner {
    engine: Arc<dyn OcrEngine>,
    language: String,
}

impl OcrExtractor {
    pub fn new(engine: Arc<dyn OcrEngine>, language: &str) -> Self {
        let language = if language.trim().is_empty() {
            DEFAULT_LANGUAGE.to_string()
        } else {
            language.trim().to_string()
        };

        Self {
            inner: Arc::new(OcrExtractorInner { engine, language }),
        }
    }

    /// Joins several language codes into a Tesseract style hint (`eng+spa`).
    pub fn with_languages(engine: Arc<dyn OcrEngine>, languages: &[String]) -> Self {
        Self::new(engine, &languages.join("+"))
    }

    pub fn language(&self) -> &str {
        &self.inner.language
    }

    pub fn extract(&self, image_bytes: &[u8]) -> Result<String, OcrError> {
        let _span = tracing::info_span!("processor.ocr", language = %self.inner.language).entered();

        if image_bytes.is_empty() {
            return Err(OcrError::Decode("image data is empty".to_string()));
        }

        let img = image::load_from_memory(image_bytes)
            .map_err(|e| OcrError::Decode(format!("Failed to load image: {}", e)))?;

        let text = self.inner.engine.recognize(&img, &self.inner.language)?;

        Ok(text.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    struct FixedEngine(&'static str);

    impl OcrEngine for FixedEngine {
        fn recognize(&self, _image: &DynamicImage, _language: &str) -> Result<String, OcrError> {
            Ok(self.0.to_string())
        }
    }

    struct LanguageEcho;

    impl OcrEngine for LanguageEcho {
        fn recognize(&self, _image: &DynamicImage, language: &str) -> Result<String, OcrError> {
            Ok(language.to_string())
        }
    }

    struct BrokenEngine;

    impl OcrEngine for BrokenEngine {
        fn recognize(&self, _image: &DynamicImage, _language: &str) -> Result<String, OcrError> {
            Err(OcrError::Engine("tessdata missing".to_string()))
        }
    }

    fn png_bytes() -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(image::RgbImage::new(4, 2));
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn test_extract_trims_text() {
        let extractor = OcrExtractor::new(Arc::new(FixedEngine("  Mona Lisa\n\n")), "eng");
        assert_eq!(extractor.extract(&png_bytes()).unwrap(), "Mona Lisa");
    }

    #[test]
    fn test_extract_allows_empty_text() {
        let extractor = OcrExtractor::new(Arc::new(FixedEngine(" \n ")), "eng");
        assert_eq!(extractor.extract(&png_bytes()).unwrap(), "");
    }

    #[test]
    fn test_language_hint_is_forwarded() {
        let extractor = OcrExtractor::new(Arc::new(LanguageEcho), "eng+spa");
        assert_eq!(extractor.extract(&png_bytes()).unwrap(), "eng+spa");
    }

    #[test]
    fn test_blank_language_defaults_to_eng() {
        let extractor = OcrExtractor::new(Arc::new(LanguageEcho), "  ");
        assert_eq!(extractor.language(), "eng");
    }

    #[test]
    fn test_with_languages_joins_codes() {
        let extractor = OcrExtractor::with_languages(
            Arc::new(LanguageEcho),
            &["eng".to_string(), "spa".to_string()],
        );
        assert_eq!(extractor.language(), "eng+spa");
    }

    #[test]
    fn test_invalid_image_data_error() {
        let extractor = OcrExtractor::new(Arc::new(FixedEngine("x")), "eng");
        match extractor.extract(b"not valid image data") {
            Err(OcrError::Decode(msg)) => assert!(msg.contains("Failed to load image")),
            other => panic!("Expected Decode error, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_image_data_error() {
        let extractor = OcrExtractor::new(Arc::new(FixedEngine("x")), "eng");
        assert!(matches!(extractor.extract(&[]), Err(OcrError::Decode(_))));
    }

    #[test]
    fn test_engine_error_is_surfaced() {
        let extractor = OcrExtractor::new(Arc::new(BrokenEngine), "eng");
        match extractor.extract(&png_bytes()) {
            Err(OcrError::Engine(msg)) => assert_eq!(msg, "tessdata missing"),
            other => panic!("Expected Engine error, got {:?}", other),
        }
    }

    #[test]
    fn test_extractor_clone_shares_engine() {
        let extractor = OcrExtractor::new(Arc::new(FixedEngine("x")), "spa");
        let cloned = extractor.clone();
        assert!(Arc::ptr_eq(&extractor.inner, &cloned.inner));
        assert_eq!(cloned.language(), "spa");
    }
}
