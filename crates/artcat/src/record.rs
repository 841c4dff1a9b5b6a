/// An uploaded artwork image waiting for extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRecord {
    pub name: String,
    pub raw_bytes: Vec<u8>,
}

impl ImageRecord {
    pub fn new(name: impl Into<String>, raw_bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            raw_bytes,
        }
    }
}

/// OCR output for one image. `text` is trimmed and may be empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionResult {
    pub name: String,
    pub text: String,
    pub raw_bytes: Vec<u8>,
}

impl ExtractionResult {
    /// Consumes the record so the image bytes move along with the text.
    pub fn from_record(record: ImageRecord, text: String) -> Self {
        Self {
            name: record.name,
            text,
            raw_bytes: record.raw_bytes,
        }
    }

    pub fn has_text(&self) -> bool {
        !self.text.is_empty()
    }

    pub fn has_image(&self) -> bool {
        !self.raw_bytes.is_empty()
    }
}

/// Stable sort by file name, the page order of every catalog.
pub fn sort_by_name(results: &mut [ExtractionResult]) {
    results.sort_by(|a, b| a.name.cmp(&b.name));
}
