//! Scripted OCR engine and image fixtures.
//!
//! Fixture images are keyed by their pixel width: the engine looks the width
//! up in its script to decide what to answer, so a test can tell images apart
//! without any real recognition.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::io::Cursor;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use image::{DynamicImage, ImageFormat, RgbImage};

use artcat::{ExtractionResult, ImageRecord, OcrEngine, OcrError, OcrExtractor};

/// Answers OCR calls from a width-keyed script.
#[derive(Default)]
pub struct ScriptedEngine {
    texts: HashMap<u32, String>,
    failures: HashSet<u32>,
    delays: HashMap<u32, Duration>,
}

impl ScriptedEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Images `width` pixels wide read as `text`.
    pub fn text(mut self, width: u32, text: &str) -> Self {
        self.texts.insert(width, text.to_string());
        self
    }

    /// Images `width` pixels wide make the engine fail.
    pub fn fail(mut self, width: u32) -> Self {
        self.failures.insert(width);
        self
    }

    /// Images `width` pixels wide take `delay` to recognize.
    pub fn delay(mut self, width: u32, delay: Duration) -> Self {
        self.delays.insert(width, delay);
        self
    }

    pub fn into_extractor(self) -> OcrExtractor {
        OcrExtractor::new(Arc::new(self), "eng")
    }
}

impl OcrEngine for ScriptedEngine {
    fn recognize(&self, image: &DynamicImage, _language: &str) -> Result<String, OcrError> {
        let width = image.width();
        if let Some(delay) = self.delays.get(&width) {
            thread::sleep(*delay);
        }
        if self.failures.contains(&width) {
            return Err(OcrError::Engine(format!("scripted failure for width {}", width)));
        }
        Ok(self.texts.get(&width).cloned().unwrap_or_default())
    }
}

fn encode(image: DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut buf = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut buf), format)
        .expect("Failed to encode fixture image");
    buf
}

pub fn png(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_pixel(width, height, image::Rgb([180, 120, 60]));
    encode(DynamicImage::ImageRgb8(img), ImageFormat::Png)
}

pub fn jpeg(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_pixel(width, height, image::Rgb([40, 90, 160]));
    encode(DynamicImage::ImageRgb8(img), ImageFormat::Jpeg)
}

pub fn record(name: &str, bytes: Vec<u8>) -> ImageRecord {
    ImageRecord::new(name, bytes)
}

pub fn result(name: &str, text: &str, bytes: Vec<u8>) -> ExtractionResult {
    ExtractionResult {
        name: name.to_string(),
        text: text.to_string(),
        raw_bytes: bytes,
    }
}
