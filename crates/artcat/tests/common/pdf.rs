//! Reads generated catalogs back with `lopdf`.

#![allow(dead_code)]

use lopdf::content::Content;
use lopdf::{Document, Object};

/// One `Tj` string and the `Td` position it was drawn at, in points.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub x: f32,
    pub y: f32,
    pub text: String,
}

/// One drawn image: the `cm` matrix before its `Do`, in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedImage {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

pub struct PdfInspector {
    doc: Document,
}

fn number(obj: &Object) -> f32 {
    obj.as_float().expect("operand is not a number")
}

impl PdfInspector {
    pub fn load(bytes: &[u8]) -> Self {
        Self {
            doc: Document::load_mem(bytes).expect("Failed to parse generated PDF"),
        }
    }

    pub fn page_count(&self) -> usize {
        self.doc.get_pages().len()
    }

    fn page_content(&self, page: usize) -> Content {
        let pages = self.doc.get_pages();
        let page_id = pages
            .values()
            .nth(page)
            .copied()
            .expect("page index out of range");
        let data = self
            .doc
            .get_page_content(page_id)
            .expect("Failed to read page content");
        Content::decode(&data).expect("Failed to decode page content")
    }

    /// Text runs of one page in drawing order.
    pub fn text_runs(&self, page: usize) -> Vec<TextRun> {
        let mut runs = Vec::new();
        let mut position = (0.0, 0.0);

        for op in self.page_content(page).operations {
            match op.operator.as_str() {
                "Td" => position = (number(&op.operands[0]), number(&op.operands[1])),
                "Tj" => {
                    let bytes = op.operands[0].as_str().expect("Tj operand is not a string");
                    runs.push(TextRun {
                        x: position.0,
                        y: position.1,
                        text: bytes.iter().map(|&b| char::from(b)).collect(),
                    });
                }
                _ => {}
            }
        }

        runs
    }

    /// All text strings of one page in drawing order.
    pub fn page_text(&self, page: usize) -> Vec<String> {
        self.text_runs(page).into_iter().map(|run| run.text).collect()
    }

    pub fn images(&self, page: usize) -> Vec<PlacedImage> {
        let mut placed = Vec::new();
        let mut matrix = None;

        for op in self.page_content(page).operations {
            match op.operator.as_str() {
                "cm" => {
                    let m: Vec<f32> = op.operands.iter().map(number).collect();
                    matrix = Some(PlacedImage {
                        x: m[4],
                        y: m[5],
                        width: m[0],
                        height: m[3],
                    });
                }
                "Do" => placed.extend(matrix.take()),
                _ => {}
            }
        }

        placed
    }

    /// Value of a string entry in the document Info dictionary.
    pub fn info(&self, key: &str) -> Option<String> {
        let info_ref = self.doc.trailer.get(b"Info").ok()?.as_reference().ok()?;
        let info = self.doc.get_dictionary(info_ref).ok()?;
        let value = info.get(key.as_bytes()).ok()?.as_str().ok()?;
        Some(String::from_utf8_lossy(value).into_owned())
    }
}

pub fn mm(points: f32) -> f64 {
    f64::from(points) * 25.4 / 72.0
}
