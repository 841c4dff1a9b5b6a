use std::collections::{BTreeMap, BTreeSet};

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};

use crate::config::{FontFamily, FontSpec, Margins, Rgb};
use crate::error::LayoutError;
use crate::layout::geometry::{center_offset, mm_to_pt, pt_to_mm, scaled_height};
use crate::layout::text::{encode, to_single_byte, TextMeasure};
use crate::processor::PdfImage;

/// Horizontal padding inside a text cell, in mm.
pub const CELL_PADDING: f64 = 1.0;

/// An image embedded once and drawable on any page.
#[derive(Debug, Clone, Copy)]
pub struct ImageHandle {
    id: ObjectId,
    pub width_px: u32,
    pub height_px: u32,
}

/// Outcome of drawing one block of wrapped text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextBlock {
    pub lines: usize,
    pub truncated: bool,
}

#[derive(Default)]
struct PageState {
    operations: Vec<Operation>,
    fonts: BTreeSet<FontFamily>,
    images: BTreeMap<String, ObjectId>,
}

/// Imperative drawing surface over a `lopdf` document.
///
/// Coordinates are mm from the top-left page corner with a vertical text
/// cursor, converted to PDF points on output. Pages are appended in call
/// order and the surface is owned by a single layout pass.
pub struct PdfCanvas {
    doc: Document,
    pages_id: ObjectId,
    page_ids: Vec<ObjectId>,
    font_ids: BTreeMap<FontFamily, ObjectId>,
    page: Option<PageState>,
    page_size: (f64, f64),
    margins: Margins,
    font: FontSpec,
    text_color: Rgb,
    y: f64,
    content_bottom: f64,
}

impl PdfCanvas {
    pub fn new(page_size: (f64, f64), margins: Margins) -> Self {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        Self {
            doc,
            pages_id,
            page_ids: Vec::new(),
            font_ids: BTreeMap::new(),
            page: None,
            page_size,
            margins,
            font: FontSpec::new(FontFamily::Helvetica, 11.0),
            text_color: Rgb::default(),
            y: margins.top,
            content_bottom: page_size.1 - margins.bottom,
        }
    }

    pub fn add_page(&mut self) -> Result<(), LayoutError> {
        self.flush_page()?;
        self.page = Some(PageState::default());
        self.y = self.margins.top;
        Ok(())
    }

    pub fn set_font(&mut self, font: FontSpec) {
        self.font = font;
    }

    pub fn set_text_color(&mut self, color: Rgb) {
        self.text_color = color;
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn set_y(&mut self, y: f64) {
        self.y = y;
    }

    pub fn line_break(&mut self, height: f64) {
        self.y += height;
    }

    /// Text below this line is cut off. Starts at the bottom margin.
    pub fn content_bottom(&self) -> f64 {
        self.content_bottom
    }

    pub fn set_content_bottom(&mut self, y: f64) {
        self.content_bottom = y;
    }

    /// Embeds the image into the document without drawing it.
    pub fn register_image(&mut self, image: PdfImage) -> ImageHandle {
        let width_px = image.width_px;
        let height_px = image.height_px;
        let id = self.doc.add_object(image.into_stream());
        ImageHandle {
            id,
            width_px,
            height_px,
        }
    }

    /// Draws an embedded image with its top-left corner at (x, y) and the
    /// given width. Returns the rendered height.
    pub fn place_image(&mut self, image: &ImageHandle, x: f64, y: f64, width: f64) -> f64 {
        let height = scaled_height(width, image.width_px, image.height_px);
        let page_height = self.page_size.1;
        let page = self.page.get_or_insert_with(PageState::default);

        let name = format!("Im{}", image.id.0);
        page.images.insert(name.clone(), image.id);

        page.operations.extend([
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    real(mm_to_pt(width)),
                    real(0.0),
                    real(0.0),
                    real(mm_to_pt(height)),
                    real(mm_to_pt(x)),
                    real(mm_to_pt(page_height - y - height)),
                ],
            ),
            Operation::new("Do", vec![Object::Name(name.into_bytes())]),
            Operation::new("Q", vec![]),
        ]);

        height
    }

    /// Draws `text` wrapped to `width`, each line centered in a cell that
    /// starts at the left margin. Advances the cursor one `line_height` per
    /// line. Lines that would cross the content bottom are dropped and the
    /// last kept line is ellipsized.
    pub fn write_centered(&mut self, width: f64, line_height: f64, text: &str) -> TextBlock {
        let measure = TextMeasure::new(self.font.family, self.font.size);
        let wrap_width = (width - 2.0 * CELL_PADDING).max(0.0);
        let mut lines = measure.wrap(&to_single_byte(text), wrap_width);

        let room = ((self.content_bottom - self.y) / line_height).floor().max(0.0) as usize;
        let truncated = lines.len() > room;
        if truncated {
            lines.truncate(room);
            if let Some(last) = lines.pop() {
                lines.push(measure.ellipsize(&last, wrap_width));
            }
        }

        let x = self.margins.left;
        for line in &lines {
            let line_width = measure.width(line);
            self.draw_text_line(x + center_offset(width, line_width), self.y, line_height, line);
            self.y += line_height;
        }

        TextBlock {
            lines: lines.len(),
            truncated,
        }
    }

    fn draw_text_line(&mut self, x: f64, y: f64, line_height: f64, line: &str) {
        if line.is_empty() {
            return;
        }

        let font = self.font;
        let (r, g, b) = self.text_color.as_unit();
        // Baseline sits slightly below the middle of the line box
        let baseline = y + 0.5 * line_height + 0.3 * pt_to_mm(f64::from(font.size));
        let page_height = self.page_size.1;

        let page = self.page.get_or_insert_with(PageState::default);
        page.fonts.insert(font.family);
        page.operations.extend([
            Operation::new("BT", vec![]),
            Operation::new(
                "Tf",
                vec![Object::Name(font_resource(font.family).into()), font.size.into()],
            ),
            Operation::new("rg", vec![r.into(), g.into(), b.into()]),
            Operation::new(
                "Td",
                vec![real(mm_to_pt(x)), real(mm_to_pt(page_height - baseline))],
            ),
            Operation::new(
                "Tj",
                vec![Object::String(encode(line), StringFormat::Literal)],
            ),
            Operation::new("ET", vec![]),
        ]);
    }

    fn font_id(&mut self, family: FontFamily) -> ObjectId {
        if let Some(id) = self.font_ids.get(&family) {
            return *id;
        }
        let id = self.doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => family.base_font(),
            "Encoding" => "WinAnsiEncoding",
        });
        self.font_ids.insert(family, id);
        id
    }

    fn flush_page(&mut self) -> Result<(), LayoutError> {
        let Some(page) = self.page.take() else {
            return Ok(());
        };

        let content = Content {
            operations: page.operations,
        };
        let encoded = content
            .encode()
            .map_err(|e| LayoutError::Serialize(format!("Failed to encode page content: {}", e)))?;
        let content_id = self.doc.add_object(Stream::new(dictionary! {}, encoded));

        let mut fonts = Dictionary::new();
        for family in page.fonts {
            let id = self.font_id(family);
            fonts.set(font_resource(family), id);
        }
        let mut xobjects = Dictionary::new();
        for (name, id) in page.images {
            xobjects.set(name, id);
        }

        let (width, height) = self.page_size;
        let page_id = self.doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => vec![0.into(), 0.into(), real(mm_to_pt(width)), real(mm_to_pt(height))],
            "Resources" => dictionary! {
                "Font" => fonts,
                "XObject" => xobjects,
            },
            "Contents" => content_id,
        });
        self.page_ids.push(page_id);
        Ok(())
    }

    /// Closes the last page and serializes the whole document.
    pub fn finish(mut self, title: &str) -> Result<Vec<u8>, LayoutError> {
        self.flush_page()?;

        let kids: Vec<Object> = self.page_ids.iter().map(|id| (*id).into()).collect();
        let count = kids.len() as i64;
        self.doc.objects.insert(
            self.pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );

        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        let info_id = self.doc.add_object(dictionary! {
            "Title" => Object::string_literal(title),
            "Producer" => Object::string_literal(concat!("artcat ", env!("CARGO_PKG_VERSION"))),
        });
        self.doc.trailer.set("Root", catalog_id);
        self.doc.trailer.set("Info", info_id);

        let mut buffer = Vec::new();
        self.doc
            .save_to(&mut buffer)
            .map_err(|e| LayoutError::Serialize(e.to_string()))?;

        Ok(buffer)
    }
}

fn font_resource(family: FontFamily) -> &'static str {
    match family {
        FontFamily::Helvetica => "F1",
        FontFamily::Times => "F2",
        FontFamily::Courier => "F3",
    }
}

fn real(value: f64) -> Object {
    Object::Real(value as f32)
}
