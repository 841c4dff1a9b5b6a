//! Single-byte text handling for the standard PDF fonts: character
//! substitution, glyph widths and line wrapping.
//!
//! Pages use WinAnsiEncoding, whose 0x20-0x7E and 0xA0-0xFF ranges match
//! Latin-1. Anything else is replaced with `?` before it reaches a page.

use crate::config::FontFamily;
use crate::layout::geometry::pt_to_mm;

pub const REPLACEMENT: char = '?';
pub const ELLIPSIS: &str = "...";

#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const TIMES_WIDTHS: [u16; 95] = [
    250, 333, 408, 500, 500, 833, 778, 180, 333, 333, 500, 564, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 278, 278, 564, 564, 564, 444,
    921, 722, 667, 667, 722, 611, 556, 722, 722, 333, 389, 722, 611, 889, 722, 722,
    556, 722, 667, 556, 611, 722, 722, 944, 722, 722, 611, 333, 278, 333, 469, 500,
    333, 444, 500, 444, 500, 444, 333, 500, 500, 278, 278, 500, 278, 778, 500, 500,
    500, 500, 333, 389, 278, 500, 500, 722, 500, 500, 444, 480, 200, 480, 541,
];

const COURIER_WIDTH: u16 = 600;

/// ASCII stand-in with a similar advance width for each of 0xA0-0xFF.
const LATIN1_WIDTH_PROXY: &[u8; 96] =
    b" !0000|0`Oa0+-O`*+rr`u0.,ro0MMM?AAAAAAWCEEEEIIIIDNOOOOO+OUUUUYPbaaaaaamceeeettttonooooo+ouuuuypy";

fn is_encodable(c: char) -> bool {
    matches!(c, '\u{20}'..='\u{7E}' | '\u{A0}'..='\u{FF}')
}

/// Replaces every character the page encoding cannot carry. Line breaks
/// survive, tabs become spaces and carriage returns are dropped.
pub fn to_single_byte(text: &str) -> String {
    text.chars()
        .filter(|c| *c != '\r')
        .map(|c| match c {
            '\n' => '\n',
            '\t' => ' ',
            c if is_encodable(c) => c,
            _ => REPLACEMENT,
        })
        .collect()
}

/// Bytes for a PDF string operand. Expects text from [`to_single_byte`].
pub fn encode(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| {
            if is_encodable(c) {
                c as u32 as u8
            } else {
                REPLACEMENT as u8
            }
        })
        .collect()
}

/// Advance width in thousandths of an em.
pub fn char_width(family: FontFamily, c: char) -> u16 {
    if family == FontFamily::Courier {
        return COURIER_WIDTH;
    }

    let code = c as u32;
    let ascii = match code {
        0x20..=0x7E => code as u8,
        0xA0..=0xFF => LATIN1_WIDTH_PROXY[(code - 0xA0) as usize],
        _ => REPLACEMENT as u8,
    };
    let index = usize::from(ascii - 0x20);

    match family {
        FontFamily::Helvetica => HELVETICA_WIDTHS[index],
        FontFamily::Times => TIMES_WIDTHS[index],
        FontFamily::Courier => COURIER_WIDTH,
    }
}

pub fn string_width_mm(family: FontFamily, size_pt: f32, text: &str) -> f64 {
    let units: u32 = text.chars().map(|c| u32::from(char_width(family, c))).sum();
    pt_to_mm(f64::from(units) * f64::from(size_pt) / 1000.0)
}

/// Measures text in one font at one size.
#[derive(Debug, Clone, Copy)]
pub struct TextMeasure {
    pub family: FontFamily,
    pub size_pt: f32,
}

impl TextMeasure {
    pub fn new(family: FontFamily, size_pt: f32) -> Self {
        Self { family, size_pt }
    }

    pub fn width(&self, text: &str) -> f64 {
        string_width_mm(self.family, self.size_pt, text)
    }

    /// Breaks text into lines no wider than `max_width`. Explicit newlines
    /// are kept, lines break at spaces, and words wider than a whole line
    /// are split between characters.
    pub fn wrap(&self, text: &str, max_width: f64) -> Vec<String> {
        text.split('\n')
            .flat_map(|paragraph| self.wrap_paragraph(paragraph, max_width))
            .collect()
    }

    fn wrap_paragraph(&self, paragraph: &str, max_width: f64) -> Vec<String> {
        let mut lines = Vec::new();
        let mut current = String::new();
        let mut started = false;

        for word in paragraph.split(' ') {
            let joined = if started {
                format!("{} {}", current, word)
            } else {
                word.to_string()
            };
            if self.width(&joined) <= max_width {
                current = joined;
                started = true;
                continue;
            }

            if started {
                lines.push(std::mem::take(&mut current));
            }

            if self.width(word) <= max_width {
                current = word.to_string();
            } else {
                current = self.split_word(word, max_width, &mut lines);
            }
            started = true;
        }

        lines.push(current);
        lines
    }

    /// Pushes full-width chunks of `word` and returns the remainder.
    fn split_word(&self, word: &str, max_width: f64, lines: &mut Vec<String>) -> String {
        let mut piece = String::new();
        for c in word.chars() {
            piece.push(c);
            if self.width(&piece) > max_width && piece.chars().count() > 1 {
                piece.pop();
                lines.push(std::mem::take(&mut piece));
                piece.push(c);
            }
        }
        piece
    }

    /// Shortens `line` until it fits with a trailing ellipsis.
    pub fn ellipsize(&self, line: &str, max_width: f64) -> String {
        let mut kept: String = line.trim_end().to_string();
        while !kept.is_empty() && self.width(&format!("{}{}", kept, ELLIPSIS)) > max_width {
            kept.pop();
        }
        format!("{}{}", kept.trim_end(), ELLIPSIS)
    }
}
