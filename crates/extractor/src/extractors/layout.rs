use crate::{ExtractorError, Result};
use lopdf::content::{Content, Operation};
use lopdf::{Document, Encoding, Object, ObjectId};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Advance of one glyph as a fraction of the font size. Securities lists are
/// set in a fixed-pitch font, so every glyph (space included) is this wide.
const GLYPH_WIDTH: f32 = 0.6;

/// Baselines closer than this (in user space units) belong to the same line.
const SAME_LINE_TOLERANCE: f32 = 0.5;

/// Rebuilds the text of one page as lines in content stream order.
///
/// A new line starts whenever the text position moves to another baseline
/// (`Td`, `TD`, `Tm`) or an explicit next-line operator runs (`T*`, `'`, `"`).
/// Horizontal gaps on the same baseline, from positioning operators or `TJ`
/// offsets, become runs of spaces so fixed-width columns keep their padding.
pub struct PageTextBuilder<'a> {
    encodings: BTreeMap<Vec<u8>, Encoding<'a>>,
    font: Option<Vec<u8>>,
    font_size: f32,
    leading: f32,
    scale_x: f32,
    scale_y: f32,
    line_x: f32,
    line_y: f32,
    x: f32,
    y: f32,
    /// Baseline and end position of the last shown string
    last: Option<(f32, f32)>,
    line_break: bool,
    text: String,
}

impl<'a> PageTextBuilder<'a> {
    pub fn new(doc: &'a Document, page_id: ObjectId) -> Result<Self> {
        let fonts = doc
            .get_page_fonts(page_id)
            .map_err(|e| ExtractorError::ExtractionError(format!("Page fonts: {}", e)))?;

        let mut encodings = BTreeMap::new();
        for (name, font) in fonts {
            match font.get_font_encoding(doc) {
                Ok(encoding) => {
                    encodings.insert(name, encoding);
                }
                Err(e) => warn!(
                    "Font {} has no usable encoding: {}",
                    String::from_utf8_lossy(&name),
                    e
                ),
            }
        }

        Ok(Self {
            encodings,
            font: None,
            font_size: 0.0,
            leading: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            line_x: 0.0,
            line_y: 0.0,
            x: 0.0,
            y: 0.0,
            last: None,
            line_break: false,
            text: String::new(),
        })
    }

    /// Extracts the text of `page_id`, one text line per output line.
    pub fn page_text(doc: &'a Document, page_id: ObjectId) -> Result<String> {
        let data = doc
            .get_page_content(page_id)
            .map_err(|e| ExtractorError::ExtractionError(format!("Page content: {}", e)))?;
        let content = Content::decode(&data)
            .map_err(|e| ExtractorError::ExtractionError(format!("Content stream: {}", e)))?;

        let mut builder = Self::new(doc, page_id)?;
        for operation in &content.operations {
            builder.apply(operation)?;
        }
        Ok(builder.finish())
    }

    pub fn apply(&mut self, operation: &Operation) -> Result<()> {
        let operands = &operation.operands;
        match operation.operator.as_str() {
            "BT" => {
                self.scale_x = 1.0;
                self.scale_y = 1.0;
                self.move_to(0.0, 0.0);
            }
            "Tf" => {
                self.font = operands
                    .first()
                    .and_then(|name| name.as_name().ok())
                    .map(<[u8]>::to_vec);
                self.font_size = number(operands, 1);
            }
            "TL" => self.leading = number(operands, 0),
            "Td" => self.move_by(number(operands, 0), number(operands, 1)),
            "TD" => {
                let ty = number(operands, 1);
                self.leading = -ty;
                self.move_by(number(operands, 0), ty);
            }
            "Tm" => {
                self.scale_x = number(operands, 0);
                self.scale_y = number(operands, 3);
                self.move_to(number(operands, 4), number(operands, 5));
            }
            "T*" => self.next_line(),
            "'" => {
                self.next_line();
                if let Some(Object::String(bytes, _)) = operands.first() {
                    self.show(bytes)?;
                }
            }
            "\"" => {
                self.next_line();
                if let Some(Object::String(bytes, _)) = operands.get(2) {
                    self.show(bytes)?;
                }
            }
            "Tj" => {
                if let Some(Object::String(bytes, _)) = operands.first() {
                    self.show(bytes)?;
                }
            }
            "TJ" => {
                let Some(Object::Array(items)) = operands.first() else {
                    return Ok(());
                };
                for item in items {
                    match item {
                        Object::String(bytes, _) => self.show(bytes)?,
                        other => {
                            if let Ok(offset) = other.as_float() {
                                self.x -= offset / 1000.0 * self.font_size * self.scale_x;
                            }
                        }
                    }
                }
            }
            _ => {}
        }
        Ok(())
    }

    pub fn finish(mut self) -> String {
        if !self.text.is_empty() && !self.text.ends_with('\n') {
            self.text.push('\n');
        }
        self.text
    }

    fn move_to(&mut self, x: f32, y: f32) {
        self.line_x = x;
        self.line_y = y;
        self.x = x;
        self.y = y;
    }

    fn move_by(&mut self, tx: f32, ty: f32) {
        self.move_to(
            self.line_x + tx * self.scale_x,
            self.line_y + ty * self.scale_y,
        );
    }

    fn next_line(&mut self) {
        self.move_by(0.0, -self.leading);
        self.line_break = true;
    }

    fn glyph_advance(&self) -> f32 {
        GLYPH_WIDTH * self.font_size * self.scale_x.abs()
    }

    fn show(&mut self, bytes: &[u8]) -> Result<()> {
        let decoded = match self.font.as_ref().and_then(|font| self.encodings.get(font)) {
            Some(encoding) => Document::decode_text(encoding, bytes)
                .map_err(|e| ExtractorError::ExtractionError(format!("Text decoding: {}", e)))?,
            None => {
                debug!("No encoding for current font; reading bytes as Latin-1");
                bytes.iter().map(|&b| char::from(b)).collect()
            }
        };

        let advance = self.glyph_advance();
        if let Some((last_y, last_end)) = self.last {
            if self.line_break || (self.y - last_y).abs() > SAME_LINE_TOLERANCE {
                self.text.push('\n');
            } else if advance > 0.0 {
                let gap = self.x - last_end;
                if gap > advance / 2.0 {
                    let spaces = (gap / advance).round().max(1.0) as usize;
                    self.text.extend(std::iter::repeat_n(' ', spaces));
                }
            }
        }

        self.text.push_str(&decoded);
        self.x += decoded.chars().count() as f32 * advance;
        self.last = Some((self.y, self.x));
        self.line_break = false;
        Ok(())
    }
}

fn number(operands: &[Object], idx: usize) -> f32 {
    operands
        .get(idx)
        .and_then(|operand| operand.as_float().ok())
        .unwrap_or(0.0)
}
