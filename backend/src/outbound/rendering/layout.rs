//! Fills a compiled design with rows and parameters, producing positioned
//! page items.
//!
//! Coordinates are whole points measured from the top-left corner of the
//! page. Text widths are estimated from average Helvetica glyph widths, so
//! wrapping is approximate.

use std::collections::BTreeMap;

use crate::domain::{ReportParameters, ReportRow};

use super::design::{Align, Band, Content, Design, Element, TextStyle};
use super::expression::{Scope, Value};

/// Average glyph advance in thousandths of the font size.
const REGULAR_ADVANCE: u32 = 500;
const BOLD_ADVANCE: u32 = 556;

/// Decoded image ready for embedding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item {
    Text {
        x: u32,
        y: u32,
        width: u32,
        lines: Vec<String>,
        style: TextStyle,
    },
    Image {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        image: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Page {
    pub items: Vec<Item>,
}

/// Output of the fill stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filled {
    pub pages: Vec<Page>,
    pub images: Vec<RgbImage>,
}

pub fn line_height(style: &TextStyle) -> u32 {
    style.size.saturating_add(style.size.div_ceil(5))
}

fn advance(style: &TextStyle) -> u32 {
    if style.bold { BOLD_ADVANCE } else { REGULAR_ADVANCE }
}

/// Glyph advance in thousandths of a point.
fn glyph_advance(style: &TextStyle) -> u32 {
    style.size.saturating_mul(advance(style))
}

/// Estimated width of `text` in points.
pub fn text_width(text: &str, style: &TextStyle) -> u32 {
    let chars = u32::try_from(text.chars().count()).unwrap_or(u32::MAX);
    chars.saturating_mul(glyph_advance(style)).div_euclid(1000)
}

/// Horizontal offset of a line within a box of `width` points.
pub fn align_offset(line: &str, width: u32, style: &TextStyle) -> u32 {
    let slack = width.saturating_sub(text_width(line, style));
    match style.align {
        Align::Left => 0,
        Align::Center => slack.div_euclid(2),
        Align::Right => slack,
    }
}

/// Break `text` into lines that fit a `width` by `height` box.
pub fn wrap(text: &str, width: u32, height: u32, style: &TextStyle) -> Vec<String> {
    let line_chars = width
        .saturating_mul(1000)
        .checked_div(glyph_advance(style))
        .unwrap_or_default()
        .max(1);
    let per_line = usize::try_from(line_chars).unwrap_or(usize::MAX);
    let line_count = height
        .checked_div(line_height(style))
        .unwrap_or_default()
        .max(1);
    let max_lines = usize::try_from(line_count).unwrap_or(usize::MAX);

    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            let mut chars: Vec<char> = word.chars().collect();
            let line_len = line.chars().count();
            if line_len > 0 && line_len.saturating_add(1).saturating_add(chars.len()) <= per_line {
                line.push(' ');
                line.extend(&chars);
                continue;
            }
            if line_len > 0 {
                lines.push(std::mem::take(&mut line));
            }
            while chars.len() > per_line {
                let rest = chars.split_off(per_line);
                lines.push(chars.into_iter().collect());
                chars = rest;
            }
            line.extend(chars);
        }
        lines.push(line);
    }
    lines.truncate(max_lines);
    lines
}

struct Filler<'a> {
    design: &'a Design,
    parameters: &'a ReportParameters,
    images: Vec<RgbImage>,
    image_index: BTreeMap<&'a [u8], usize>,
    pages: Vec<Page>,
    current: Page,
    cursor: u32,
    page_number: u32,
}

impl<'a> Filler<'a> {
    fn band_height(band: Option<&Band>) -> u32 {
        band.map_or(0, |band| band.height)
    }

    /// Lowest y a band may reach before the page footer.
    fn body_bottom(&self) -> u32 {
        let page = &self.design.page;
        page.height
            .saturating_sub(page.bottom_margin)
            .saturating_sub(Self::band_height(self.design.page_footer.as_ref()))
    }

    /// Lowest y a detail band may reach, leaving room for the column footer.
    fn detail_bottom(&self) -> u32 {
        self.body_bottom()
            .saturating_sub(Self::band_height(self.design.column_footer.as_ref()))
    }

    fn start_page(&mut self, first: bool) -> Result<(), String> {
        self.page_number = self.page_number.saturating_add(1);
        self.cursor = self.design.page.top_margin;
        let design = self.design;
        if first {
            if let Some(title) = &design.title {
                self.place(title, None)?;
            }
        }
        if let Some(header) = &design.page_header {
            self.place(header, None)?;
        }
        if let Some(header) = &design.column_header {
            self.place(header, None)?;
        }
        Ok(())
    }

    fn close_page(&mut self) -> Result<(), String> {
        let design = self.design;
        if let Some(footer) = &design.page_footer {
            self.cursor = self.body_bottom();
            self.place(footer, None)?;
        }
        self.pages.push(std::mem::take(&mut self.current));
        Ok(())
    }

    fn break_page(&mut self) -> Result<(), String> {
        let design = self.design;
        if let Some(footer) = &design.column_footer {
            self.place(footer, None)?;
        }
        self.close_page()?;
        self.start_page(false)
    }

    fn place(&mut self, band: &'a Band, row: Option<&'a ReportRow>) -> Result<(), String> {
        for element in &band.elements {
            self.place_element(element, row)?;
        }
        self.cursor = self.cursor.saturating_add(band.height);
        Ok(())
    }

    fn place_element(
        &mut self,
        element: &'a Element,
        row: Option<&'a ReportRow>,
    ) -> Result<(), String> {
        let frame = element.frame;
        let x = self.design.page.left_margin.saturating_add(frame.x);
        let y = self.cursor.saturating_add(frame.y);
        let scope = Scope {
            row,
            parameters: self.parameters,
            page_number: self.page_number,
        };
        let text = match &element.content {
            Content::Static(text) => text.clone(),
            Content::Text(expression) => match expression.evaluate(&scope)? {
                Value::Text(text) => text,
                Value::Null => return Ok(()),
                Value::Image(_) => {
                    return Err("text field expression yielded an image".to_owned());
                }
            },
            Content::Image(expression) => {
                let bytes = match expression.evaluate(&scope)? {
                    Value::Image(bytes) => bytes,
                    Value::Null => return Ok(()),
                    Value::Text(_) => {
                        return Err("image expression must name an image parameter".to_owned());
                    }
                };
                let image = self.decode(bytes)?;
                self.current.items.push(Item::Image {
                    x,
                    y,
                    width: frame.width,
                    height: frame.height,
                    image,
                });
                return Ok(());
            }
        };
        self.current.items.push(Item::Text {
            x,
            y,
            width: frame.width,
            lines: wrap(&text, frame.width, frame.height, &element.style),
            style: element.style,
        });
        Ok(())
    }

    fn decode(&mut self, bytes: &'a [u8]) -> Result<usize, String> {
        if let Some(index) = self.image_index.get(bytes) {
            return Ok(*index);
        }
        let decoded = image::load_from_memory(bytes)
            .map_err(|err| format!("image could not be decoded: {err}"))?
            .to_rgb8();
        let index = self.images.len();
        self.images.push(RgbImage {
            width: decoded.width(),
            height: decoded.height(),
            pixels: decoded.into_raw(),
        });
        self.image_index.insert(bytes, index);
        Ok(index)
    }

    /// Whether `band` placed at the cursor would cross `bottom`.
    fn overflows(&self, band: &Band, bottom: u32) -> bool {
        self.cursor.saturating_add(band.height) > bottom
    }

    fn detail(&mut self, band: &'a Band, row: &'a ReportRow) -> Result<(), String> {
        if self.overflows(band, self.detail_bottom()) {
            self.break_page()?;
            if self.overflows(band, self.detail_bottom()) {
                return Err(format!(
                    "detail band of height {} does not fit on a page",
                    band.height
                ));
            }
        }
        self.place(band, Some(row))
    }

    fn summary(&mut self, band: &'a Band) -> Result<(), String> {
        if self.overflows(band, self.body_bottom()) {
            self.close_page()?;
            self.start_page(false)?;
            if self.overflows(band, self.body_bottom()) {
                return Err(format!(
                    "summary band of height {} does not fit on a page",
                    band.height
                ));
            }
        }
        self.place(band, None)
    }
}

/// Lay out `design` over `rows`.
///
/// # Errors
/// Fails when a band cannot fit on an empty page, an expression cannot be
/// evaluated, or an image does not decode.
pub fn fill(
    design: &Design,
    rows: &[ReportRow],
    parameters: &ReportParameters,
) -> Result<Filled, String> {
    let mut filler = Filler {
        design,
        parameters,
        images: Vec::new(),
        image_index: BTreeMap::new(),
        pages: Vec::new(),
        current: Page::default(),
        cursor: 0,
        page_number: 0,
    };

    filler.start_page(true)?;
    for row in rows {
        for band in &design.detail {
            filler.detail(band, row)?;
        }
    }
    if let Some(footer) = &design.column_footer {
        filler.place(footer, None)?;
    }
    if let Some(summary) = &design.summary {
        filler.summary(summary)?;
    }
    filler.close_page()?;

    Ok(Filled {
        pages: filler.pages,
        images: filler.images,
    })
}
