//! Minimal PDF 1.4 writer for filled pages.
//!
//! Text uses the standard Helvetica fonts with WinAnsi encoding; characters
//! outside Latin-1 are replaced with `?`. Images are embedded as
//! uncompressed 8-bit RGB XObjects.

use super::design::PageSetup;
use super::layout::{Filled, Item, Page, align_offset, line_height};

const REGULAR_FONT: &str = "F1";
const BOLD_FONT: &str = "F2";

/// Object numbers are assigned in write order: catalog, page tree, info,
/// two fonts, images, then a page object and content stream per page.
struct Writer {
    buf: Vec<u8>,
    offsets: Vec<usize>,
}

impl Writer {
    fn new() -> Self {
        let mut buf = b"%PDF-1.4\n".to_vec();
        buf.extend_from_slice(b"%\xE2\xE3\xCF\xD3\n");
        Self {
            buf,
            offsets: Vec::new(),
        }
    }

    fn object(&mut self, body: &str) {
        self.offsets.push(self.buf.len());
        let number = self.offsets.len();
        self.buf
            .extend_from_slice(format!("{number} 0 obj\n{body}\nendobj\n").as_bytes());
    }

    fn stream(&mut self, dictionary: &str, data: &[u8]) {
        self.offsets.push(self.buf.len());
        let number = self.offsets.len();
        self.buf.extend_from_slice(
            format!(
                "{number} 0 obj\n<< {dictionary} /Length {} >>\nstream\n",
                data.len()
            )
            .as_bytes(),
        );
        self.buf.extend_from_slice(data);
        self.buf.extend_from_slice(b"\nendstream\nendobj\n");
    }

    fn finish(mut self, info: usize) -> Vec<u8> {
        let xref = self.buf.len();
        let mut table = format!("xref\n0 {}\n0000000000 65535 f \n", self.offsets.len() + 1);
        for offset in &self.offsets {
            table.push_str(&format!("{offset:010} 00000 n \n"));
        }
        table.push_str(&format!(
            "trailer\n<< /Size {} /Root 1 0 R /Info {info} 0 R >>\nstartxref\n{xref}\n%%EOF\n",
            self.offsets.len() + 1
        ));
        self.buf.extend_from_slice(table.as_bytes());
        self.buf
    }
}

/// Escape `text` as a PDF literal string in WinAnsi encoding.
fn literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('(');
    for c in text.chars() {
        match c {
            '(' | ')' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            ' '..='~' => out.push(c),
            '\u{a0}'..='\u{ff}' => {
                out.push_str(&format!("\\{:03o}", u32::from(c)));
            }
            c if c.is_whitespace() => out.push(' '),
            _ => out.push('?'),
        }
    }
    out.push(')');
    out
}

fn content_stream(page: &Page, setup: &PageSetup) -> String {
    let mut ops = String::new();
    for item in &page.items {
        match item {
            Item::Text {
                x,
                y,
                width,
                lines,
                style,
            } => {
                let font = if style.bold { BOLD_FONT } else { REGULAR_FONT };
                let mut baseline = setup.height.saturating_sub(y.saturating_add(style.size));
                for line in lines {
                    let left = x.saturating_add(align_offset(line, *width, style));
                    ops.push_str(&format!(
                        "BT /{font} {} Tf {left} {baseline} Td {} Tj ET\n",
                        style.size,
                        literal(line)
                    ));
                    baseline = baseline.saturating_sub(line_height(style));
                }
            }
            Item::Image {
                x,
                y,
                width,
                height,
                image,
            } => {
                let bottom = setup.height.saturating_sub(y.saturating_add(*height));
                ops.push_str(&format!(
                    "q {width} 0 0 {height} {x} {bottom} cm /Im{image} Do Q\n"
                ));
            }
        }
    }
    ops
}

/// Serialize `filled` as a PDF document titled `title`.
///
/// # Errors
/// Fails when there are no pages to write.
pub fn write(title: &str, setup: &PageSetup, filled: &Filled) -> Result<Vec<u8>, String> {
    if filled.pages.is_empty() {
        return Err("report produced no pages".to_owned());
    }

    let first_image = 6;
    let first_page = first_image + filled.images.len();
    let kids: Vec<String> = (0..filled.pages.len())
        .map(|index| format!("{} 0 R", first_page + index * 2))
        .collect();
    let mut xobjects = String::new();
    for index in 0..filled.images.len() {
        xobjects.push_str(&format!("/Im{index} {} 0 R ", first_image + index));
    }
    let resources = format!(
        "<< /Font << /{REGULAR_FONT} 4 0 R /{BOLD_FONT} 5 0 R >> /XObject << {xobjects}>> >>"
    );

    let mut writer = Writer::new();
    writer.object("<< /Type /Catalog /Pages 2 0 R >>");
    writer.object(&format!(
        "<< /Type /Pages /Kids [{}] /Count {} >>",
        kids.join(" "),
        filled.pages.len()
    ));
    writer.object(&format!(
        "<< /Title {} /Producer (employee-backend) >>",
        literal(title)
    ));
    writer.object(
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>",
    );
    writer.object(
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold /Encoding /WinAnsiEncoding >>",
    );
    for image in &filled.images {
        writer.stream(
            &format!(
                "/Type /XObject /Subtype /Image /Width {} /Height {} /ColorSpace /DeviceRGB /BitsPerComponent 8",
                image.width, image.height
            ),
            &image.pixels,
        );
    }
    for (index, page) in filled.pages.iter().enumerate() {
        writer.object(&format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {} {}] /Resources {resources} /Contents {} 0 R >>",
            setup.width,
            setup.height,
            first_page + index * 2 + 1
        ));
        writer.stream("", content_stream(page, setup).as_bytes());
    }
    Ok(writer.finish(3))
}
