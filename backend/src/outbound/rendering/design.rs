//! Compiles band-layout XML designs into a typed [`Design`].
//!
//! The supported subset mirrors what the bundled design and the visual
//! editor emit: page geometry, parameter and field declarations, the seven
//! standard bands, and `staticText`, `textField` and `image` elements.
//! Unknown elements are skipped.

use std::collections::{BTreeMap, BTreeSet};

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use super::expression::{Expression, Term};

const DEFAULT_PAGE_WIDTH: u32 = 595;
const DEFAULT_PAGE_HEIGHT: u32 = 842;
const DEFAULT_MARGIN: u32 = 20;
const DEFAULT_FONT_SIZE: u32 = 10;

/// Largest page side and element coordinate accepted, in points (200 inches).
const MAX_PAGE_EXTENT: u32 = 14_400;
/// Largest font size accepted, in points.
const MAX_FONT_SIZE: u32 = 1_000;

/// Page geometry in points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSetup {
    pub width: u32,
    pub height: u32,
    pub left_margin: u32,
    pub right_margin: u32,
    pub top_margin: u32,
    pub bottom_margin: u32,
    pub column_width: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextStyle {
    pub size: u32,
    pub bold: bool,
    pub align: Align,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            size: DEFAULT_FONT_SIZE,
            bold: false,
            align: Align::Left,
        }
    }
}

/// Element box relative to the band's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Frame {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Static(String),
    Text(Expression),
    Image(Expression),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub frame: Frame,
    pub style: TextStyle,
    pub content: Content,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Band {
    pub height: u32,
    pub elements: Vec<Element>,
}

/// A compiled design.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Design {
    pub name: String,
    pub page: PageSetup,
    pub parameters: BTreeSet<String>,
    pub fields: BTreeSet<String>,
    pub title: Option<Band>,
    pub page_header: Option<Band>,
    pub column_header: Option<Band>,
    pub detail: Vec<Band>,
    pub column_footer: Option<Band>,
    pub page_footer: Option<Band>,
    pub summary: Option<Band>,
}

impl Design {
    /// Every band in print order, for validation passes.
    fn bands(&self) -> impl Iterator<Item = &Band> {
        self.title
            .iter()
            .chain(&self.page_header)
            .chain(&self.column_header)
            .chain(&self.detail)
            .chain(&self.column_footer)
            .chain(&self.page_footer)
            .chain(&self.summary)
    }
}

#[derive(Debug, Default)]
struct Node {
    name: String,
    attributes: BTreeMap<String, String>,
    children: Vec<Node>,
    text: String,
}

impl Node {
    fn child(&self, name: &str) -> Option<&Node> {
        self.children.iter().find(|child| child.name == name)
    }

    fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Node> {
        self.children.iter().filter(move |child| child.name == name)
    }

    fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    fn number(&self, name: &str, default: u32) -> Result<u32, String> {
        let Some(raw) = self.attr(name) else {
            return Ok(default);
        };
        let whole = raw.trim().split('.').next().unwrap_or_default();
        whole
            .parse()
            .map_err(|_| format!("<{}> attribute {name}=\"{raw}\" is not a number", self.name))
    }

    /// Like [`Node::number`], rejecting values above `max`.
    fn bounded(&self, name: &str, default: u32, max: u32) -> Result<u32, String> {
        let value = self.number(name, default)?;
        if value > max {
            return Err(format!(
                "<{}> attribute {name}=\"{value}\" is out of range (at most {max})",
                self.name
            ));
        }
        Ok(value)
    }
}

fn open_node(start: &BytesStart<'_>) -> Result<Node, String> {
    let mut node = Node {
        name: String::from_utf8_lossy(start.local_name().as_ref()).into_owned(),
        ..Node::default()
    };
    for entry in start.attributes() {
        let attribute = entry.map_err(|err| format!("malformed attribute: {err}"))?;
        let key = String::from_utf8_lossy(attribute.key.local_name().as_ref()).into_owned();
        let value = attribute
            .unescape_value()
            .map_err(|err| format!("malformed attribute value: {err}"))?;
        node.attributes.insert(key, value.into_owned());
    }
    Ok(node)
}

fn attach(stack: &mut Vec<Node>, root: &mut Option<Node>, node: Node) -> Result<(), String> {
    match stack.last_mut() {
        Some(parent) => {
            parent.children.push(node);
            Ok(())
        }
        None if root.is_none() => {
            *root = Some(node);
            Ok(())
        }
        None => Err("document has more than one root element".to_owned()),
    }
}

fn parse_tree(xml: &str) -> Result<Node, String> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Node> = Vec::new();
    let mut root = None;
    loop {
        let event = reader.read_event().map_err(|err| {
            format!(
                "malformed XML near byte {}: {err}",
                reader.buffer_position()
            )
        })?;
        match event {
            Event::Start(start) => stack.push(open_node(&start)?),
            Event::Empty(start) => {
                let node = open_node(&start)?;
                attach(&mut stack, &mut root, node)?;
            }
            Event::End(_) => {
                let node = stack
                    .pop()
                    .ok_or_else(|| "unbalanced closing tag".to_owned())?;
                attach(&mut stack, &mut root, node)?;
            }
            Event::Text(text) => {
                if let Some(node) = stack.last_mut() {
                    let unescaped = text
                        .unescape()
                        .map_err(|err| format!("malformed text: {err}"))?;
                    node.text.push_str(&unescaped);
                }
            }
            Event::CData(data) => {
                if let Some(node) = stack.last_mut() {
                    node.text
                        .push_str(&String::from_utf8_lossy(&data.into_inner()));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err("document ended before every element was closed".to_owned());
    }
    root.ok_or_else(|| "document has no root element".to_owned())
}

fn declared_names(root: &Node, tag: &str) -> Result<BTreeSet<String>, String> {
    root.children_named(tag)
        .map(|node| {
            node.attr("name")
                .map(str::to_owned)
                .ok_or_else(|| format!("<{tag}> requires a name"))
        })
        .collect()
}

fn compile_style(element: &Node) -> Result<TextStyle, String> {
    let mut style = TextStyle::default();
    let Some(text_element) = element.child("textElement") else {
        return Ok(style);
    };
    style.align = match text_element.attr("textAlignment") {
        Some("Center") => Align::Center,
        Some("Right") => Align::Right,
        _ => Align::Left,
    };
    if let Some(font) = text_element.child("font") {
        style.size = font.bounded("size", DEFAULT_FONT_SIZE, MAX_FONT_SIZE)?.max(1);
        style.bold = font.attr("isBold") == Some("true");
    }
    Ok(style)
}

fn compile_frame(element: &Node) -> Result<Frame, String> {
    let Some(report_element) = element.child("reportElement") else {
        return Err(format!("<{}> requires a reportElement", element.name));
    };
    Ok(Frame {
        x: report_element.bounded("x", 0, MAX_PAGE_EXTENT)?,
        y: report_element.bounded("y", 0, MAX_PAGE_EXTENT)?,
        width: report_element.bounded("width", 0, MAX_PAGE_EXTENT)?,
        height: report_element.bounded("height", 0, MAX_PAGE_EXTENT)?,
    })
}

fn compile_expression(element: &Node, tag: &str) -> Result<Expression, String> {
    let source = element
        .child(tag)
        .map(|node| node.text.trim())
        .ok_or_else(|| format!("<{}> requires a {tag}", element.name))?;
    Expression::parse(source)
}

fn compile_element(node: &Node) -> Result<Option<Element>, String> {
    let content = match node.name.as_str() {
        "staticText" => Content::Static(
            node.child("text")
                .map(|text| text.text.clone())
                .unwrap_or_default(),
        ),
        "textField" => Content::Text(compile_expression(node, "textFieldExpression")?),
        "image" => Content::Image(compile_expression(node, "imageExpression")?),
        _ => return Ok(None),
    };
    Ok(Some(Element {
        frame: compile_frame(node)?,
        style: compile_style(node)?,
        content,
    }))
}

/// Bands taller than the page can never be placed.
fn compile_band(node: &Node, page: &PageSetup) -> Result<Band, String> {
    let mut elements = Vec::new();
    for child in &node.children {
        if let Some(element) = compile_element(child)? {
            elements.push(element);
        }
    }
    Ok(Band {
        height: node.bounded("height", 0, page.height)?,
        elements,
    })
}

fn compile_section(root: &Node, section: &str, page: &PageSetup) -> Result<Vec<Band>, String> {
    root.child(section)
        .into_iter()
        .flat_map(|node| node.children_named("band"))
        .map(|band| compile_band(band, page))
        .collect()
}

fn compile_single(root: &Node, section: &str, page: &PageSetup) -> Result<Option<Band>, String> {
    Ok(compile_section(root, section, page)?.into_iter().next())
}

fn check_references(design: &Design) -> Result<(), String> {
    let expressions = design
        .bands()
        .flat_map(|band| &band.elements)
        .filter_map(|element| match &element.content {
            Content::Text(expression) | Content::Image(expression) => Some(expression),
            Content::Static(_) => None,
        });
    for expression in expressions {
        for term in expression.terms() {
            match term {
                Term::Field(name) if !design.fields.contains(name) => {
                    return Err(format!("field {name} is not declared"));
                }
                Term::Parameter(name) if !design.parameters.contains(name) => {
                    return Err(format!("parameter {name} is not declared"));
                }
                _ => {}
            }
        }
    }
    Ok(())
}

fn compile_page(root: &Node) -> Result<PageSetup, String> {
    let width = root.bounded("pageWidth", DEFAULT_PAGE_WIDTH, MAX_PAGE_EXTENT)?;
    let height = root.bounded("pageHeight", DEFAULT_PAGE_HEIGHT, MAX_PAGE_EXTENT)?;
    let left_margin = root.bounded("leftMargin", DEFAULT_MARGIN, width)?;
    let right_margin = root.bounded("rightMargin", DEFAULT_MARGIN, width)?;
    let top_margin = root.bounded("topMargin", DEFAULT_MARGIN, height)?;
    let bottom_margin = root.bounded("bottomMargin", DEFAULT_MARGIN, height)?;

    let printable = left_margin
        .checked_add(right_margin)
        .and_then(|margins| width.checked_sub(margins))
        .ok_or_else(|| "margins exceed the page width".to_owned())?;
    if top_margin.saturating_add(bottom_margin) >= height {
        return Err("margins exceed the page height".to_owned());
    }

    Ok(PageSetup {
        width,
        height,
        left_margin,
        right_margin,
        top_margin,
        bottom_margin,
        column_width: root.bounded("columnWidth", printable, width)?,
    })
}

/// Compile `xml` into a [`Design`].
///
/// # Errors
/// Returns a message for malformed XML, a root other than `jasperReport`,
/// geometry that is out of range or does not fit the page, malformed
/// expressions, or undeclared references.
pub fn compile(xml: &str) -> Result<Design, String> {
    let root = parse_tree(xml)?;
    if root.name != "jasperReport" {
        return Err(format!(
            "root element must be jasperReport, found {}",
            root.name
        ));
    }

    let page = compile_page(&root)?;

    let design = Design {
        name: root.attr("name").unwrap_or("report").to_owned(),
        page,
        parameters: declared_names(&root, "parameter")?,
        fields: declared_names(&root, "field")?,
        title: compile_single(&root, "title", &page)?,
        page_header: compile_single(&root, "pageHeader", &page)?,
        column_header: compile_single(&root, "columnHeader", &page)?,
        detail: compile_section(&root, "detail", &page)?,
        column_footer: compile_single(&root, "columnFooter", &page)?,
        page_footer: compile_single(&root, "pageFooter", &page)?,
        summary: compile_single(&root, "summary", &page)?,
    };
    check_references(&design)?;
    Ok(design)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const DESIGN: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<jasperReport xmlns="http://jasperreports.sourceforge.net/jasperreports"
    name="people" pageWidth="400" pageHeight="300" leftMargin="10" rightMargin="10"
    topMargin="15" bottomMargin="15">
    <parameter name="createdBy" class="java.lang.String"/>
    <parameter name="logoLeft" class="java.io.InputStream"/>
    <field name="name" class="java.lang.String"/>
    <title>
        <band height="40">
            <image>
                <reportElement x="0" y="0" width="40" height="40"/>
                <imageExpression><![CDATA[$P{logoLeft}]]></imageExpression>
            </image>
            <staticText>
                <reportElement x="50" y="0" width="200" height="20"/>
                <textElement textAlignment="Center"><font size="16" isBold="true"/></textElement>
                <text><![CDATA[Employees & Staff]]></text>
            </staticText>
        </band>
    </title>
    <detail>
        <band height="20">
            <textField>
                <reportElement x="0" y="0" width="200" height="20"/>
                <textFieldExpression><![CDATA[$F{name}]]></textFieldExpression>
            </textField>
        </band>
    </detail>
    <pageFooter>
        <band height="20">
            <textField>
                <reportElement x="0" y="0" width="100" height="20"/>
                <textFieldExpression>"Page " + $V{PAGE_NUMBER}</textFieldExpression>
            </textField>
        </band>
    </pageFooter>
</jasperReport>"#;

    #[rstest]
    fn compiles_geometry_declarations_and_bands() {
        let design = compile(DESIGN).expect("compile");

        assert_eq!(design.name, "people");
        assert_eq!(design.page.width, 400);
        assert_eq!(design.page.column_width, 380);
        assert_eq!(design.page.top_margin, 15);
        assert!(design.parameters.contains("createdBy"));
        assert!(design.fields.contains("name"));
        assert_eq!(design.detail.len(), 1);
        assert!(design.page_header.is_none());

        let title = design.title.expect("title band");
        assert_eq!(title.height, 40);
        assert_eq!(title.elements.len(), 2);
        let heading = title.elements.get(1).expect("heading element");
        assert_eq!(heading.content, Content::Static("Employees & Staff".to_owned()));
        assert_eq!(
            heading.style,
            TextStyle {
                size: 16,
                bold: true,
                align: Align::Center
            }
        );
    }

    #[rstest]
    fn applies_page_defaults() {
        let design = compile("<jasperReport/>").expect("compile");

        assert_eq!(design.page.width, DEFAULT_PAGE_WIDTH);
        assert_eq!(design.page.height, DEFAULT_PAGE_HEIGHT);
        assert_eq!(design.page.column_width, 555);
        assert!(design.detail.is_empty());
    }

    #[rstest]
    #[case("<report/>", "root element")]
    #[case("not xml at all", "root")]
    #[case(r#"<jasperReport pageWidth="wide"/>"#, "not a number")]
    #[case(
        r#"<jasperReport><detail><band height="20"><textField><reportElement width="10" height="10"/><textFieldExpression>$F{ghost}</textFieldExpression></textField></band></detail></jasperReport>"#,
        "field ghost"
    )]
    #[case(
        r#"<jasperReport><title><band height="20"><image><reportElement width="10" height="10"/><imageExpression>$P{logo}</imageExpression></image></band></title></jasperReport>"#,
        "parameter logo"
    )]
    #[case(
        r#"<jasperReport><title><band><textField><reportElement/><textFieldExpression>$F{</textFieldExpression></textField></band></title></jasperReport>"#,
        "unterminated"
    )]
    #[case(
        r#"<jasperReport><title><band height="20"><staticText><reportElement width="10" height="10"/><textElement><font size="100000000"/></textElement><text>Big</text></staticText></band></title></jasperReport>"#,
        "size=\"100000000\" is out of range"
    )]
    #[case(
        r#"<jasperReport leftMargin="4294967295" rightMargin="1"/>"#,
        "leftMargin=\"4294967295\" is out of range"
    )]
    #[case(
        r#"<jasperReport leftMargin="300" rightMargin="300"/>"#,
        "margins exceed the page width"
    )]
    #[case(
        r#"<jasperReport pageHeight="100" topMargin="60" bottomMargin="40"/>"#,
        "margins exceed the page height"
    )]
    #[case(r#"<jasperReport pageWidth="4294967295"/>"#, "pageWidth")]
    #[case(
        r#"<jasperReport pageHeight="200"><detail><band height="4000000000"/></detail></jasperReport>"#,
        "height=\"4000000000\" is out of range"
    )]
    #[case(
        r#"<jasperReport><title><band height="20"><staticText><reportElement x="4294967295" width="10" height="10"/><text>Far</text></staticText></band></title></jasperReport>"#,
        "x=\"4294967295\" is out of range"
    )]
    fn rejects_invalid_designs(#[case] xml: &str, #[case] fragment: &str) {
        let err = compile(xml).expect_err("should fail");
        assert!(err.contains(fragment), "{err} should mention {fragment}");
    }

    #[rstest]
    #[case("<jasperReport><title>")]
    #[case("<jasperReport></title>")]
    fn rejects_truncated_documents(#[case] xml: &str) {
        assert!(compile(xml).is_err());
    }

    #[rstest]
    fn skips_unknown_elements() {
        let xml = r#"<jasperReport><title><band height="10"><line><reportElement width="10" height="1"/></line></band></title></jasperReport>"#;
        let design = compile(xml).expect("compile");
        assert!(design.title.expect("title").elements.is_empty());
    }
}
