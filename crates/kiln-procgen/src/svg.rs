//! Vector documents for icon output

use kiln_core::Color;
use std::fmt::Write;

/// Fill and stroke applied to one element
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SvgStyle {
    pub fill: Option<Color>,
    pub stroke: Option<Color>,
    pub stroke_width: f32,
}

impl SvgStyle {
    pub fn filled(color: Color) -> Self {
        Self {
            fill: Some(color),
            stroke: None,
            stroke_width: 0.0,
        }
    }

    pub fn stroked(color: Color, width: f32) -> Self {
        Self {
            fill: None,
            stroke: Some(color),
            stroke_width: width,
        }
    }

    pub fn with_stroke(mut self, color: Color, width: f32) -> Self {
        self.stroke = Some(color);
        self.stroke_width = width;
        self
    }

    fn attributes(&self) -> String {
        let mut out = String::new();
        match self.fill {
            Some(c) => {
                let _ = write!(out, r#" fill="{}""#, c.to_hex_string());
                if c.a < 255 {
                    let _ = write!(out, r#" fill-opacity="{}""#, num(c.a as f32 / 255.0));
                }
            }
            None => out.push_str(r#" fill="none""#),
        }
        if let Some(c) = self.stroke {
            let _ = write!(
                out,
                r#" stroke="{}" stroke-width="{}" stroke-linejoin="round" stroke-linecap="round""#,
                c.to_hex_string(),
                num(self.stroke_width)
            );
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SvgElement {
    Rect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        rx: f32,
        style: SvgStyle,
    },
    Circle {
        cx: f32,
        cy: f32,
        r: f32,
        style: SvgStyle,
    },
    Path {
        d: String,
        style: SvgStyle,
    },
}

impl SvgElement {
    fn render(&self, out: &mut String) {
        let _ = match self {
            SvgElement::Rect {
                x,
                y,
                w,
                h,
                rx,
                style,
            } => writeln!(
                out,
                r#"  <rect x="{}" y="{}" width="{}" height="{}" rx="{}"{}/>"#,
                num(*x),
                num(*y),
                num(*w),
                num(*h),
                num(*rx),
                style.attributes()
            ),
            SvgElement::Circle { cx, cy, r, style } => writeln!(
                out,
                r#"  <circle cx="{}" cy="{}" r="{}"{}/>"#,
                num(*cx),
                num(*cy),
                num(*r),
                style.attributes()
            ),
            SvgElement::Path { d, style } => {
                writeln!(out, r#"  <path d="{}"{}/>"#, d, style.attributes())
            }
        };
    }
}

/// Incremental builder for path data strings
#[derive(Debug, Default, Clone)]
pub struct PathBuilder {
    d: String,
}

impl PathBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(mut self, x: f32, y: f32) -> Self {
        self.push(format!("M{} {}", num(x), num(y)));
        self
    }

    pub fn line_to(mut self, x: f32, y: f32) -> Self {
        self.push(format!("L{} {}", num(x), num(y)));
        self
    }

    pub fn close(mut self) -> Self {
        self.push("Z".to_string());
        self
    }

    /// Closed polygon through `points`
    pub fn polygon(points: &[(f32, f32)]) -> Self {
        let mut builder = Self::new();
        for (i, (x, y)) in points.iter().enumerate() {
            builder = if i == 0 {
                builder.move_to(*x, *y)
            } else {
                builder.line_to(*x, *y)
            };
        }
        builder.close()
    }

    pub fn build(self) -> String {
        self.d
    }

    fn push(&mut self, segment: String) {
        if !self.d.is_empty() {
            self.d.push(' ');
        }
        self.d.push_str(&segment);
    }
}

/// A complete SVG document with a fixed pixel size
#[derive(Debug, Clone, PartialEq)]
pub struct SvgDocument {
    pub width: u32,
    pub height: u32,
    /// Coordinate space the elements are authored in
    pub view_box: (f32, f32),
    pub elements: Vec<SvgElement>,
}

impl SvgDocument {
    pub fn new(width: u32, height: u32, view_box: (f32, f32)) -> Self {
        Self {
            width,
            height,
            view_box,
            elements: Vec::new(),
        }
    }

    pub fn push(&mut self, element: SvgElement) {
        self.elements.push(element);
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
            self.width,
            self.height,
            num(self.view_box.0),
            num(self.view_box.1)
        );
        for element in &self.elements {
            element.render(&mut out);
        }
        out.push_str("</svg>\n");
        out
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.render().into_bytes()
    }
}

/// Read the `width`/`height` attributes off an SVG root element
pub fn declared_dimensions(document: &str) -> Option<(u32, u32)> {
    let start = document.find("<svg")?;
    let end = document[start..].find('>')? + start;
    let tag = &document[start..end];
    let attr = |name: &str| -> Option<u32> {
        let key = format!(" {}=\"", name);
        let pos = tag.find(&key)? + key.len();
        let rest = &tag[pos..];
        let value = &rest[..rest.find('"')?];
        value.trim_end_matches("px").parse().ok()
    };
    Some((attr("width")?, attr("height")?))
}

/// Format a coordinate with at most two decimals and no trailing zeros
fn num(v: f32) -> String {
    let rounded = (v * 100.0).round() / 100.0;
    let s = format!("{:.2}", rounded);
    let trimmed = s.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}
