//! Retained SVG canvas for the comparison figure.
//!
//! Elements are recorded in draw order and serialized once by
//! [`Canvas::finish_svg`]. A clip region collects the elements drawn while it
//! is open into one `<g clip-path>` group.

use std::fmt;

use crate::primitives::{Font, Paint, Stroke};
use crate::text::{TextMetrics, measure_text};

const FONT_FAMILY: &str = "DejaVu Sans, Helvetica, Arial, sans-serif";

#[derive(Debug, Clone)]
enum Element {
    Rect { x: f64, y: f64, w: f64, h: f64, paint: Paint },
    Line { from: (f64, f64), to: (f64, f64), stroke: Stroke },
    Text { at: (f64, f64), content: String, font: Font, angle: Option<f64> },
    Clipped { clip_id: String, children: Vec<Element> },
}

struct Escaped<'a>(&'a str);

impl fmt::Display for Escaped<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for ch in self.0.chars() {
            match ch {
                '<' => f.write_str("&lt;")?,
                '>' => f.write_str("&gt;")?,
                '&' => f.write_str("&amp;")?,
                '"' => f.write_str("&quot;")?,
                _ => write!(f, "{ch}")?,
            }
        }
        Ok(())
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Element::Rect { x, y, w, h, paint } => {
                write!(f, r#"<rect x="{x:.2}" y="{y:.2}" width="{w:.2}" height="{h:.2}""#)?;
                match paint {
                    Paint::Fill(c) => write!(f, r#" fill="{}""#, c.to_svg_fill())?,
                    Paint::Outline(s) => write!(
                        f,
                        r#" fill="none" stroke="{}" stroke-width="{:.2}""#,
                        s.color.to_svg_fill(),
                        s.width
                    )?,
                }
                writeln!(f, " />")
            }
            Element::Line { from: (x1, y1), to: (x2, y2), stroke } => writeln!(
                f,
                r#"<line x1="{x1:.2}" y1="{y1:.2}" x2="{x2:.2}" y2="{y2:.2}" stroke="{}" stroke-width="{:.2}" />"#,
                stroke.color.to_svg_fill(),
                stroke.width
            ),
            Element::Text { at: (x, y), content, font, angle } => {
                let (anchor, baseline) = font.placement.svg_alignment();
                write!(
                    f,
                    r#"<text x="{x:.2}" y="{y:.2}" font-family="{FONT_FAMILY}" font-size="{:.1}" fill="{}" text-anchor="{anchor}" dominant-baseline="{baseline}""#,
                    font.size,
                    font.color.to_svg_fill()
                )?;
                if font.bold {
                    f.write_str(r#" font-weight="bold""#)?;
                }
                if let Some(a) = angle {
                    write!(f, r#" transform="rotate({a:.1},{x:.2},{y:.2})""#)?;
                }
                writeln!(f, ">{}</text>", Escaped(content))
            }
            Element::Clipped { clip_id, children } => {
                writeln!(f, r#"<g clip-path="url(#{clip_id})">"#)?;
                for child in children {
                    write!(f, "{child}")?;
                }
                writeln!(f, "</g>")
            }
        }
    }
}

/// SVG drawing surface; coordinates in points with the origin top-left.
pub struct Canvas {
    pub width: f64,
    pub height: f64,
    elements: Vec<Element>,
    clip_paths: Vec<String>,
    open_clip: Option<(String, Vec<Element>)>,
}

impl Canvas {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height, elements: Vec::new(), clip_paths: Vec::new(), open_clip: None }
    }

    pub fn rect(&mut self, x: f64, y: f64, w: f64, h: f64, paint: Paint) {
        self.push(Element::Rect { x, y, w, h, paint });
    }

    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, stroke: Stroke) {
        self.push(Element::Line { from: (x1, y1), to: (x2, y2), stroke });
    }

    pub fn text(&mut self, x: f64, y: f64, content: &str, font: &Font) {
        self.push(Element::Text { at: (x, y), content: content.to_string(), font: font.clone(), angle: None });
    }

    /// Text rotated by `angle` degrees about its anchor.
    pub fn text_rotated(&mut self, x: f64, y: f64, content: &str, font: &Font, angle: f64) {
        self.push(Element::Text {
            at: (x, y),
            content: content.to_string(),
            font: font.clone(),
            angle: Some(angle),
        });
    }

    /// Clip everything drawn until [`Canvas::pop_clip`] to the rectangle.
    /// An already open clip region is closed first.
    pub fn push_clip(&mut self, x: f64, y: f64, w: f64, h: f64) -> String {
        self.pop_clip();
        let id = format!("clip{}", self.clip_paths.len());
        self.clip_paths.push(format!(
            r#"<clipPath id="{id}"><rect x="{x:.2}" y="{y:.2}" width="{w:.2}" height="{h:.2}" /></clipPath>"#
        ));
        self.open_clip = Some((id.clone(), Vec::new()));
        id
    }

    pub fn pop_clip(&mut self) {
        if let Some((clip_id, children)) = self.open_clip.take() {
            self.elements.push(Element::Clipped { clip_id, children });
        }
    }

    pub fn measure_text(&self, content: &str, font: &Font) -> TextMetrics {
        measure_text(content, font)
    }

    fn push(&mut self, element: Element) {
        match &mut self.open_clip {
            Some((_, children)) => children.push(element),
            None => self.elements.push(element),
        }
    }

    /// Serialize the document on a white page.
    pub fn finish_svg(mut self) -> String {
        self.pop_clip();
        let (w, h) = (self.width, self.height);
        let defs = if self.clip_paths.is_empty() {
            String::new()
        } else {
            format!("<defs>\n{}\n</defs>\n", self.clip_paths.join("\n"))
        };
        let body: String = self.elements.iter().map(Element::to_string).collect();
        format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n\
             {defs}<rect width=\"{w}\" height=\"{h}\" fill=\"white\" />\n{body}</svg>\n"
        )
    }
}
