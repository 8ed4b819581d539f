//! Format-independent drawing primitives and their SVG serialization.

use std::fmt::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Start,
    Middle,
    End,
}

impl Anchor {
    fn as_str(&self) -> &'static str {
        match self {
            Anchor::Start => "start",
            Anchor::Middle => "middle",
            Anchor::End => "end",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub fill: String,
    pub stroke: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    pub x: f64,
    pub y: f64,
    pub content: String,
    pub fill: String,
    pub anchor: Anchor,
    pub font_family: String,
    pub font_size: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Rect(Rect),
    Text(Text),
    Group(Vec<Node>),
}

/// Root of a chart. Children are drawn in order, later ones on top.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub width: f64,
    pub height: f64,
    pub children: Vec<Node>,
}

impl Scene {
    /// Every text node in draw order, descending into groups.
    pub fn texts(&self) -> Vec<&Text> {
        fn walk<'a>(nodes: &'a [Node], out: &mut Vec<&'a Text>) {
            for node in nodes {
                match node {
                    Node::Text(t) => out.push(t),
                    Node::Group(children) => walk(children, out),
                    Node::Rect(_) => {}
                }
            }
        }
        let mut out = Vec::new();
        walk(&self.children, &mut out);
        out
    }

    /// Serialize as a standalone SVG document.
    pub fn to_svg(&self) -> String {
        let mut svg = String::new();
        let _ = write!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = self.width,
            h = self.height
        );
        for node in &self.children {
            write_node(&mut svg, node);
        }
        svg.push_str("</svg>\n");
        svg
    }
}

fn write_node(svg: &mut String, node: &Node) {
    match node {
        Node::Rect(r) => {
            let _ = write!(
                svg,
                r#"<rect x="{x:.2}" y="{y:.2}" width="{w:.2}" height="{h:.2}" fill="{fill}""#,
                x = r.x,
                y = r.y,
                w = r.width,
                h = r.height,
                fill = escape(&r.fill)
            );
            if let Some(stroke) = &r.stroke {
                let _ = write!(svg, r#" stroke="{}""#, escape(stroke));
            }
            svg.push_str(" />");
        }
        Node::Text(t) => {
            let _ = write!(
                svg,
                r#"<text x="{x:.2}" y="{y:.2}" fill="{fill}" text-anchor="{anchor}" font-family="{family}" font-size="{size:.1}">{content}</text>"#,
                x = t.x,
                y = t.y,
                fill = escape(&t.fill),
                anchor = t.anchor.as_str(),
                family = escape(&t.font_family),
                size = t.font_size,
                content = escape(&t.content)
            );
        }
        Node::Group(children) => {
            svg.push_str("<g>");
            for child in children {
                write_node(svg, child);
            }
            svg.push_str("</g>");
        }
    }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
