//! Box-plot layout: returns bucketed by value, stacked by arrival order.

use crate::chart::scene::{Anchor, Node, Rect, Scene, Text};
use crate::chart::style::{Style, MAX_GROUPS};
use crate::config;
use crate::returns::RenderableRecord;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Heading and subtitle drawn at the top of a chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartTitle {
    pub heading: String,
    pub subtitle: String,
}

impl ChartTitle {
    pub fn new(heading: &str, subtitle: &str) -> Self {
        Self {
            heading: heading.to_string(),
            subtitle: subtitle.to_string(),
        }
    }
}

/// One placed record.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub bucket: i64,
    /// Position within the bucket's stack; 0 sits on the baseline.
    pub row: usize,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub fill: String,
    pub label: String,
    pub value: f64,
}

/// Longest common prefix of two strings, by character.
pub fn common_prefix(a: &str, b: &str) -> String {
    a.chars()
        .zip(b.chars())
        .take_while(|(x, y)| x == y)
        .map(|(x, _)| x)
        .collect()
}

/// Label for a date range: the shared part of both dates formatted as
/// `20JAN02`. A single day yields the full token, a month `20JAN`, and dates
/// with nothing in common an empty string.
pub fn period_label(start: NaiveDate, end: NaiveDate) -> String {
    let start = start.format(config::LABEL_DATE_FORMAT).to_string().to_uppercase();
    let end = end.format(config::LABEL_DATE_FORMAT).to_string().to_uppercase();
    common_prefix(&start, &end)
}

/// Signed whole percentage, with `+` only above half a span so that the
/// zero boundary prints as `0%`.
pub fn axis_label(value: f64, span: f64) -> String {
    let pct = (value * 100.0).round();
    if pct == 0.0 {
        return "0%".to_string();
    }
    if value > span / 2.0 {
        format!("+{:.0}%", pct)
    } else {
        format!("{:.0}%", pct)
    }
}

/// Place every record. Cells come out in bucket-then-row order.
pub fn cells(records: &[RenderableRecord], style: &Style) -> Vec<Cell> {
    let mut buckets: BTreeMap<i64, Vec<&RenderableRecord>> = BTreeMap::new();
    for r in records {
        buckets.entry(style.bucket(r.value)).or_default().push(r);
    }

    let width = style.cell_width();
    let height = style.cell_height();
    let mut out = Vec::with_capacity(records.len());
    for (bucket, stack) in &buckets {
        for (row, r) in stack.iter().enumerate() {
            out.push(Cell {
                bucket: *bucket,
                row,
                x: width * (*bucket + 1) as f64,
                y: height * (style.rows_from_top - row as f64),
                width,
                height,
                fill: style.color(r.value),
                label: period_label(r.record.date_start, r.record.date_end),
                value: r.value,
            });
        }
    }
    out
}

/// Records whose value lies outside the style's declared range. They are
/// still placed, possibly beyond the drawing area.
pub fn out_of_range(records: &[RenderableRecord], style: &Style) -> usize {
    records.iter().filter(|r| !style.in_range(r.value)).count()
}

fn cell_node(cell: &Cell, style: &Style) -> Node {
    Node::Group(vec![
        Node::Rect(Rect {
            x: cell.x,
            y: cell.y,
            width: cell.width,
            height: cell.height,
            fill: cell.fill.clone(),
            stroke: Some("#000".to_string()),
        }),
        Node::Text(Text {
            x: cell.x + cell.width / 2.0,
            y: cell.y + cell.height * 0.6,
            content: cell.label.clone(),
            fill: "#000".to_string(),
            anchor: Anchor::Middle,
            font_family: style.font_family.clone(),
            font_size: style.font_size,
        }),
    ])
}

fn axis_node(column: i64, style: &Style) -> Node {
    let value = style.bucket_start(column);
    Node::Text(Text {
        x: style.cell_width() * (column + 1) as f64,
        y: style.cell_height() * (style.rows_from_top + 1.5),
        content: axis_label(value, style.span),
        fill: style.color(value),
        anchor: Anchor::Middle,
        font_family: style.font_family.clone(),
        font_size: style.font_size * 0.8,
    })
}

fn title_node(title: &ChartTitle, style: &Style) -> Node {
    let x = style.width / 2.0;
    let y = style.cell_height();
    Node::Group(vec![
        Node::Text(Text {
            x,
            y,
            content: title.heading.clone(),
            fill: "#000".to_string(),
            anchor: Anchor::Middle,
            font_family: style.font_family.clone(),
            font_size: style.font_size * 2.0,
        }),
        Node::Text(Text {
            x,
            y: y + style.font_size * 2.0,
            content: title.subtitle.clone(),
            fill: "#000".to_string(),
            anchor: Anchor::Middle,
            font_family: style.font_family.clone(),
            font_size: style.font_size * 1.4,
        }),
    ])
}

/// Build the chart scene: background, cells, axis labels, then the title.
///
/// Expects a style that passes [`Style::validate`]; axis columns are capped
/// at the bucket limit otherwise.
pub fn layout(records: &[RenderableRecord], style: &Style, title: &ChartTitle) -> Scene {
    let mut children = vec![Node::Rect(Rect {
        x: 0.0,
        y: 0.0,
        width: style.width,
        height: style.height,
        fill: style.background.clone(),
        stroke: None,
    })];

    children.extend(cells(records, style).iter().map(|c| cell_node(c, style)));
    let columns = style.n_columns().min(MAX_GROUPS + 2);
    children.extend((0..columns).map(|i| axis_node(i, style)));
    children.push(title_node(title, style));

    Scene {
        width: style.width,
        height: style.height,
        children,
    }
}
