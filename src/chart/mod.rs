//! Box-plot chart of periodic returns.
//!
//! [`layout`] turns a list of records with their return values into a
//! [`Scene`], a tree of rectangles, text, and groups; [`Scene::to_svg`]
//! serializes it.

pub mod layout;
pub mod scene;
pub mod style;

pub use layout::{axis_label, cells, layout, out_of_range, period_label, Cell, ChartTitle};
pub use scene::{Anchor, Node, Rect, Scene, Text};
pub use style::{Style, MAX_GROUPS};
