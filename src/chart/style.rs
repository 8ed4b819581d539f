use crate::error::{Result, TrendsError};

/// Slack added before flooring bucket arithmetic so that values sitting on a
/// bucket boundary (e.g. `0.0` with `min_val = -0.6`, `span = 0.1`) land in
/// the bucket that starts there despite binary rounding.
const BOUNDARY_EPSILON: f64 = 1e-9;

/// Upper bound on value buckets a style may declare.
pub const MAX_GROUPS: i64 = 1000;

/// Geometry, value range, and typography of a box-plot chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    pub width: f64,
    pub height: f64,
    /// Width of one value bucket, as a fraction (0.1 = 10 percentage points).
    pub span: f64,
    /// Lowest value of the declared range; hue 0.
    pub min_val: f64,
    /// Highest value of the declared range; hue 150.
    pub max_val: f64,
    /// Baseline row, counted in cell heights from the top edge.
    pub rows_from_top: f64,
    pub background: String,
    pub font_family: String,
    pub font_size: f64,
}

impl Default for Style {
    fn default() -> Self {
        let width = 800.0;
        Self {
            width,
            height: (width * 9.0 / 16.0_f64).floor(),
            span: 0.1,
            min_val: -0.6,
            max_val: 1.3,
            rows_from_top: 10.5,
            background: "#f8f8f8".to_string(),
            font_family: "P22 Johnston Underground".to_string(),
            font_size: 14.0,
        }
    }
}

impl Style {
    /// Reject styles whose bucket arithmetic is undefined or unbounded.
    pub fn validate(&self) -> Result<()> {
        let finite = self.span.is_finite() && self.min_val.is_finite() && self.max_val.is_finite();
        if !finite || self.span <= 0.0 || self.max_val <= self.min_val {
            return Err(TrendsError::InvalidArgument(format!(
                "chart style needs finite span > 0 and max_val > min_val (span={}, range={}..{})",
                self.span, self.min_val, self.max_val
            )));
        }
        if self.n_groups() > MAX_GROUPS {
            return Err(TrendsError::InvalidArgument(format!(
                "chart style declares {} buckets, more than {}",
                self.n_groups(),
                MAX_GROUPS
            )));
        }
        if !self.width.is_finite() || self.width <= 0.0 {
            return Err(TrendsError::InvalidArgument(format!(
                "chart width must be positive, got {}",
                self.width
            )));
        }
        Ok(())
    }

    /// Buckets covering `[min_val, max_val]` plus one guard bucket.
    pub fn n_groups(&self) -> i64 {
        (((self.max_val - self.min_val) / self.span + BOUNDARY_EPSILON).floor() as i64)
            .saturating_add(1)
    }

    /// Number of axis columns laid out below the stacks.
    pub fn n_columns(&self) -> i64 {
        self.n_groups().saturating_add(2)
    }

    pub fn cell_width(&self) -> f64 {
        (self.width / self.n_groups().saturating_add(3) as f64).floor()
    }

    pub fn cell_height(&self) -> f64 {
        self.cell_width()
    }

    /// Bucket index of `value`. Not clamped: values outside the declared
    /// range get negative or over-range indices.
    pub fn bucket(&self, value: f64) -> i64 {
        ((value - self.min_val) / self.span + BOUNDARY_EPSILON).floor() as i64
    }

    /// Lower boundary value of a bucket.
    pub fn bucket_start(&self, bucket: i64) -> f64 {
        self.min_val + bucket as f64 * self.span
    }

    pub fn in_range(&self, value: f64) -> bool {
        value >= self.min_val && value <= self.max_val
    }

    /// Hue in degrees, linear from 0 at `min_val` to 150 at `max_val`.
    pub fn hue(&self, value: f64) -> f64 {
        150.0 * (value - self.min_val) / (self.max_val - self.min_val)
    }

    /// Fill color for `value` at fixed saturation and lightness.
    pub fn color(&self, value: f64) -> String {
        format!("hsl({:.1},100%,40%)", self.hue(value))
    }
}
