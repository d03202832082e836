use palette::Srgb;

use crate::color;

// ---------------------------------------------------------------------------
// Axis configuration
// ---------------------------------------------------------------------------

/// Where tick marks go along an axis.
#[derive(Debug, Clone, PartialEq)]
pub enum Ticks {
    /// A "nice" step chosen from the visible range.
    Auto,
    /// Exactly these positions (those outside the limits are skipped).
    Fixed(Vec<f64>),
    /// Every multiple of the step inside the limits.
    Multiple(f64),
}

/// Position of a horizontal axis spine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    Bottom,
    /// Above the plot; `position` is a fraction of the axes height
    /// (1.0 is the top edge, 1.05 sits a little above it).
    Top { position: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Solid,
    Dashed,
}

/// The direction in which values grow along the vertical axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalDirection {
    Up,
    Down,
}

#[derive(Debug, Clone, PartialEq)]
pub struct XAxis {
    /// Fixed data limits; autoscaled from the artists when `None`.
    pub limits: Option<(f64, f64)>,
    /// Larger values plot leftward.
    pub reversed: bool,
    pub label: Option<String>,
    /// Color of the axis label.
    pub color: Srgb<u8>,
    pub placement: Placement,
    pub tick_labels: bool,
    pub major_ticks: Ticks,
    pub minor_ticks: Option<Ticks>,
}

impl Default for XAxis {
    fn default() -> Self {
        Self {
            limits: None,
            reversed: false,
            label: None,
            color: color::BLACK,
            placement: Placement::Bottom,
            tick_labels: true,
            major_ticks: Ticks::Auto,
            minor_ticks: None,
        }
    }
}

impl XAxis {
    pub fn set_limits(&mut self, low: f64, high: f64) {
        self.limits = Some((low, high));
    }

    /// Spine position as a fraction of the axes height (bottom = 0).
    pub fn spine_position(&self) -> f64 {
        match self.placement {
            Placement::Bottom => 0.0,
            Placement::Top { position } => position,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct YAxis {
    pub direction: VerticalDirection,
    pub label: Option<String>,
    pub major_ticks: Ticks,
}

impl Default for YAxis {
    fn default() -> Self {
        Self {
            direction: VerticalDirection::Up,
            label: None,
            major_ticks: Ticks::Auto,
        }
    }
}

impl YAxis {
    /// Orient the axis so that deeper samples plot lower.
    ///
    /// Depth-aligned artists are drawn at `offset - depth`, which shrinks as
    /// depth grows, so values must grow upward. Idempotent.
    pub fn orient_depth_down(&mut self) {
        self.direction = VerticalDirection::Up;
    }
}

/// Grid lines at the host's ticks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid {
    pub major_alpha: f64,
    pub minor_alpha: f64,
}

// ---------------------------------------------------------------------------
// Artists
// ---------------------------------------------------------------------------

/// A polyline. Non-finite coordinates break the line.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub color: Srgb<u8>,
    /// Stroke width in points.
    pub width: f64,
    pub label: Option<String>,
}

impl Line {
    pub fn new(x: Vec<f64>, y: Vec<f64>, color: Srgb<u8>) -> Self {
        Self {
            x,
            y,
            color,
            width: 1.5,
            label: None,
        }
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }
}

/// Filled rectangle between two x and two y values.
#[derive(Debug, Clone, PartialEq)]
pub struct Band {
    pub x: (f64, f64),
    pub y: (f64, f64),
    pub color: Srgb<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub text: String,
    pub x: f64,
    pub y: f64,
    /// Font size in points.
    pub font_size: f64,
}

/// A line across the full width of the axes at a data y value.
#[derive(Debug, Clone, PartialEq)]
pub struct HorizontalLine {
    pub y: f64,
    pub color: Srgb<u8>,
    pub style: LineStyle,
    pub label: Option<String>,
}

impl HorizontalLine {
    pub fn new(y: f64, color: Srgb<u8>) -> Self {
        Self {
            y,
            color,
            style: LineStyle::Solid,
            label: None,
        }
    }

    pub fn dashed(mut self) -> Self {
        self.style = LineStyle::Dashed;
        self
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Artist {
    Line(Line),
    Band(Band),
    Annotation(Annotation),
    HorizontalLine(HorizontalLine),
}

impl Artist {
    fn x_values(&self) -> Vec<f64> {
        match self {
            Artist::Line(line) => line.x.clone(),
            Artist::Band(band) => vec![band.x.0, band.x.1],
            Artist::Annotation(_) | Artist::HorizontalLine(_) => Vec::new(),
        }
    }

    fn y_values(&self) -> Vec<f64> {
        match self {
            Artist::Line(line) => line.y.clone(),
            Artist::Band(band) => vec![band.y.0, band.y.1],
            Artist::Annotation(annotation) => vec![annotation.y],
            Artist::HorizontalLine(hline) => vec![hline.y],
        }
    }

    /// Legend entry, for artists that carry a label.
    pub fn legend_entry(&self) -> Option<LegendEntry> {
        match self {
            Artist::Line(line) => line.label.as_ref().map(|label| LegendEntry {
                label: label.clone(),
                color: line.color,
                style: LineStyle::Solid,
            }),
            Artist::HorizontalLine(hline) => hline.label.as_ref().map(|label| LegendEntry {
                label: label.clone(),
                color: hline.color,
                style: hline.style,
            }),
            Artist::Band(_) | Artist::Annotation(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub label: String,
    pub color: Srgb<u8>,
    pub style: LineStyle,
}

// ---------------------------------------------------------------------------
// Axes
// ---------------------------------------------------------------------------

/// One coordinate system inside a panel: an x axis, a y axis and the
/// artists drawn in its data coordinates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Axes {
    pub x: XAxis,
    pub y: YAxis,
    pub grid: Option<Grid>,
    artists: Vec<Artist>,
}

impl Axes {
    pub fn artists(&self) -> &[Artist] {
        &self.artists
    }

    pub fn plot(&mut self, line: Line) {
        self.artists.push(Artist::Line(line));
    }

    pub fn fill_between(&mut self, x: (f64, f64), y: (f64, f64), color: Srgb<u8>) {
        self.artists.push(Artist::Band(Band { x, y, color }));
    }

    pub fn annotate(&mut self, text: &str, (x, y): (f64, f64), font_size: f64) {
        self.artists.push(Artist::Annotation(Annotation {
            text: text.to_string(),
            x,
            y,
            font_size,
        }));
    }

    pub fn axhline(&mut self, hline: HorizontalLine) {
        self.artists.push(Artist::HorizontalLine(hline));
    }

    /// Finite data range of the artists along y.
    pub fn y_extent(&self) -> Option<(f64, f64)> {
        extent(self.artists.iter().flat_map(Artist::y_values))
    }

    /// The x limits used for drawing: fixed, or autoscaled from the artists.
    pub fn x_limits(&self) -> (f64, f64) {
        self.x
            .limits
            .unwrap_or_else(|| autoscale(extent(self.artists.iter().flat_map(Artist::x_values))))
    }
}

// ---------------------------------------------------------------------------
// Scaling helpers
// ---------------------------------------------------------------------------

/// Min and max over the finite values, if any.
pub(crate) fn extent(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.filter(|v| v.is_finite()).fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

/// Pad a data range by 5 % on each side; degenerate ranges get a unit span.
pub(crate) fn autoscale(extent: Option<(f64, f64)>) -> (f64, f64) {
    match extent {
        None => (0.0, 1.0),
        Some((lo, hi)) if (hi - lo).abs() < f64::EPSILON => (lo - 0.5, hi + 0.5),
        Some((lo, hi)) => {
            let margin = (hi - lo) * 0.05;
            (lo - margin, hi + margin)
        }
    }
}
