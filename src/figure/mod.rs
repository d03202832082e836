/// Figure layer: a drawable model filled in by the plot routines, and its
/// SVG renderer.
///
/// ```text
///   Figure ── title, size, dpi
///     └─ Panel (width ratio, legend)      one per column, shared depth axis
///          └─ Axes  host first, twins after
///               ├─ XAxis (limits, direction, spine placement, ticks)
///               ├─ YAxis (direction, ticks)
///               └─ Artist: Line | Band | Annotation | HorizontalLine
/// ```
pub mod axes;
mod render;

pub use axes::{
    Annotation, Artist, Axes, Band, Grid, HorizontalLine, LegendEntry, Line, LineStyle, Placement,
    Ticks, VerticalDirection, XAxis, YAxis,
};

use crate::config::PlotConfig;
use crate::error::Result;

// ---------------------------------------------------------------------------
// Panel – one column of the figure
// ---------------------------------------------------------------------------

/// A panel holds a host axes plus any number of twins sharing its y axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    width_ratio: f64,
    axes: Vec<Axes>,
    show_legend: bool,
}

impl Panel {
    pub fn new(width_ratio: f64) -> Self {
        Self {
            width_ratio,
            axes: vec![Axes::default()],
            show_legend: false,
        }
    }

    pub fn width_ratio(&self) -> f64 {
        self.width_ratio
    }

    /// Host axes first, twins in creation order.
    pub fn axes(&self) -> &[Axes] {
        &self.axes
    }

    pub fn host(&self) -> &Axes {
        &self.axes[0]
    }

    pub fn host_mut(&mut self) -> &mut Axes {
        &mut self.axes[0]
    }

    /// Add an axes with its own x axis that shares the host's y axis.
    pub fn twin_x(&mut self) -> &mut Axes {
        self.axes.push(Axes::default());
        let last = self.axes.len() - 1;
        &mut self.axes[last]
    }

    pub fn show_legend(&self) -> bool {
        self.show_legend
    }

    pub fn set_legend(&mut self, show: bool) {
        self.show_legend = show;
    }

    /// Labelled artists of every axes in the panel.
    pub fn legend_entries(&self) -> Vec<LegendEntry> {
        self.axes
            .iter()
            .flat_map(|axes| axes.artists().iter().filter_map(Artist::legend_entry))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Figure
// ---------------------------------------------------------------------------

/// A composed drawable surface. Panels sit side by side and share one
/// vertical range.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    title: Option<String>,
    /// Width and height in inches.
    size: (f64, f64),
    dpi: f64,
    panels: Vec<Panel>,
}

impl Figure {
    /// An empty figure sized from a validated configuration.
    pub fn from_config(config: &PlotConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            title: None,
            size: config.figure_size,
            dpi: config.dpi,
            panels: Vec::new(),
        })
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn with_panel(mut self, panel: Panel) -> Self {
        self.panels.push(panel);
        self
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn size(&self) -> (f64, f64) {
        self.size
    }

    pub fn dpi(&self) -> f64 {
        self.dpi
    }

    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    /// Surface size in pixels.
    pub fn pixel_size(&self) -> (u32, u32) {
        let (width, height) = self.size;
        (
            (width * self.dpi).round().max(1.0) as u32,
            (height * self.dpi).round().max(1.0) as u32,
        )
    }

    /// The vertical range shared by every panel.
    pub fn y_limits(&self) -> (f64, f64) {
        axes::autoscale(axes::extent(
            self.panels
                .iter()
                .flat_map(|panel| panel.axes())
                .filter_map(Axes::y_extent)
                .flat_map(|(lo, hi)| [lo, hi]),
        ))
    }

    /// Render to an SVG document. Every call draws a fresh surface.
    pub fn to_svg(&self) -> Result<String> {
        render::to_svg(self)
    }
}
