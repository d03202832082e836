use std::sync::Arc;

use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use palette::Srgb;
use serde_json::Value as JsonValue;

use super::filter::{complete_rows, float_array};
use super::loader::{common_length, fill_absent, read_column, FieldSpec};
use super::model::Column;
use crate::color;
use crate::config::PlotConfig;
use crate::error::Result;
use crate::figure::{Axes, Figure, Line, Panel, Placement};
use crate::schema::cpt;

const TABLE: &str = "CptTable";

const PENETRATION_LENGTH: FieldSpec =
    FieldSpec::with_aliases(cpt::PENETRATION_LENGTH, &[cpt::DEPTH]);
const DEPTH_OFFSET: FieldSpec = FieldSpec::new(cpt::DEPTH_OFFSET);
const CONE_RESISTANCE: FieldSpec = FieldSpec::new(cpt::CONE_RESISTANCE);
const LOCAL_FRICTION: FieldSpec = FieldSpec::new(cpt::LOCAL_FRICTION);
const FRICTION_RATIO: FieldSpec =
    FieldSpec::with_aliases(cpt::FRICTION_RATIO, &[cpt::FRICTION_RATIO_COMPUTED]);

// ---------------------------------------------------------------------------
// Trace styles
// ---------------------------------------------------------------------------

/// Axis setup of one measurement channel.
struct Trace {
    label: &'static str,
    axis_label: &'static str,
    limits: (f64, f64),
    reversed: bool,
    spine: f64,
    color: Srgb<u8>,
}

const CONE_RESISTANCE_TRACE: Trace = Trace {
    label: cpt::CONE_RESISTANCE,
    axis_label: "qc [MPa]",
    limits: (0.0, 40.0),
    reversed: false,
    spine: 1.0,
    color: color::CONE_RESISTANCE,
};

const LOCAL_FRICTION_TRACE: Trace = Trace {
    label: cpt::LOCAL_FRICTION,
    axis_label: "fs [MPa]",
    limits: (0.0, 0.8),
    reversed: false,
    spine: 1.05,
    color: color::LOCAL_FRICTION,
};

const FRICTION_RATIO_TRACE: Trace = Trace {
    label: cpt::FRICTION_RATIO,
    axis_label: "Rf [%]",
    limits: (0.0, 16.0),
    reversed: true,
    spine: 1.1,
    color: color::TAB_GRAY,
};

// ---------------------------------------------------------------------------
// CptTable
// ---------------------------------------------------------------------------

/// The cone-penetration traces of one sounding, one entry per sample in
/// depth order.
///
/// | column              | unit                 |
/// |---------------------|----------------------|
/// | `penetrationLength` | m                    |
/// | `depthOffset`       | m w.r.t. reference   |
/// | `coneResistance`    | MPa                  |
/// | `localFriction`     | MPa                  |
/// | `frictionRatio`     | %                    |
#[derive(Debug, Clone, PartialEq)]
pub struct CptTable {
    penetration_length: Column<f64>,
    depth_offset: Column<f64>,
    cone_resistance: Column<f64>,
    local_friction: Column<f64>,
    friction_ratio: Column<f64>,
}

impl CptTable {
    /// Build a table, rejecting columns of unequal length.
    pub fn new(
        penetration_length: Column<f64>,
        depth_offset: Column<f64>,
        cone_resistance: Column<f64>,
        local_friction: Column<f64>,
        friction_ratio: Column<f64>,
    ) -> Result<Self> {
        common_length(
            TABLE,
            &[
                (cpt::PENETRATION_LENGTH, Some(penetration_length.len())),
                (cpt::DEPTH_OFFSET, Some(depth_offset.len())),
                (cpt::CONE_RESISTANCE, Some(cone_resistance.len())),
                (cpt::LOCAL_FRICTION, Some(local_friction.len())),
                (cpt::FRICTION_RATIO, Some(friction_ratio.len())),
            ],
        )?;
        Ok(Self {
            penetration_length,
            depth_offset,
            cone_resistance,
            local_friction,
            friction_ratio,
        })
    }

    /// Build from the `data` block of a `parse/cpt` response.
    ///
    /// Penetration length falls back to `depth`, friction ratio to
    /// `frictionRatioComputed`. An absent field becomes an all-missing column.
    pub fn from_api_response(data: &JsonValue) -> Result<Self> {
        let penetration_length = read_column::<f64>(data, &PENETRATION_LENGTH)?;
        let depth_offset = read_column::<f64>(data, &DEPTH_OFFSET)?;
        let cone_resistance = read_column::<f64>(data, &CONE_RESISTANCE)?;
        let local_friction = read_column::<f64>(data, &LOCAL_FRICTION)?;
        let friction_ratio = read_column::<f64>(data, &FRICTION_RATIO)?;

        let len = common_length(
            TABLE,
            &[
                (cpt::PENETRATION_LENGTH, penetration_length.as_ref().map(Vec::len)),
                (cpt::DEPTH_OFFSET, depth_offset.as_ref().map(Vec::len)),
                (cpt::CONE_RESISTANCE, cone_resistance.as_ref().map(Vec::len)),
                (cpt::LOCAL_FRICTION, local_friction.as_ref().map(Vec::len)),
                (cpt::FRICTION_RATIO, friction_ratio.as_ref().map(Vec::len)),
            ],
        )?;
        log::debug!("Parsed {len} CPT samples");

        Self::new(
            fill_absent(penetration_length, len),
            fill_absent(depth_offset, len),
            fill_absent(cone_resistance, len),
            fill_absent(local_friction, len),
            fill_absent(friction_ratio, len),
        )
    }

    /// Number of samples (before any row drop).
    pub fn len(&self) -> usize {
        self.penetration_length.len()
    }

    pub fn is_empty(&self) -> bool {
        self.penetration_length.is_empty()
    }

    pub fn penetration_length(&self) -> &[Option<f64>] {
        &self.penetration_length
    }

    pub fn depth_offset(&self) -> &[Option<f64>] {
        &self.depth_offset
    }

    pub fn cone_resistance(&self) -> &[Option<f64>] {
        &self.cone_resistance
    }

    pub fn local_friction(&self) -> &[Option<f64>] {
        &self.local_friction
    }

    pub fn friction_ratio(&self) -> &[Option<f64>] {
        &self.friction_ratio
    }

    /// Indices of the samples with every column present.
    pub fn complete_rows(&self) -> Vec<usize> {
        complete_rows(&[
            &self.penetration_length,
            &self.depth_offset,
            &self.cone_resistance,
            &self.local_friction,
            &self.friction_ratio,
        ])
    }

    /// Tabular view: the complete samples only, dropped jointly.
    pub fn tabular_view(&self) -> Result<RecordBatch> {
        let rows = self.complete_rows();
        log::debug!("CPT tabular view keeps {} of {} samples", rows.len(), self.len());

        let columns = [
            (cpt::PENETRATION_LENGTH, &self.penetration_length),
            (cpt::DEPTH_OFFSET, &self.depth_offset),
            (cpt::CONE_RESISTANCE, &self.cone_resistance),
            (cpt::LOCAL_FRICTION, &self.local_friction),
            (cpt::FRICTION_RATIO, &self.friction_ratio),
        ];
        let schema = Schema::new(
            columns
                .iter()
                .map(|(name, _)| Field::new(*name, DataType::Float64, false))
                .collect::<Vec<_>>(),
        );
        let arrays = columns
            .iter()
            .map(|(_, column)| float_array(column, &rows))
            .collect();

        Ok(RecordBatch::try_new(Arc::new(schema), arrays)?)
    }

    // -- Trace rendering --

    /// Cone resistance on [0, 40] MPa, axis at the top edge.
    pub fn draw_cone_resistance(&self, axes: &mut Axes, offset: f64) {
        self.draw_trace(axes, offset, &self.cone_resistance, &CONE_RESISTANCE_TRACE);
    }

    /// Local friction on [0, 0.8] MPa, axis just above the cone resistance axis.
    pub fn draw_local_friction(&self, axes: &mut Axes, offset: f64) {
        self.draw_trace(axes, offset, &self.local_friction, &LOCAL_FRICTION_TRACE);
    }

    /// Friction ratio on [0, 16] %, reversed, axis above the other two.
    pub fn draw_friction_ratio(&self, axes: &mut Axes, offset: f64) {
        self.draw_trace(axes, offset, &self.friction_ratio, &FRICTION_RATIO_TRACE);
    }

    pub fn plot_cone_resistance(&self, offset: f64, config: &PlotConfig) -> Result<Figure> {
        self.plot_trace(offset, config, Self::draw_cone_resistance)
    }

    pub fn plot_local_friction(&self, offset: f64, config: &PlotConfig) -> Result<Figure> {
        self.plot_trace(offset, config, Self::draw_local_friction)
    }

    pub fn plot_friction_ratio(&self, offset: f64, config: &PlotConfig) -> Result<Figure> {
        self.plot_trace(offset, config, Self::draw_friction_ratio)
    }

    fn plot_trace(
        &self,
        offset: f64,
        config: &PlotConfig,
        draw: fn(&Self, &mut Axes, f64),
    ) -> Result<Figure> {
        let mut panel = Panel::new(1.0);
        draw(self, panel.host_mut(), offset);
        Ok(Figure::from_config(config)?.with_panel(panel))
    }

    fn draw_trace(&self, axes: &mut Axes, offset: f64, values: &[Option<f64>], trace: &Trace) {
        axes.x.placement = Placement::Top { position: trace.spine };
        axes.x.set_limits(trace.limits.0, trace.limits.1);
        axes.x.reversed = trace.reversed;
        axes.x.label = Some(trace.axis_label.to_string());
        axes.x.color = trace.color;
        axes.y.orient_depth_down();

        let depth = self
            .penetration_length
            .iter()
            .map(|length| length.map_or(f64::NAN, |length| offset - length))
            .collect();
        let x = values.iter().map(|v| v.unwrap_or(f64::NAN)).collect();

        axes.plot(Line::new(x, depth, trace.color).with_label(trace.label));
    }
}
