use std::sync::Arc;

use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use serde_json::Value as JsonValue;

use super::filter::{complete_rows, float_array, text_array, Cells};
use super::loader::{common_length, fill_absent, read_column, FieldSpec};
use super::model::{Column, MainComponent};
use crate::color::LayerColors;
use crate::config::PlotConfig;
use crate::error::Result;
use crate::figure::{Axes, Figure, Panel};
use crate::schema::layer;

const TABLE: &str = "LayerTable";

/// Annotation font size in points.
const LABEL_FONT_SIZE: f64 = 5.0;
/// Horizontal position of the soil-name annotation inside the layer band.
const LABEL_X: f64 = 0.25;

// ---------------------------------------------------------------------------
// LayerRow – one complete layer
// ---------------------------------------------------------------------------

/// A layer with every field present.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerRow<'a> {
    pub geotechnical_soil_name: &'a str,
    pub lower_boundary: f64,
    pub upper_boundary: f64,
    pub color: &'a str,
    pub main_component: MainComponent,
    pub cohesion: f64,
    pub gamma_sat: f64,
    pub gamma_unsat: f64,
    pub phi: f64,
    pub undrained_shear_strength: f64,
}

// ---------------------------------------------------------------------------
// LayerTable
// ---------------------------------------------------------------------------

/// Soil-layer classification of one sounding, one entry per layer in depth
/// order.
///
/// Boundaries are in m below the reference, cohesion and undrained shear
/// strength in kPa, unit weights in kN/m³ and the friction angle in degrees.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerTable {
    geotechnical_soil_name: Column<String>,
    lower_boundary: Column<f64>,
    upper_boundary: Column<f64>,
    color: Column<String>,
    main_component: Column<MainComponent>,
    cohesion: Column<f64>,
    gamma_sat: Column<f64>,
    gamma_unsat: Column<f64>,
    phi: Column<f64>,
    undrained_shear_strength: Column<f64>,
}

impl LayerTable {
    /// Build a table, rejecting columns of unequal length.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        geotechnical_soil_name: Column<String>,
        lower_boundary: Column<f64>,
        upper_boundary: Column<f64>,
        color: Column<String>,
        main_component: Column<MainComponent>,
        cohesion: Column<f64>,
        gamma_sat: Column<f64>,
        gamma_unsat: Column<f64>,
        phi: Column<f64>,
        undrained_shear_strength: Column<f64>,
    ) -> Result<Self> {
        let table = Self {
            geotechnical_soil_name,
            lower_boundary,
            upper_boundary,
            color,
            main_component,
            cohesion,
            gamma_sat,
            gamma_unsat,
            phi,
            undrained_shear_strength,
        };
        let lengths: Vec<(&'static str, Option<usize>)> = table
            .columns()
            .iter()
            .map(|(name, cells)| (*name, Some(cells.row_count())))
            .collect();
        common_length(TABLE, &lengths)?;
        Ok(table)
    }

    /// Build from a `classify/*` response.
    ///
    /// An absent key becomes an all-missing column sized to the others.
    pub fn from_api_response(response: &JsonValue) -> Result<Self> {
        let geotechnical_soil_name =
            read_column::<String>(response, &FieldSpec::new(layer::GEOTECHNICAL_SOIL_NAME))?;
        let lower_boundary = read_column::<f64>(response, &FieldSpec::new(layer::LOWER_BOUNDARY))?;
        let upper_boundary = read_column::<f64>(response, &FieldSpec::new(layer::UPPER_BOUNDARY))?;
        let color = read_column::<String>(response, &FieldSpec::new(layer::COLOR))?;
        let main_component =
            read_column::<MainComponent>(response, &FieldSpec::new(layer::MAIN_COMPONENT))?;
        let cohesion = read_column::<f64>(response, &FieldSpec::new(layer::COHESION))?;
        let gamma_sat = read_column::<f64>(response, &FieldSpec::new(layer::GAMMA_SAT))?;
        let gamma_unsat = read_column::<f64>(response, &FieldSpec::new(layer::GAMMA_UNSAT))?;
        let phi = read_column::<f64>(response, &FieldSpec::new(layer::PHI))?;
        let undrained_shear_strength =
            read_column::<f64>(response, &FieldSpec::new(layer::UNDRAINED_SHEAR_STRENGTH))?;

        let len = common_length(
            TABLE,
            &[
                (layer::GEOTECHNICAL_SOIL_NAME, geotechnical_soil_name.as_ref().map(Vec::len)),
                (layer::LOWER_BOUNDARY, lower_boundary.as_ref().map(Vec::len)),
                (layer::UPPER_BOUNDARY, upper_boundary.as_ref().map(Vec::len)),
                (layer::COLOR, color.as_ref().map(Vec::len)),
                (layer::MAIN_COMPONENT, main_component.as_ref().map(Vec::len)),
                (layer::COHESION, cohesion.as_ref().map(Vec::len)),
                (layer::GAMMA_SAT, gamma_sat.as_ref().map(Vec::len)),
                (layer::GAMMA_UNSAT, gamma_unsat.as_ref().map(Vec::len)),
                (layer::PHI, phi.as_ref().map(Vec::len)),
                (layer::UNDRAINED_SHEAR_STRENGTH, undrained_shear_strength.as_ref().map(Vec::len)),
            ],
        )?;
        log::debug!("Parsed {len} soil layers");

        Self::new(
            fill_absent(geotechnical_soil_name, len),
            fill_absent(lower_boundary, len),
            fill_absent(upper_boundary, len),
            fill_absent(color, len),
            fill_absent(main_component, len),
            fill_absent(cohesion, len),
            fill_absent(gamma_sat, len),
            fill_absent(gamma_unsat, len),
            fill_absent(phi, len),
            fill_absent(undrained_shear_strength, len),
        )
    }

    fn columns(&self) -> [(&'static str, &dyn Cells); 10] {
        [
            (layer::GEOTECHNICAL_SOIL_NAME, &self.geotechnical_soil_name),
            (layer::LOWER_BOUNDARY, &self.lower_boundary),
            (layer::UPPER_BOUNDARY, &self.upper_boundary),
            (layer::COLOR, &self.color),
            (layer::MAIN_COMPONENT, &self.main_component),
            (layer::COHESION, &self.cohesion),
            (layer::GAMMA_SAT, &self.gamma_sat),
            (layer::GAMMA_UNSAT, &self.gamma_unsat),
            (layer::PHI, &self.phi),
            (layer::UNDRAINED_SHEAR_STRENGTH, &self.undrained_shear_strength),
        ]
    }

    /// Number of layers (before any row drop).
    pub fn len(&self) -> usize {
        self.geotechnical_soil_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.geotechnical_soil_name.is_empty()
    }

    pub fn geotechnical_soil_name(&self) -> &[Option<String>] {
        &self.geotechnical_soil_name
    }

    pub fn lower_boundary(&self) -> &[Option<f64>] {
        &self.lower_boundary
    }

    pub fn upper_boundary(&self) -> &[Option<f64>] {
        &self.upper_boundary
    }

    pub fn color(&self) -> &[Option<String>] {
        &self.color
    }

    pub fn main_component(&self) -> &[Option<MainComponent>] {
        &self.main_component
    }

    pub fn cohesion(&self) -> &[Option<f64>] {
        &self.cohesion
    }

    pub fn gamma_sat(&self) -> &[Option<f64>] {
        &self.gamma_sat
    }

    pub fn gamma_unsat(&self) -> &[Option<f64>] {
        &self.gamma_unsat
    }

    pub fn phi(&self) -> &[Option<f64>] {
        &self.phi
    }

    pub fn undrained_shear_strength(&self) -> &[Option<f64>] {
        &self.undrained_shear_strength
    }

    /// Indices of the layers with every column present.
    pub fn complete_rows(&self) -> Vec<usize> {
        let columns = self.columns();
        let cells: Vec<&dyn Cells> = columns.iter().map(|(_, cells)| *cells).collect();
        complete_rows(&cells)
    }

    /// The complete layers, in table order.
    pub fn rows(&self) -> impl Iterator<Item = LayerRow<'_>> + '_ {
        self.complete_rows().into_iter().filter_map(move |row| {
            Some(LayerRow {
                geotechnical_soil_name: self.geotechnical_soil_name[row].as_deref()?,
                lower_boundary: self.lower_boundary[row]?,
                upper_boundary: self.upper_boundary[row]?,
                color: self.color[row].as_deref()?,
                main_component: self.main_component[row]?,
                cohesion: self.cohesion[row]?,
                gamma_sat: self.gamma_sat[row]?,
                gamma_unsat: self.gamma_unsat[row]?,
                phi: self.phi[row]?,
                undrained_shear_strength: self.undrained_shear_strength[row]?,
            })
        })
    }

    /// Tabular view: the complete layers only, dropped jointly.
    pub fn tabular_view(&self) -> Result<RecordBatch> {
        let rows = self.complete_rows();
        log::debug!("Layer tabular view keeps {} of {} layers", rows.len(), self.len());

        let text = |name: &str| Field::new(name, DataType::Utf8, false);
        let float = |name: &str| Field::new(name, DataType::Float64, false);
        let schema = Schema::new(vec![
            text(layer::GEOTECHNICAL_SOIL_NAME),
            float(layer::LOWER_BOUNDARY),
            float(layer::UPPER_BOUNDARY),
            text(layer::COLOR),
            text(layer::MAIN_COMPONENT),
            float(layer::COHESION),
            float(layer::GAMMA_SAT),
            float(layer::GAMMA_UNSAT),
            float(layer::PHI),
            float(layer::UNDRAINED_SHEAR_STRENGTH),
        ]);

        let arrays = vec![
            text_array(&self.geotechnical_soil_name, &rows, |s| s.as_str()),
            float_array(&self.lower_boundary, &rows),
            float_array(&self.upper_boundary, &rows),
            text_array(&self.color, &rows, |s| s.as_str()),
            text_array(&self.main_component, &rows, |c| c.as_str()),
            float_array(&self.cohesion, &rows),
            float_array(&self.gamma_sat, &rows),
            float_array(&self.gamma_unsat, &rows),
            float_array(&self.phi, &rows),
            float_array(&self.undrained_shear_strength, &rows),
        ];

        Ok(RecordBatch::try_new(Arc::new(schema), arrays)?)
    }

    // -- Rendering --

    /// Stack the complete layers as coloured bands between
    /// `offset - lowerBoundary` and `offset - upperBoundary`, each labelled
    /// with its soil name.
    pub fn draw(&self, axes: &mut Axes, offset: f64) {
        let colors = LayerColors::default();
        axes.x.set_limits(0.0, 1.0);

        for row in self.rows() {
            let lower = offset - row.lower_boundary;
            let upper = offset - row.upper_boundary;
            let color = colors.color_for(row.color, row.main_component);
            axes.fill_between((0.0, 1.0), (lower, upper), color);

            let middle = (lower - upper) / 2.0 + upper;
            axes.annotate(row.geotechnical_soil_name, (LABEL_X, middle), LABEL_FONT_SIZE);
        }

        axes.y.orient_depth_down();
        axes.x.tick_labels = false;
    }

    pub fn plot(&self, offset: f64, config: &PlotConfig) -> Result<Figure> {
        let mut panel = Panel::new(1.0);
        self.draw(panel.host_mut(), offset);
        Ok(Figure::from_config(config)?.with_panel(panel))
    }
}
