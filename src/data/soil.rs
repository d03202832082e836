use serde_json::Value as JsonValue;

use super::cpt::CptTable;
use super::layer::LayerTable;
use super::loader::read_scalar;
use super::location::Location;
use crate::color;
use crate::config::PlotConfig;
use crate::error::Result;
use crate::figure::{Figure, Grid, HorizontalLine, Panel, Ticks};
use crate::schema::{cpt, parse};

const UNKNOWN: &str = "Unknown";

/// Upper end of the cone-resistance grid (MPa).
const GRID_LIMIT: u32 = 40;
const GRID_MAJOR_STEP: u32 = 5;
const GRID_MINOR_STEP: u32 = 1;
const DEPTH_TICK_STEP: f64 = 0.5;

// ---------------------------------------------------------------------------
// SoilProperties
// ---------------------------------------------------------------------------

/// One sounding: its CPT traces, its layer classification, where it was
/// taken and the survey metadata that anchors the depth axis.
#[derive(Debug, Clone, PartialEq)]
pub struct SoilProperties {
    cpt_table: CptTable,
    layer_table: LayerTable,
    location: Location,
    vertical_position_reference_point: String,
    /// Elevation of the depth zero, in m w.r.t. the reference point.
    vertical_position_offset: f64,
    predrilled_depth: Option<f64>,
    label: String,
    groundwater_level: Option<f64>,
}

impl SoilProperties {
    /// Assemble from a `parse/cpt` response and a `classify/*` response.
    ///
    /// Defaults: reference point and label `"Unknown"`, offset `0.0`,
    /// no pre-drilled depth, no groundwater level.
    pub fn from_api_response(
        response_parse: &JsonValue,
        response_classify: &JsonValue,
    ) -> Result<Self> {
        let empty = JsonValue::Object(Default::default());
        let data = response_parse.get(parse::DATA).unwrap_or(&empty);
        let location = response_parse.get(parse::LOCATION).unwrap_or(&empty);

        Ok(Self {
            cpt_table: CptTable::from_api_response(data)?,
            layer_table: LayerTable::from_api_response(response_classify)?,
            location: Location::from_api_response(location)?,
            vertical_position_reference_point: read_scalar(
                response_parse,
                parse::VERTICAL_POSITION_REFERENCE_POINT,
            )?
            .unwrap_or_else(|| UNKNOWN.to_string()),
            vertical_position_offset: read_scalar(response_parse, parse::VERTICAL_POSITION_OFFSET)?
                .unwrap_or(0.0),
            predrilled_depth: read_scalar(response_parse, parse::PREDRILLED_DEPTH)?,
            label: read_scalar(response_parse, parse::LABEL)?
                .unwrap_or_else(|| UNKNOWN.to_string()),
            groundwater_level: read_scalar(response_parse, parse::GROUNDWATER_LEVEL)?,
        })
    }

    pub fn cpt_table(&self) -> &CptTable {
        &self.cpt_table
    }

    pub fn layer_table(&self) -> &LayerTable {
        &self.layer_table
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn vertical_position_reference_point(&self) -> &str {
        &self.vertical_position_reference_point
    }

    pub fn vertical_position_offset(&self) -> f64 {
        self.vertical_position_offset
    }

    pub fn predrilled_depth(&self) -> Option<f64> {
        self.predrilled_depth
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn groundwater_level(&self) -> Option<f64> {
        self.groundwater_level
    }

    /// Compose the CPT traces and the layer stack on one depth axis.
    ///
    /// Left panel: cone resistance on the host axes with the depth grid,
    /// local friction and friction ratio on twins stacked above it, and the
    /// groundwater / pre-drilled reference lines. Right panel: the layers.
    pub fn plot(&self, config: &PlotConfig) -> Result<Figure> {
        let offset = self.vertical_position_offset;

        let mut traces = Panel::new(config.width_ratios.0);
        traces.set_legend(true);
        {
            let host = traces.host_mut();
            host.x.major_ticks = Ticks::Fixed(steps(GRID_LIMIT, GRID_MAJOR_STEP));
            host.x.minor_ticks = Some(Ticks::Fixed(steps(GRID_LIMIT, GRID_MINOR_STEP)));
            host.grid = Some(Grid {
                major_alpha: 0.5,
                minor_alpha: 0.2,
            });
            host.y.major_ticks = Ticks::Multiple(DEPTH_TICK_STEP);
            let reference = &self.vertical_position_reference_point;
            host.y.label = Some(format!("Depth [m w.r.t. {reference}]"));

            if let Some(level) = self.groundwater_level {
                host.axhline(
                    HorizontalLine::new(offset - level, color::TAB_BLUE)
                        .dashed()
                        .with_label("Groundwater level"),
                );
            }
            if let Some(depth) = self.predrilled_depth {
                host.axhline(
                    HorizontalLine::new(offset - depth, color::TAB_BROWN)
                        .dashed()
                        .with_label("Surface level"),
                );
            }

            self.cpt_table.draw_cone_resistance(host, offset);
        }
        self.cpt_table.draw_local_friction(traces.twin_x(), offset);
        self.cpt_table.draw_friction_ratio(traces.twin_x(), offset);

        let mut layers = Panel::new(config.width_ratios.1);
        self.layer_table.draw(layers.host_mut(), offset);

        Ok(Figure::from_config(config)?
            .with_title(&self.label)
            .with_panel(traces)
            .with_panel(layers))
    }
}

fn steps(limit: u32, step: u32) -> Vec<f64> {
    (0..=limit).step_by(step as usize).map(f64::from).collect()
}

// ---------------------------------------------------------------------------
// Classify request
// ---------------------------------------------------------------------------

/// Body for the `classify/*` call: the parse response with
/// `data.correctedPenetrationLength` set to `data.depth` when present, else
/// to `data.penetrationLength`.
///
/// This runs before classification and prefers `depth`, while
/// [`CptTable::from_api_response`] prefers `penetrationLength` when reading
/// the traces back. Both paths are kept as they are.
pub fn classify_request_body(response_parse: &JsonValue) -> JsonValue {
    let mut body = response_parse.clone();
    if let Some(data) = body.get_mut(parse::DATA).and_then(JsonValue::as_object_mut) {
        let corrected = data
            .get(cpt::DEPTH)
            .or_else(|| data.get(cpt::PENETRATION_LENGTH))
            .cloned();
        if let Some(corrected) = corrected {
            data.insert(cpt::CORRECTED_PENETRATION_LENGTH.to_string(), corrected);
        }
    }
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::figure::{Artist, LineStyle};
    use serde_json::json;

    fn parse_response() -> JsonValue {
        json!({
            "data": {
                "penetrationLength": [0.0, 1.0, 2.0],
                "depthOffset": [0.0, 0.0, 0.0],
                "coneResistance": [1.0, 2.0, 3.0],
                "localFriction": [0.1, 0.2, 0.3],
                "frictionRatio": [1.0, 2.0, 3.0]
            }
        })
    }

    fn classify_response() -> JsonValue {
        json!({
            "geotechnicalSoilName": ["Zand", "Klei", "Veen"],
            "lowerBoundary": [0.5, 1.5, 2.0],
            "upperBoundary": [0.0, 0.5, 1.5],
            "color": ["#e5e500", "#007f00", "#7f3f00"],
            "mainComponent": ["sand", "clay", "peat"],
            "cohesion": [0.0, 5.0, 2.0],
            "gamma_sat": [20.0, 17.0, 11.0],
            "gamma_unsat": [18.0, 17.0, 11.0],
            "phi": [32.5, 17.5, 15.0],
            "undrainedShearStrength": [0.0, 50.0, 20.0]
        })
    }

    fn soil() -> SoilProperties {
        SoilProperties::from_api_response(&parse_response(), &classify_response()).unwrap()
    }

    #[test]
    fn metadata_defaults_apply() {
        let soil = soil();
        assert_eq!(soil.vertical_position_reference_point(), "Unknown");
        assert_eq!(soil.vertical_position_offset(), 0.0);
        assert_eq!(soil.label(), "Unknown");
        assert_eq!(soil.predrilled_depth(), None);
        assert_eq!(soil.groundwater_level(), None);
        assert_eq!(soil.location(), &Location::default());
    }

    #[test]
    fn metadata_is_read_when_present() {
        let mut parse = parse_response();
        parse["verticalPositionReferencePoint"] = json!("NAP");
        parse["verticalPositionOffset"] = json!(-1.25);
        parse["predrilledDepth"] = json!(0.5);
        parse["label"] = json!("CPT-01");
        parse["groundwaterLevel"] = json!(null);
        parse["location"] = json!({ "srs": "EPSG:4326", "long": 4.9, "lat": 52.37 });

        let soil = SoilProperties::from_api_response(&parse, &classify_response()).unwrap();
        assert_eq!(soil.vertical_position_reference_point(), "NAP");
        assert_eq!(soil.vertical_position_offset(), -1.25);
        assert_eq!(soil.predrilled_depth(), Some(0.5));
        assert_eq!(soil.label(), "CPT-01");
        assert_eq!(soil.groundwater_level(), None);
        assert_eq!(soil.location().lat(), Some(52.37));
    }

    #[test]
    fn invalid_classify_response_fails_the_aggregate() {
        let mut classify = classify_response();
        classify["phi"] = json!([1.0]);
        assert!(SoilProperties::from_api_response(&parse_response(), &classify).is_err());
    }

    #[test]
    fn plot_has_two_panels_and_three_trace_axes() {
        let soil = soil();
        let figure = soil.plot(&PlotConfig::default()).unwrap();

        assert_eq!(figure.panels().len(), 2);
        let axes = figure.panels()[0].axes();
        assert_eq!(axes.len(), 3);
        assert_eq!(axes[0].x.limits, Some((0.0, 40.0)));
        assert_eq!(axes[1].x.limits, Some((0.0, 0.8)));
        assert_eq!(axes[2].x.limits, Some((0.0, 16.0)));
        assert!(axes[2].x.reversed);
        assert_eq!(figure.panels()[1].width_ratio(), 0.1);
        assert_eq!(figure.panels()[1].axes().len(), 1);
    }

    #[test]
    fn host_carries_the_depth_grid() {
        let soil = soil();
        let figure = soil.plot(&PlotConfig::default()).unwrap();
        let host = figure.panels()[0].host();

        assert_eq!(
            host.x.major_ticks,
            Ticks::Fixed(vec![0.0, 5.0, 10.0, 15.0, 20.0, 25.0, 30.0, 35.0, 40.0])
        );
        match &host.x.minor_ticks {
            Some(Ticks::Fixed(ticks)) => assert_eq!(ticks.len(), 41),
            other => panic!("unexpected minor ticks: {other:?}"),
        }
        assert_eq!(host.y.major_ticks, Ticks::Multiple(0.5));
        assert!(host.grid.is_some());
    }

    #[test]
    fn reference_lines_sit_at_offset_minus_level() {
        let mut parse = parse_response();
        parse["verticalPositionOffset"] = json!(1.0);
        parse["groundwaterLevel"] = json!(0.0);
        parse["predrilledDepth"] = json!(0.5);
        let soil = SoilProperties::from_api_response(&parse, &classify_response()).unwrap();
        let figure = soil.plot(&PlotConfig::default()).unwrap();

        let lines: Vec<_> = figure.panels()[0]
            .host()
            .artists()
            .iter()
            .filter_map(|artist| match artist {
                Artist::HorizontalLine(line) => Some(line),
                _ => None,
            })
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].y, 1.0);
        assert_eq!(lines[0].label.as_deref(), Some("Groundwater level"));
        assert_eq!(lines[1].y, 0.5);
        assert_eq!(lines[1].color, color::TAB_BROWN);
        assert!(lines.iter().all(|line| line.style == LineStyle::Dashed));

        let legend: Vec<_> = figure.panels()[0]
            .legend_entries()
            .into_iter()
            .map(|e| e.label)
            .collect();
        assert!(legend.contains(&"Surface level".to_string()));
        assert!(legend.contains(&"frictionRatio".to_string()));
    }

    #[test]
    fn no_reference_lines_without_levels() {
        let soil = soil();
        let figure = soil.plot(&PlotConfig::default()).unwrap();
        assert!(!figure.panels()[0]
            .host()
            .artists()
            .iter()
            .any(|artist| matches!(artist, Artist::HorizontalLine(_))));
    }

    #[test]
    fn repeated_plots_are_independent() {
        let soil = soil();
        let first = soil.plot(&PlotConfig::default()).unwrap();
        let second = soil.plot(&PlotConfig::default()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn classify_body_prefers_depth() {
        let mut parse = parse_response();
        parse["data"]["depth"] = json!([0.0, 0.9, 1.9]);
        let body = classify_request_body(&parse);
        assert_eq!(body["data"]["correctedPenetrationLength"], json!([0.0, 0.9, 1.9]));
        assert!(parse["data"].get("correctedPenetrationLength").is_none());
    }

    #[test]
    fn classify_body_falls_back_to_penetration_length() {
        let body = classify_request_body(&parse_response());
        assert_eq!(body["data"]["correctedPenetrationLength"], json!([0.0, 1.0, 2.0]));
    }
}
