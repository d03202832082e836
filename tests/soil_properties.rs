use std::fs;
use std::path::Path;

use cpt_panda::figure::{Artist, LineStyle, Placement};
use cpt_panda::{classify_request_body, MainComponent, PlotConfig, SoilProperties};
use serde_json::Value as JsonValue;

fn load(name: &str) -> JsonValue {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/response").join(name);
    let text = fs::read_to_string(&path).unwrap();
    serde_json::from_str(&text).unwrap()
}

fn soil() -> SoilProperties {
    SoilProperties::from_api_response(&load("response_parse.json"), &load("response_classify.json"))
        .unwrap()
}

#[test]
fn parses_saved_responses() {
    let soil = soil();

    assert_eq!(soil.label(), "CPT-000000012345");
    assert_eq!(soil.vertical_position_reference_point(), "NAP");
    assert_eq!(soil.vertical_position_offset(), 1.2);
    assert_eq!(soil.predrilled_depth(), Some(0.5));
    assert_eq!(soil.groundwater_level(), Some(1.0));
    assert_eq!(soil.location().srs_name(), Some("EPSG:4326"));
    assert_eq!(soil.location().coordinates().unwrap(), (4.8952, 52.3702));

    assert_eq!(soil.cpt_table().len(), 4);
    assert_eq!(soil.layer_table().len(), 3);
    assert_eq!(soil.layer_table().main_component()[1], Some(MainComponent::Peat));
}

#[test]
fn tabular_views_drop_incomplete_samples() {
    let soil = soil();

    let cpt = soil.cpt_table().tabular_view().unwrap();
    assert_eq!(cpt.num_rows(), 3);
    assert_eq!(cpt.num_columns(), 5);

    let layers = soil.layer_table().tabular_view().unwrap();
    assert_eq!(layers.num_rows(), 3);
    assert_eq!(layers.schema().field(0).name(), "geotechnicalSoilName");
}

#[test]
fn composite_plot_has_traces_and_layers() {
    let figure = soil().plot(&PlotConfig::default()).unwrap();

    assert_eq!(figure.title(), Some("CPT-000000012345"));
    assert_eq!(figure.size(), (10.0, 12.0));

    let [traces, layers] = figure.panels() else {
        panic!("expected two panels");
    };
    assert_eq!(traces.width_ratio(), 1.0);
    assert_eq!(layers.width_ratio(), 0.1);
    assert_eq!(traces.axes().len(), 3);

    let spines: Vec<_> = traces.axes().iter().map(|axes| axes.x.placement).collect();
    assert_eq!(
        spines,
        vec![
            Placement::Top { position: 1.0 },
            Placement::Top { position: 1.05 },
            Placement::Top { position: 1.1 },
        ]
    );
    assert!(traces.axes()[2].x.reversed);

    let legend = traces.legend_entries();
    let dashed: Vec<_> = legend
        .iter()
        .filter(|entry| entry.style == LineStyle::Dashed)
        .map(|entry| entry.label.as_str())
        .collect();
    assert_eq!(dashed, vec!["Groundwater level", "Surface level"]);

    let hlines: Vec<f64> = traces
        .host()
        .artists()
        .iter()
        .filter_map(|artist| match artist {
            Artist::HorizontalLine(hline) => Some(hline.y),
            _ => None,
        })
        .collect();
    assert_eq!(hlines.len(), 2);
    assert!((hlines[0] - 0.2).abs() < 1e-9);
    assert!((hlines[1] - 0.7).abs() < 1e-9);

    let names: Vec<_> = layers
        .host()
        .artists()
        .iter()
        .filter_map(|artist| match artist {
            Artist::Annotation(annotation) => Some(annotation.text.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(names, vec!["Klei, zandig", "Veen", "Zand"]);
}

#[test]
fn composite_plot_renders_to_svg() {
    let svg = soil().plot(&PlotConfig::default()).unwrap().to_svg().unwrap();

    assert!(svg.contains("<svg"));
    assert!(svg.contains("CPT-000000012345"));
    assert!(svg.contains("Veen"));
    assert!(svg.contains("qc [MPa]"));
    assert!(svg.contains("Depth [m w.r.t. NAP]"));
}

#[test]
fn plotting_twice_draws_the_same_figure() {
    let soil = soil();
    let config = PlotConfig::default();
    let first = soil.plot(&config).unwrap().to_svg().unwrap();
    let second = soil.plot(&config).unwrap().to_svg().unwrap();
    assert_eq!(first, second);
}

#[test]
fn classify_request_carries_corrected_length() {
    let body = classify_request_body(&load("response_parse.json"));
    assert_eq!(body["data"]["correctedPenetrationLength"], body["data"]["penetrationLength"]);
    assert_eq!(body["label"], "CPT-000000012345");
}

#[test]
fn missing_metadata_falls_back_to_defaults() {
    let parse = serde_json::json!({ "data": load("response_parse.json")["data"].clone() });
    let soil = SoilProperties::from_api_response(&parse, &load("response_classify.json")).unwrap();

    assert_eq!(soil.label(), "Unknown");
    assert_eq!(soil.vertical_position_reference_point(), "Unknown");
    assert_eq!(soil.vertical_position_offset(), 0.0);
    assert_eq!(soil.predrilled_depth(), None);
    assert_eq!(soil.groundwater_level(), None);
    assert!(soil.location().coordinates().is_err());
}
