use cpt_panda::{CptTable, LayerTable, SoilError};
use proptest::prelude::*;
use serde_json::{json, Value as JsonValue};

const FIELDS: [&str; 5] = [
    "penetrationLength",
    "depthOffset",
    "coneResistance",
    "localFriction",
    "frictionRatio",
];

const LAYER_FIELDS: [&str; 10] = [
    "geotechnicalSoilName",
    "lowerBoundary",
    "upperBoundary",
    "color",
    "mainComponent",
    "cohesion",
    "gamma_sat",
    "gamma_unsat",
    "phi",
    "undrainedShearStrength",
];

fn cell() -> impl Strategy<Value = Option<f64>> {
    prop_oneof![3 => (0.0..50.0f64).prop_map(Some), 1 => Just(None)]
}

/// Five equally long columns, some cells missing.
fn table_columns() -> impl Strategy<Value = Vec<Vec<Option<f64>>>> {
    (0usize..30).prop_flat_map(|len| {
        prop::collection::vec(prop::collection::vec(cell(), len), FIELDS.len())
    })
}

fn data_block(columns: &[Vec<Option<f64>>]) -> JsonValue {
    let mut data = json!({});
    for (name, column) in FIELDS.iter().zip(columns) {
        data[*name] = json!(column);
    }
    data
}

/// A present value of the right JSON type for the layer column at `field`.
fn layer_value(field: usize) -> BoxedStrategy<JsonValue> {
    match LAYER_FIELDS[field] {
        "geotechnicalSoilName" => prop::sample::select(vec!["Zand", "Klei, zandig", "Veen"])
            .prop_map(JsonValue::from)
            .boxed(),
        "color" => prop::sample::select(vec!["#e5e500", "#007f00", "tab:brown", "not-a-color"])
            .prop_map(JsonValue::from)
            .boxed(),
        "mainComponent" => {
            prop::sample::select(vec!["rock", "rocks", "gravel", "sand", "silt", "clay", "peat"])
                .prop_map(JsonValue::from)
                .boxed()
        }
        _ => (0.0..40.0f64).prop_map(JsonValue::from).boxed(),
    }
}

fn layer_cell(field: usize) -> impl Strategy<Value = JsonValue> {
    prop_oneof![4 => layer_value(field), 1 => Just(JsonValue::Null)]
}

/// Ten equally long layer columns with nulls scattered across them.
fn layer_columns() -> impl Strategy<Value = Vec<Vec<JsonValue>>> {
    (0usize..20).prop_flat_map(|len| {
        (0..LAYER_FIELDS.len())
            .map(|field| prop::collection::vec(layer_cell(field), len))
            .collect::<Vec<_>>()
    })
}

fn classify_block(columns: &[Vec<JsonValue>]) -> JsonValue {
    let mut response = json!({});
    for (name, column) in LAYER_FIELDS.iter().zip(columns) {
        response[*name] = JsonValue::Array(column.clone());
    }
    response
}

proptest! {
    #[test]
    fn view_never_has_more_rows_than_the_table(columns in table_columns()) {
        let table = CptTable::from_api_response(&data_block(&columns)).unwrap();
        let view = table.tabular_view().unwrap();
        prop_assert!(view.num_rows() <= table.len());
    }

    #[test]
    fn view_keeps_exactly_the_complete_rows(columns in table_columns()) {
        let table = CptTable::from_api_response(&data_block(&columns)).unwrap();
        let complete = (0..table.len())
            .filter(|&row| columns.iter().all(|column| column[row].is_some()))
            .count();
        prop_assert_eq!(table.tabular_view().unwrap().num_rows(), complete);
        prop_assert_eq!(table.complete_rows().len(), complete);
    }

    #[test]
    fn any_shorter_column_is_rejected(columns in table_columns(), short in 0usize..5) {
        prop_assume!(!columns[short].is_empty());
        let mut columns = columns;
        columns[short].pop();

        let err = CptTable::from_api_response(&data_block(&columns)).unwrap_err();
        let is_validation = matches!(err, SoilError::Validation { table: "CptTable", .. });
        prop_assert!(is_validation, "{}", err);
    }

    #[test]
    fn depth_alias_reads_like_penetration_length(columns in table_columns()) {
        let primary = data_block(&columns);
        let mut aliased = primary.clone();
        let lengths = aliased.as_object_mut().unwrap().remove("penetrationLength").unwrap();
        aliased["depth"] = lengths;

        let a = CptTable::from_api_response(&primary).unwrap();
        let b = CptTable::from_api_response(&aliased).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn every_shorter_layer_column_is_rejected(columns in layer_columns()) {
        prop_assume!(!columns[0].is_empty());
        for short in 0..LAYER_FIELDS.len() {
            let mut shortened = columns.clone();
            shortened[short].pop();

            let err = LayerTable::from_api_response(&classify_block(&shortened)).unwrap_err();
            let is_validation = matches!(err, SoilError::Validation { table: "LayerTable", .. });
            prop_assert!(is_validation, "{} shortened: {}", LAYER_FIELDS[short], err);
        }
    }

    #[test]
    fn layer_view_keeps_exactly_the_complete_rows(columns in layer_columns()) {
        let table = LayerTable::from_api_response(&classify_block(&columns)).unwrap();
        let complete = (0..table.len())
            .filter(|&row| columns.iter().all(|column| !column[row].is_null()))
            .count();

        prop_assert_eq!(table.len(), columns[0].len());
        prop_assert_eq!(table.tabular_view().unwrap().num_rows(), complete);
        prop_assert_eq!(table.rows().count(), complete);
    }
}
