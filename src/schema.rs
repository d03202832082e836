/// Key names of the analysis API payloads.
/// The tabular views reuse them as column names.

// ── Parse response: top level ───────────────────────────────────────────────
pub mod parse {
    pub const DATA: &str = "data";
    pub const LOCATION: &str = "location";
    pub const VERTICAL_POSITION_REFERENCE_POINT: &str = "verticalPositionReferencePoint";
    pub const VERTICAL_POSITION_OFFSET: &str = "verticalPositionOffset";
    pub const PREDRILLED_DEPTH: &str = "predrilledDepth";
    pub const LABEL: &str = "label";
    pub const GROUNDWATER_LEVEL: &str = "groundwaterLevel";
}

// ── Parse response: location block ──────────────────────────────────────────
pub mod location {
    pub const SRS: &str = "srs";
    pub const LONG: &str = "long";
    pub const LAT: &str = "lat";
}

// ── Parse response: data block (CPT traces) ─────────────────────────────────
pub mod cpt {
    pub const PENETRATION_LENGTH: &str = "penetrationLength";
    pub const DEPTH: &str = "depth";
    pub const DEPTH_OFFSET: &str = "depthOffset";
    pub const CONE_RESISTANCE: &str = "coneResistance";
    pub const LOCAL_FRICTION: &str = "localFriction";
    pub const FRICTION_RATIO: &str = "frictionRatio";
    pub const FRICTION_RATIO_COMPUTED: &str = "frictionRatioComputed";
    pub const CORRECTED_PENETRATION_LENGTH: &str = "correctedPenetrationLength";
}

// ── Classify response (layer table) ─────────────────────────────────────────
pub mod layer {
    pub const GEOTECHNICAL_SOIL_NAME: &str = "geotechnicalSoilName";
    pub const LOWER_BOUNDARY: &str = "lowerBoundary";
    pub const UPPER_BOUNDARY: &str = "upperBoundary";
    pub const COLOR: &str = "color";
    pub const MAIN_COMPONENT: &str = "mainComponent";
    pub const COHESION: &str = "cohesion";
    pub const GAMMA_SAT: &str = "gamma_sat";
    pub const GAMMA_UNSAT: &str = "gamma_unsat";
    pub const PHI: &str = "phi";
    pub const UNDRAINED_SHEAR_STRENGTH: &str = "undrainedShearStrength";
}
