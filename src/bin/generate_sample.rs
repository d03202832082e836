use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde_json::{json, Value as JsonValue};

/// Synthetic stratigraphy: name, main component, color, bottom depth,
/// mean qc (MPa) and mean Rf (%).
const STRATA: [(&str, &str, &str, f64, f64, f64); 5] = [
    ("Klei, zandig", "clay", "#007f00", 2.4, 0.8, 3.5),
    ("Veen", "peat", "#7f3f00", 4.1, 0.3, 7.0),
    ("Klei, siltig", "clay", "#00a000", 6.0, 1.0, 4.0),
    ("Zand, siltig", "sand", "#c8c800", 9.5, 8.0, 0.9),
    ("Zand", "sand", "#e5e500", 14.0, 18.0, 0.5),
];

const STEP: f64 = 0.02;

/// Seeded SplitMix64 stream, enough for reproducible sample noise.
struct Noise(u64);

impl Noise {
    fn next_f64(&mut self) -> f64 {
        self.0 = self.0.wrapping_add(0x9e37_79b9_7f4a_7c15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^= z >> 31;
        (z >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Normal sample by the Box-Muller transform.
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let radius = (-2.0 * self.next_f64().max(f64::MIN_POSITIVE).ln()).sqrt();
        let angle = std::f64::consts::TAU * self.next_f64();
        mean + std_dev * radius * angle.cos()
    }
}

fn stratum_at(depth: f64) -> (f64, f64) {
    STRATA
        .iter()
        .find(|(.., bottom, _, _)| depth <= *bottom)
        .or(STRATA.last())
        .map(|&(.., qc, rf)| (qc, rf))
        .unwrap_or((1.0, 1.0))
}

fn round(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

fn parse_response(rng: &mut Noise) -> JsonValue {
    let offset = 0.8;
    let predrilled = 0.5;
    let bottom = STRATA[STRATA.len() - 1].3;
    let samples = ((bottom - predrilled) / STEP).round() as usize;

    let mut penetration_length = Vec::with_capacity(samples);
    let mut depth_offset = Vec::with_capacity(samples);
    let mut cone_resistance = Vec::with_capacity(samples);
    let mut local_friction = Vec::with_capacity(samples);
    let mut friction_ratio = Vec::with_capacity(samples);

    for i in 0..samples {
        let depth = predrilled + i as f64 * STEP;
        let (qc_mean, rf_mean) = stratum_at(depth);
        let qc = rng.gauss(qc_mean, qc_mean * 0.08).max(0.05);
        let rf = rng.gauss(rf_mean, rf_mean * 0.1).max(0.1);

        penetration_length.push(round(depth, 3));
        depth_offset.push(round(offset - depth, 3));
        cone_resistance.push(round(qc, 3));
        local_friction.push(round(qc * rf / 100.0, 4));
        friction_ratio.push(round(rf, 2));
    }

    // A short dropout, as a real sounding would have.
    if samples > 120 {
        for column in [&mut local_friction, &mut friction_ratio] {
            for cell in &mut column[100..104] {
                *cell = f64::NAN;
            }
        }
    }
    let as_json = |values: Vec<f64>| -> JsonValue {
        values
            .into_iter()
            .map(|v| if v.is_finite() { json!(v) } else { JsonValue::Null })
            .collect()
    };

    json!({
        "label": "CPT-SAMPLE-01",
        "verticalPositionReferencePoint": "NAP",
        "verticalPositionOffset": offset,
        "predrilledDepth": predrilled,
        "groundwaterLevel": 1.2,
        "location": { "srs": "EPSG:4326", "long": 4.8952, "lat": 52.3702 },
        "data": {
            "penetrationLength": as_json(penetration_length),
            "depthOffset": as_json(depth_offset),
            "coneResistance": as_json(cone_resistance),
            "localFriction": as_json(local_friction),
            "frictionRatio": as_json(friction_ratio)
        }
    })
}

fn classify_response(rng: &mut Noise) -> JsonValue {
    let mut upper = 0.5;
    let mut names = Vec::new();
    let mut uppers = Vec::new();
    let mut lowers = Vec::new();
    let mut colors = Vec::new();
    let mut components = Vec::new();
    let mut cohesion = Vec::new();
    let mut gamma_sat = Vec::new();
    let mut gamma_unsat = Vec::new();
    let mut phi = Vec::new();
    let mut su = Vec::new();

    for &(name, component, color, bottom, qc, _) in &STRATA {
        let sandy = component == "sand";
        names.push(name);
        uppers.push(round(upper, 2));
        lowers.push(bottom);
        colors.push(color);
        components.push(component);
        cohesion.push(if sandy { 0.0 } else { round(rng.gauss(5.0, 1.0).max(0.0), 1) });
        gamma_unsat.push(if sandy { 18.0 } else { 14.0 + round(rng.next_f64() * 2.0, 1) });
        gamma_sat.push(if sandy { 20.0 } else { 15.0 + round(rng.next_f64() * 2.0, 1) });
        phi.push(if sandy { 30.0 + round(rng.next_f64() * 5.0, 1) } else { 22.5 });
        su.push(if sandy { 0.0 } else { round(qc * 1000.0 / 15.0, 1) });
        upper = bottom;
    }

    json!({
        "geotechnicalSoilName": names,
        "upperBoundary": uppers,
        "lowerBoundary": lowers,
        "color": colors,
        "mainComponent": components,
        "cohesion": cohesion,
        "gamma_sat": gamma_sat,
        "gamma_unsat": gamma_unsat,
        "phi": phi,
        "undrainedShearStrength": su
    })
}

fn main() -> Result<()> {
    env_logger::init();

    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    fs::create_dir_all(&out_dir).with_context(|| format!("creating {}", out_dir.display()))?;

    let mut rng = Noise(42);
    let parse = parse_response(&mut rng);
    let classify = classify_response(&mut rng);

    let files = [("response_parse.json", &parse), ("response_classify.json", &classify)];
    for (name, value) in files {
        let path = out_dir.join(name);
        fs::write(&path, serde_json::to_string_pretty(value)?)
            .with_context(|| format!("writing {}", path.display()))?;
        println!("Wrote {}", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noise_is_seeded_and_unit_bounded() {
        let (mut a, mut b) = (Noise(7), Noise(7));
        for _ in 0..1000 {
            let value = a.next_f64();
            assert_eq!(value, b.next_f64());
            assert!((0.0..1.0).contains(&value));
        }
    }

    #[test]
    fn sample_columns_line_up() {
        let parse = parse_response(&mut Noise(42));
        let data = parse["data"].as_object().unwrap();
        let lengths: Vec<usize> = data.values().map(|v| v.as_array().unwrap().len()).collect();
        assert!(lengths.windows(2).all(|pair| pair[0] == pair[1]));
        assert!(data["frictionRatio"][100].is_null());
        assert!(data["coneResistance"][100].is_number());
    }
}
