use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SoilError};

// ---------------------------------------------------------------------------
// Plot configuration
// ---------------------------------------------------------------------------

/// Layout of the composite figure. Missing JSON fields take the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    /// Width and height in inches.
    pub figure_size: (f64, f64),
    /// Relative widths of the trace panel and the layer panel.
    pub width_ratios: (f64, f64),
    pub dpi: f64,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            figure_size: (10.0, 12.0),
            width_ratios: (1.0, 0.1),
            dpi: 100.0,
        }
    }
}

impl PlotConfig {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: PlotConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let checks = [
            ("figure width", self.figure_size.0),
            ("figure height", self.figure_size.1),
            ("trace panel width ratio", self.width_ratios.0),
            ("layer panel width ratio", self.width_ratios.1),
            ("dpi", self.dpi),
        ];
        match checks.iter().find(|(_, value)| !(value.is_finite() && *value > 0.0)) {
            Some((name, value)) => Err(SoilError::InvalidConfig(format!(
                "{name} must be a positive number, got {value}"
            ))),
            None => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// Reprojection service configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EpsgIoConfig {
    pub base_url: String,
    pub source_srs: u32,
    pub target_srs: u32,
    pub timeout_secs: u64,
}

impl Default for EpsgIoConfig {
    fn default() -> Self {
        Self {
            base_url: "https://epsg.io".to_string(),
            source_srs: 4326,
            target_srs: 28992,
            timeout_secs: 30,
        }
    }
}

impl EpsgIoConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
