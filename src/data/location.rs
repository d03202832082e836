use serde_json::Value as JsonValue;
use ureq::Agent;

use super::loader::read_scalar;
use crate::config::EpsgIoConfig;
use crate::error::{Result, SoilError};
use crate::schema::{location, parse};

// ---------------------------------------------------------------------------
// Location
// ---------------------------------------------------------------------------

/// Where the sounding was taken: a coordinate pair in `srs_name`.
///
/// Every part may be missing from the payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Location {
    srs_name: Option<String>,
    long: Option<f64>,
    lat: Option<f64>,
}

impl Location {
    pub fn new(srs_name: Option<String>, long: Option<f64>, lat: Option<f64>) -> Self {
        Self { srs_name, long, lat }
    }

    /// Build from the `location` block of a `parse/cpt` response.
    pub fn from_api_response(block: &JsonValue) -> Result<Self> {
        Ok(Self {
            srs_name: read_scalar(block, location::SRS)?,
            long: read_scalar(block, location::LONG)?,
            lat: read_scalar(block, location::LAT)?,
        })
    }

    pub fn srs_name(&self) -> Option<&str> {
        self.srs_name.as_deref()
    }

    pub fn long(&self) -> Option<f64> {
        self.long
    }

    pub fn lat(&self) -> Option<f64> {
        self.lat
    }

    /// `(long, lat)`, failing when either is missing.
    pub fn coordinates(&self) -> Result<(f64, f64)> {
        let missing = |key: &str| SoilError::MissingField(format!("{}.{key}", parse::LOCATION));
        let long = self.long.ok_or_else(|| missing(location::LONG))?;
        let lat = self.lat.ok_or_else(|| missing(location::LAT))?;
        Ok((long, lat))
    }

    /// Reproject to EPSG:28992 through epsg.io. Not cached: every call asks
    /// the service again.
    pub fn transform(&self) -> Result<JsonValue> {
        self.transform_with(&EpsgIo::default())
    }

    pub fn transform_with(&self, reprojector: &dyn Reprojector) -> Result<JsonValue> {
        reprojector.reproject(self)
    }
}

// ---------------------------------------------------------------------------
// Reprojection collaborator
// ---------------------------------------------------------------------------

/// A blocking coordinate reprojection service.
pub trait Reprojector {
    fn reproject(&self, location: &Location) -> Result<JsonValue>;
}

/// epsg.io `trans` endpoint client.
pub struct EpsgIo {
    config: EpsgIoConfig,
    agent: Agent,
}

impl Default for EpsgIo {
    fn default() -> Self {
        Self::new(EpsgIoConfig::default())
    }
}

impl EpsgIo {
    pub fn new(config: EpsgIoConfig) -> Self {
        let agent_config = Agent::config_builder()
            .timeout_global(Some(config.timeout()))
            .http_status_as_error(false)
            .build();
        Self {
            config,
            agent: Agent::new_with_config(agent_config),
        }
    }

    pub fn request_url(&self, long: f64, lat: f64) -> String {
        format!(
            "{}/trans?s_srs={}&t_srs={}&x={long}&y={lat}&format=json",
            self.config.base_url.trim_end_matches('/'),
            self.config.source_srs,
            self.config.target_srs,
        )
    }

    /// Parse a success body; otherwise surface the raw body untouched.
    pub(crate) fn interpret(status: u16, body: String) -> Result<JsonValue> {
        if (200..300).contains(&status) {
            Ok(serde_json::from_str(&body)?)
        } else {
            Err(SoilError::ExternalService { status, body })
        }
    }
}

impl Reprojector for EpsgIo {
    fn reproject(&self, location: &Location) -> Result<JsonValue> {
        let (long, lat) = location.coordinates()?;
        let url = self.request_url(long, lat);
        log::info!("Reprojecting ({long}, {lat}) via {url}");

        let mut response = self.agent.get(&url).call()?;
        let status = response.status().as_u16();
        let body = response.body_mut().read_to_string()?;
        Self::interpret(status, body)
    }
}
