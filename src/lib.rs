//! Validated CPT traces and soil-layer tables from the geotechnical analysis
//! API, with depth-aligned plots.

pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod figure;
pub mod schema;

pub use config::{EpsgIoConfig, PlotConfig};
pub use data::cpt::CptTable;
pub use data::layer::{LayerRow, LayerTable};
pub use data::location::{EpsgIo, Location, Reprojector};
pub use data::model::MainComponent;
pub use data::soil::{classify_request_body, SoilProperties};
pub use error::{Result, SoilError};
pub use figure::Figure;
