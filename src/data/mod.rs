/// Data layer: validated tables, the soil-properties aggregate, and the
/// reprojection collaborator.
///
/// Architecture:
/// ```text
///  parse/cpt response        classify/cpt response
///        │                          │
///        ▼                          ▼
///   ┌──────────┐             ┌──────────┐
///   │  loader   │  JSON keys → aligned columns, length check
///   └──────────┘             └──────────┘
///        │                          │
///        ▼                          ▼
///   ┌──────────┐             ┌────────────┐
///   │ CptTable  │             │ LayerTable  │
///   └──────────┘             └────────────┘
///        │        ┌──────────┐      │
///        └───────▶│  filter   │◀────┘  joint drop of incomplete rows
///                 └──────────┘
///                      │
///                      ▼
///              ┌────────────────┐
///              │ SoilProperties  │  + Location, offset, levels → Figure
///              └────────────────┘
/// ```

pub mod cpt;
pub(crate) mod filter;
pub mod layer;
pub mod location;
pub(crate) mod loader;
pub mod model;
pub mod soil;
