/// Data layer: core types, loading, caching and filtering.
///
/// Architecture:
/// ```text
///  vehicles.csv / .tsv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse → normalise headers → drop rows → coerce numbers
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  cache    │  one Arc<Dataset> per path, per session
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  FilterSpec → working subset, selection, distributions
///   └──────────┘
/// ```

pub mod cache;
pub mod filter;
pub mod loader;
pub mod model;
