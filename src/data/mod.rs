/// Data layer: core types, loading, and querying.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → LaunchDataset
///   └──────────┘
///        │
///        ▼
///   ┌───────────────┐
///   │ LaunchDataset │  Vec<LaunchRecord>, site order, payload bounds
///   └───────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  query    │  (site, payload range) → outcome counts, scatter points
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod query;
