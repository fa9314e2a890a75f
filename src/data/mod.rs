/// Data layer: record store, filtering, and the views derived from it.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file, check required columns → RecordStore
///   └──────────┘
///        │
///        ▼
///   ┌─────────────┐
///   │ RecordStore  │  Vec<ObservationRecord>, option lists, date bounds
///   └─────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  FilterSpec predicates → filtered records
///   └──────────┘
///        │
///        ├──► projection  map points, table rows, statistics, record count
///        └──► export      CSV bytes for download
/// ```

pub mod columns;
pub mod error;
pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
pub mod projection;
