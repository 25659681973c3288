/// Data layer: core types, loading, transforms, and windowing.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → OutbreakDataset
///   └──────────┘
///        │
///        ▼
///   ┌────────────────┐
///   │ OutbreakDataset │  one CaseSeries per measure
///   └────────────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ transform  │  aggregate per frequency mode
///   └───────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  window   │  resolve slider offsets → clip to date range
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │   view    │  derived records for the chart / map / table
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod transform;
pub mod view;
pub mod window;
