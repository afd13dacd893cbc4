/// Data layer: classification, loading, filtering, statistics.
///
/// Architecture:
/// ```text
///  .xlsx / .csv / .json
///        │
///        ▼
///   ┌──────────┐
///   │ classify  │  filename rules → SLA files + driver files
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → RawTable
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Dataset  │  merge tables, parse Date column
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐      ┌──────────┐
///   │  filter   │ ───▶ │  stats    │  [start, end] window → min/std/max
///   └──────────┘      └──────────┘
/// ```
pub mod classify;
pub mod filter;
pub mod loader;
pub mod model;
pub mod stats;
