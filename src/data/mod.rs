/// Data layer: core types and the load → clean → select → export pipeline.
///
/// Architecture:
/// ```text
///  .csv / .xlsx bytes
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse bytes → Table
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Table    │  named, equal-length, typed columns
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ transform  │  fill holes → select columns → preview / chart subset
///   └───────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  writer   │  encode Table → output bytes, derive output name
///   └──────────┘
/// ```
pub mod error;
pub mod loader;
pub mod model;
pub mod transform;
pub mod writer;
