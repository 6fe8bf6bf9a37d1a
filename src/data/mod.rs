/// Data layer: core types, loading, and row cleaning.
///
/// Architecture:
/// ```text
///  .xlsx / .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  read sheet → Vec<RawRow>
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  drop blank / zero rows, remove duplicates → Vec<Reading>
///   └──────────┘
///        │
///        ▼
///   analysis (parse → deltas → classify) → report
/// ```

pub mod filter;
pub mod loader;
pub mod model;
