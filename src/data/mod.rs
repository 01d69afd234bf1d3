/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse + coerce every cell → ExamTable (or LoadError)
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ ExamTable │  immutable Vec<ExamRecord>, widget domains
///   └───────────┘
///        │   FilterSpec
///        ▼
///   ┌──────────┐
///   │ pipeline  │  filter → Subset, aggregate → AggregateResult
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ breakdown │  group-by summaries for the secondary charts
///   └───────────┘
/// ```

pub mod aggregate;
pub mod breakdown;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod pipeline;
