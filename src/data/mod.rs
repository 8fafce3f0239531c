/// Data layer: core types, decoding, and the grouping pipeline.
///
/// Architecture:
/// ```text
///  .json / .csv bytes
///        │
///        ▼
///   ┌──────────┐
///   │  parser   │  decode bytes → Vec<Record>
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ pipeline  │  drop blank labels, sort, cut into groups
///   └──────────┘
///        │
///        ▼
///   ┌────────────────┐
///   │ PipelineResult │  Vec<Group>, ascending by key
///   └────────────────┘
/// ```

pub mod model;
pub mod parser;
pub mod pipeline;
