pub mod allocator;

pub use allocator::{
    AllocationError, StrokeIndexTable, StrokeRow, allocate, allocate_multi_tee,
    allocate_with_baseline, stroke_index_table, total_strokes,
};
