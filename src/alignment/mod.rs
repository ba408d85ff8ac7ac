pub mod compaction;
pub mod matrix;
pub mod report;
pub mod sentence;
pub mod vicinity;
