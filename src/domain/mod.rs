// Domain layer - Pure data types, no I/O
pub mod dashboard;
pub mod dataset;
