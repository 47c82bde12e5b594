// Domain layer - query model, upstream records and output frames
pub mod error;
pub mod frame;
pub mod nullable;
pub mod query;
pub mod telemetry;
pub mod timestamp;
