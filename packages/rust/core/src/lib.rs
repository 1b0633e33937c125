//! Core pipeline logic for CourseGen: prompt composition, stage execution,
//! module-outline parsing, plain-text export, and the end-to-end coordinator.

pub mod export;
pub mod outline;
pub mod pipeline;
pub mod prompt;
pub mod stages;
