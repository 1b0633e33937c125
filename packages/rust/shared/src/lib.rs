//! Shared types, error model, and configuration for CourseGen.
//!
//! This crate is the foundation depended on by all other CourseGen crates.
//! It provides:
//! - [`CourseGenError`] — the unified error type
//! - Pipeline artifact types ([`LearningObjectiveSet`], [`CurriculumPlan`], [`WeeklyContent`])
//! - Configuration ([`AppConfig`], config loading, API key lookup)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DefaultsConfig, GeminiConfig, GroqConfig, config_dir, config_file_path,
    expand_home, init_config, load_config, load_config_from, read_api_key,
};
pub use error::{CourseGenError, Result};
pub use types::{
    Approach, AudienceLevel, Complexity, CREDIT_HOURS_RANGE, CurriculumPlan,
    LearningObjectiveSet, MODULE_COUNT, ObjectiveSource, SEMESTER_WEEKS_RANGE, WeeklyContent,
};
