//! End-to-end course pipeline: topic → objectives → curriculum → weekly content.
//!
//! Stages run strictly forward, each consuming the previous stage's
//! persisted artifact. Every stage is also independently invocable through
//! the functions in [`crate::stages`], so a run can resume from any
//! persisted artifact without repeating earlier stages.

use std::path::PathBuf;
use std::time::Instant;

use tracing::{info, instrument};

use coursegen_providers::ProviderSet;
use coursegen_shared::{Approach, AudienceLevel, Complexity, Result, WeeklyContent};
use coursegen_store::ArtifactStore;

use crate::stages::{
    self, ContentRequest, CurriculumRequest, CurriculumSource, FacetPolicy, ObjectivesRequest,
};

/// Configuration for one full pipeline run.
#[derive(Debug, Clone)]
pub struct CoursePipelineConfig {
    pub topic: String,
    pub level: AudienceLevel,
    pub credit_hours: u8,
    pub semester_weeks: u32,
    pub approach: Approach,
    pub assessment_preferences: Vec<String>,
    /// Target week for the content stage (one week per invocation).
    pub week: u32,
    pub complexity: Complexity,
    pub media_preferences: Vec<String>,
}

/// Result of one full pipeline run.
#[derive(Debug)]
pub struct CoursePipelineResult {
    pub objectives_path: PathBuf,
    pub curriculum_path: PathBuf,
    pub content_path: PathBuf,
    pub objective_count: usize,
    pub content: WeeklyContent,
    pub elapsed: std::time::Duration,
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called when the pipeline completes.
    fn done(&self, result: &CoursePipelineResult);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn done(&self, _result: &CoursePipelineResult) {}
}

/// Run the full pipeline for one course request.
///
/// 1. Generate learning objectives
/// 2. Generate the curriculum plan from those objectives
/// 3. Generate the four content facets for the requested week
#[instrument(skip_all, fields(topic = %config.topic, week = config.week))]
pub async fn run_course_pipeline(
    config: &CoursePipelineConfig,
    providers: &ProviderSet,
    store: &ArtifactStore,
    policy: &FacetPolicy,
    progress: &dyn ProgressReporter,
) -> Result<CoursePipelineResult> {
    let start = Instant::now();

    info!(topic = %config.topic, "starting course pipeline");

    // --- Stage 1: objectives ---
    progress.phase("Generating learning objectives");
    let (objectives, objectives_path) = stages::generate_objectives(
        providers,
        store,
        &ObjectivesRequest {
            topic: config.topic.clone(),
            level: config.level,
            credit_hours: config.credit_hours,
        },
    )
    .await?;

    // --- Stage 2: curriculum ---
    progress.phase("Structuring curriculum plan");
    let (_plan, curriculum_path) = stages::generate_curriculum(
        providers,
        store,
        &CurriculumRequest {
            source: CurriculumSource::Objectives {
                topic: config.topic.clone(),
                list: objectives.clone(),
            },
            semester_weeks: config.semester_weeks,
            approach: config.approach,
            assessment_preferences: config.assessment_preferences.clone(),
        },
    )
    .await?;

    // --- Stage 3: weekly content ---
    progress.phase(&format!("Generating content for week {}", config.week));
    let (content, content_path) = stages::generate_weekly_content(
        providers,
        store,
        policy,
        &ContentRequest {
            curriculum_path: curriculum_path.clone(),
            week: config.week,
            complexity: config.complexity,
            media_preferences: config.media_preferences.clone(),
        },
    )
    .await?;

    let result = CoursePipelineResult {
        objectives_path,
        curriculum_path,
        content_path,
        objective_count: objectives.len(),
        content,
        elapsed: start.elapsed(),
    };

    progress.done(&result);

    info!(
        objectives = result.objective_count,
        content_path = %result.content_path.display(),
        elapsed_ms = result.elapsed.as_millis(),
        "course pipeline complete"
    );

    Ok(result)
}
