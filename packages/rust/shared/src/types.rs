//! Core domain types for CourseGen pipeline artifacts.
//!
//! The serde shapes here are the on-disk artifact schemas: one pretty-printed
//! JSON object per file, field names fixed for cross-stage compatibility.

use serde::{Deserialize, Serialize};

use crate::error::CourseGenError;

/// Valid credit-hour range for a course (inclusive).
pub const CREDIT_HOURS_RANGE: std::ops::RangeInclusive<u8> = 1..=6;

/// Valid semester length range in weeks (inclusive).
pub const SEMESTER_WEEKS_RANGE: std::ops::RangeInclusive<u32> = 8..=20;

/// Number of modules a curriculum plan is divided into.
pub const MODULE_COUNT: u32 = 4;

// ---------------------------------------------------------------------------
// AudienceLevel
// ---------------------------------------------------------------------------

/// Audience tier for a course, driving objective phrasing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AudienceLevel {
    UndergraduateBasic,
    UndergraduateAdvanced,
    Graduate,
    Professional,
}

impl AudienceLevel {
    /// Bloom's-taxonomy action verbs appropriate for this tier.
    pub fn bloom_verbs(&self) -> [&'static str; 4] {
        match self {
            Self::UndergraduateBasic => ["Describe", "Identify", "Explain", "Apply"],
            Self::UndergraduateAdvanced => ["Analyze", "Compare", "Construct", "Evaluate"],
            Self::Graduate => ["Critically assess", "Integrate", "Design", "Develop"],
            Self::Professional => ["Implement", "Optimize", "Strategize", "Lead"],
        }
    }

    /// Human-readable label used in prompts.
    pub fn label(&self) -> &'static str {
        match self {
            Self::UndergraduateBasic => "Undergraduate (Basic)",
            Self::UndergraduateAdvanced => "Undergraduate (Advanced)",
            Self::Graduate => "Graduate",
            Self::Professional => "Professional",
        }
    }
}

impl std::fmt::Display for AudienceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for AudienceLevel {
    type Err = CourseGenError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "undergraduate-basic" | "undergraduate_basic" => Ok(Self::UndergraduateBasic),
            "undergraduate-advanced" | "undergraduate_advanced" => Ok(Self::UndergraduateAdvanced),
            "graduate" => Ok(Self::Graduate),
            "professional" => Ok(Self::Professional),
            other => Err(CourseGenError::validation(format!(
                "unknown audience level '{other}': expected undergraduate-basic, \
                 undergraduate-advanced, graduate, or professional"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Approach
// ---------------------------------------------------------------------------

/// Pedagogical approach for a curriculum plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Approach {
    #[serde(rename = "Project-based")]
    ProjectBased,
    Theory,
    Blended,
}

impl Approach {
    pub fn label(&self) -> &'static str {
        match self {
            Self::ProjectBased => "Project-based",
            Self::Theory => "Theory",
            Self::Blended => "Blended",
        }
    }
}

impl std::fmt::Display for Approach {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for Approach {
    type Err = CourseGenError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "project-based" | "project_based" | "project" => Ok(Self::ProjectBased),
            "theory" => Ok(Self::Theory),
            "blended" => Ok(Self::Blended),
            other => Err(CourseGenError::validation(format!(
                "unknown approach '{other}': expected project-based, theory, or blended"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Complexity
// ---------------------------------------------------------------------------

/// Learning complexity tier for generated weekly content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Complexity {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl Complexity {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
            Self::Expert => "Expert",
        }
    }
}

impl std::fmt::Display for Complexity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for Complexity {
    type Err = CourseGenError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "beginner" => Ok(Self::Beginner),
            "intermediate" => Ok(Self::Intermediate),
            "advanced" => Ok(Self::Advanced),
            "expert" => Ok(Self::Expert),
            other => Err(CourseGenError::validation(format!(
                "unknown complexity '{other}': expected beginner, intermediate, advanced, or expert"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Stage 1 artifact: learning objectives
// ---------------------------------------------------------------------------

/// The `<topic>_learning_objectives.json` artifact produced by Stage 1.
/// Immutable once written; consumed by Stage 2.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningObjectiveSet {
    /// Course topic as supplied by the user.
    pub topic: String,
    /// Ordered list of generated objective lines.
    pub objectives: Vec<String>,
}

// ---------------------------------------------------------------------------
// Stage 2 artifact: curriculum plan
// ---------------------------------------------------------------------------

/// Source objectives recorded in a curriculum artifact.
///
/// Stage 2 accepts either a Stage-1 objective list or raw pasted outcome
/// text, so both shapes are valid in persisted artifacts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ObjectiveSource {
    List(Vec<String>),
    Raw(String),
}

impl ObjectiveSource {
    /// Render the objectives as prompt-ready text, one per line.
    pub fn as_prompt_text(&self) -> String {
        match self {
            Self::List(items) => items.join("\n"),
            Self::Raw(text) => text.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::List(items) => items.is_empty(),
            Self::Raw(text) => text.trim().is_empty(),
        }
    }
}

/// The `<course>_curriculum.json` artifact produced by Stage 2.
///
/// `curriculum_text` is free-form plan text; module boundaries are located
/// by scanning for the literal `**Module N: ...**` header convention.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurriculumPlan {
    pub course_name: String,
    pub approach: Approach,
    /// Assessment preferences joined into a single display string.
    pub assessments: String,
    pub semester_weeks: u32,
    pub learning_objectives: ObjectiveSource,
    pub curriculum_text: String,
}

// ---------------------------------------------------------------------------
// Stage 3 artifact: weekly content
// ---------------------------------------------------------------------------

/// The `<course>_Week_<n>_content.json` artifact produced by Stage 3.
/// Terminal artifact; not consumed by further stages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyContent {
    pub lecture_notes: String,
    pub reading_materials: String,
    pub exercises_projects: String,
    pub assessment_questions: String,
}
