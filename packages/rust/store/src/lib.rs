//! JSON artifact store for pipeline stage outputs.
//!
//! Each stage persists one pretty-printed JSON artifact under a deterministic,
//! human-readable name derived from the course/topic with whitespace
//! normalized to underscores:
//!
//! ```text
//! <root>/
//! ├── objectives/<Topic>_learning_objectives.json
//! ├── curriculums/<Course>_curriculum.json
//! └── content/<Course>_Week_<n>_content.json
//! ```
//!
//! Naming is collision-prone by design: two runs with the same normalized
//! name overwrite each other, last write wins. Writes are atomic
//! (temp file + rename) so a reader never observes a half-written artifact.
//! Loads are strict; a malformed artifact is a validation error, never a
//! silently defaulted value.

use std::path::{Path, PathBuf};

use tracing::debug;

use coursegen_shared::{
    CourseGenError, CurriculumPlan, LearningObjectiveSet, Result, WeeklyContent,
};

const OBJECTIVES_DIR: &str = "objectives";
const CURRICULUMS_DIR: &str = "curriculums";
const CONTENT_DIR: &str = "content";

/// Filesystem-backed store for stage artifacts.
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    /// Open a store rooted at `root`, creating the directory layout if needed.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        for sub in [OBJECTIVES_DIR, CURRICULUMS_DIR, CONTENT_DIR] {
            let dir = root.join(sub);
            std::fs::create_dir_all(&dir).map_err(|e| CourseGenError::io(&dir, e))?;
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    // -- paths --------------------------------------------------------------

    pub fn objectives_path(&self, topic: &str) -> PathBuf {
        self.root
            .join(OBJECTIVES_DIR)
            .join(format!("{}_learning_objectives.json", normalize_name(topic)))
    }

    pub fn curriculum_path(&self, course_name: &str) -> PathBuf {
        self.root
            .join(CURRICULUMS_DIR)
            .join(format!("{}_curriculum.json", normalize_name(course_name)))
    }

    pub fn content_path(&self, course_name: &str, week: u32) -> PathBuf {
        self.root.join(CONTENT_DIR).join(format!(
            "{}_Week_{week}_content.json",
            normalize_name(course_name)
        ))
    }

    // -- save ---------------------------------------------------------------

    /// Persist a Stage-1 objectives artifact. Returns the written path.
    pub fn save_objectives(&self, set: &LearningObjectiveSet) -> Result<PathBuf> {
        let path = self.objectives_path(&set.topic);
        write_json(&path, set)?;
        Ok(path)
    }

    /// Persist a Stage-2 curriculum artifact. Returns the written path.
    pub fn save_curriculum(&self, plan: &CurriculumPlan) -> Result<PathBuf> {
        let path = self.curriculum_path(&plan.course_name);
        write_json(&path, plan)?;
        Ok(path)
    }

    /// Persist a Stage-3 weekly content artifact. Returns the written path.
    pub fn save_content(
        &self,
        course_name: &str,
        week: u32,
        content: &WeeklyContent,
    ) -> Result<PathBuf> {
        let path = self.content_path(course_name, week);
        write_json(&path, content)?;
        Ok(path)
    }

    // -- load ---------------------------------------------------------------

    pub fn load_objectives(&self, path: &Path) -> Result<LearningObjectiveSet> {
        read_json(path, "objectives artifact")
    }

    pub fn load_curriculum(&self, path: &Path) -> Result<CurriculumPlan> {
        read_json(path, "curriculum artifact")
    }

    pub fn load_content(&self, path: &Path) -> Result<WeeklyContent> {
        read_json(path, "content artifact")
    }
}

/// Collapse all whitespace runs in a name to single underscores.
fn normalize_name(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join("_")
}

/// Write a JSON artifact atomically (temp file in the target dir, then rename).
fn write_json<T: serde::Serialize>(path: &Path, data: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(data)
        .map_err(|e| CourseGenError::Storage(format!("JSON serialization failed: {e}")))?;

    let file_name = path
        .file_name()
        .ok_or_else(|| CourseGenError::Storage(format!("invalid artifact path: {path:?}")))?
        .to_string_lossy();
    let temp = path.with_file_name(format!(".{file_name}.tmp"));

    std::fs::write(&temp, json).map_err(|e| CourseGenError::io(&temp, e))?;
    std::fs::rename(&temp, path).map_err(|e| CourseGenError::io(path, e))?;

    debug!(path = %path.display(), "wrote artifact");
    Ok(())
}

/// Read and strictly deserialize a JSON artifact.
fn read_json<T: serde::de::DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let content = std::fs::read_to_string(path).map_err(|e| CourseGenError::io(path, e))?;
    serde_json::from_str(&content).map_err(|e| {
        CourseGenError::validation(format!("malformed {what} at {}: {e}", path.display()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use coursegen_shared::{Approach, ObjectiveSource};

    fn temp_store() -> (PathBuf, ArtifactStore) {
        let dir = std::env::temp_dir().join(format!("coursegen-store-test-{}", uuid::Uuid::now_v7()));
        let store = ArtifactStore::open(&dir).unwrap();
        (dir, store)
    }

    fn sample_plan() -> CurriculumPlan {
        CurriculumPlan {
            course_name: "Data Engineering".into(),
            approach: Approach::ProjectBased,
            assessments: "Quizzes, Projects".into(),
            semester_weeks: 15,
            learning_objectives: ObjectiveSource::List(vec!["1. Design pipelines.".into()]),
            curriculum_text: "**Module 1: Foundations**\nWeek 1: ...".into(),
        }
    }

    #[test]
    fn normalize_collapses_whitespace() {
        assert_eq!(normalize_name("Web   Development"), "Web_Development");
        assert_eq!(normalize_name("  Databases "), "Databases");
        assert_eq!(normalize_name("Intro to\tRust"), "Intro_to_Rust");
    }

    #[test]
    fn objectives_path_matches_convention() {
        let (dir, store) = temp_store();
        let path = store.objectives_path("Databases");
        assert!(
            path.to_string_lossy()
                .ends_with("Databases_learning_objectives.json")
        );
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn objectives_roundtrip() {
        let (dir, store) = temp_store();
        let set = LearningObjectiveSet {
            topic: "Web Development".into(),
            objectives: vec!["1. Describe HTTP.".into()],
        };

        let path = store.save_objectives(&set).unwrap();
        assert!(path.exists());

        let loaded = store.load_objectives(&path).unwrap();
        assert_eq!(loaded.topic, "Web Development");
        assert_eq!(loaded.objectives, set.objectives);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn curriculum_roundtrip_and_overwrite() {
        let (dir, store) = temp_store();
        let mut plan = sample_plan();

        let path1 = store.save_curriculum(&plan).unwrap();

        // Same normalized name: second save overwrites, last write wins.
        plan.curriculum_text = "**Module 1: Revised**".into();
        let path2 = store.save_curriculum(&plan).unwrap();
        assert_eq!(path1, path2);

        let loaded = store.load_curriculum(&path2).unwrap();
        assert_eq!(loaded.curriculum_text, "**Module 1: Revised**");

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn content_path_embeds_week() {
        let (dir, store) = temp_store();
        let path = store.content_path("Data Engineering", 3);
        assert!(
            path.to_string_lossy()
                .ends_with("Data_Engineering_Week_3_content.json")
        );
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn malformed_artifact_is_validation_error() {
        let (dir, store) = temp_store();
        let path = store.curriculum_path("Broken");
        std::fs::write(&path, r#"{ "course_name": "Broken" }"#).unwrap();

        let err = store.load_curriculum(&path).unwrap_err();
        assert!(matches!(err, CourseGenError::Validation { .. }));
        assert!(err.to_string().contains("malformed curriculum artifact"));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn write_leaves_no_temp_files() {
        let (dir, store) = temp_store();
        let set = LearningObjectiveSet {
            topic: "Tidy".into(),
            objectives: vec!["1. Clean up.".into()],
        };
        let path = store.save_objectives(&set).unwrap();

        for entry in std::fs::read_dir(path.parent().unwrap()).unwrap() {
            let name = entry.unwrap().file_name().to_string_lossy().to_string();
            assert!(!name.starts_with('.'), "temp file left behind: {name}");
        }

        let _ = std::fs::remove_dir_all(&dir);
    }
}
