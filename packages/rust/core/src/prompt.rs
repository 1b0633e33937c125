//! Prompt composer: deterministic rendering of generation instructions.
//!
//! Every function here is pure — structured inputs in, one instruction
//! string out. No backend calls, no I/O. Formatting requirements (numbered
//! lists, the `**Module N: ...**` header convention) are requested in the
//! instruction text; they are not enforced on the output.

use coursegen_shared::{Approach, AudienceLevel, Complexity, MODULE_COUNT};

// ---------------------------------------------------------------------------
// Facet
// ---------------------------------------------------------------------------

/// One of the four independent content pieces generated in Stage 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Facet {
    LectureNotes,
    ReadingMaterials,
    ExercisesProjects,
    AssessmentQuestions,
}

impl Facet {
    /// All facets in their fixed generation/assembly order.
    pub const ALL: [Facet; 4] = [
        Facet::LectureNotes,
        Facet::ReadingMaterials,
        Facet::ExercisesProjects,
        Facet::AssessmentQuestions,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LectureNotes => "lecture_notes",
            Self::ReadingMaterials => "reading_materials",
            Self::ExercisesProjects => "exercises_projects",
            Self::AssessmentQuestions => "assessment_questions",
        }
    }
}

impl std::fmt::Display for Facet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Stage 1: learning objectives
// ---------------------------------------------------------------------------

/// Instruction for Stage 1: exactly 5 measurable objectives as a plain
/// numbered list, phrased with Bloom verbs for the audience tier.
pub fn objectives_prompt(topic: &str, level: AudienceLevel, credit_hours: u8) -> String {
    let verbs = level.bloom_verbs().join(", ");
    format!(
        "You are an academic course designer.\n\
         \n\
         Generate 5 measurable learning objectives for a course titled '{topic}'.\n\
         Audience: {level} students.\n\
         Course Duration: {credit_hours} credit hours.\n\
         \n\
         Phrase each objective with Bloom's Taxonomy verbs suitable for this \
         audience, such as: {verbs}.\n\
         Focus on both technical and practical skills that are highly relevant \
         in today's job market.\n\
         \n\
         Return only the numbered list of objectives, with no extra commentary."
    )
}

// ---------------------------------------------------------------------------
// Stage 2: curriculum plan
// ---------------------------------------------------------------------------

/// Instruction for Stage 2: a week-by-week plan divided into exactly four
/// modules, headers in the literal `**Module N: [Name]**` convention so
/// downstream segmentation can locate module boundaries.
pub fn curriculum_prompt(
    objectives_text: &str,
    semester_weeks: u32,
    approach: Approach,
    assessments: &str,
) -> String {
    format!(
        "You are an expert academic course designer.\n\
         \n\
         Generate a {semester_weeks}-week university curriculum based on the \
         following learning objectives:\n\
         \n\
         {objectives_text}\n\
         \n\
         Course Parameters:\n\
         - Pedagogical Approach: {approach}\n\
         - Assessment Preferences: {assessments}\n\
         - Duration: {semester_weeks} weeks\n\
         \n\
         Requirements:\n\
         1. Divide the course into exactly {MODULE_COUNT} modules.\n\
         2. Each module must indicate the weeks it covers (e.g., \"Weeks 1-4\").\n\
         3. For each week, provide:\n\
            - Topics\n\
            - Activities\n\
            - Assessment (if applicable)\n\
         4. Use numbered list format for weeks.\n\
         5. Clearly mark module headers as: **Module 1: [Module Name]**, \
         **Module 2: [Module Name]**, etc.\n\
         6. Output plain text only. Do not add introductory phrases or apologies."
    )
}

// ---------------------------------------------------------------------------
// Stage 3: weekly content facets
// ---------------------------------------------------------------------------

/// Structured inputs shared by all four facet instructions.
#[derive(Debug, Clone)]
pub struct FacetContext<'a> {
    pub course_name: &'a str,
    /// Full Stage-2 plan text. Restated in every facet instruction; scope is
    /// restricted to the target week only by instruction, not by parsing.
    pub curriculum_text: &'a str,
    pub week: u32,
    pub complexity: Complexity,
    pub media_preferences: &'a [String],
}

impl FacetContext<'_> {
    fn base(&self) -> String {
        format!(
            "You are an expert instructional designer creating content for a \
             university course.\n\
             Course: {}\n\
             Overall Curriculum:\n{}\n\
             Learning Complexity: {}\n\
             \n\
             Your task is to generate content *only* for the topics and \
             activities listed for **Week {}** in the curriculum.",
            self.course_name, self.curriculum_text, self.complexity, self.week
        )
    }
}

/// Instruction for one content facet.
pub fn facet_prompt(facet: Facet, ctx: &FacetContext<'_>) -> String {
    let base = ctx.base();
    let week = ctx.week;

    match facet {
        Facet::LectureNotes => format!(
            "{base}\n\n\
             Generate detailed lecture notes for **Week {week}**. The notes \
             should be clear, comprehensive, and include practical examples and \
             explanations suitable for the specified complexity level."
        ),
        Facet::ReadingMaterials => {
            let media = ctx.media_preferences.join(", ");
            format!(
                "{base}\n\n\
                 Provide a list of 5-7 key resources that are highly relevant to \
                 the topics of **Week {week}**. Based on the user's preferences, \
                 include a mix of the following types: **{media}**. Provide links \
                 where applicable."
            )
        }
        Facet::ExercisesProjects => format!(
            "{base}\n\n\
             Design two practical exercises and one project idea that directly \
             correspond to the learning objectives and activities planned for \
             **Week {week}**."
        ),
        Facet::AssessmentQuestions => format!(
            "{base}\n\n\
             Develop a set of 10 MCQs and 10 Short Questions that specifically \
             test the knowledge and skills covered in **Week {week}**. After \
             writing the questions, provide a concise answer key. The order \
             should be: MCQs first, followed by Short Questions, then MCQ \
             answers, and then Short Question answers."
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn objectives_prompt_is_deterministic() {
        let a = objectives_prompt("Databases", AudienceLevel::Graduate, 3);
        let b = objectives_prompt("Databases", AudienceLevel::Graduate, 3);
        assert_eq!(a, b);
    }

    #[test]
    fn objectives_prompt_mentions_tier_verbs() {
        let prompt = objectives_prompt("Databases", AudienceLevel::Graduate, 3);
        assert!(prompt.contains("'Databases'"));
        assert!(prompt.contains("Graduate students"));
        assert!(prompt.contains("3 credit hours"));
        assert!(prompt.contains("Critically assess"));
        assert!(prompt.contains("numbered list"));
    }

    #[test]
    fn curriculum_prompt_requests_header_convention() {
        let prompt = curriculum_prompt("1. Do a thing.", 15, Approach::Blended, "Quizzes");
        assert!(prompt.contains("15-week"));
        assert!(prompt.contains("exactly 4 modules"));
        assert!(prompt.contains("**Module 1: [Module Name]**"));
        assert!(prompt.contains("Blended"));
        assert!(prompt.contains("Quizzes"));
    }

    #[test]
    fn facet_prompts_restate_curriculum_and_restrict_week() {
        let media = vec!["Text".to_string(), "Videos".to_string()];
        let ctx = FacetContext {
            course_name: "Databases",
            curriculum_text: "**Module 1: Intro**\nWeek 1: relational model",
            week: 4,
            complexity: Complexity::Advanced,
            media_preferences: &media,
        };

        for facet in Facet::ALL {
            let prompt = facet_prompt(facet, &ctx);
            assert!(prompt.contains("Course: Databases"));
            assert!(prompt.contains("relational model"), "{facet}");
            assert!(prompt.contains("**Week 4**"), "{facet}");
            assert!(prompt.contains("Advanced"));
        }
    }

    #[test]
    fn reading_materials_prompt_lists_media_preferences() {
        let media = vec!["Books".to_string(), "Interactive simulations".to_string()];
        let ctx = FacetContext {
            course_name: "C",
            curriculum_text: "plan",
            week: 1,
            complexity: Complexity::Beginner,
            media_preferences: &media,
        };
        let prompt = facet_prompt(Facet::ReadingMaterials, &ctx);
        assert!(prompt.contains("**Books, Interactive simulations**"));
    }

    #[test]
    fn assessment_prompt_fixes_section_order() {
        let ctx = FacetContext {
            course_name: "C",
            curriculum_text: "plan",
            week: 2,
            complexity: Complexity::Expert,
            media_preferences: &[],
        };
        let prompt = facet_prompt(Facet::AssessmentQuestions, &ctx);
        assert!(prompt.contains("10 MCQs and 10 Short Questions"));
        // Answer-key section order is fixed: MCQ answers before short answers.
        let mcq_answers = prompt.find("MCQ answers").unwrap();
        let short_answers = prompt.find("Short Question answers").unwrap();
        assert!(mcq_answers < short_answers);
    }

    #[test]
    fn facet_names_match_artifact_fields() {
        assert_eq!(Facet::LectureNotes.as_str(), "lecture_notes");
        assert_eq!(Facet::AssessmentQuestions.as_str(), "assessment_questions");
    }
}
