//! Plain-text export of pipeline artifacts.
//!
//! Renders module headers as headings and bodies as paragraphs, using the
//! outline segmentation from [`crate::outline`]. Rich-document conversion
//! is a presentation concern and lives outside this crate.

use coursegen_shared::{CurriculumPlan, WeeklyContent};

use crate::outline;

/// Render a curriculum plan as a plain-text document.
pub fn curriculum_to_text(plan: &CurriculumPlan) -> String {
    let mut out = String::new();

    out.push_str(&format!("Course: {}\n", plan.course_name));
    out.push_str(&format!("Approach: {}\n", plan.approach));
    out.push_str(&format!("Assessments: {}\n", plan.assessments));
    out.push_str(&format!("Duration: {} weeks\n\n", plan.semester_weeks));

    out.push_str("Learning Objectives\n");
    out.push_str("-------------------\n");
    out.push_str(&plan.learning_objectives.as_prompt_text());
    out.push_str("\n\n");

    let parsed = outline::segment_modules(&plan.curriculum_text);
    if parsed.sections.is_empty() {
        // No recognizable headers: emit the plan as one block.
        out.push_str(&plan.curriculum_text);
        out.push('\n');
        return out;
    }

    if !parsed.preamble.trim().is_empty() {
        out.push_str(parsed.preamble.trim());
        out.push_str("\n\n");
    }

    for section in &parsed.sections {
        let heading = format!("Module {}: {}", section.number, section.title);
        out.push_str(&heading);
        out.push('\n');
        out.push_str(&"=".repeat(heading.len()));
        out.push('\n');
        out.push_str(section.body.trim());
        out.push_str("\n\n");
    }

    out
}

/// Render a weekly content artifact as a plain-text document, sections in
/// their fixed facet order.
pub fn weekly_content_to_text(course_name: &str, week: u32, content: &WeeklyContent) -> String {
    let sections = [
        ("Lecture Notes", &content.lecture_notes),
        ("Reading Materials & References", &content.reading_materials),
        ("Exercises & Projects", &content.exercises_projects),
        ("Assessment Questions", &content.assessment_questions),
    ];

    let mut out = format!("{course_name} — Week {week}\n\n");
    for (heading, body) in sections {
        out.push_str(heading);
        out.push('\n');
        out.push_str(&"=".repeat(heading.len()));
        out.push('\n');
        out.push_str(body.trim());
        out.push_str("\n\n");
    }
    out
}
