//! Module-boundary segmentation of curriculum plan text.
//!
//! Stage 2 requests that plan text mark module boundaries with the literal
//! `**Module N: [Name]**` convention. This module scans for those headers
//! and splits the text into non-overlapping segments, one per header, for
//! display and export. Segmentation is lossless: the preamble plus all
//! segment text concatenates back to the original input.

use std::sync::OnceLock;

use regex::Regex;

/// One module segment recovered from plan text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleSection {
    /// Module number as written in the header.
    pub number: u32,
    /// Header title with the `**` markers stripped.
    pub title: String,
    /// Raw segment text from the header start up to the next header
    /// (or end of input), header line included.
    pub text: String,
    /// Segment text with the header marker removed.
    pub body: String,
}

/// Segmentation result for a full plan body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleOutline {
    /// Text preceding the first module header (often empty).
    pub preamble: String,
    pub sections: Vec<ModuleSection>,
}

impl ModuleOutline {
    /// Rebuild the original input from the segmentation.
    pub fn reconstruct(&self) -> String {
        let mut out = self.preamble.clone();
        for section in &self.sections {
            out.push_str(&section.text);
        }
        out
    }
}

fn header_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\*\*Module\s+(\d+):\s*([^*\n]*?)\s*\*\*").expect("valid regex"))
}

/// Split plan text on `**Module N: ...**` headers.
///
/// N well-formed headers yield exactly N sections; text with no headers
/// yields an outline whose preamble is the entire input.
pub fn segment_modules(text: &str) -> ModuleOutline {
    let matches: Vec<_> = header_regex().find_iter(text).collect();

    if matches.is_empty() {
        return ModuleOutline {
            preamble: text.to_string(),
            sections: Vec::new(),
        };
    }

    let preamble = text[..matches[0].start()].to_string();
    let mut sections = Vec::with_capacity(matches.len());

    for (i, m) in matches.iter().enumerate() {
        let end = matches
            .get(i + 1)
            .map(|next| next.start())
            .unwrap_or(text.len());
        let segment = &text[m.start()..end];

        let caps = header_regex()
            .captures(m.as_str())
            .expect("match re-captures");
        let number = caps[1].parse().unwrap_or(0);
        let title = caps[2].trim().to_string();

        sections.push(ModuleSection {
            number,
            title,
            text: segment.to_string(),
            body: segment[m.len()..].to_string(),
        });
    }

    ModuleOutline { preamble, sections }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAN: &str = "\
Overview line.
**Module 1: Foundations**
Week 1: basics
Week 2: practice
**Module 2: Applications**
Week 3: projects
**Module 3: Systems**
Week 4: integration
**Module 4: Capstone**
Week 5: wrap-up
";

    #[test]
    fn recovers_one_section_per_header() {
        let outline = segment_modules(PLAN);
        assert_eq!(outline.sections.len(), 4);
        assert_eq!(outline.preamble, "Overview line.\n");

        let numbers: Vec<u32> = outline.sections.iter().map(|s| s.number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4]);
        assert_eq!(outline.sections[0].title, "Foundations");
        assert_eq!(outline.sections[3].title, "Capstone");
    }

    #[test]
    fn sections_are_non_overlapping_and_lossless() {
        let outline = segment_modules(PLAN);
        assert_eq!(outline.reconstruct(), PLAN);

        // Bodies exclude headers but lose no week lines.
        assert!(outline.sections[0].body.contains("Week 1: basics"));
        assert!(!outline.sections[0].body.contains("**Module 1"));
        assert!(outline.sections[1].body.contains("Week 3: projects"));
    }

    #[test]
    fn headerless_text_is_all_preamble() {
        let outline = segment_modules("no headers here\njust text\n");
        assert!(outline.sections.is_empty());
        assert_eq!(outline.preamble, "no headers here\njust text\n");
        assert_eq!(outline.reconstruct(), "no headers here\njust text\n");
    }

    #[test]
    fn header_at_start_has_empty_preamble() {
        let text = "**Module 1: Only**\nbody\n";
        let outline = segment_modules(text);
        assert_eq!(outline.preamble, "");
        assert_eq!(outline.sections.len(), 1);
        assert_eq!(outline.sections[0].body, "\nbody\n");
    }

    #[test]
    fn tolerates_flexible_header_spacing() {
        let text = "**Module  2:   Spaced Out  **\nbody";
        let outline = segment_modules(text);
        assert_eq!(outline.sections.len(), 1);
        assert_eq!(outline.sections[0].number, 2);
        assert_eq!(outline.sections[0].title, "Spaced Out");
    }

    #[test]
    fn single_header_consumes_rest_of_text() {
        let outline = segment_modules("intro\n**Module 1: All**\neverything else");
        assert_eq!(outline.sections.len(), 1);
        assert!(outline.sections[0].text.ends_with("everything else"));
    }
}
