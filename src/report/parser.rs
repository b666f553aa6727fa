//! Best-effort splitting of an analysis result into titled sections.
//!
//! The model is asked to put `## ` before every heading. Text is split on
//! that marker; anything else about the layout is taken as it comes. The
//! parser never fails: text without markers simply yields no sections.

use crate::analysis::prompt::{COMPLIANCE_BANNER, SNAPSHOT_BANNER};

/// Heading marker the report is split on.
const SECTION_MARKER: &str = "## ";

/// How a section is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    /// Top-level banner; rendered as a section break without a body.
    Banner,
    /// Ordinary titled section.
    Body,
}

/// One `## `-delimited fragment of a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: String,
    /// Lines after the title, re-joined with `\n` and trimmed.
    pub content: String,
    pub kind: SectionKind,
}

/// A display line of section content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportLine<'a> {
    /// A `-` item, with the dash and surrounding whitespace removed.
    Bullet(&'a str),
    /// Any other non-empty line, as written.
    Text(&'a str),
    /// Empty line, kept as vertical spacing.
    Blank,
}

impl Section {
    pub fn is_banner(&self) -> bool {
        self.kind == SectionKind::Banner
    }

    /// Classify the content lines for display.
    ///
    /// ```
    /// use auditpro::report::{parse_sections, ReportLine};
    ///
    /// let sections = parse_sections("## TITLE\nline1\n- item1\n- item2");
    /// assert_eq!(
    ///     sections[0].lines(),
    ///     [
    ///         ReportLine::Text("line1"),
    ///         ReportLine::Bullet("item1"),
    ///         ReportLine::Bullet("item2"),
    ///     ]
    /// );
    /// ```
    pub fn lines(&self) -> Vec<ReportLine<'_>> {
        if self.content.is_empty() {
            return Vec::new();
        }
        self.content
            .split('\n')
            .map(|line| {
                let trimmed = line.trim();
                if let Some(item) = trimmed.strip_prefix('-') {
                    ReportLine::Bullet(item.trim())
                } else if trimmed.is_empty() {
                    ReportLine::Blank
                } else {
                    ReportLine::Text(line.trim_end_matches('\r'))
                }
            })
            .collect()
    }
}

/// Whether `title` names one of the two top-level banners.
pub fn is_banner_title(title: &str) -> bool {
    title.contains(SNAPSHOT_BANNER) || title.contains(COMPLIANCE_BANNER)
}

/// Split a raw analysis result into ordered sections.
///
/// Text before the first marker is not part of any section and is dropped.
pub fn parse_sections(raw: &str) -> Vec<Section> {
    raw.split(SECTION_MARKER)
        .skip(1)
        .filter(|fragment| !fragment.trim().is_empty())
        .map(|fragment| {
            let (first, rest) = fragment.split_once('\n').unwrap_or((fragment, ""));
            let title = first.replace("---", "").trim().to_string();
            let content = rest.trim().to_string();
            let kind = if is_banner_title(&title) {
                SectionKind::Banner
            } else {
                SectionKind::Body
            };
            Section {
                title,
                content,
                kind,
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_section_with_bullets() {
        let sections = parse_sections("## TITLE\nline1\n- item1\n- item2");

        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, "TITLE");
        assert_eq!(sections[0].kind, SectionKind::Body);
        assert_eq!(
            sections[0].lines(),
            [
                ReportLine::Text("line1"),
                ReportLine::Bullet("item1"),
                ReportLine::Bullet("item2"),
            ]
        );
    }

    #[test]
    fn no_markers_no_sections() {
        assert!(parse_sections("Plain prose without any headings.").is_empty());
        assert!(parse_sections("").is_empty());
        assert!(parse_sections("# Only level one").is_empty());
    }

    #[test]
    fn text_before_first_marker_is_dropped() {
        let sections = parse_sections("\n\n## A\nbody");
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, "A");

        let sections = parse_sections("Here is the audit you asked for.\n## A\nbody");
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, "A");
        assert_eq!(sections[0].content, "body");
    }

    #[test]
    fn rule_markers_are_stripped_from_titles() {
        let sections = parse_sections("## --- CUSTOMER PROFILE SNAPSHOT ---\n");
        assert_eq!(sections[0].title, "CUSTOMER PROFILE SNAPSHOT");
    }

    #[test]
    fn every_rule_marker_in_a_title_is_removed() {
        let sections = parse_sections("## ---A---B---\nbody");
        assert_eq!(sections[0].title, "AB");

        // Only the title line is cleaned.
        let sections = parse_sections("## --- S ---\n---\n- item");
        assert_eq!(sections[0].title, "S");
        assert_eq!(sections[0].content, "---\n- item");
    }

    #[test]
    fn banners_are_recognised_by_containment() {
        let raw = "## CUSTOMER PROFILE SNAPSHOT\n---\n\
                   ## SECTION 1: CALL CONTEXT & HISTORY\nBilling dispute.\n\
                   ## THE CALLBACK PLAYBOOK COMPLIANCE AUDIT\n\
                   ## C) COMPLIANCE SUMMARY\nPartial.";
        let kinds: Vec<_> = parse_sections(raw).iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            [
                SectionKind::Banner,
                SectionKind::Body,
                SectionKind::Banner,
                SectionKind::Body
            ]
        );
    }

    #[test]
    fn content_is_trimmed_and_keeps_blank_lines() {
        let sections = parse_sections("## S\n\n  first\n\nsecond  \n\n");
        assert_eq!(sections[0].content, "first\n\nsecond");
        assert_eq!(
            sections[0].lines(),
            [
                ReportLine::Text("first"),
                ReportLine::Blank,
                ReportLine::Text("second"),
            ]
        );
    }

    #[test]
    fn indented_bullets_are_detected() {
        let sections = parse_sections("## S\nintro\n   -   nested item  ");
        assert_eq!(
            sections[0].lines(),
            [ReportLine::Text("intro"), ReportLine::Bullet("nested item")]
        );
    }

    #[test]
    fn empty_title_is_still_a_section() {
        let sections = parse_sections("## \nbody text");
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, "");
        assert_eq!(sections[0].content, "body text");
    }

    #[test]
    fn title_only_section_has_no_lines() {
        let sections = parse_sections("## SECTION 9: TECHNICAL LOGS SUMMARY");
        assert_eq!(sections[0].title, "SECTION 9: TECHNICAL LOGS SUMMARY");
        assert!(sections[0].lines().is_empty());
    }

    #[test]
    fn crlf_line_endings() {
        let sections = parse_sections("## A\r\nline\r\n- item\r\n");
        assert_eq!(sections[0].title, "A");
        assert_eq!(
            sections[0].lines(),
            [ReportLine::Text("line"), ReportLine::Bullet("item")]
        );
    }

    #[test]
    fn marker_inside_a_line_also_splits() {
        let sections = parse_sections("## A\nsee ## B for details");
        let titles: Vec<_> = sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, ["A", "B for details"]);
        assert_eq!(sections[0].content, "see");
    }
}
