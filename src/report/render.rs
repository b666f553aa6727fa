//! Printable plain-text rendering of a parsed report.
//!
//! Used for headless output and the "Copy report" action.

use std::fmt::Write as _;

use chrono::{DateTime, Local};

use super::parser::{ReportLine, Section};

/// Timestamp layout used in report headers.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Render `sections` under a header naming the transcript.
///
/// Banners become underlined headings, bullets are prefixed with `•`, and
/// blank content lines are preserved.
pub fn render_plain(name: &str, generated_at: DateTime<Local>, sections: &[Section]) -> String {
    let mut out = String::with_capacity(1024);
    // Writing to a String cannot fail.
    let _ = writeln!(out, "{name}");
    let _ = writeln!(
        out,
        "Audit Generation Timestamp: {}",
        generated_at.format(TIMESTAMP_FORMAT)
    );

    for section in sections {
        out.push('\n');
        if section.is_banner() {
            let _ = writeln!(out, "{}", section.title);
            let _ = writeln!(out, "{}", "=".repeat(section.title.chars().count()));
            continue;
        }

        let _ = writeln!(out, "[{}]", section.title);
        for line in section.lines() {
            match line {
                ReportLine::Bullet(item) => {
                    let _ = writeln!(out, "  • {item}");
                }
                ReportLine::Text(text) => {
                    let _ = writeln!(out, "  {text}");
                }
                ReportLine::Blank => out.push('\n'),
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::parse_sections;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 3, 14, 9, 26, 53).unwrap()
    }

    #[test]
    fn header_names_transcript_and_time() {
        let out = render_plain("call.txt", fixed_time(), &[]);
        assert_eq!(
            out,
            "call.txt\nAudit Generation Timestamp: 2026-03-14 09:26:53\n"
        );
    }

    #[test]
    fn renders_banners_sections_and_bullets() {
        let sections = parse_sections(
            "## CUSTOMER PROFILE SNAPSHOT\n---\n\
             ## SECTION 3: KEY PAIN POINTS & FRICTION\n\
             Two outages this week.\n\n- Modem reboots\n- Long hold times",
        );
        let out = render_plain("call.txt", fixed_time(), &sections);

        assert!(out.contains("CUSTOMER PROFILE SNAPSHOT\n=========================\n"));
        assert!(out.contains("[SECTION 3: KEY PAIN POINTS & FRICTION]\n"));
        assert!(out.contains("  Two outages this week.\n\n  • Modem reboots\n  • Long hold times\n"));
        // Banner bodies are not printed.
        assert!(!out.contains("---"));
    }

    #[test]
    fn marker_less_result_renders_header_only() {
        let sections = parse_sections("The model ignored the format.");
        let out = render_plain("x.txt", fixed_time(), &sections);
        assert_eq!(out.lines().count(), 2);
    }
}
