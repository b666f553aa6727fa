//! Audit report formatting.
//!
//! * [`parse_sections`] — split a raw analysis result on `## ` headings.
//! * [`Section`] / [`ReportLine`] — titled fragments and their display lines.
//! * [`render_plain`] — printable plain-text report.

pub mod parser;
pub mod render;

pub use parser::{is_banner_title, parse_sections, ReportLine, Section, SectionKind};
pub use render::render_plain;
