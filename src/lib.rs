//! AuditPro: call-center transcript audits backed by a hosted Gemini model.
//!
//! * [`queue`] — transcript entries, lifecycle, single and batch processing.
//! * [`analysis`] — the single outbound analysis call and its error taxonomy.
//! * [`report`] — splitting results into sections and plain-text rendering.
//! * [`config`] — TOML settings.
//! * [`app`] — egui front end.

pub mod analysis;
pub mod app;
pub mod config;
pub mod queue;
pub mod report;
