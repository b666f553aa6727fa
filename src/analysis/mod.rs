//! Transcript analysis against the hosted Gemini model.
//!
//! This module provides:
//! * [`Analyzer`] — async trait implemented by analysis backends.
//! * [`GeminiAnalyzer`] — `generateContent` REST client.
//! * [`AnalysisError`] — configuration / provider / empty-response failures.
//! * [`prompt`] — the fixed system instruction and sampling constants.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use auditpro::analysis::{Analyzer, GeminiAnalyzer};
//! use auditpro::config::AppConfig;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::default();
//!     let analyzer = GeminiAnalyzer::from_config(&config.analysis);
//!
//!     match analyzer.analyze("Agent: Thanks for calling...").await {
//!         Ok(report) => println!("{report}"),
//!         Err(e) => eprintln!("analysis failed: {e}"),
//!     }
//! }
//! ```

pub mod client;
pub mod prompt;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use client::{AnalysisError, Analyzer, GeminiAnalyzer};
