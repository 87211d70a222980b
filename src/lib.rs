//! Quiz scoring and lead capture for the Srećno učenje franchise site.
//!
//! The [`quiz`] module holds the scoring engine, result matching, lead gate, and the
//! session state machine. Collaborators (CMS persistence, analytics, report generation)
//! are consumed through traits so hosts can plug in their own adapters.

pub mod config;
pub mod error;
pub mod quiz;
pub mod telemetry;
