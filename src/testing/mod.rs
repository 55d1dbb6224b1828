//! # Contract testing
//!
//! Assertions over HTTP responses, a dependency-ordered case runner and the
//! per-run report it produces.

pub mod assertion;
#[cfg(test)]
pub mod fake_api;
pub mod report;
pub mod runner;

pub use report::RunReport;
pub use runner::{Case, CaseContext, CaseFuture, Suite};
