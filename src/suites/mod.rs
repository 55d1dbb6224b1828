//! The four scenario suites run against the storefront API.

pub mod category;
pub mod end_to_end;
pub mod product;
pub mod user;

use std::fmt::{self, Display};
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::SuiteError;
use crate::testing::Suite;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, clap::ValueEnum)]
pub enum SuiteKind {
    Category,
    Product,
    User,
    #[value(name = "e2e")]
    EndToEnd,
}

impl SuiteKind {
    pub const ALL: [SuiteKind; 4] = [
        SuiteKind::Category,
        SuiteKind::Product,
        SuiteKind::User,
        SuiteKind::EndToEnd,
    ];

    pub fn build(self) -> Result<Suite, SuiteError> {
        match self {
            SuiteKind::Category => category::suite(),
            SuiteKind::Product => product::suite(),
            SuiteKind::User => user::suite(),
            SuiteKind::EndToEnd => end_to_end::suite(),
        }
    }
}

impl Display for SuiteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SuiteKind::Category => category::NAME,
            SuiteKind::Product => product::NAME,
            SuiteKind::User => user::NAME,
            SuiteKind::EndToEnd => end_to_end::NAME,
        };
        write!(f, "{label}")
    }
}

static FIXTURE_SEQUENCE: AtomicU32 = AtomicU32::new(0);

/// Millisecond timestamp plus a process-wide counter, so suites running
/// side by side never reuse a fixture email or name.
pub(crate) fn unique_suffix() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis())
        .unwrap_or(0);
    let sequence = FIXTURE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("{millis}{sequence:03}")
}

pub(crate) fn unique_email(prefix: &str) -> String {
    format!("{prefix}{}@gmail.com", unique_suffix())
}

pub(crate) fn cat_images() -> Vec<String> {
    vec!["cat1.png".to_string(), "cat2.png".to_string()]
}

pub(crate) fn placeholder_images() -> Vec<String> {
    vec![
        "https://placehold1.co/600x400".to_string(),
        "https://placehold2.co/600x400".to_string(),
    ]
}
