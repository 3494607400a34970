use crate::models::Listing;
use serde::Serialize;
use std::fmt;

/// Why a candidate was dropped instead of aborting the batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Skip {
    MissingTitle,
}

impl fmt::Display for Skip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Skip::MissingTitle => write!(f, "no extractable title"),
        }
    }
}

/// Which of the two candidate-location passes produced the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Pass {
    Primary,
    Alternate,
}

/// Counters describing one scrape run.
///
/// The selectors are guesses against markup we do not control, so the report
/// is the only honest signal of how well a run went: how many candidates each
/// pass surfaced, how many survived the title gate, and how often each field
/// fell back to its default.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScrapeReport {
    pub primary_candidates: usize,
    pub alternate_candidates: usize,
    pub kept: usize,
    pub skipped_missing_title: usize,
    pub defaulted_desc: usize,
    pub defaulted_date: usize,
    pub defaulted_location: usize,
    pub defaulted_tags: usize,
}

impl ScrapeReport {
    pub fn pass_used(&self) -> Pass {
        if self.primary_candidates > 0 {
            Pass::Primary
        } else {
            Pass::Alternate
        }
    }
}

/// The listings extracted by one run, together with its report.
#[derive(Debug, Clone)]
pub struct ScrapeOutcome {
    pub listings: Vec<Listing>,
    pub report: ScrapeReport,
}
