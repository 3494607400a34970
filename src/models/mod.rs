use serde::{Deserialize, Serialize};

/// Attendance mode of a listing.
///
/// The Devfolio scraper only emits `Online` or `Hybrid` (it infers the mode
/// from the location text); `Offline` appears in hand-authored data such as
/// the mock collection served by `/api/test-hackathons`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Mode {
    Online,
    Hybrid,
    Offline,
}

/// A hackathon listing as persisted to `data/hackathons.json` and served by
/// the read API. Field names are camelCase on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    /// Trailing path segment of `link`, or a random 8-char token if the link
    /// has no usable segment. Not guaranteed globally unique.
    pub id: String,
    pub title: String,
    pub desc: String,
    /// Best-effort date text, `YYYY-MM-DD` when defaulted.
    pub date: String,
    pub mode: Mode,
    pub location: String,
    pub sector_tags: Vec<String>,
    pub organiser: String,
    /// Always an absolute URL (`http://` or `https://`).
    pub link: String,
}
