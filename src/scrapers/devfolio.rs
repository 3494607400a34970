use crate::models::{Listing, Mode};
use crate::scrapers::traits::Scraper;
use crate::scrapers::types::{ScrapeOutcome, ScrapeReport, Skip};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{Days, Utc};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Fixed scrape target; the scraper takes no configuration.
const TARGET_URL: &str = "https://devfolio.co/hackathons";
const SITE_ORIGIN: &str = "https://devfolio.co";
const ORGANISER: &str = "Devfolio";
const DEFAULT_DESC: &str = "A hackathon hosted on Devfolio. Click to learn more.";

/// Primary pass: class names observed on Devfolio's hackathon cards.
/// This is an approximation; the markup is not under our control and the
/// class names may change without notice.
const PRIMARY_CARDS: &str =
    r#"div[class*="HackathonCard"], div[class*="hackathon-card"], .hackathon-item"#;

/// Alternate pass: generic containers, filtered by title keywords afterwards.
const ALTERNATE_CARDS: &str = r#"div.card, div[class*="Card"], article, section > div"#;

/// Per-field fallback chains, tried in order, first non-empty text wins.
const TITLE_CASCADE: &[&str] = &["h2", "h3", r#"[class*="title"], [class*="name"]"#];
const DESC_CASCADE: &[&str] = &["p", r#"[class*="description"], [class*="content"]"#];
const DATE_CASCADE: &[&str] = &[r#"[class*="date"], [class*="time"]"#, "time"];
const LOCATION_CASCADE: &[&str] = &[r#"[class*="location"], [class*="place"]"#];
const TAGS: &str = r#"[class*="tag"], [class*="category"], [class*="badge"]"#;

const ALT_TITLE_CASCADE: &[&str] = &["h1", "h2", "h3", "h4", ".title", ".heading"];
const ALT_DESC_CASCADE: &[&str] = &["p", ".description", ".content", ".text"];

fn sel(css: &str) -> Selector {
    Selector::parse(css).unwrap()
}

/// Walk a fallback chain and return the first non-empty trimmed text.
fn first_text(el: ElementRef<'_>, cascade: &[&str]) -> Option<String> {
    for css in cascade {
        let selector = sel(css);
        for found in el.select(&selector) {
            let text = found.text().collect::<String>().trim().to_string();
            if !text.is_empty() {
                return Some(text);
            }
        }
    }
    None
}

fn first_href(el: ElementRef<'_>) -> Option<String> {
    let anchor = sel("a");
    el.select(&anchor)
        .find_map(|a| a.value().attr("href"))
        .map(|href| href.trim().to_string())
        .filter(|href| !href.is_empty())
}

/// Rewrite a raw href into an absolute URL. Site-relative links are resolved
/// against the Devfolio origin; scheme-less absolute links get `https://`.
fn normalize_link(raw: &str) -> String {
    if raw.starts_with("http://") || raw.starts_with("https://") {
        raw.to_string()
    } else if raw.starts_with('/') {
        format!("{SITE_ORIGIN}{raw}")
    } else {
        format!("https://{raw}")
    }
}

/// Trailing non-empty path segment of the link, or a random token.
fn derive_id(link: &str) -> String {
    link.split('/')
        .filter(|segment| !segment.is_empty())
        .next_back()
        .map(str::to_string)
        .unwrap_or_else(random_id)
}

fn random_id() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}

fn mode_for(location: &str) -> Mode {
    if location.to_lowercase().contains("virtual") {
        Mode::Online
    } else {
        Mode::Hybrid
    }
}

fn today() -> String {
    Utc::now().date_naive().format("%Y-%m-%d").to_string()
}

fn thirty_days_out() -> String {
    (Utc::now().date_naive() + Days::new(30))
        .format("%Y-%m-%d")
        .to_string()
}

/// Devfolio hackathon scraper.
pub struct DevfolioScraper {
    client: Client,
}

impl DevfolioScraper {
    pub fn new() -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            ),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36")
            .default_headers(headers)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }

    /// One GET against the fixed target, no retries.
    async fn fetch(&self) -> Result<String> {
        debug!("Fetching URL: {}", TARGET_URL);

        let response = self
            .client
            .get(TARGET_URL)
            .send()
            .await
            .context("Failed to fetch Devfolio page")?;

        if !response.status().is_success() {
            warn!("Devfolio returned status: {}", response.status());
            anyhow::bail!("Failed to fetch Devfolio page: {}", response.status());
        }

        response.text().await.context("Failed to read response body")
    }

    /// Locate candidate cards and extract listings from them.
    ///
    /// If the primary selectors find nothing, the alternate pass scans generic
    /// containers and keeps only titles that mention "hack" or "challenge".
    fn extract_listings(&self, html: &str) -> (Vec<Listing>, ScrapeReport) {
        let document = Html::parse_document(html);
        let mut report = ScrapeReport::default();
        let mut listings = Vec::new();

        let primary = sel(PRIMARY_CARDS);
        for card in document.select(&primary) {
            report.primary_candidates += 1;
            match self.extract_primary(card, &mut report) {
                Ok(listing) => {
                    report.kept += 1;
                    listings.push(listing);
                }
                Err(skip) => {
                    report.skipped_missing_title += 1;
                    debug!("Skipping candidate: {}", skip);
                }
            }
        }

        if report.primary_candidates == 0 {
            info!("No candidates from primary selectors, trying alternates...");
            let alternate = sel(ALTERNATE_CARDS);
            for card in document.select(&alternate) {
                report.alternate_candidates += 1;
                if let Some(listing) = self.extract_alternate(card) {
                    report.kept += 1;
                    listings.push(listing);
                }
            }
        }

        (listings, report)
    }

    fn extract_primary(
        &self,
        card: ElementRef<'_>,
        report: &mut ScrapeReport,
    ) -> Result<Listing, Skip> {
        // A candidate with no extractable title is discarded.
        let title = first_text(card, TITLE_CASCADE).ok_or(Skip::MissingTitle)?;

        let desc = first_text(card, DESC_CASCADE).unwrap_or_else(|| {
            report.defaulted_desc += 1;
            DEFAULT_DESC.to_string()
        });

        // Date text is kept as found; only absence gets the +30d default.
        let date = first_text(card, DATE_CASCADE).unwrap_or_else(|| {
            report.defaulted_date += 1;
            thirty_days_out()
        });

        let link = normalize_link(&first_href(card).unwrap_or_else(|| TARGET_URL.to_string()));

        let location = first_text(card, LOCATION_CASCADE).unwrap_or_else(|| {
            report.defaulted_location += 1;
            "Virtual".to_string()
        });

        let tag_selector = sel(TAGS);
        let mut sector_tags: Vec<String> = card
            .select(&tag_selector)
            .map(|tag| tag.text().collect::<String>().trim().to_string())
            .filter(|tag| !tag.is_empty())
            .collect();
        if sector_tags.is_empty() {
            report.defaulted_tags += 1;
            sector_tags = vec!["Technology".to_string(), "Development".to_string()];
        }

        Ok(Listing {
            id: derive_id(&link),
            title,
            desc,
            date,
            mode: mode_for(&location),
            location,
            sector_tags,
            organiser: ORGANISER.to_string(),
            link,
        })
    }

    fn extract_alternate(&self, card: ElementRef<'_>) -> Option<Listing> {
        let title = first_text(card, ALT_TITLE_CASCADE)?;
        let lowered = title.to_lowercase();
        if !lowered.contains("hack") && !lowered.contains("challenge") {
            return None;
        }

        let desc = first_text(card, ALT_DESC_CASCADE).unwrap_or_else(|| DEFAULT_DESC.to_string());
        let link = normalize_link(&first_href(card).unwrap_or_else(|| TARGET_URL.to_string()));

        Some(Listing {
            id: random_id(),
            title,
            desc,
            date: today(),
            mode: Mode::Online,
            location: "Virtual".to_string(),
            sector_tags: vec!["Technology".to_string()],
            organiser: ORGANISER.to_string(),
            link,
        })
    }
}

impl Default for DevfolioScraper {
    fn default() -> Self {
        Self::new().expect("Failed to create default DevfolioScraper")
    }
}

#[async_trait]
impl Scraper for DevfolioScraper {
    async fn scrape(&self) -> Result<ScrapeOutcome> {
        info!("Starting Devfolio scrape from {}", TARGET_URL);

        let html = self.fetch().await?;
        debug!("Downloaded {} bytes of HTML", html.len());

        let (listings, report) = self.extract_listings(&html);

        info!(
            "{:?} pass: {} primary candidates, {} alternate candidates, kept {}, skipped {} (no title)",
            report.pass_used(),
            report.primary_candidates,
            report.alternate_candidates,
            report.kept,
            report.skipped_missing_title
        );
        debug!(
            "Defaults applied: desc {}, date {}, location {}, tags {}",
            report.defaulted_desc,
            report.defaulted_date,
            report.defaulted_location,
            report.defaulted_tags
        );

        Ok(ScrapeOutcome { listings, report })
    }

    fn source_name(&self) -> &'static str {
        "Devfolio"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrapers::types::Pass;

    fn extract(html: &str) -> (Vec<Listing>, ScrapeReport) {
        DevfolioScraper::new().unwrap().extract_listings(html)
    }

    #[test]
    fn primary_card_with_virtual_location() {
        let html = r#"
            <html><body>
              <div class="HackathonCard__StyledCard-sc-1xyz">
                <h2>Fintech Hack 2025</h2>
                <span class="location">Virtual, India</span>
                <a href="/hackathons/fintech-hack-2025">Apply</a>
              </div>
            </body></html>
        "#;

        let (listings, report) = extract(html);

        assert_eq!(report.primary_candidates, 1);
        assert_eq!(listings.len(), 1);

        let listing = &listings[0];
        assert_eq!(listing.title, "Fintech Hack 2025");
        assert_eq!(listing.mode, Mode::Online);
        assert_eq!(listing.location, "Virtual, India");
        assert_eq!(listing.date, thirty_days_out());
        assert_eq!(listing.desc, DEFAULT_DESC);
        assert_eq!(listing.link, "https://devfolio.co/hackathons/fintech-hack-2025");
        assert_eq!(listing.id, "fintech-hack-2025");
        assert_eq!(listing.organiser, "Devfolio");
        assert_eq!(listing.sector_tags, vec!["Technology", "Development"]);
        assert_eq!(report.defaulted_date, 1);
        assert_eq!(report.defaulted_tags, 1);
    }

    #[test]
    fn alternate_pass_keeps_challenge_titles() {
        let html = r#"
            <html><body>
              <section>
                <div class="card">
                  <h3>AI Challenge 2025</h3>
                  <p>Build with AI.</p>
                </div>
              </section>
            </body></html>
        "#;

        let (listings, report) = extract(html);

        assert_eq!(report.primary_candidates, 0);
        assert_eq!(report.pass_used(), Pass::Alternate);
        assert_eq!(report.alternate_candidates, 1);
        assert_eq!(listings.len(), 1);

        let listing = &listings[0];
        assert_eq!(listing.title, "AI Challenge 2025");
        assert_eq!(listing.desc, "Build with AI.");
        assert_eq!(listing.date, today());
        assert_eq!(listing.mode, Mode::Online);
        assert_eq!(listing.location, "Virtual");
        assert_eq!(listing.sector_tags, vec!["Technology"]);
        assert_eq!(listing.id.len(), 8);
    }

    #[test]
    fn alternate_pass_drops_unrelated_titles() {
        let html = r#"
            <html><body>
              <div class="card"><h2>Cooking Meetup</h2></div>
            </body></html>
        "#;

        let (listings, report) = extract(html);

        assert_eq!(report.alternate_candidates, 1);
        assert_eq!(report.kept, 0);
        assert!(listings.is_empty());
    }

    #[test]
    fn candidate_without_title_is_skipped() {
        let html = r#"
            <html><body>
              <div class="hackathon-item"><p>No heading here.</p></div>
              <div class="hackathon-item">
                <h2>Open Hack</h2>
                <a href="https://example.com/e/open-hack">Go</a>
              </div>
            </body></html>
        "#;

        let (listings, report) = extract(html);

        assert_eq!(report.primary_candidates, 2);
        assert_eq!(report.skipped_missing_title, 1);
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].title, "Open Hack");
        assert_eq!(listings[0].link, "https://example.com/e/open-hack");
    }

    #[test]
    fn title_cascade_falls_back_to_h3() {
        let html = r#"
            <html><body>
              <div class="hackathon-item">
                <h3>Quiet Hack</h3>
              </div>
            </body></html>
        "#;

        let (listings, _) = extract(html);
        assert_eq!(listings[0].title, "Quiet Hack");
    }

    #[test]
    fn tags_and_date_text_are_kept_verbatim() {
        let html = r#"
            <html><body>
              <div class="hackathon-item">
                <h2>Green Hack</h2>
                <span class="date">Jan 5, 2026</span>
                <span class="tag">CleanTech</span>
                <span class="badge">IoT</span>
                <span class="place">Bangalore</span>
              </div>
            </body></html>
        "#;

        let (listings, report) = extract(html);

        let listing = &listings[0];
        assert_eq!(listing.date, "Jan 5, 2026");
        assert_eq!(listing.sector_tags, vec!["CleanTech", "IoT"]);
        assert_eq!(listing.location, "Bangalore");
        assert_eq!(listing.mode, Mode::Hybrid);
        assert_eq!(report.defaulted_date, 0);
        assert_eq!(report.defaulted_tags, 0);
    }

    #[test]
    fn missing_location_defaults_to_virtual_and_online() {
        let html = r#"
            <html><body>
              <div class="hackathon-item"><h2>Space Hack</h2></div>
            </body></html>
        "#;

        let (listings, report) = extract(html);

        assert_eq!(listings[0].location, "Virtual");
        assert_eq!(listings[0].mode, Mode::Online);
        assert_eq!(report.defaulted_location, 1);
    }

    #[test]
    fn link_normalization() {
        assert_eq!(normalize_link("/e/foo"), "https://devfolio.co/e/foo");
        assert_eq!(normalize_link("example.com/e/foo"), "https://example.com/e/foo");
        assert_eq!(normalize_link("https://a.dev/x"), "https://a.dev/x");
        assert_eq!(normalize_link("http://a.dev/x"), "http://a.dev/x");
    }

    #[test]
    fn mode_detection_is_case_insensitive() {
        assert_eq!(mode_for("Virtual, India"), Mode::Online);
        assert_eq!(mode_for("VIRTUAL event"), Mode::Online);
        assert_eq!(mode_for("Bangalore"), Mode::Hybrid);
    }

    #[test]
    fn id_comes_from_trailing_link_segment() {
        assert_eq!(derive_id("https://devfolio.co/hackathons/foo"), "foo");
        assert_eq!(derive_id("https://devfolio.co/hackathons/"), "hackathons");
        // No usable segment at all: random token.
        assert_eq!(derive_id("").len(), 8);
    }
}
