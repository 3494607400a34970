pub mod devfolio;
pub mod traits;
pub mod types;

pub use devfolio::DevfolioScraper;
pub use traits::Scraper;
pub use types::{ScrapeOutcome, ScrapeReport};
