use crate::models::Listing;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::info;

/// Storage interface for the listing collection.
///
/// Keeps extraction logic independent of where the collection lives, so the
/// JSON file can be swapped for a real datastore without touching scrapers or
/// the read API.
#[async_trait]
pub trait ListingStore: Send + Sync {
    /// Load the full collection.
    async fn load(&self) -> Result<Vec<Listing>>;

    /// Replace the full collection. No merge, no dedup against prior runs.
    async fn save(&self, listings: &[Listing]) -> Result<()>;
}

/// Pretty-printed JSON array in a single file.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default store for scraped hackathons, relative to the working directory.
    pub fn hackathons() -> Self {
        Self::new("data/hackathons.json")
    }
}

#[async_trait]
impl ListingStore for JsonFileStore {
    async fn load(&self) -> Result<Vec<Listing>> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        serde_json::from_slice(&bytes)
            .with_context(|| format!("Failed to parse {}", self.path.display()))
    }

    async fn save(&self, listings: &[Listing]) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            tokio::fs::create_dir_all(dir)
                .await
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }

        let json = serde_json::to_string_pretty(listings)?;
        tokio::fs::write(&self.path, json)
            .await
            .with_context(|| format!("Failed to write {}", self.path.display()))?;

        info!("Saved {} listings to {}", listings.len(), self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Mode;

    fn listing(id: &str) -> Listing {
        Listing {
            id: id.to_string(),
            title: "Fintech Hack 2025".to_string(),
            desc: "Build fintech things.".to_string(),
            date: "2025-07-20".to_string(),
            mode: Mode::Online,
            location: "Virtual".to_string(),
            sector_tags: vec!["Fintech".to_string()],
            organiser: "Devfolio".to_string(),
            link: "https://devfolio.co/hackathons/fintech-hack".to_string(),
        }
    }

    #[tokio::test]
    async fn save_creates_directory_and_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("data/hackathons.json"));

        let listings = vec![listing("a"), listing("b")];
        store.save(&listings).await.unwrap();

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded, listings);
    }

    #[tokio::test]
    async fn save_twice_is_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hackathons.json");
        let store = JsonFileStore::new(path.clone());
        let listings = vec![listing("a")];

        store.save(&listings).await.unwrap();
        let first = tokio::fs::read(&path).await.unwrap();

        store.save(&listings).await.unwrap();
        let second = tokio::fs::read(&path).await.unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn save_overwrites_previous_collection_wholesale() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("hackathons.json"));

        store.save(&[listing("a"), listing("b")]).await.unwrap();
        store.save(&[listing("c")]).await.unwrap();

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, "c");
    }

    #[tokio::test]
    async fn load_fails_when_file_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("absent.json"));
        assert!(store.load().await.is_err());
    }

    #[tokio::test]
    async fn load_fails_on_corrupt_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hackathons.json");
        tokio::fs::write(&path, b"not json").await.unwrap();

        let store = JsonFileStore::new(path);
        assert!(store.load().await.is_err());
    }

    #[test]
    fn wire_format_uses_camel_case_tags() {
        let json = serde_json::to_string(&listing("a")).unwrap();
        assert!(json.contains("\"sectorTags\""));
        assert!(json.contains("\"mode\":\"Online\""));
    }
}
