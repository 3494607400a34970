use crate::models::{Listing, Mode};
use crate::storage::{JsonFileStore, ListingStore};
use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

/// Shared state for the read API. The listing store is behind a trait object
/// so swapping the JSON file for a real datastore never touches handlers.
#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn ListingStore>,
    schemes_path: PathBuf,
}

impl AppState {
    pub fn new(store: Arc<dyn ListingStore>, schemes_path: impl Into<PathBuf>) -> Self {
        Self {
            store,
            schemes_path: schemes_path.into(),
        }
    }

    /// File-backed state with the fixed paths under the working directory.
    pub fn with_default_paths() -> Self {
        Self::new(Arc::new(JsonFileStore::hackathons()), "data/schemes.json")
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/hackathons", get(get_hackathons))
        .route("/api/test-hackathons", get(get_test_hackathons))
        .route("/api/schemes", get(get_schemes))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, state: AppState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Read API listening on {}", addr);
    axum::serve(listener, router(state))
        .await
        .context("Server error")?;
    Ok(())
}

/// `GET /api/hackathons`: the scraped collection, as persisted.
async fn get_hackathons(State(state): State<AppState>) -> Response {
    match state.store.load().await {
        Ok(listings) => Json(listings).into_response(),
        Err(err) => {
            error!("Error fetching hackathons: {:#}", err);
            error_response("Failed to fetch hackathons data")
        }
    }
}

/// `GET /api/schemes`: hand-authored scheme data, passed through verbatim.
async fn get_schemes(State(state): State<AppState>) -> Response {
    match read_json(&state.schemes_path).await {
        Ok(schemes) => Json(schemes).into_response(),
        Err(err) => {
            error!("Error fetching schemes: {:#}", err);
            error_response("Failed to fetch schemes data")
        }
    }
}

/// `GET /api/test-hackathons`: fixed sample collection for UI development,
/// served after a simulated network delay.
async fn get_test_hackathons() -> Json<Vec<Listing>> {
    tokio::time::sleep(Duration::from_millis(500)).await;
    Json(mock_hackathons())
}

async fn read_json(path: &Path) -> Result<Value> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_slice(&bytes).with_context(|| format!("Failed to parse {}", path.display()))
}

fn error_response(message: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": message })),
    )
        .into_response()
}

fn mock_listing(
    id: &str,
    title: &str,
    desc: &str,
    date: &str,
    mode: Mode,
    location: &str,
    sector_tags: &[&str],
    organiser: &str,
    link: &str,
) -> Listing {
    Listing {
        id: id.to_string(),
        title: title.to_string(),
        desc: desc.to_string(),
        date: date.to_string(),
        mode,
        location: location.to_string(),
        sector_tags: sector_tags.iter().map(|tag| tag.to_string()).collect(),
        organiser: organiser.to_string(),
        link: link.to_string(),
    }
}

pub fn mock_hackathons() -> Vec<Listing> {
    vec![
        mock_listing(
            "1",
            "DevFest 2025",
            "A global tech conference hosted by GDG featuring keynotes, technical sessions, and hackathons.",
            "2025-06-15",
            Mode::Hybrid,
            "Mumbai",
            &["Web Development", "AI/ML", "Cloud"],
            "Google Developer Groups",
            "https://devfest.withgoogle.com",
        ),
        mock_listing(
            "2",
            "Fintech Hack 2025",
            "Build innovative financial technology solutions to solve real-world banking and finance challenges.",
            "2025-07-20",
            Mode::Online,
            "Virtual",
            &["Fintech", "Blockchain", "Payments"],
            "Devfolio",
            "https://devfolio.co/hackathons",
        ),
        mock_listing(
            "3",
            "Health Tech Innovation Challenge",
            "Design and develop solutions to improve healthcare accessibility and affordability in India.",
            "2025-08-05",
            Mode::Offline,
            "Bangalore",
            &["Healthcare", "IoT", "AI"],
            "Devfolio",
            "https://devfolio.co/hackathons",
        ),
        mock_listing(
            "4",
            "Climate Action Hackathon",
            "Develop innovative tech solutions to address climate change and promote sustainability.",
            "2025-09-10",
            Mode::Hybrid,
            "Delhi",
            &["CleanTech", "Sustainability", "IoT"],
            "Devfolio",
            "https://devfolio.co/hackathons",
        ),
        mock_listing(
            "5",
            "EdTech Revolution",
            "Create next-generation education technology to make learning more accessible, engaging, and effective.",
            "2025-10-15",
            Mode::Online,
            "Virtual",
            &["EdTech", "AI", "Mobile"],
            "Devfolio",
            "https://devfolio.co/hackathons",
        ),
    ]
}
