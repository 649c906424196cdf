use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use engine::catalog::{load_catalog, CatalogPaths};
use engine::{match_all, score_one, JobPosting, MatchBreakdown, MatchOutcome, ResumeProfile, ScoringWeights};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

#[derive(Deserialize)]
pub struct JobFilters {
    #[serde(default)]
    pub remote: Option<bool>,
    #[serde(default)]
    pub location: Option<String>,
    /// Comma-separated; a job passes when any keyword appears in its text.
    #[serde(default)]
    pub keywords: Option<String>,
}

#[derive(Deserialize)]
pub struct MatchRequest {
    pub resume_text: String,
    #[serde(default)]
    pub skills: Vec<String>,
}

#[derive(Serialize)]
pub struct MatchResponse {
    pub count: usize,
    pub matches: HashMap<String, MatchOutcome>,
}

#[derive(Clone)]
pub struct AppState {
    pub catalog_root: PathBuf,
    pub catalog: Arc<RwLock<Vec<JobPosting>>>,
    pub weights: ScoringWeights,
    pub admin_token: Option<String>,
}

pub fn build_app(catalog_dir: String) -> Result<Router> {
    // Misconfigured weights are a startup failure, never a per-request one.
    let weights = ScoringWeights::default();
    weights.validate()?;

    let paths = CatalogPaths::new(&catalog_dir);
    let postings = load_catalog(&paths)?;
    let admin_token = std::env::var("ADMIN_TOKEN").ok();
    let state = AppState {
        catalog_root: PathBuf::from(&catalog_dir),
        catalog: Arc::new(RwLock::new(postings)),
        weights,
        admin_token,
    };

    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/jobs", get(jobs_handler))
        .route("/match", post(match_handler))
        .route("/match/:job_id", post(match_one_handler))
        .route("/catalog/reload", post(reload_handler))
        .with_state(state)
        .layer(cors);
    Ok(app)
}

pub async fn jobs_handler(
    State(state): State<AppState>,
    Query(filters): Query<JobFilters>,
) -> Json<serde_json::Value> {
    let catalog = state.catalog.read();
    let jobs: Vec<&JobPosting> = catalog.iter().filter(|j| passes_filters(j, &filters)).collect();
    Json(serde_json::json!({ "count": jobs.len(), "jobs": jobs }))
}

fn passes_filters(job: &JobPosting, filters: &JobFilters) -> bool {
    if filters.remote == Some(true) && !job.is_remote {
        return false;
    }
    if let Some(location) = filters.location.as_deref() {
        let wanted = location.trim().to_lowercase();
        if !wanted.is_empty() {
            let have = job.location.as_deref().unwrap_or("").to_lowercase();
            if !have.contains(&wanted) {
                return false;
            }
        }
    }
    if let Some(keywords) = filters.keywords.as_deref() {
        let wanted: Vec<String> = keywords
            .split(',')
            .map(|kw| kw.trim().to_lowercase())
            .filter(|kw| !kw.is_empty())
            .collect();
        if !wanted.is_empty() {
            let mut haystack = format!(
                "{} {} {}",
                job.title,
                job.description,
                job.company.as_deref().unwrap_or("")
            );
            for skill in &job.skills {
                haystack.push(' ');
                haystack.push_str(skill);
            }
            let haystack = haystack.to_lowercase();
            if !wanted.iter().any(|kw| haystack.contains(kw)) {
                return false;
            }
        }
    }
    true
}

/// Score the supplied résumé against the whole catalogue. Per-posting
/// failures surface inside the mapping as failed outcomes; one bad record
/// never turns into a page-level error.
pub async fn match_handler(
    State(state): State<AppState>,
    Json(req): Json<MatchRequest>,
) -> Json<MatchResponse> {
    let resume = ResumeProfile::new(req.resume_text, &req.skills);
    let catalog = state.catalog.read();
    let matches = match_all(&resume, &catalog, &state.weights);
    Json(MatchResponse { count: matches.len(), matches })
}

pub async fn match_one_handler(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
    Json(req): Json<MatchRequest>,
) -> Result<Json<MatchBreakdown>, (StatusCode, String)> {
    let resume = ResumeProfile::new(req.resume_text, &req.skills);
    let catalog = state.catalog.read();
    match catalog.iter().find(|job| job.id == job_id) {
        Some(job) => Ok(Json(score_one(&resume, job, &state.weights))),
        None => Err((StatusCode::NOT_FOUND, format!("no posting with id {job_id}"))),
    }
}

async fn reload_handler(
    State(state): State<AppState>,
    headers: axum::http::HeaderMap,
) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    authorize(&state, &headers)?;
    let paths = CatalogPaths::new(&state.catalog_root);
    match load_catalog(&paths) {
        Ok(postings) => {
            let count = postings.len();
            *state.catalog.write() = postings;
            tracing::info!(count, "catalogue reloaded");
            Ok(Json(serde_json::json!({ "reloaded": count })))
        }
        Err(err) => Err((StatusCode::INTERNAL_SERVER_ERROR, format!("reload failed: {err}"))),
    }
}

fn authorize(state: &AppState, headers: &axum::http::HeaderMap) -> Result<(), (StatusCode, String)> {
    let required = match &state.admin_token {
        Some(t) => t,
        None => return Err((StatusCode::UNAUTHORIZED, "ADMIN_TOKEN not set".into())),
    };
    let provided = headers.get("X-ADMIN-TOKEN").and_then(|v| v.to_str().ok()).unwrap_or("");
    if provided == required {
        Ok(())
    } else {
        Err((StatusCode::UNAUTHORIZED, "invalid admin token".into()))
    }
}
