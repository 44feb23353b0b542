use crate::engine::{read_state, SharedState};
use crate::models::{PoissonPoint, RateEstimate, Ticket};
use crate::rate::DEFAULT_POISSON_RANGE;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub const MAX_POISSON_RANGE: u64 = 500;

#[derive(Clone)]
pub struct AppState {
    pub dashboard: SharedState,
}

#[derive(Deserialize)]
pub struct PoissonParams {
    pub range: Option<u64>,
}

#[derive(Serialize)]
pub struct PoissonResponse {
    pub rate: f64,
    pub range: u64,
    pub points: Vec<PoissonPoint>,
}

/// Ticket as shown in the feed, with the wall-clock time pre-formatted.
#[derive(Serialize)]
pub struct TicketView {
    #[serde(flatten)]
    pub ticket: Ticket,
    pub timestamp: String,
}

impl From<Ticket> for TicketView {
    fn from(ticket: Ticket) -> Self {
        let timestamp = ticket.display_time();
        Self { ticket, timestamp }
    }
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub nodes: usize,
    pub tickets: usize,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/snapshot", get(get_snapshot))
        .route("/api/topology", get(get_topology))
        .route("/api/histogram", get(get_histogram))
        .route("/api/tickets", get(get_tickets))
        .route("/api/rate", get(get_rate))
        .route("/api/rate/poisson", get(get_poisson))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let dashboard = read_state(&state.dashboard);
    Json(HealthResponse {
        status: "ok",
        nodes: dashboard.topology().node_count(),
        tickets: dashboard.incidents().tickets().len(),
    })
}

pub async fn get_snapshot(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = read_state(&state.dashboard).snapshot();
    Json(snapshot)
}

pub async fn get_topology(State(state): State<AppState>) -> impl IntoResponse {
    let topology = read_state(&state.dashboard).topology_snapshot();
    Json(topology)
}

pub async fn get_histogram(State(state): State<AppState>) -> impl IntoResponse {
    let histogram = read_state(&state.dashboard).histogram();
    Json(histogram)
}

pub async fn get_tickets(State(state): State<AppState>) -> impl IntoResponse {
    let tickets: Vec<TicketView> = read_state(&state.dashboard)
        .tickets()
        .into_iter()
        .map(TicketView::from)
        .collect();
    Json(tickets)
}

pub async fn get_rate(State(state): State<AppState>) -> Json<RateEstimate> {
    Json(read_state(&state.dashboard).rate())
}

pub async fn get_poisson(
    State(state): State<AppState>,
    Query(params): Query<PoissonParams>,
) -> impl IntoResponse {
    let range = params
        .range
        .unwrap_or(DEFAULT_POISSON_RANGE)
        .min(MAX_POISSON_RANGE);
    let dashboard = read_state(&state.dashboard);
    Json(PoissonResponse {
        rate: dashboard.rate().value,
        range,
        points: dashboard.poisson(range),
    })
}
