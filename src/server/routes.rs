use super::state::ServerState;
use crate::generation::GenerationInput;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

#[derive(Serialize)]
struct ServerStats {
    pub uptime: String,
    pub catalog_tracks: usize,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

async fn home(State(state): State<ServerState>) -> impl IntoResponse {
    Json(ServerStats {
        uptime: format_uptime(state.start_time.elapsed()),
        catalog_tracks: state.catalog_size,
    })
}

#[derive(Serialize)]
struct InvalidRequestBody {
    error: String,
    details: Vec<String>,
}

/// Boundary validation for a generation request. The core itself never
/// rejects input, so everything range-related is checked here.
fn validate(input: &GenerationInput) -> Vec<String> {
    let mut problems = Vec::new();
    if !(20..=120).contains(&input.duration_min) {
        problems.push("durationMin must be between 20 and 120".to_owned());
    }
    if input.arm_songs > 3 {
        problems.push("armSongs must be between 0 and 3".to_owned());
    }
    if input.prefs.genres.len() > 10 {
        problems.push("genres must contain at most 10 entries".to_owned());
    }
    if input.prefs.include_artists.len() > 10 {
        problems.push("includeArtists must contain at most 10 entries".to_owned());
    }
    if input.prefs.exclude_artists.len() > 10 {
        problems.push("excludeArtists must contain at most 10 entries".to_owned());
    }
    if input.prefs.theme.chars().count() > 200 {
        problems.push("theme must be at most 200 characters".to_owned());
    }
    if !(0.0..=100.0).contains(&input.prefs.familiarity) {
        problems.push("familiarity must be between 0 and 100".to_owned());
    }
    problems
}

async fn generate_playlist(
    State(state): State<ServerState>,
    Json(input): Json<GenerationInput>,
) -> Response {
    let problems = validate(&input);
    if !problems.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(InvalidRequestBody {
                error: "Invalid request".to_owned(),
                details: problems,
            }),
        )
            .into_response();
    }

    // StdRng rather than the thread rng so the future stays Send
    let mut rng = StdRng::from_os_rng();
    let response = state.generator.generate(&input, &mut rng).await;
    Json(response).into_response()
}

pub fn make_router(state: ServerState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/api/generate-playlist", post(generate_playlist))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
