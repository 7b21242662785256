//! Always-on liveness/readiness HTTP listener.
//!
//! Runs as an independent task and shares no state with the download
//! pipeline, so hosting-platform probes keep getting answers while renditions
//! are in flight.

use std::time::{SystemTime, UNIX_EPOCH};

use {
    axum::{Json, Router, extract::State, response::IntoResponse, routing::get},
    tokio_util::sync::CancellationToken,
    tracing::info,
};

/// Static facts the probe endpoints report.
#[derive(Debug, Clone)]
pub struct HealthState {
    /// Locale the bot replies in.
    pub locale: String,
    /// Keys of the localized message set, reported by `/language`.
    pub message_keys: Vec<String>,
}

/// Build the probe router (shared between production startup and tests).
pub fn build_health_app(state: HealthState) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/language", get(language_handler))
        .with_state(state)
}

/// Bind and serve the probe router until `cancel` fires.
pub async fn serve(
    bind: &str,
    port: u16,
    state: HealthState,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let app = build_health_app(state);
    let listener = tokio::net::TcpListener::bind((bind, port)).await?;
    info!(bind, port, "health listener up");
    axum::serve(listener, app)
        .with_graceful_shutdown(async move { cancel.cancelled().await })
        .await?;
    Ok(())
}

// ── Handlers ─────────────────────────────────────────────────────────────────

async fn root_handler(State(state): State<HealthState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "tokgrab",
        "language": state.locale,
        "timestamp": unix_now(),
    }))
}

async fn health_handler(State(state): State<HealthState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "language": state.locale,
    }))
}

async fn language_handler(State(state): State<HealthState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "language": state.locale,
        "messages": state.message_keys,
    }))
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {
        super::*,
        axum::{body::Body, http::Request},
        tower::ServiceExt,
    };

    fn state() -> HealthState {
        HealthState {
            locale: "my".into(),
            message_keys: vec!["welcome".into(), "processing".into()],
        }
    }

    async fn get_json(path: &str) -> serde_json::Value {
        let app = build_health_app(state());
        let response = app
            .oneshot(Request::get(path).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), axum::http::StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn root_reports_service_and_timestamp() {
        let body = get_json("/").await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["service"], "tokgrab");
        assert_eq!(body["language"], "my");
        assert!(body["timestamp"].as_u64().unwrap() > 0);
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let body = get_json("/health").await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["language"], "my");
    }

    #[tokio::test]
    async fn language_lists_message_keys() {
        let body = get_json("/language").await;
        assert_eq!(body["language"], "my");
        let keys: Vec<String> =
            serde_json::from_value(body["messages"].clone()).unwrap();
        assert!(keys.contains(&"processing".to_string()));
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let app = build_health_app(state());
        let response = app
            .oneshot(Request::get("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), axum::http::StatusCode::NOT_FOUND);
    }
}
