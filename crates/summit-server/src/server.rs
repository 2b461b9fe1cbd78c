use std::net::SocketAddr;

use axum::Router;
use axum::routing::{get, post};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::AppConfig;
use crate::handlers;
use crate::state::AppState;

pub struct SummitServer {
    addr: SocketAddr,
    app: Router,
}

pub fn build_app(state: AppState, cfg: &AppConfig) -> Router {
    let body_limit = cfg.server.body_limit_bytes;
    Router::new()
        // Health and info endpoints
        .route("/", get(handlers::root))
        .route("/healthz", get(handlers::healthz))
        // Conferences
        .route("/conferences", post(handlers::create_conference))
        .route("/conferences/query", post(handlers::query_conferences))
        // Static segments must be registered alongside the {token}
        // routes; the router prefers the literal match.
        .route("/conferences/created", get(handlers::conferences_created))
        .route("/conferences/attending", get(handlers::conferences_to_attend))
        .route(
            "/conferences/{token}",
            get(handlers::get_conference).put(handlers::update_conference),
        )
        .route(
            "/conferences/{token}/registration",
            post(handlers::register).delete(handlers::unregister),
        )
        // Sessions
        .route(
            "/conferences/{token}/sessions",
            get(handlers::list_conference_sessions).post(handlers::create_session),
        )
        .route(
            "/conferences/{token}/sessions/type/{type}",
            get(handlers::sessions_by_type),
        )
        .route("/sessions/speaker/{speaker}", get(handlers::sessions_by_speaker))
        .route(
            "/sessions/early-non-workshop",
            get(handlers::early_non_workshop_sessions),
        )
        .route("/sessions/total", get(handlers::total_session_count))
        .route("/sessions/keynote-speakers", get(handlers::keynote_speakers))
        .route(
            "/sessions/{token}/wishlist",
            post(handlers::add_to_wishlist).delete(handlers::remove_from_wishlist),
        )
        // Profile
        .route(
            "/profile",
            get(handlers::get_profile).put(handlers::save_profile),
        )
        .route("/profile/wishlist", get(handlers::list_wishlist))
        // Cached reads
        .route("/announcement", get(handlers::get_announcement))
        .route("/speaker/featured", get(handlers::get_featured_speaker))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(axum::extract::DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

pub struct ServerBuilder {
    addr: SocketAddr,
    config: AppConfig,
    state: Option<AppState>,
}

impl ServerBuilder {
    pub fn new() -> Self {
        let cfg = AppConfig::default();
        Self {
            addr: cfg.addr(),
            config: cfg,
            state: None,
        }
    }

    pub fn with_addr(mut self, addr: SocketAddr) -> Self {
        self.addr = addr;
        self
    }

    pub fn with_config(mut self, cfg: AppConfig) -> Self {
        self.addr = cfg.addr();
        self.config = cfg;
        self
    }

    pub fn with_state(mut self, state: AppState) -> Self {
        self.state = Some(state);
        self
    }

    pub fn build(self) -> SummitServer {
        let state = self
            .state
            .unwrap_or_else(|| AppState::in_memory(self.config.jobs.workers));
        let app = build_app(state, &self.config);

        SummitServer {
            addr: self.addr,
            app,
        }
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SummitServer {
    pub async fn run(self) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        tracing::info!("listening on {}", self.addr);
        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }
}

async fn shutdown_signal() {
    // Wait for Ctrl+C
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use tower::ServiceExt;

    fn app() -> Router {
        build_app(AppState::in_memory(1), &AppConfig::default())
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_healthz() {
        let response = app()
            .oneshot(Request::get("/healthz").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_create_requires_identity() {
        let response = app()
            .oneshot(
                Request::post("/conferences")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"name":"RustConf"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["error"]["code"], "unauthorized");
    }

    #[tokio::test]
    async fn test_conference_round_trip_over_http() {
        let app = app();
        let response = app
            .clone()
            .oneshot(
                Request::post("/conferences")
                    .header("x-user-id", "alice")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"name":"RustConf","maxAttendees":3}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let created = body_json(response).await;
        let token = created["websafeKey"].as_str().unwrap().to_string();

        let response = app
            .clone()
            .oneshot(
                Request::get(format!("/conferences/{token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let fetched = body_json(response).await;
        assert_eq!(fetched["name"], "RustConf");
        assert_eq!(fetched["seatsAvailable"], 3);

        let response = app
            .oneshot(
                Request::post(format!("/conferences/{token}/registration"))
                    .header("x-user-id", "bob")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["data"], true);
    }

    #[tokio::test]
    async fn test_static_routes_win_over_token_routes() {
        let response = app()
            .oneshot(
                Request::get("/conferences/created")
                    .header("x-user-id", "alice")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_json(response).await["items"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_announcement_defaults_to_empty() {
        let response = app()
            .oneshot(Request::get("/announcement").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["data"], "");
    }

    #[tokio::test]
    async fn test_unknown_conference_is_json_fault() {
        let ghost = summit_core::ConferenceKey::new(summit_core::ProfileKey::new("ghost"), 1)
            .websafe();
        let response = app()
            .oneshot(
                Request::get(format!("/conferences/{ghost}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["error"]["code"], "not-found");
    }
}
