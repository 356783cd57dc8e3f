//! API Server Module
//!
//! This module implements the HTTP endpoints for poll submission.
//! Submitted polls are validated against the current event catalog and the
//! result is returned to the client; errors use the `{ "error": message }`
//! shape the web client displays.

use crate::{
    config::Config,
    state::EventCatalog,
    validation::{Eip712Recovery, PollValidator},
    EventRecord, PollSubmission, ValidationResult,
};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Shared application state that is accessible across all request handlers
///
/// - `validator`: Validates incoming poll submissions
/// - `catalog`: Allow-listed events polls may be scoped to
#[derive(Clone)]
pub struct AppState {
    validator: Arc<PollValidator>,
    catalog: EventCatalog,
}

/// The main API server struct
pub struct Server {
    config: Config,
    state: AppState,
}

impl Server {
    /// Creates a new API server instance
    ///
    /// # Arguments
    /// * `config` - Server configuration (host, port, signing domain)
    /// * `catalog` - The event catalog polls are checked against
    pub fn new(config: Config, catalog: EventCatalog) -> Self {
        // Signatures are recovered under the configured EIP-712 domain
        let recovery = Eip712Recovery::new(config.signing.clone());
        let state = AppState {
            validator: Arc::new(PollValidator::new(recovery)),
            catalog,
        };

        // Bundle the config with the shared state
        Self { config, state }
    }

    /// Router with every API endpoint mounted
    pub fn router(&self) -> Router {
        Router::new()
            .route("/api/polls", post(handle_create_poll))
            .route("/api/events", get(handle_list_events).put(handle_replace_events))
            .with_state(self.state.clone())
    }

    /// Starts the API server and begins listening for incoming requests
    ///
    /// This method:
    /// 1. Builds the router with the poll and event endpoints
    /// 2. Binds the router to the configured host and port
    /// 3. Starts serving requests asynchronously
    ///
    /// # Returns
    /// `Ok(())` if the server shuts down cleanly, or an error if binding fails
    pub async fn start(self) -> anyhow::Result<()> {
        // Step 1: Build the router with every endpoint mounted
        let app = self.router();

        // Step 2: Format the listening address from config
        let addr = format!("{}:{}", self.config.api.host, self.config.api.port);
        info!("API server listening on {}", addr);

        // Step 3: Bind to the TCP address and start serving
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }
}

/// Error body understood by the web client
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

fn bad_request(error: String) -> Response {
    (StatusCode::BAD_REQUEST, Json(ErrorBody { error })).into_response()
}

/// Handles `POST /api/polls`
///
/// 1. Deserializes the poll from the request body
/// 2. Validates it against a snapshot of the event catalog
/// 3. Returns the `ValidationResult` on success, or `400` with the reason
async fn handle_create_poll(State(state): State<AppState>, Json(body): Json<Value>) -> Response {
    // Step 1: Deserialize the poll; only a non-object body or a non-array list fails here
    let poll: PollSubmission = match serde_json::from_value(body) {
        Ok(poll) => poll,
        Err(e) => {
            warn!("Failed to deserialize poll submission: {}", e);
            return bad_request(format!("Invalid poll data: {}", e));
        }
    };

    // Step 2: Take a consistent snapshot of the catalog and the clock
    let events = state.catalog.snapshot().await;
    let now = Utc::now().timestamp();
    debug!("Validating poll {:?} from {:?}", poll.title, poll.polltaker_account);

    // Step 3: Run the stages; the first failure decides the response
    match state.validator.failing_stage(&poll, &events, now) {
        None => {
            info!("Poll {:?} from {:?} accepted", poll.title, poll.polltaker_account);
            (StatusCode::OK, Json(ValidationResult::valid())).into_response()
        }
        Some((stage, error)) => {
            warn!(
                "Poll from {:?} rejected at {} stage: {:?}",
                poll.polltaker_account, stage, error
            );
            bad_request(error.to_string())
        }
    }
}

/// Handles `GET /api/events`
async fn handle_list_events(State(state): State<AppState>) -> Json<Vec<EventRecord>> {
    Json(state.catalog.snapshot().await.as_ref().clone())
}

/// Handles `PUT /api/events`, replacing the whole catalog
async fn handle_replace_events(
    State(state): State<AppState>,
    Json(events): Json<Vec<EventRecord>>,
) -> Json<Value> {
    let count = events.len();
    state.catalog.replace(events).await;
    info!("Event catalog replaced with {} events", count);

    Json(serde_json::json!({ "events": count }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ApiConfig, EventsConfig};
    use crate::validation::tests::{events, signed_poll, test_domain};
    use crate::EventId;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    fn test_server(catalog: EventCatalog) -> Server {
        let config = Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            events: EventsConfig::default(),
            signing: test_domain(),
        };
        Server::new(config, catalog)
    }

    async fn send(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(match body {
                Some(body) => Body::from(body.to_string()),
                None => Body::empty(),
            })
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_create_poll_with_missing_fields_is_rejected() {
        let app = test_server(EventCatalog::new()).router();

        let (status, body) = send(app, "POST", "/api/polls", Some(serde_json::json!({ "title": "Lunch?" }))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Missing required poll data fields");
    }

    #[tokio::test]
    async fn test_create_poll_with_wrong_typed_fields_is_rejected_as_missing() {
        let app = test_server(EventCatalog::new()).router();
        let body = serde_json::json!({ "title": false, "description": 0 });

        let (status, body) = send(app, "POST", "/api/polls", Some(body)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Missing required poll data fields");
    }

    #[tokio::test]
    async fn test_create_poll_with_negative_end_date_is_rejected() {
        let catalog = EventCatalog::new();
        catalog.replace(events()).await;
        let app = test_server(catalog).router();
        let mut poll = serde_json::to_value(signed_poll(Utc::now().timestamp()).await).unwrap();
        poll["end_date"] = serde_json::json!(-5);

        let (status, body) = send(app, "POST", "/api/polls", Some(poll)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Poll end date must be at least 1 day in the future");
    }

    #[tokio::test]
    async fn test_create_poll_with_valid_attestation_is_accepted() {
        let catalog = EventCatalog::new();
        catalog.replace(events()).await;
        let app = test_server(catalog).router();
        let poll = signed_poll(Utc::now().timestamp()).await;

        let (status, body) = send(app, "POST", "/api/polls", Some(serde_json::to_value(&poll).unwrap())).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!({ "isValid": true, "errorMessage": null }));
    }

    #[tokio::test]
    async fn test_create_poll_with_unknown_event_is_rejected() {
        let catalog = EventCatalog::new();
        catalog.replace(vec![EventRecord::new(EventId::number(5))]).await;
        let app = test_server(catalog).router();
        let poll = signed_poll(Utc::now().timestamp()).await;

        let (status, body) = send(app, "POST", "/api/polls", Some(serde_json::to_value(&poll).unwrap())).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid ID in qualifying events 7");
    }

    #[tokio::test]
    async fn test_create_poll_with_non_object_body_is_rejected() {
        let app = test_server(EventCatalog::new()).router();

        let (status, body) = send(app, "POST", "/api/polls", Some(serde_json::json!("not a poll"))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().starts_with("Invalid poll data"));
    }

    #[tokio::test]
    async fn test_events_can_be_replaced_and_listed() {
        let server = test_server(EventCatalog::new());

        let (status, body) = send(
            server.router(),
            "PUT",
            "/api/events",
            Some(serde_json::json!([{ "id": 1, "name": "ETHDenver" }, { "id": 7 }])),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["events"], 2);

        let (status, body) = send(server.router(), "GET", "/api/events", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["id"], 1);
        assert_eq!(body[0]["name"], "ETHDenver");
        assert_eq!(body[1]["id"], 7);
    }
}
