//! [`NotificationSink`] backed by the Home Assistant REST API.

use std::future::Future;
use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use serde::Serialize;

use planner_app::ports::{NotificationSink, NotifyError};

use crate::config::HomeAssistantConfig;

const SELECT_OPTION_PATH: &str = "/api/services/input_select/select_option";
const API_ROOT_PATH: &str = "/api/";

#[derive(Serialize)]
struct SelectOption<'a> {
    entity_id: &'a str,
    option: &'a str,
}

/// Pushes values by selecting options on Home Assistant `input_select`s.
pub struct HomeAssistantSink {
    client: Client,
    base_url: String,
    token: Option<String>,
    timeout: Duration,
}

impl HomeAssistantSink {
    /// Build the sink and its HTTP client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialised.
    pub fn new(config: HomeAssistantConfig) -> Result<Self, reqwest::Error> {
        let timeout = Duration::from_secs(config.request_timeout_secs);
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.filter(|token| !token.trim().is_empty()),
            timeout,
        })
    }

    fn token(&self) -> Result<&str, NotifyError> {
        self.token.as_deref().ok_or(NotifyError::MissingCredential)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn transport_error(&self, err: reqwest::Error) -> NotifyError {
        if err.is_timeout() {
            NotifyError::TimedOut(self.timeout)
        } else {
            NotifyError::Transport(Box::new(err))
        }
    }
}

async fn check(response: Response) -> Result<(), NotifyError> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
        return Err(NotifyError::Unauthorized {
            status: status.as_u16(),
        });
    }
    let body = response.text().await.unwrap_or_default();
    Err(NotifyError::Rejected {
        status: status.as_u16(),
        body,
    })
}

impl NotificationSink for HomeAssistantSink {
    fn verify(&self) -> impl Future<Output = Result<(), NotifyError>> + Send {
        async move {
            let token = self.token()?;
            let response = self
                .client
                .get(self.url(API_ROOT_PATH))
                .bearer_auth(token)
                .send()
                .await
                .map_err(|err| self.transport_error(err))?;
            check(response).await?;
            tracing::debug!(base_url = %self.base_url, "home assistant reachable");
            Ok(())
        }
    }

    fn notify(
        &self,
        entity: &str,
        value: &str,
    ) -> impl Future<Output = Result<(), NotifyError>> + Send {
        async move {
            let token = self.token()?;
            let body = SelectOption {
                entity_id: entity,
                option: value,
            };
            let response = self
                .client
                .post(self.url(SELECT_OPTION_PATH))
                .bearer_auth(token)
                .json(&body)
                .send()
                .await
                .map_err(|err| self.transport_error(err))?;
            check(response).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::{Arc, Mutex};

    use axum::extract::State;
    use axum::http::HeaderMap;
    use axum::http::header::AUTHORIZATION;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::{Value, json};

    const TOKEN: &str = "secret-token";

    #[derive(Clone, Default)]
    struct FakeHub {
        received: Arc<Mutex<Vec<Value>>>,
    }

    fn authorized(headers: &HeaderMap) -> bool {
        headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            == Some(format!("Bearer {TOKEN}").as_str())
    }

    async fn api_root(headers: HeaderMap) -> (StatusCode, Json<Value>) {
        if !authorized(&headers) {
            return (StatusCode::UNAUTHORIZED, Json(json!({})));
        }
        (StatusCode::OK, Json(json!({ "message": "API running." })))
    }

    async fn select_option(
        State(hub): State<FakeHub>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> (StatusCode, String) {
        if !authorized(&headers) {
            return (StatusCode::UNAUTHORIZED, String::new());
        }
        match body["option"].as_str() {
            Some("Boom") => return (StatusCode::BAD_REQUEST, "invalid option".to_string()),
            Some("Slow") => tokio::time::sleep(Duration::from_secs(5)).await,
            _ => {}
        }
        hub.received.lock().unwrap().push(body);
        (StatusCode::OK, "[]".to_string())
    }

    async fn spawn_fake_hub() -> (String, FakeHub) {
        let hub = FakeHub::default();
        let app = Router::new()
            .route(API_ROOT_PATH, get(api_root))
            .route(SELECT_OPTION_PATH, post(select_option))
            .with_state(hub.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{addr}"), hub)
    }

    fn make_sink(base_url: &str, token: Option<&str>) -> HomeAssistantSink {
        HomeAssistantSink::new(HomeAssistantConfig {
            base_url: base_url.to_string(),
            token: token.map(ToString::to_string),
            request_timeout_secs: 1,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn should_verify_with_valid_token() {
        let (url, _) = spawn_fake_hub().await;
        let sink = make_sink(&url, Some(TOKEN));
        sink.verify().await.unwrap();
    }

    #[tokio::test]
    async fn should_report_rejected_token_as_credential_error() {
        let (url, _) = spawn_fake_hub().await;
        let sink = make_sink(&url, Some("wrong"));
        let err = sink.verify().await.unwrap_err();
        assert!(matches!(err, NotifyError::Unauthorized { status: 401 }));
        assert!(err.is_credential_error());
    }

    #[tokio::test]
    async fn should_report_missing_token_without_calling_hub() {
        let (url, hub) = spawn_fake_hub().await;
        let sink = make_sink(&url, Some("   "));

        let err = sink.notify("input_select.planner_mode", "Travail").await;
        assert!(matches!(err, Err(NotifyError::MissingCredential)));
        assert!(hub.received.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn should_select_option_on_entity() {
        let (url, hub) = spawn_fake_hub().await;
        let sink = make_sink(&format!("{url}/"), Some(TOKEN));

        sink.notify("input_select.planner_phase", "Soirée")
            .await
            .unwrap();

        let received = hub.received.lock().unwrap().clone();
        assert_eq!(
            received,
            vec![json!({ "entity_id": "input_select.planner_phase", "option": "Soirée" })]
        );
    }

    #[tokio::test]
    async fn should_report_error_status_with_body() {
        let (url, _) = spawn_fake_hub().await;
        let sink = make_sink(&url, Some(TOKEN));

        let err = sink
            .notify("input_select.planner_mode", "Boom")
            .await
            .unwrap_err();

        let NotifyError::Rejected { status, body } = err else {
            panic!("expected a rejection, got {err:?}");
        };
        assert_eq!(status, 400);
        assert_eq!(body, "invalid option");
    }

    #[tokio::test]
    async fn should_report_unreachable_hub_as_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let sink = make_sink(&format!("http://{addr}"), Some(TOKEN));

        let err = sink.verify().await.unwrap_err();
        assert!(matches!(err, NotifyError::Transport(_)));
        assert!(!err.is_credential_error());
    }

    #[tokio::test]
    async fn should_report_slow_hub_as_timeout() {
        let (url, _) = spawn_fake_hub().await;
        let sink = make_sink(&url, Some(TOKEN));

        let err = sink
            .notify("input_select.planner_mode", "Slow")
            .await
            .unwrap_err();
        assert!(matches!(err, NotifyError::TimedOut(_)));
    }
}
