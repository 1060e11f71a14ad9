//! MediReminder REST API Client
//!
//! HTTP client for communicating with the MediReminder backend. Every request
//! carries a JSON content type and, when a session exists, a bearer token.

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::dto::*;
use super::error::{extract_error_message, ApiError, ApiResult};
use crate::config::ApiConfig;

/// MediReminder REST API client
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a new client with the given configuration
    pub fn new(config: &ApiConfig) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(ApiError::Network)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Attach a session token to every subsequent request
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Issue a request and decode the JSON response.
    ///
    /// Returns `Ok(None)` for `204 No Content`. Non-success statuses become
    /// [`ApiError::Status`] with the message extracted from the error body.
    pub async fn request<T, B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> ApiResult<Option<T>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let mut builder = self
            .client
            .request(method.clone(), self.url(path))
            .header(CONTENT_TYPE, "application/json");

        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(ApiError::from_transport)?;
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = extract_error_message(status.as_u16(), &text);
            tracing::debug!(%method, path, status = status.as_u16(), %message, "API request failed");
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        if status == StatusCode::NO_CONTENT {
            return Ok(None);
        }

        let bytes = response.bytes().await.map_err(ApiError::from_transport)?;
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn fetch<T, B>(&self, method: Method, path: &str, body: Option<&B>) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(method, path, body)
            .await?
            .ok_or_else(|| ApiError::EmptyResponse(path.to_string()))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.fetch::<T, ()>(Method::GET, path, None).await
    }

    async fn delete(&self, path: &str) -> ApiResult<()> {
        self.request::<serde_json::Value, ()>(Method::DELETE, path, None)
            .await
            .map(|_| ())
    }

    // ============================================
    // Auth
    // ============================================

    /// Check that the backend is reachable
    pub async fn health(&self) -> ApiResult<HealthResponse> {
        self.get("/").await
    }

    pub async fn login(&self, request: &LoginRequest) -> ApiResult<AuthResponse> {
        self.fetch(Method::POST, "/auth/login", Some(request)).await
    }

    pub async fn signup(&self, request: &SignupRequest) -> ApiResult<AuthResponse> {
        self.fetch(Method::POST, "/auth/signup", Some(request)).await
    }

    /// Fetch the user the current token belongs to
    pub async fn me(&self) -> ApiResult<AuthUser> {
        if self.token.is_none() {
            return Err(ApiError::Unauthenticated);
        }
        self.get("/auth/me").await
    }

    // ============================================
    // Medicines
    // ============================================

    pub async fn list_medicines(&self) -> ApiResult<Vec<Medication>> {
        self.get("/medicines").await
    }

    pub async fn create_medicine(&self, medication: &NewMedication) -> ApiResult<Medication> {
        self.fetch(Method::POST, "/medicines", Some(medication)).await
    }

    pub async fn update_medicine(
        &self,
        id: &RecordId,
        update: &MedicationUpdate,
    ) -> ApiResult<Medication> {
        self.fetch(Method::PUT, &record_path("medicines", id), Some(update))
            .await
    }

    pub async fn delete_medicine(&self, id: &RecordId) -> ApiResult<()> {
        self.delete(&record_path("medicines", id)).await
    }

    // ============================================
    // Caregivers
    // ============================================

    pub async fn list_caregivers(&self) -> ApiResult<Vec<Caregiver>> {
        self.get("/caregivers").await
    }

    pub async fn create_caregiver(&self, caregiver: &NewCaregiver) -> ApiResult<Caregiver> {
        self.fetch(Method::POST, "/caregivers", Some(caregiver)).await
    }

    pub async fn update_caregiver(
        &self,
        id: &RecordId,
        update: &CaregiverUpdate,
    ) -> ApiResult<Caregiver> {
        self.fetch(Method::PUT, &record_path("caregivers", id), Some(update))
            .await
    }

    pub async fn delete_caregiver(&self, id: &RecordId) -> ApiResult<()> {
        self.delete(&record_path("caregivers", id)).await
    }

    // ============================================
    // Alarms
    // ============================================

    pub async fn list_alarms(&self) -> ApiResult<Vec<Alarm>> {
        self.get("/alarms").await
    }

    pub async fn create_alarm(&self, alarm: &NewAlarm) -> ApiResult<Alarm> {
        self.fetch(Method::POST, "/alarms", Some(alarm)).await
    }

    pub async fn update_alarm(&self, id: &RecordId, update: &AlarmUpdate) -> ApiResult<Alarm> {
        self.fetch(Method::PUT, &record_path("alarms", id), Some(update))
            .await
    }

    pub async fn delete_alarm(&self, id: &RecordId) -> ApiResult<()> {
        self.delete(&record_path("alarms", id)).await
    }
}

/// `/{collection}/{id}` with text ids escaped as a single path segment
fn record_path(collection: &str, id: &RecordId) -> String {
    match id {
        RecordId::Int(id) => format!("/{}/{}", collection, id),
        RecordId::Text(id) => format!("/{}/{}", collection, urlencoding::encode(id)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::Path,
        http::{HeaderMap, StatusCode as AxumStatus},
        routing::{delete, get, post, put},
        Json, Router,
    };
    use serde_json::{json, Value};

    async fn spawn_server(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn client_for(base_url: &str) -> ApiClient {
        ApiClient::new(&ApiConfig {
            base_url: base_url.to_string(),
            request_timeout_secs: 5,
        })
        .unwrap()
    }

    fn mock_backend() -> Router {
        Router::new()
            .route(
                "/alarms",
                get(|headers: HeaderMap| async move {
                    let auth = headers
                        .get("authorization")
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or_default()
                        .to_string();
                    if auth != "Bearer secret-token" {
                        return (
                            AxumStatus::UNAUTHORIZED,
                            Json(json!({"detail": "Missing or invalid Authorization header"})),
                        );
                    }
                    (
                        AxumStatus::OK,
                        Json(json!([
                            {"id": 1, "medication_name": "Aspirin", "scheduled_time": "08:00"},
                            {"id": "b", "medication_name": "Zinc", "scheduled_time": "20:00", "status": "taken"}
                        ])),
                    )
                }),
            )
            .route(
                "/alarms/:id",
                put(|Path(id): Path<String>, Json(body): Json<Value>| async move {
                    Json(json!({
                        "id": id,
                        "medication_name": "Aspirin",
                        "scheduled_time": "08:00",
                        "status": body["status"],
                    }))
                }),
            )
            .route(
                "/medicines/:id",
                delete(|| async { AxumStatus::NO_CONTENT }),
            )
            .route(
                "/medicines",
                post(|Json(body): Json<Value>| async move {
                    let mut created = body.clone();
                    created["id"] = json!(99);
                    created["user_id"] = json!("u1");
                    (AxumStatus::CREATED, Json(created))
                }),
            )
            .route(
                "/auth/login",
                post(|| async {
                    (
                        AxumStatus::UNPROCESSABLE_ENTITY,
                        Json(json!({"detail": [{"msg": "x"}, {"msg": "y"}]})),
                    )
                }),
            )
            .route(
                "/caregivers",
                get(|| async { (AxumStatus::INTERNAL_SERVER_ERROR, "upstream exploded") }),
            )
    }

    #[tokio::test]
    async fn test_bearer_token_attached() {
        let base = spawn_server(mock_backend()).await;
        let client = client_for(&base).with_token("secret-token");

        let alarms = client.list_alarms().await.unwrap();
        assert_eq!(alarms.len(), 2);
        assert_eq!(alarms[0].id, Some(RecordId::Int(1)));
        assert_eq!(alarms[1].status, Some(AlarmStatus::Taken));
    }

    #[tokio::test]
    async fn test_missing_token_surfaces_detail() {
        let base = spawn_server(mock_backend()).await;
        let client = client_for(&base);

        let err = client.list_alarms().await.unwrap_err();
        assert_eq!(err.status(), Some(401));
        assert_eq!(err.to_string(), "Missing or invalid Authorization header");
        assert!(err.is_unauthorized());
    }

    #[tokio::test]
    async fn test_no_content_is_empty_result() {
        let base = spawn_server(mock_backend()).await;
        let client = client_for(&base).with_token("secret-token");

        let result: Option<Value> = client
            .request::<Value, ()>(Method::DELETE, "/medicines/3", None)
            .await
            .unwrap();
        assert!(result.is_none());

        client.delete_medicine(&RecordId::Int(3)).await.unwrap();
    }

    #[tokio::test]
    async fn test_detail_list_joined() {
        let base = spawn_server(mock_backend()).await;
        let client = client_for(&base);

        let err = client
            .login(&LoginRequest {
                identifier: "ada@example.com".to_string(),
                password: "pw".to_string(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "x, y");
        assert_eq!(err.status(), Some(422));
    }

    #[tokio::test]
    async fn test_unparsable_error_body() {
        let base = spawn_server(mock_backend()).await;
        let client = client_for(&base);

        let err = client.list_caregivers().await.unwrap_err();
        assert_eq!(err.to_string(), "Request failed with status 500");
    }

    #[tokio::test]
    async fn test_create_and_update_round_trip() {
        let base = spawn_server(mock_backend()).await;
        let client = client_for(&base).with_token("secret-token");

        let created = client
            .create_medicine(&NewMedication {
                name: "Metformin".to_string(),
                dosage: "500mg".to_string(),
                frequency: "Daily".to_string(),
                time: "08:30".to_string(),
                instructions: None,
                active: true,
                start_date: chrono::NaiveDate::from_ymd_opt(2026, 10, 1).unwrap(),
            })
            .await
            .unwrap();
        assert_eq!(created.id, RecordId::Int(99));
        assert_eq!(created.time, "08:30");
        assert_eq!(created.instructions, None);

        let updated = client
            .update_alarm(&RecordId::Int(1), &AlarmUpdate::status(AlarmStatus::Snoozed))
            .await
            .unwrap();
        assert_eq!(updated.status, Some(AlarmStatus::Snoozed));
        assert_eq!(updated.id, Some(RecordId::Text("1".to_string())));
    }

    #[test]
    fn test_record_path_escapes_text_ids() {
        assert_eq!(record_path("alarms", &RecordId::Int(12)), "/alarms/12");
        assert_eq!(
            record_path("medicines", &RecordId::Text("a/b?c#d".to_string())),
            "/medicines/a%2Fb%3Fc%23d"
        );
        assert_eq!(
            record_path("caregivers", &RecordId::Text("7f3e".to_string())),
            "/caregivers/7f3e"
        );
    }

    #[tokio::test]
    async fn test_text_id_reaches_server_as_one_segment() {
        let base = spawn_server(mock_backend()).await;
        let client = client_for(&base).with_token("secret-token");

        let id = RecordId::Text("night/dose 2".to_string());
        let updated = client
            .update_alarm(&id, &AlarmUpdate::status(AlarmStatus::Taken))
            .await
            .unwrap();
        assert_eq!(updated.id, Some(id));
        assert_eq!(updated.status, Some(AlarmStatus::Taken));
    }

    #[tokio::test]
    async fn test_me_requires_token() {
        let client = client_for("http://127.0.0.1:9");
        let err = client.me().await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthenticated));
        assert!(err.is_unauthorized());
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = client_for(&format!("http://{}", addr));
        let err = client.health().await.unwrap_err();
        assert!(matches!(err, ApiError::Network(_)));
    }

    #[test]
    fn test_url_joining() {
        let client = client_for("http://localhost:8000/");
        assert_eq!(client.base_url(), "http://localhost:8000");
        assert_eq!(client.url("/medicines"), "http://localhost:8000/medicines");
        assert_eq!(client.url("alarms/3"), "http://localhost:8000/alarms/3");
    }
}
