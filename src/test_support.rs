//! In-process fake of the wellness backend for tests.
//!
//! Binds an `axum` router on `127.0.0.1:0`, records every request it sees,
//! and lets a test force any route to fail with a chosen status and body.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use serde_json::{Value, json};

use crate::config::ClientConfig;
use crate::net::http::ApiClient;

pub(crate) const NO_SURVEYS_MESSAGE: &str = "Nenhum questionário disponível para este funcionário.";

/// One request as observed by the fake.
#[derive(Debug, Clone)]
pub(crate) struct Recorded {
    pub route: &'static str,
    pub authorization: Option<String>,
    pub query: HashMap<String, String>,
    pub body: Value,
}

#[derive(Default)]
pub(crate) struct FakeState {
    pub login_reply: Mutex<Option<(u16, Value)>>,
    pub login_delay_ms: AtomicU64,
    pub failures: Mutex<HashMap<&'static str, (u16, Value)>>,
    pub checkins: Mutex<Vec<Value>>,
    pub materials: Mutex<Vec<Value>>,
    pub files: Mutex<HashMap<String, Vec<u8>>>,
    pub surveys: Mutex<Vec<Value>>,
    pub survey_details: Mutex<HashMap<i64, Value>>,
    pub requests: Mutex<Vec<Recorded>>,
}

pub(crate) struct FakeBackend {
    pub base_url: String,
    pub state: Arc<FakeState>,
}

impl FakeBackend {
    pub async fn spawn() -> Self {
        let state = Arc::new(FakeState::default());
        let app = Router::new()
            .route("/auth/login", post(login))
            .route("/esqueci-minha-senha", post(forgot_password))
            .route("/cadastroSenha", post(set_password))
            .route("/checkin/novo", post(create_checkin))
            .route("/checkin/historico/{user_id}", get(checkin_history))
            .route("/materiais/listar", get(list_materials))
            .route("/materiais/download/{file_name}", get(download_material))
            .route("/questionarios", get(list_surveys))
            .route("/questionario/resposta", post(submit_answers))
            .route("/questionario/{id}", get(survey_detail))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("fake backend should bind");
        let addr = listener
            .local_addr()
            .expect("fake backend should have an address");
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self { base_url: format!("http://{addr}"), state }
    }

    pub fn config(&self) -> ClientConfig {
        ClientConfig::new(&self.base_url).expect("fake backend URL should be valid")
    }

    pub fn api(&self) -> ApiClient {
        ApiClient::new(&self.config()).expect("api client should build")
    }

    pub fn set_login_reply(&self, status: u16, body: Value) {
        *self.state.login_reply.lock().unwrap() = Some((status, body));
    }

    /// Make every request to `route` answer `status` with `body`.
    pub fn fail(&self, route: &'static str, status: u16, body: Value) {
        self.state
            .failures
            .lock()
            .unwrap()
            .insert(route, (status, body));
    }

    pub fn requests_for(&self, route: &str) -> Vec<Recorded> {
        self.state
            .requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.route == route)
            .cloned()
            .collect()
    }
}

/// Login reply for a correctly-roled staff member.
pub(crate) fn staff_login_body(id: i64, token: &str) -> Value {
    json!({
        "user": { "id": id, "name": "Ana Souza", "email": "ana@empresa.test", "role": ["FUNC"] },
        "token": token,
    })
}

// =============================================================================
// HANDLER PLUMBING
// =============================================================================

fn record(state: &FakeState, route: &'static str, headers: &HeaderMap, query: HashMap<String, String>, body: Value) {
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(ToOwned::to_owned);
    state
        .requests
        .lock()
        .unwrap()
        .push(Recorded { route, authorization, query, body });
}

fn forced(state: &FakeState, route: &'static str) -> Option<Response> {
    let failures = state.failures.lock().unwrap();
    let (status, body) = failures.get(route)?;
    Some(reply(*status, body.clone()))
}

fn reply(status: u16, body: Value) -> Response {
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(body)).into_response()
}

// =============================================================================
// HANDLERS
// =============================================================================

async fn login(State(state): State<Arc<FakeState>>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    record(&state, "login", &headers, HashMap::new(), body);
    let delay = state.login_delay_ms.load(Ordering::SeqCst);
    if delay > 0 {
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }
    if let Some(resp) = forced(&state, "login") {
        return resp;
    }
    let canned = state.login_reply.lock().unwrap().clone();
    match canned {
        Some((status, body)) => reply(status, body),
        None => reply(401, json!({ "message": "Credenciais inválidas" })),
    }
}

async fn forgot_password(State(state): State<Arc<FakeState>>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    record(&state, "forgot_password", &headers, HashMap::new(), body);
    if let Some(resp) = forced(&state, "forgot_password") {
        return resp;
    }
    (StatusCode::OK, "Link de recuperação enviado para o e-mail.").into_response()
}

async fn set_password(
    State(state): State<Arc<FakeState>>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> Response {
    record(&state, "set_password", &headers, query, body);
    if let Some(resp) = forced(&state, "set_password") {
        return resp;
    }
    (StatusCode::OK, "Senha cadastrada com sucesso.").into_response()
}

async fn create_checkin(State(state): State<Arc<FakeState>>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    record(&state, "checkin", &headers, HashMap::new(), body.clone());
    if let Some(resp) = forced(&state, "checkin") {
        return resp;
    }
    let mut checkins = state.checkins.lock().unwrap();
    let mut stored = body;
    if let Some(map) = stored.as_object_mut() {
        map.insert("id".into(), json!(checkins.len() + 1));
    }
    checkins.push(stored.clone());
    (StatusCode::CREATED, Json(stored)).into_response()
}

async fn checkin_history(
    State(state): State<Arc<FakeState>>,
    headers: HeaderMap,
    Path(user_id): Path<i64>,
) -> Response {
    record(&state, "history", &headers, HashMap::new(), Value::Null);
    if let Some(resp) = forced(&state, "history") {
        return resp;
    }
    let checkins = state.checkins.lock().unwrap();
    let rows: Vec<Value> = checkins
        .iter()
        .filter(|c| c.get("idFuncionario").and_then(Value::as_i64) == Some(user_id))
        .cloned()
        .collect();
    Json(rows).into_response()
}

async fn list_materials(State(state): State<Arc<FakeState>>, headers: HeaderMap) -> Response {
    record(&state, "materials", &headers, HashMap::new(), Value::Null);
    if let Some(resp) = forced(&state, "materials") {
        return resp;
    }
    let materials = state.materials.lock().unwrap().clone();
    Json(materials).into_response()
}

async fn download_material(
    State(state): State<Arc<FakeState>>,
    headers: HeaderMap,
    Path(file_name): Path<String>,
) -> Response {
    record(&state, "download", &headers, HashMap::new(), json!(file_name));
    if let Some(resp) = forced(&state, "download") {
        return resp;
    }
    match state.files.lock().unwrap().get(&file_name) {
        Some(bytes) => (StatusCode::OK, bytes.clone()).into_response(),
        None => reply(404, json!({ "message": "Arquivo não encontrado" })),
    }
}

async fn list_surveys(
    State(state): State<Arc<FakeState>>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    record(&state, "surveys", &headers, query, Value::Null);
    if let Some(resp) = forced(&state, "surveys") {
        return resp;
    }
    let surveys = state.surveys.lock().unwrap().clone();
    if surveys.is_empty() {
        return reply(404, json!({ "message": NO_SURVEYS_MESSAGE }));
    }
    Json(surveys).into_response()
}

async fn survey_detail(State(state): State<Arc<FakeState>>, headers: HeaderMap, Path(id): Path<i64>) -> Response {
    record(&state, "survey", &headers, HashMap::new(), Value::Null);
    if let Some(resp) = forced(&state, "survey") {
        return resp;
    }
    match state.survey_details.lock().unwrap().get(&id) {
        Some(detail) => Json(detail.clone()).into_response(),
        None => reply(404, json!({ "message": "Questionário não encontrado" })),
    }
}

async fn submit_answers(
    State(state): State<Arc<FakeState>>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> Response {
    record(&state, "answers", &headers, query, body);
    if let Some(resp) = forced(&state, "answers") {
        return resp;
    }
    StatusCode::OK.into_response()
}
