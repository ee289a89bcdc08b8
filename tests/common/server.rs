//! In-process mock of the restaurant backend
//!
//! Used when no live backend is configured. It follows the backend's REST
//! contract closely enough for every e2e test to run against it: bearer
//! authentication with the configured credentials, sequential ids, the id
//! checks on create / update, and 201 / 200 / 204 / 400 / 401 / 404
//! statuses.
//!
//! Each test spawns its own instance on a random port, so tests running in
//! parallel never see each other's entities.

use super::constants::*;
use axum::extract::{Path, State};
use axum::http::{header::AUTHORIZATION, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use restaurant_api_tests::{Credentials, Resource, ResourceKey};
use serde_json::{json, Map, Value};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::debug;
use uuid::Uuid;

type Entity = Map<String, Value>;

#[derive(Default)]
struct MockStore {
    tokens: HashSet<String>,
    last_id: i64,
    collections: HashMap<Resource, BTreeMap<String, Entity>>,
}

impl MockStore {
    fn is_authorized(&self, headers: &HeaderMap) -> bool {
        headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .is_some_and(|token| self.tokens.contains(token))
    }

    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    fn entity(&self, resource: Resource, key: &str) -> Option<&Entity> {
        self.collections.get(&resource).and_then(|c| c.get(key))
    }

    fn entities_mut(&mut self, resource: Resource) -> &mut BTreeMap<String, Entity> {
        self.collections.entry(resource).or_default()
    }

    /// Order items must point at an existing menu item and order.
    fn references_exist(&self, entity: &Entity) -> bool {
        [("menuItem", Resource::MenuItem), ("order", Resource::Order)]
            .into_iter()
            .all(|(field, resource)| {
                entity
                    .get(field)
                    .and_then(|reference| reference.get("id"))
                    .and_then(Value::as_i64)
                    .is_some_and(|id| self.entity(resource, &id.to_string()).is_some())
            })
    }
}

/// Fields the backend validates as non-null on create and full update.
fn required_fields(resource: Resource) -> &'static [&'static str] {
    match resource {
        Resource::User => &["login"],
        Resource::Staff => &[
            "firstName",
            "lastName",
            "email",
            "phone",
            "role",
            "joinDate",
            "isActive",
        ],
        Resource::Customer => &["firstName", "lastName", "email"],
        Resource::MenuItem => &["name", "price", "category", "isAvailable"],
        Resource::Order => &["orderDate", "status", "totalAmount", "paymentMethod"],
        Resource::OrderItem => &["quantity", "subtotal", "menuItem", "order"],
        Resource::Reservation => &[
            "reservationDate",
            "partySize",
            "status",
            "customerName",
            "customerEmail",
            "customerPhone",
        ],
        Resource::Authority => &["name"],
    }
}

fn has_value(entity: &Entity, field: &str) -> bool {
    entity.get(field).is_some_and(|value| !value.is_null())
}

fn problem(status: StatusCode, title: &str, error_key: &str) -> Response {
    (
        status,
        Json(json!({
            "title": title,
            "status": status.as_u16(),
            "errorKey": error_key,
        })),
    )
        .into_response()
}

fn unauthorized() -> Response {
    problem(StatusCode::UNAUTHORIZED, "Unauthorized", "unauthorized")
}

fn validate(resource: Resource, entity: &Entity) -> Result<(), Response> {
    match required_fields(resource)
        .iter()
        .find(|field| !has_value(entity, field))
    {
        Some(field) => Err(problem(
            StatusCode::BAD_REQUEST,
            &format!("{} must not be null", field),
            "fieldrequired",
        )),
        None => Ok(()),
    }
}

fn check_body_id(entity: &Entity, key: &str) -> Result<(), Response> {
    match entity.get("id").and_then(Value::as_i64) {
        None => Err(problem(StatusCode::BAD_REQUEST, "Invalid id", "idnull")),
        Some(id) if id.to_string() != key => {
            Err(problem(StatusCode::BAD_REQUEST, "Invalid ID", "idinvalid"))
        }
        Some(_) => Ok(()),
    }
}

fn into_entity(body: Value) -> Result<Entity, Response> {
    match body {
        Value::Object(entity) => Ok(entity),
        _ => Err(problem(
            StatusCode::BAD_REQUEST,
            "Body must be a JSON object",
            "invalidbody",
        )),
    }
}

#[derive(Clone)]
struct MockState {
    inner: Arc<Mutex<MockStore>>,
    credentials: Arc<Credentials>,
}

impl MockState {
    fn new(credentials: &Credentials) -> Self {
        Self {
            inner: Arc::default(),
            credentials: Arc::new(credentials.clone()),
        }
    }

    fn store(&self) -> MutexGuard<'_, MockStore> {
        self.inner.lock().unwrap()
    }

    fn authenticate(&self, body: Value) -> Response {
        let username = body.get("username").and_then(Value::as_str);
        let password = body.get("password").and_then(Value::as_str);
        if username != Some(self.credentials.username.as_str())
            || password != Some(self.credentials.password.as_str())
        {
            return problem(StatusCode::UNAUTHORIZED, "Bad credentials", "badcredentials");
        }

        let token = Uuid::new_v4().to_string();
        self.store().tokens.insert(token.clone());
        Json(json!({ "id_token": token })).into_response()
    }

    fn list(&self, resource: Resource, headers: &HeaderMap) -> Response {
        let store = self.store();
        if !store.is_authorized(headers) {
            return unauthorized();
        }
        let entities: Vec<Value> = store
            .collections
            .get(&resource)
            .map(|c| c.values().cloned().map(Value::Object).collect())
            .unwrap_or_default();
        Json(entities).into_response()
    }

    fn create(&self, resource: Resource, headers: &HeaderMap, body: Value) -> Response {
        let mut store = self.store();
        if !store.is_authorized(headers) {
            return unauthorized();
        }
        let mut entity = match into_entity(body) {
            Ok(entity) => entity,
            Err(response) => return response,
        };
        if let Err(response) = validate(resource, &entity) {
            return response;
        }
        if has_value(&entity, "id") {
            return problem(
                StatusCode::BAD_REQUEST,
                &format!("A new {} cannot already have an ID", resource),
                "idexists",
            );
        }

        let key = match resource.key_field() {
            "id" => {
                let id = store.next_id();
                entity.insert("id".to_string(), Value::from(id));
                id.to_string()
            }
            field => {
                let key = match entity.get(field).and_then(Value::as_str) {
                    Some(key) if !key.is_empty() => key.to_string(),
                    _ => return problem(StatusCode::BAD_REQUEST, "Missing key", "keyrequired"),
                };
                if store.entity(resource, &key).is_some() {
                    return problem(StatusCode::BAD_REQUEST, "Key already used", "keyexists");
                }
                if resource == Resource::User {
                    let id = store.next_id();
                    entity.insert("id".to_string(), Value::from(id));
                }
                key
            }
        };

        if resource == Resource::OrderItem && !store.references_exist(&entity) {
            return problem(StatusCode::BAD_REQUEST, "Entity not found", "idnotfound");
        }

        debug!("Mock backend created {} {}", resource, key);
        store.entities_mut(resource).insert(key, entity.clone());
        (StatusCode::CREATED, Json(Value::Object(entity))).into_response()
    }

    fn get(&self, resource: Resource, headers: &HeaderMap, key: &str) -> Response {
        let store = self.store();
        if !store.is_authorized(headers) {
            return unauthorized();
        }
        match store.entity(resource, key) {
            Some(entity) => Json(Value::Object(entity.clone())).into_response(),
            None => problem(StatusCode::NOT_FOUND, "Not Found", "notfound"),
        }
    }

    fn update(&self, resource: Resource, headers: &HeaderMap, key: &str, body: Value) -> Response {
        let mut store = self.store();
        if !store.is_authorized(headers) {
            return unauthorized();
        }
        let entity = match into_entity(body) {
            Ok(entity) => entity,
            Err(response) => return response,
        };
        if let Err(response) = check_body_id(&entity, key) {
            return response;
        }
        if store.entity(resource, key).is_none() {
            return problem(StatusCode::BAD_REQUEST, "Entity not found", "idnotfound");
        }
        if let Err(response) = validate(resource, &entity) {
            return response;
        }
        if resource == Resource::OrderItem && !store.references_exist(&entity) {
            return problem(StatusCode::BAD_REQUEST, "Entity not found", "idnotfound");
        }

        store
            .entities_mut(resource)
            .insert(key.to_string(), entity.clone());
        Json(Value::Object(entity)).into_response()
    }

    fn partial_update(
        &self,
        resource: Resource,
        headers: &HeaderMap,
        key: &str,
        body: Value,
    ) -> Response {
        let mut store = self.store();
        if !store.is_authorized(headers) {
            return unauthorized();
        }
        let patch = match into_entity(body) {
            Ok(patch) => patch,
            Err(response) => return response,
        };
        if let Err(response) = check_body_id(&patch, key) {
            return response;
        }
        let mut merged = match store.entity(resource, key) {
            Some(existing) => existing.clone(),
            None => return problem(StatusCode::BAD_REQUEST, "Entity not found", "idnotfound"),
        };
        // Null fields are ignored, as in the backend's partial update.
        for (field, value) in patch {
            if !value.is_null() {
                merged.insert(field, value);
            }
        }
        if resource == Resource::OrderItem && !store.references_exist(&merged) {
            return problem(StatusCode::BAD_REQUEST, "Entity not found", "idnotfound");
        }

        store
            .entities_mut(resource)
            .insert(key.to_string(), merged.clone());
        Json(Value::Object(merged)).into_response()
    }

    fn delete(&self, resource: Resource, headers: &HeaderMap, key: &str) -> Response {
        let mut store = self.store();
        if !store.is_authorized(headers) {
            return unauthorized();
        }
        store.entities_mut(resource).remove(key);
        StatusCode::NO_CONTENT.into_response()
    }
}

fn collection_routes(resource: Resource) -> Router<MockState> {
    let collection = get(
        move |State(state): State<MockState>, headers: HeaderMap| async move {
            state.list(resource, &headers)
        },
    )
    .post(
        move |State(state): State<MockState>, headers: HeaderMap, Json(body): Json<Value>| async move {
            state.create(resource, &headers, body)
        },
    );

    let mut item = get(
        move |State(state): State<MockState>, headers: HeaderMap, Path(key): Path<String>| async move {
            state.get(resource, &headers, &key)
        },
    )
    .delete(
        move |State(state): State<MockState>, headers: HeaderMap, Path(key): Path<String>| async move {
            state.delete(resource, &headers, &key)
        },
    );

    // Users and authorities are create / read / delete only.
    if resource.key_field() == "id" {
        item = item
            .put(
                move |State(state): State<MockState>,
                      headers: HeaderMap,
                      Path(key): Path<String>,
                      Json(body): Json<Value>| async move {
                    state.update(resource, &headers, &key, body)
                },
            )
            .patch(
                move |State(state): State<MockState>,
                      headers: HeaderMap,
                      Path(key): Path<String>,
                      Json(body): Json<Value>| async move {
                    state.partial_update(resource, &headers, &key, body)
                },
            );
    }

    Router::new()
        .route(resource.path(), collection)
        .route(&format!("{}/{{key}}", resource.path()), item)
}

fn make_app(state: MockState) -> Router {
    let mut api: Router<MockState> = Router::new().route(
        "/authenticate",
        post(|State(state): State<MockState>, Json(body): Json<Value>| async move {
            state.authenticate(body)
        }),
    );
    for resource in Resource::ALL {
        api = api.merge(collection_routes(resource));
    }

    Router::new()
        .route(
            "/management/health",
            get(|| async { Json(json!({ "status": "UP" })) }),
        )
        .nest("/api", api)
        .with_state(state)
}

/// Mock backend instance
///
/// When dropped, the server gracefully shuts down.
pub struct MockBackend {
    /// API root for the client (e.g., "http://127.0.0.1:12345/api")
    pub base_url: String,

    /// The port the server is listening on
    pub port: u16,

    state: MockState,
    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl MockBackend {
    /// Spawns a new mock backend on a random port, accepting only
    /// `credentials` at login, and waits for it to be ready.
    ///
    /// # Panics
    ///
    /// Panics if the port cannot be bound or the server doesn't become ready
    /// within the timeout.
    pub async fn spawn(credentials: &Credentials) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");

        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        let state = MockState::new(credentials);
        let app = make_app(state.clone());

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Mock backend failed");
        });

        let backend = Self {
            base_url: format!("http://127.0.0.1:{}/api", port),
            port,
            state,
            _shutdown_tx: Some(shutdown_tx),
        };

        backend.wait_for_ready().await;

        backend
    }

    /// Number of stored entities of a resource.
    pub fn count(&self, resource: Resource) -> usize {
        self.state
            .store()
            .collections
            .get(&resource)
            .map_or(0, |c| c.len())
    }

    /// Whether an entity with this key is stored.
    pub fn contains(&self, resource: Resource, key: &ResourceKey) -> bool {
        self.state
            .store()
            .entity(resource, &key.to_string())
            .is_some()
    }

    /// Stored entity, bypassing the HTTP layer.
    pub fn entity(&self, resource: Resource, key: &ResourceKey) -> Option<Value> {
        self.state
            .store()
            .entity(resource, &key.to_string())
            .cloned()
            .map(Value::Object)
    }

    async fn wait_for_ready(&self) {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(100))
            .build()
            .expect("Failed to build reqwest client");

        let health_url = format!("http://127.0.0.1:{}/management/health", self.port);
        let start = std::time::Instant::now();
        let timeout = Duration::from_millis(SERVER_READY_TIMEOUT_MS);

        loop {
            if start.elapsed() > timeout {
                panic!(
                    "Mock backend did not become ready within {}ms",
                    SERVER_READY_TIMEOUT_MS
                );
            }

            match client.get(&health_url).send().await {
                Ok(response) if response.status().is_success() => return,
                _ => {
                    tokio::time::sleep(Duration::from_millis(SERVER_READY_POLL_INTERVAL_MS)).await;
                }
            }
        }
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        if let Some(tx) = self._shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
