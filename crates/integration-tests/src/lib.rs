//! Integration test harness for Clinica.
//!
//! Tests run both services in-process against a stub of the REST backend:
//!
//! - [`StubBackend`] is a small axum app bound to `127.0.0.1:0` that serves
//!   canned products, orders, appointments and customers, and records every
//!   request it receives.
//! - [`storefront`] and [`admin`] build the real routers pointed at the stub.
//! - [`Browser`] drives a router with `tower::ServiceExt::oneshot`, keeping
//!   cookies between calls so session state survives like it would in a
//!   real browser.

#![allow(clippy::missing_panics_doc, clippy::expect_used)]

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

use axum::{
    Json, Router,
    body::Body,
    extract::{Path, Request, State},
    http::{
        HeaderMap, Method, StatusCode,
        header::{AUTHORIZATION, CONTENT_TYPE, COOKIE, SET_COOKIE},
    },
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, patch},
};
use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tower::ServiceExt;
use tower_sessions::cookie::Cookie;

use clinica_backend::CLIENT_ID_HEADER;

/// Tenant used when a caller sends no `client_id` cookie.
pub const DEFAULT_CLIENT_ID: &str = "clinic-default";

// =============================================================================
// Stub backend
// =============================================================================

/// A request seen by the stub backend.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub client_id: Option<String>,
}

#[derive(Default)]
struct StubData {
    products: Vec<Value>,
    orders: Vec<Value>,
    appointments: Vec<Value>,
    customers: Vec<Value>,
    placed_orders: Vec<Value>,
    requests: Vec<RecordedRequest>,
    fail_with: Option<StatusCode>,
    order_total: Option<usize>,
}

/// In-process stand-in for the REST backend.
#[derive(Clone)]
pub struct StubBackend {
    data: Arc<Mutex<StubData>>,
    url: Arc<String>,
}

impl StubBackend {
    /// Start a stub seeded with the standard fixtures.
    pub async fn start() -> Self {
        let data = Arc::new(Mutex::new(seeded()));
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind stub backend");
        let addr = listener.local_addr().expect("stub backend address");

        let stub = Self {
            data,
            url: Arc::new(format!("http://{addr}/")),
        };
        let router = stub.router();
        tokio::spawn(async move {
            axum::serve(listener, router)
                .await
                .expect("stub backend crashed");
        });
        stub
    }

    /// Base URL to use as `API_URL`.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Every request received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.lock().requests.clone()
    }

    /// Requests received for one path.
    #[must_use]
    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.path == path)
            .collect()
    }

    /// Bodies posted to `/ecommerce/orders`.
    #[must_use]
    pub fn placed_orders(&self) -> Vec<Value> {
        self.lock().placed_orders.clone()
    }

    /// Report `total` orders in listings while still returning only the
    /// fixture page.
    pub fn report_order_total(&self, total: usize) {
        self.lock().order_total = Some(total);
    }

    /// Make every following request fail with `status`.
    pub fn fail_with(&self, status: StatusCode) {
        self.lock().fail_with = Some(status);
    }

    fn lock(&self) -> MutexGuard<'_, StubData> {
        self.data.lock().expect("stub data lock poisoned")
    }

    fn router(&self) -> Router {
        Router::new()
            .route("/health", get(health))
            .route("/products", get(list_products))
            .route("/products/{id}", get(get_product))
            .route("/ecommerce/categories", get(categories))
            .route("/ecommerce/orders", axum::routing::post(place_order))
            .route("/orders", get(list_orders))
            .route("/orders/{id}", get(get_order))
            .route("/orders/{id}/status", patch(update_order_status))
            .route(
                "/appointments",
                get(list_appointments).post(create_appointment),
            )
            .route("/appointments/{id}", get(get_appointment))
            .route("/appointments/{id}/status", patch(update_appointment_status))
            .route("/customers", get(list_customers).post(create_customer))
            .layer(middleware::from_fn_with_state(self.clone(), record))
            .with_state(self.clone())
    }
}

fn seeded() -> StubData {
    let now = Utc::now();
    StubData {
        products: vec![
            json!({"id": "p1", "name": "Vitamin C Serum", "price": "25.00", "stock": 10,
                   "category": "skincare", "isActive": true}),
            json!({"id": "p2", "name": "Retinol Cream", "price": "40.00", "stock": 0,
                   "category": "skincare", "isActive": true}),
            json!({"id": "p3", "name": "Sunscreen SPF 50", "price": "18.50",
                   "compareAtPrice": "22.00", "stock": 3, "category": "sun", "isActive": true}),
            json!({"id": "p4", "name": "Discontinued Toner", "price": "12.00", "stock": 20,
                   "category": "skincare", "isActive": false}),
        ],
        orders: vec![
            order_json("o1", "1001", "120.00", "delivered", now - Duration::days(3)),
            order_json("o2", "1002", "80.00", "pending", now - Duration::days(1)),
            order_json("o3", "1003", "50.00", "cancelled", now - Duration::days(2)),
        ],
        appointments: vec![
            json!({"id": "a1", "customerName": "Ada Lovelace", "email": "ada@example.com",
                   "service": "Facial", "scheduledAt": now + Duration::days(2),
                   "durationMinutes": 60, "status": "scheduled"}),
            json!({"id": "a2", "customerName": "Alan Turing", "service": "Consultation",
                   "scheduledAt": now - Duration::days(4), "durationMinutes": 30,
                   "status": "completed"}),
        ],
        customers: vec![
            json!({"id": "c1", "firstName": "Grace", "lastName": "Hopper",
                   "email": "grace@example.com", "ordersCount": 2, "totalSpent": "200.00"}),
        ],
        ..StubData::default()
    }
}

fn order_json(
    id: &str,
    number: &str,
    total: &str,
    status: &str,
    created_at: chrono::DateTime<Utc>,
) -> Value {
    json!({
        "id": id,
        "orderNumber": number,
        "customer": {"name": "Grace Hopper", "email": "grace@example.com"},
        "items": [],
        "subtotal": total,
        "total": total,
        "status": status,
        "createdAt": created_at,
    })
}

async fn record(State(stub): State<StubBackend>, request: Request, next: Next) -> Response {
    let recorded = {
        let header = |name: &str| {
            request
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(String::from)
        };
        RecordedRequest {
            method: request.method().to_string(),
            path: request.uri().path().to_string(),
            query: request.uri().query().map(String::from),
            authorization: header(AUTHORIZATION.as_str()),
            client_id: header(CLIENT_ID_HEADER),
        }
    };

    let failure = {
        let mut data = stub.lock();
        data.requests.push(recorded);
        data.fail_with
    };
    if let Some(status) = failure {
        return (
            status,
            Json(json!({"statusCode": status.as_u16(), "message": "Simulated failure"})),
        )
            .into_response();
    }
    next.run(request).await
}

fn not_found(what: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"statusCode": 404, "message": format!("{what} not found"), "error": "Not Found"})),
    )
        .into_response()
}

fn page(items: &[Value]) -> Json<Value> {
    Json(json!({"data": items, "total": items.len(), "page": 1, "limit": 20}))
}

fn find(items: &[Value], id: &str) -> Option<Value> {
    items.iter().find(|v| v["id"] == id).cloned()
}

async fn health() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

async fn list_products(State(stub): State<StubBackend>) -> Json<Value> {
    page(&stub.lock().products)
}

async fn get_product(State(stub): State<StubBackend>, Path(id): Path<String>) -> Response {
    find(&stub.lock().products, &id).map_or_else(|| not_found("Product"), |p| Json(p).into_response())
}

async fn categories() -> Json<Value> {
    Json(json!([
        {"id": "skincare", "name": "Skincare", "productCount": 3},
        {"id": "sun", "name": "Sun care", "productCount": 1},
    ]))
}

async fn place_order(State(stub): State<StubBackend>, Json(body): Json<Value>) -> Response {
    let mut data = stub.lock();
    data.placed_orders.push(body.clone());
    let number = 1000 + data.placed_orders.len();
    let order = json!({
        "id": format!("ord_{number}"),
        "orderNumber": number.to_string(),
        "customer": body["customer"],
        "items": body["items"],
        "subtotal": body["subtotal"],
        "shipping": body["shipping"],
        "tax": body["tax"],
        "discount": body["discount"],
        "total": body["total"],
        "status": "pending",
        "paymentStatus": "paid",
        "shippingAddress": body["shippingAddress"],
        "createdAt": Utc::now(),
    });
    (StatusCode::CREATED, Json(order)).into_response()
}

async fn list_orders(State(stub): State<StubBackend>) -> Json<Value> {
    let data = stub.lock();
    let Json(mut body) = page(&data.orders);
    if let Some(total) = data.order_total {
        body["total"] = json!(total);
    }
    Json(body)
}

async fn get_order(State(stub): State<StubBackend>, Path(id): Path<String>) -> Response {
    find(&stub.lock().orders, &id).map_or_else(|| not_found("Order"), |o| Json(o).into_response())
}

async fn update_order_status(
    State(stub): State<StubBackend>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let mut data = stub.lock();
    match data.orders.iter_mut().find(|o| o["id"] == id.as_str()) {
        Some(order) => {
            order["status"] = body["status"].clone();
            Json(order.clone()).into_response()
        }
        None => not_found("Order"),
    }
}

/// Appointments are returned as a bare array, like the real endpoint.
async fn list_appointments(State(stub): State<StubBackend>) -> Json<Value> {
    Json(Value::Array(stub.lock().appointments.clone()))
}

async fn get_appointment(State(stub): State<StubBackend>, Path(id): Path<String>) -> Response {
    find(&stub.lock().appointments, &id)
        .map_or_else(|| not_found("Appointment"), |a| Json(a).into_response())
}

async fn create_appointment(
    State(stub): State<StubBackend>,
    Json(mut body): Json<Value>,
) -> Response {
    let mut data = stub.lock();
    body["id"] = json!(format!("a{}", data.appointments.len() + 1));
    body["status"] = json!("scheduled");
    data.appointments.push(body.clone());
    (StatusCode::CREATED, Json(body)).into_response()
}

async fn update_appointment_status(
    State(stub): State<StubBackend>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let mut data = stub.lock();
    match data
        .appointments
        .iter_mut()
        .find(|a| a["id"] == id.as_str())
    {
        Some(appointment) => {
            appointment["status"] = body["status"].clone();
            Json(appointment.clone()).into_response()
        }
        None => not_found("Appointment"),
    }
}

async fn list_customers(State(stub): State<StubBackend>) -> Json<Value> {
    page(&stub.lock().customers)
}

async fn create_customer(State(stub): State<StubBackend>, Json(mut body): Json<Value>) -> Response {
    let mut data = stub.lock();
    if data.customers.iter().any(|c| c["email"] == body["email"]) {
        return (
            StatusCode::CONFLICT,
            Json(json!({"statusCode": 409, "message": "Email already registered"})),
        )
            .into_response();
    }
    body["id"] = json!(format!("c{}", data.customers.len() + 1));
    data.customers.push(body.clone());
    (StatusCode::CREATED, Json(body)).into_response()
}

// =============================================================================
// Service builders
// =============================================================================

fn lookup(stub: &StubBackend, enable_auth: bool, extra: &[(&str, &str)]) -> HashMap<String, String> {
    let mut vars = HashMap::from([
        ("API_URL".to_string(), stub.url().to_string()),
        ("ENABLE_AUTH".to_string(), enable_auth.to_string()),
        ("DEFAULT_CLIENT_ID".to_string(), DEFAULT_CLIENT_ID.to_string()),
    ]);
    for (key, value) in extra {
        vars.insert((*key).to_string(), (*value).to_string());
    }
    vars
}

/// Storefront router pointed at the stub.
#[must_use]
pub fn storefront(stub: &StubBackend, enable_auth: bool) -> Router {
    let vars = lookup(stub, enable_auth, &[]);
    let config = clinica_storefront::config::StorefrontConfig::from_lookup(&|key| {
        vars.get(key).cloned()
    })
    .expect("storefront config");
    let state = clinica_storefront::state::AppState::new(config).expect("storefront state");
    clinica_storefront::app(state)
}

/// Admin router pointed at the stub, with an empty schedule book.
#[must_use]
pub fn admin(stub: &StubBackend, enable_auth: bool) -> Router {
    let vars = lookup(stub, enable_auth, &[("ADMIN_SEED_SCHEDULES", "0")]);
    let config = clinica_admin::config::AdminConfig::from_lookup(&|key| vars.get(key).cloned())
        .expect("admin config");
    let state = clinica_admin::state::AppState::new(config).expect("admin state");
    clinica_admin::app(state)
}

// =============================================================================
// Browser
// =============================================================================

/// Response captured by [`Browser`].
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    /// The envelope's `data` field.
    #[must_use]
    pub fn data(&self) -> &Value {
        &self.body["data"]
    }

    /// The envelope's `message` field.
    #[must_use]
    pub fn message(&self) -> &str {
        self.body["message"].as_str().unwrap_or_default()
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.body["success"] == true
    }
}

/// Drives a router like a browser, keeping cookies between requests.
pub struct Browser {
    app: Router,
    cookies: BTreeMap<String, String>,
}

impl Browser {
    #[must_use]
    pub const fn new(app: Router) -> Self {
        Self {
            app,
            cookies: BTreeMap::new(),
        }
    }

    /// Set a cookie as if the backend had issued it.
    #[must_use]
    pub fn with_cookie(mut self, name: &str, value: &str) -> Self {
        self.cookies.insert(name.to_string(), value.to_string());
        self
    }

    pub async fn get(&mut self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, None).await
    }

    pub async fn post(&mut self, uri: &str, body: Value) -> TestResponse {
        self.send(Method::POST, uri, Some(body)).await
    }

    pub async fn patch(&mut self, uri: &str, body: Value) -> TestResponse {
        self.send(Method::PATCH, uri, Some(body)).await
    }

    pub async fn put(&mut self, uri: &str, body: Value) -> TestResponse {
        self.send(Method::PUT, uri, Some(body)).await
    }

    pub async fn delete(&mut self, uri: &str) -> TestResponse {
        self.send(Method::DELETE, uri, None).await
    }

    /// Send one request and record any cookies the response sets.
    pub async fn send(&mut self, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
        let mut builder = axum::http::Request::builder().method(method).uri(uri);
        if !self.cookies.is_empty() {
            let header = self
                .cookies
                .iter()
                .map(|(name, value)| format!("{name}={value}"))
                .collect::<Vec<_>>()
                .join("; ");
            builder = builder.header(COOKIE, header);
        }
        let request = match body {
            Some(body) => builder
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("valid request");

        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        for value in response.headers().get_all(SET_COOKIE) {
            if let Some(cookie) = value.to_str().ok().and_then(|s| Cookie::parse(s).ok()) {
                self.cookies
                    .insert(cookie.name().to_string(), cookie.value().to_string());
            }
        }

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read response body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

/// Read a money amount serialized either as a string or a number.
#[must_use]
pub fn money(value: &Value) -> Decimal {
    match value {
        Value::String(s) => s.parse().expect("decimal string"),
        Value::Number(n) => n.to_string().parse().expect("decimal number"),
        other => panic!("expected a money amount, got {other}"),
    }
}
