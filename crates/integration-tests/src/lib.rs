//! Integration test support for the delivery storefront.
//!
//! # Running Tests
//!
//! ```bash
//! # Stub-backed tests (no external services)
//! cargo test -p delivery-integration-tests
//!
//! # Live tests against a running storefront with a migrated, seeded database
//! STOREFRONT_BASE_URL=http://localhost:3000 cargo test -p delivery-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `checkout_flow` - Core checkout flow + HTTP gateway against [`StubOrderService`]
//! - `storefront_api` - Live storefront HTTP API (ignored by default)

use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::Utc;
use serde_json::{Value, json};
use tokio::sync::oneshot;
use url::Url;

use delivery_cli::CliConfig;
use delivery_core::catalog::Product;
use delivery_core::checkout::Notifier;
use delivery_core::order::{CreateOrderRequest, Order, OrderLine};
use delivery_core::{OrderId, OrderLineId, ProductId};

// =============================================================================
// Stub order service
// =============================================================================

#[derive(Default)]
struct StubInner {
    products: Vec<Product>,
    orders: Vec<Order>,
    requests: Vec<Value>,
    fail_with: Option<StatusCode>,
    delay: Duration,
}

#[derive(Clone, Default)]
struct StubState(Arc<Mutex<StubInner>>);

impl StubState {
    fn with<R>(&self, f: impl FnOnce(&mut StubInner) -> R) -> R {
        f(&mut self.0.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

/// In-process stand-in for the storefront's order and product endpoints.
///
/// Resolves prices from its own catalog, like the real service, and records
/// every raw order-creation body it receives. Stops when dropped.
pub struct StubOrderService {
    addr: SocketAddr,
    state: StubState,
    _shutdown: oneshot::Sender<()>,
}

impl StubOrderService {
    /// Start the stub on an ephemeral localhost port.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn start(products: Vec<Product>) -> Self {
        let state = StubState::default();
        state.with(|s| s.products = products);

        let app = Router::new()
            .route("/api/orders", post(create_order))
            .route("/api/orders/{id}", get(show_order))
            .route("/api/products/{id}", get(show_product))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind stub listener");
        let addr = listener.local_addr().expect("Stub listener has no address");

        let (tx, rx) = oneshot::channel::<()>();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = rx.await;
                })
                .await;
        });

        Self {
            addr,
            state,
            _shutdown: tx,
        }
    }

    /// Base URL of the stub.
    ///
    /// # Panics
    ///
    /// Panics if the socket address does not form a URL, which cannot happen
    /// for a bound localhost port.
    #[must_use]
    pub fn base_url(&self) -> Url {
        Url::parse(&format!("http://{}/", self.addr)).expect("Stub address is a valid URL")
    }

    /// Client configuration pointing at this stub, with the cart under `cart_dir`.
    #[must_use]
    pub fn client_config(&self, cart_dir: &std::path::Path) -> CliConfig {
        CliConfig {
            api_url: self.base_url(),
            cart_dir: cart_dir.to_path_buf(),
            http_timeout: Duration::from_secs(5),
        }
    }

    /// Answer every subsequent order creation with `status`.
    pub fn fail_orders_with(&self, status: StatusCode) {
        self.state.with(|s| s.fail_with = Some(status));
    }

    /// Accept order creations again.
    pub fn accept_orders(&self) {
        self.state.with(|s| s.fail_with = None);
    }

    /// Delay every order-creation response.
    pub fn delay_orders(&self, delay: Duration) {
        self.state.with(|s| s.delay = delay);
    }

    /// Raw JSON bodies received by `POST /api/orders`, in arrival order.
    #[must_use]
    pub fn received(&self) -> Vec<Value> {
        self.state.with(|s| s.requests.clone())
    }

    /// Orders created so far.
    #[must_use]
    pub fn orders(&self) -> Vec<Order> {
        self.state.with(|s| s.orders.clone())
    }
}

fn error(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

async fn create_order(State(state): State<StubState>, Json(body): Json<Value>) -> Response {
    let (delay, fail_with) = state.with(|s| {
        s.requests.push(body.clone());
        (s.delay, s.fail_with)
    });

    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
    if let Some(status) = fail_with {
        return error(status, "stub failure");
    }

    let request: CreateOrderRequest = match serde_json::from_value(body) {
        Ok(request) => request,
        Err(e) => return error(StatusCode::BAD_REQUEST, e.to_string()),
    };
    let new_order = match request.validate() {
        Ok(order) => order,
        Err(e) => return error(StatusCode::BAD_REQUEST, e.to_string()),
    };

    state.with(|s| {
        let mut items = Vec::with_capacity(new_order.items.len());
        for item in &new_order.items {
            let Some(product) = s.products.iter().find(|p| p.id == item.product_id) else {
                return error(
                    StatusCode::BAD_REQUEST,
                    format!("unknown product {}", item.product_id),
                );
            };
            items.push(OrderLine {
                id: OrderLineId::generate(),
                product_id: item.product_id,
                quantity: item.quantity,
                product: product.clone(),
            });
        }

        let order = Order {
            id: OrderId::generate(),
            name: new_order.name.clone(),
            email: new_order.email.as_str().to_owned(),
            phone: new_order.phone.as_str().to_owned(),
            address: new_order.address.clone(),
            created_at: Utc::now(),
            total: Order::compute_total(&items),
            items,
        };
        s.orders.push(order.clone());
        (StatusCode::CREATED, Json(order)).into_response()
    })
}

async fn show_order(State(state): State<StubState>, Path(id): Path<OrderId>) -> Response {
    state.with(|s| {
        s.orders.iter().find(|o| o.id == id).map_or_else(
            || error(StatusCode::NOT_FOUND, format!("Not found: order {id}")),
            |order| Json(order.clone()).into_response(),
        )
    })
}

async fn show_product(State(state): State<StubState>, Path(id): Path<ProductId>) -> Response {
    state.with(|s| {
        s.products.iter().find(|p| p.id == id).map_or_else(
            || error(StatusCode::NOT_FOUND, format!("Not found: product {id}")),
            |product| Json(product.clone()).into_response(),
        )
    })
}

// =============================================================================
// Notifier
// =============================================================================

/// A notification as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Success(String),
    Error(String),
}

/// Notifier that records every message for later assertions.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    /// All notifications so far, oldest first.
    #[must_use]
    pub fn messages(&self) -> Vec<Notification> {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The most recent notification.
    #[must_use]
    pub fn last(&self) -> Option<Notification> {
        self.messages().pop()
    }

    fn push(&self, notification: Notification) {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification);
    }
}

impl Notifier for RecordingNotifier {
    fn success(&self, message: &str) {
        self.push(Notification::Success(message.to_string()));
    }

    fn error(&self, message: &str) {
        self.push(Notification::Error(message.to_string()));
    }
}
