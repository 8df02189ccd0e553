//! End-to-end checkout: core flow + file-backed cart + HTTP gateway against an
//! in-process order service.
//!
//! No external services are needed.

use std::time::Duration;

use axum::http::StatusCode;
use serde_json::json;
use tempfile::TempDir;

use delivery_cli::{ApiClient, CliConfig, FileStorage};
use delivery_core::cart::{CART_STORAGE_KEY, CartProduct, CartStorage, CartStore};
use delivery_core::catalog::Product;
use delivery_core::checkout::{
    CONFIRMATION_DELAY, CheckoutError, CheckoutField, CheckoutFlow, CheckoutState, GatewayError,
    MSG_EMPTY_CART, MSG_FIX_FORM, MSG_ORDER_CREATED, MSG_SUBMIT_FAILED,
};
use delivery_core::{CategoryId, Price, ProductId};
use delivery_integration_tests::{Notification, RecordingNotifier, StubOrderService};

fn product(name: &str, cents: i64) -> Product {
    Product {
        id: ProductId::generate(),
        name: name.to_string(),
        description: None,
        price: Price::from_cents(cents).expect("valid price"),
        photo: Some(format!("/images/{}.jpg", name.to_lowercase())),
        category_id: CategoryId::generate(),
        category: None,
    }
}

struct Fixture {
    stub: StubOrderService,
    cart_dir: TempDir,
    config: CliConfig,
    pizza: Product,
    soda: Product,
}

impl Fixture {
    async fn new() -> Self {
        let pizza = product("Margherita", 4290);
        let soda = product("Guarana", 650);
        let stub = StubOrderService::start(vec![pizza.clone(), soda.clone()]).await;
        let cart_dir = tempfile::tempdir().expect("temp dir");
        let config = stub.client_config(cart_dir.path());

        Self {
            stub,
            cart_dir,
            config,
            pizza,
            soda,
        }
    }

    fn storage(&self) -> FileStorage {
        FileStorage::new(self.cart_dir.path())
    }

    fn api(&self) -> ApiClient {
        ApiClient::new(&self.config).expect("http client")
    }

    /// Cart with 2 x pizza and 1 x soda, persisted to disk.
    fn filled_cart(&self) -> CartStore<FileStorage> {
        let mut cart = CartStore::open(self.storage());
        cart.add_item(CartProduct::from(&self.pizza), 2);
        cart.add_item(CartProduct::from(&self.soda), 1);
        cart
    }
}

fn fill_valid_form<N: delivery_core::checkout::Notifier>(flow: &mut CheckoutFlow<N>) {
    flow.set_field(CheckoutField::Name, "João Silva");
    flow.set_field(CheckoutField::Email, "joao@email.com");
    flow.set_field(CheckoutField::Phone, "11988887777");
    flow.set_field(CheckoutField::Address, "Rua das Flores, 123");
}

#[tokio::test]
async fn test_successful_checkout_clears_cart_and_redirects() {
    let fx = Fixture::new().await;
    let api = fx.api();
    let notifier = RecordingNotifier::default();
    let mut cart = fx.filled_cart();
    let mut flow = CheckoutFlow::new(&notifier);
    fill_valid_form(&mut flow);

    let redirect = flow.submit(&mut cart, &api).await.expect("order created");

    assert_eq!(redirect.after, CONFIRMATION_DELAY);
    assert_eq!(redirect.path(), format!("/orders/{}", redirect.order_id));
    assert_eq!(
        flow.state(),
        CheckoutState::Succeeded {
            order_id: redirect.order_id
        }
    );
    assert!(flow.is_succeeded());
    assert!(flow.form().is_blank());
    assert!(cart.is_empty());
    assert_eq!(
        notifier.last(),
        Some(Notification::Success(MSG_ORDER_CREATED.to_string()))
    );

    // The cleared cart was persisted
    assert_eq!(
        fx.storage().load(CART_STORAGE_KEY).expect("readable").as_deref(),
        Some("[]")
    );

    // The confirmation view can load the order, priced by the service
    let order = api.order(redirect.order_id).await.expect("order readable");
    assert_eq!(order.items.len(), 2);
    assert_eq!(order.item_count(), 3);
    assert_eq!(order.total, Price::from_cents(9230).expect("valid price"));
}

#[tokio::test]
async fn test_order_request_carries_ids_and_quantities_only() {
    let fx = Fixture::new().await;
    let notifier = RecordingNotifier::default();
    let mut cart = fx.filled_cart();
    let mut flow = CheckoutFlow::new(&notifier);
    fill_valid_form(&mut flow);

    flow.submit(&mut cart, &fx.api()).await.expect("order created");

    let received = fx.stub.received();
    assert_eq!(received.len(), 1);
    let body = received.first().expect("one request");
    assert_eq!(body["name"], "João Silva");
    assert_eq!(body["phone"], "11988887777");
    assert_eq!(
        body["items"],
        json!([
            { "productId": fx.pizza.id.to_string(), "quantity": 2 },
            { "productId": fx.soda.id.to_string(), "quantity": 1 },
        ])
    );
}

#[tokio::test]
async fn test_server_failure_preserves_cart_and_allows_retry() {
    let fx = Fixture::new().await;
    let api = fx.api();
    let notifier = RecordingNotifier::default();
    let mut cart = fx.filled_cart();
    let mut flow = CheckoutFlow::new(&notifier);
    fill_valid_form(&mut flow);

    fx.stub.fail_orders_with(StatusCode::INTERNAL_SERVER_ERROR);
    let err = flow.submit(&mut cart, &api).await.expect_err("server failed");

    assert!(matches!(
        err,
        CheckoutError::Submission(GatewayError::Rejected { status: 500, .. })
    ));
    assert_eq!(flow.state(), CheckoutState::Editing);
    assert!(!flow.is_busy());
    assert_eq!(flow.form().name, "João Silva");
    assert_eq!(cart.items().len(), 2);
    assert_eq!(
        notifier.last(),
        Some(Notification::Error(MSG_SUBMIT_FAILED.to_string()))
    );

    // Nothing was lost on disk either
    let reopened = CartStore::open(fx.storage());
    assert_eq!(reopened.quantity_of(fx.pizza.id), 2);
    assert_eq!(reopened.quantity_of(fx.soda.id), 1);

    // A manual resubmit creates the order
    fx.stub.accept_orders();
    flow.submit(&mut cart, &api).await.expect("retry succeeds");

    assert_eq!(fx.stub.received().len(), 2);
    assert_eq!(fx.stub.orders().len(), 1);
    assert!(cart.is_empty());
}

#[tokio::test]
async fn test_unknown_product_is_a_submission_failure() {
    let fx = Fixture::new().await;
    let notifier = RecordingNotifier::default();
    let mut cart = CartStore::open(fx.storage());
    let discontinued = product("Discontinued", 1000);
    cart.add_item(CartProduct::from(&discontinued), 1);

    let mut flow = CheckoutFlow::new(&notifier);
    fill_valid_form(&mut flow);
    let err = flow
        .submit(&mut cart, &fx.api())
        .await
        .expect_err("unknown product");

    match err {
        CheckoutError::Submission(GatewayError::Rejected { status, message }) => {
            assert_eq!(status, 400);
            assert_eq!(message, format!("unknown product {}", discontinued.id));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(cart.quantity_of(discontinued.id), 1);
}

#[tokio::test]
async fn test_timeout_is_a_submission_failure() {
    let mut fx = Fixture::new().await;
    fx.config.http_timeout = Duration::from_millis(200);
    fx.stub.delay_orders(Duration::from_secs(2));

    let notifier = RecordingNotifier::default();
    let mut cart = fx.filled_cart();
    let mut flow = CheckoutFlow::new(&notifier);
    fill_valid_form(&mut flow);

    let err = flow
        .submit(&mut cart, &fx.api())
        .await
        .expect_err("timed out");

    assert!(matches!(
        err,
        CheckoutError::Submission(GatewayError::Transport(_))
    ));
    assert_eq!(flow.state(), CheckoutState::Editing);
    assert_eq!(cart.items().len(), 2);
}

#[tokio::test]
async fn test_unreachable_service_is_a_submission_failure() {
    let fx = Fixture::new().await;
    let closed_port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
        listener.local_addr().expect("addr").port()
    };
    let mut config = fx.config.clone();
    config.api_url = format!("http://127.0.0.1:{closed_port}/")
        .parse()
        .expect("valid url");

    let notifier = RecordingNotifier::default();
    let mut cart = fx.filled_cart();
    let mut flow = CheckoutFlow::new(&notifier);
    fill_valid_form(&mut flow);

    let api = ApiClient::new(&config).expect("http client");
    let err = flow.submit(&mut cart, &api).await.expect_err("unreachable");

    assert!(matches!(
        err,
        CheckoutError::Submission(GatewayError::Transport(_))
    ));
    assert_eq!(
        notifier.last(),
        Some(Notification::Error(MSG_SUBMIT_FAILED.to_string()))
    );
}

#[tokio::test]
async fn test_invalid_form_never_reaches_the_service() {
    let fx = Fixture::new().await;
    let notifier = RecordingNotifier::default();
    let mut cart = fx.filled_cart();
    let mut flow = CheckoutFlow::new(&notifier);
    flow.set_field(CheckoutField::Name, "Jo");
    flow.set_field(CheckoutField::Email, "joao@email.com");
    flow.set_field(CheckoutField::Phone, "123");
    flow.set_field(CheckoutField::Address, "Rua das Flores, 123");

    let err = flow
        .submit(&mut cart, &fx.api())
        .await
        .expect_err("invalid form");

    let CheckoutError::Invalid(errors) = err else {
        panic!("expected validation errors");
    };
    assert_eq!(errors.len(), 2);
    assert_eq!(
        errors.get(CheckoutField::Name),
        Some("Name must be at least 3 characters")
    );
    assert_eq!(
        errors.get(CheckoutField::Phone),
        Some("Phone must have 10 or 11 digits")
    );
    assert_eq!(
        notifier.messages(),
        vec![Notification::Error(MSG_FIX_FORM.to_string())]
    );
    assert!(fx.stub.received().is_empty());
    assert_eq!(cart.items().len(), 2);
}

#[tokio::test]
async fn test_empty_cart_never_reaches_the_service() {
    let fx = Fixture::new().await;
    let notifier = RecordingNotifier::default();
    let mut cart = CartStore::open(fx.storage());
    let mut flow = CheckoutFlow::new(&notifier);
    fill_valid_form(&mut flow);

    let err = flow
        .submit(&mut cart, &fx.api())
        .await
        .expect_err("empty cart");

    assert!(matches!(err, CheckoutError::EmptyCart));
    assert_eq!(
        notifier.last(),
        Some(Notification::Error(MSG_EMPTY_CART.to_string()))
    );
    assert!(fx.stub.received().is_empty());
}

#[tokio::test]
async fn test_cart_add_uses_service_product_details() {
    let fx = Fixture::new().await;
    let api = fx.api();

    let fetched = api.product(fx.pizza.id).await.expect("product readable");
    let mut cart = CartStore::open(fx.storage());
    cart.add_item(CartProduct::from(&fetched), 1);

    let line = cart.items().first().expect("one line");
    assert_eq!(line.name, "Margherita");
    assert_eq!(line.unit_price, fx.pizza.price);
    assert_eq!(line.image.as_deref(), Some("/images/margherita.jpg"));

    let missing = api
        .product(ProductId::generate())
        .await
        .expect_err("unknown product");
    assert!(missing.is_not_found());
}
