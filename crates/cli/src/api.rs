//! HTTP client for the storefront service.
//!
//! [`ApiClient`] is also the checkout flow's [`OrderGateway`]: every non-2xx
//! answer, transport failure or undecodable body becomes a [`GatewayError`].

use reqwest::{Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::instrument;
use url::Url;

use delivery_core::catalog::{Banner, Category, Product};
use delivery_core::checkout::{GatewayError, OrderGateway};
use delivery_core::order::{CreateOrderRequest, Order};
use delivery_core::{OrderId, ProductId};

use crate::config::CliConfig;
use crate::error::ClientError;

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// Client for the storefront JSON API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a client from CLI configuration.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Http` if the HTTP client cannot be built.
    pub fn new(config: &CliConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: config.api_url.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path)
            .map_err(|e| ClientError::InvalidArgument(format!("bad endpoint {path}: {e}")))
    }

    /// List categories.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the service answers non-2xx.
    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<Vec<Category>, ClientError> {
        let response = self.http.get(self.endpoint("api/categories")?).send().await?;
        read_json(response).await
    }

    /// List active home page banners.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the service answers non-2xx.
    #[instrument(skip(self))]
    pub async fn banners(&self) -> Result<Vec<Banner>, ClientError> {
        let response = self.http.get(self.endpoint("api/banners")?).send().await?;
        read_json(response).await
    }

    /// List products, optionally filtered by category slug.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the service answers non-2xx.
    #[instrument(skip(self))]
    pub async fn products(&self, category: Option<&str>) -> Result<Vec<Product>, ClientError> {
        let mut url = self.endpoint("api/products")?;
        if let Some(slug) = category {
            url.query_pairs_mut().append_pair("category", slug);
        }
        let response = self.http.get(url).send().await?;
        read_json(response).await
    }

    /// Fetch one product.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Api` with status 404 if the product does not exist.
    #[instrument(skip(self))]
    pub async fn product(&self, id: ProductId) -> Result<Product, ClientError> {
        let response = self
            .http
            .get(self.endpoint(&format!("api/products/{id}"))?)
            .send()
            .await?;
        read_json(response).await
    }

    /// Fetch one order with its lines.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Api` with status 404 if the order does not exist.
    #[instrument(skip(self))]
    pub async fn order(&self, id: OrderId) -> Result<Order, ClientError> {
        let response = self
            .http
            .get(self.endpoint(&format!("api/orders/{id}"))?)
            .send()
            .await?;
        read_json(response).await
    }
}

impl OrderGateway for ApiClient {
    #[instrument(skip_all, fields(lines = request.items.len()))]
    async fn create_order(&self, request: &CreateOrderRequest) -> Result<Order, GatewayError> {
        let url = self
            .endpoint("api/orders")
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let response = self
            .http
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = error_message(response).await;
            return Err(GatewayError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<Order>()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    if !status.is_success() {
        return Err(ClientError::Api {
            status: status.as_u16(),
            message: error_message(response).await,
        });
    }
    Ok(response.json::<T>().await?)
}

/// Best-effort error text: the JSON `error` field, the raw body, or the
/// status reason.
async fn error_message(response: Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    serde_json::from_str::<ErrorBody>(&body)
        .map(|b| b.error)
        .ok()
        .or_else(|| (!body.trim().is_empty()).then(|| body.trim().to_string()))
        .unwrap_or_else(|| reason(status))
}

fn reason(status: StatusCode) -> String {
    status
        .canonical_reason()
        .map_or_else(|| status.as_str().to_string(), str::to_string)
}
