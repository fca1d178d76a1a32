//! Remote auction service integration
//!
//! REST client for the auction backend:
//! - `GET  {base}/products` → a bare list of products or `{ "products": [...] }`
//! - `POST {base}/bid`      → place a bid
//!
//! Only products whose `status` is `"active"` are exposed.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use voxta_config::AuctionConfig;
use voxta_core::{AuctionItem, AuctionService, BidReceipt, BidRequest};

/// Integration errors
#[derive(Error, Debug)]
pub enum IntegrationError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Timed out after {0}s")]
    Timeout(u64),

    #[error("Rejected by auction service: {0}")]
    Rejected(String),

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Client setup failed: {0}")]
    Setup(String),
}

impl From<IntegrationError> for voxta_core::Error {
    fn from(err: IntegrationError) -> Self {
        match err {
            IntegrationError::ConnectionFailed(_) | IntegrationError::Timeout(_) => {
                voxta_core::Error::ServiceUnavailable(err.to_string())
            }
            IntegrationError::Rejected(msg) => voxta_core::Error::AuctionService(msg),
            IntegrationError::Setup(msg) => voxta_core::Error::Configuration(msg),
            _ => voxta_core::Error::AuctionService(err.to_string()),
        }
    }
}

/// Product as the auction service sends it
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductWire {
    #[serde(rename = "_id", alias = "id", default)]
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    current_bid: f64,
    #[serde(default)]
    total_bids: u32,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    status: String,
}

impl ProductWire {
    fn is_active(&self) -> bool {
        self.status == "active"
    }
}

impl From<ProductWire> for AuctionItem {
    fn from(p: ProductWire) -> Self {
        let name = if p.name.is_empty() {
            "Unknown".to_string()
        } else {
            p.name
        };
        AuctionItem::new(
            p.id,
            name,
            p.current_bid,
            p.total_bids,
            p.category.unwrap_or_else(|| "General".to_string()),
        )
        .with_description(p.description.unwrap_or_default())
    }
}

/// Either response shape of `GET /products`
///
/// Entries stay untyped so one malformed product cannot reject the rest.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ProductsResponse {
    List(Vec<serde_json::Value>),
    Wrapped { products: Vec<serde_json::Value> },
}

impl ProductsResponse {
    /// Products that deserialize; the others are logged and skipped
    fn into_products(self) -> Vec<ProductWire> {
        let entries = match self {
            ProductsResponse::List(entries) | ProductsResponse::Wrapped { products: entries } => {
                entries
            }
        };

        entries
            .into_iter()
            .enumerate()
            .filter_map(|(index, entry)| match serde_json::from_value::<ProductWire>(entry) {
                Ok(product) => Some(product),
                Err(e) => {
                    tracing::warn!(index, error = %e, "Skipping malformed product");
                    None
                }
            })
            .collect()
    }
}

/// Body of `POST /bid`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BidWire<'a> {
    product_id: &'a str,
    bid_amount: f64,
    bidder_name: &'a str,
    bid_type: &'static str,
    source: &'static str,
    timestamp: String,
    #[serde(rename = "session_id")]
    session_id: &'a str,
}

/// Optional fields of a successful bid response
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BidResponseWire {
    #[serde(default)]
    product: Option<ProductWire>,
    #[serde(default)]
    previous_bid: Option<f64>,
}

/// Error body of a rejected bid
#[derive(Debug, Default, Deserialize)]
struct ErrorWire {
    #[serde(default)]
    message: Option<String>,
}

/// REST client for the auction service
pub struct HttpAuctionService {
    client: Client,
    base_url: String,
    timeout_secs: u64,
}

impl HttpAuctionService {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, IntegrationError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| IntegrationError::Setup(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout_secs: timeout.as_secs(),
        })
    }

    pub fn from_config(config: &AuctionConfig) -> Result<Self, IntegrationError> {
        Self::new(&config.base_url, Duration::from_secs(config.timeout_seconds))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn map_send_error(&self, err: reqwest::Error) -> IntegrationError {
        if err.is_timeout() {
            IntegrationError::Timeout(self.timeout_secs)
        } else {
            IntegrationError::ConnectionFailed(err.to_string())
        }
    }

    async fn fetch_products(&self) -> Result<Vec<ProductWire>, IntegrationError> {
        let response = self
            .client
            .get(format!("{}/products", self.base_url))
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(IntegrationError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ProductsResponse = response.json().await.map_err(|e| {
            IntegrationError::InvalidResponse(format!(
                "expected a product list or {{\"products\": [...]}}: {}",
                e
            ))
        })?;
        Ok(parsed.into_products())
    }
}

#[async_trait]
impl AuctionService for HttpAuctionService {
    async fn active_items(&self) -> voxta_core::Result<Vec<AuctionItem>> {
        let products = self.fetch_products().await?;
        let items: Vec<AuctionItem> = products
            .into_iter()
            .filter(ProductWire::is_active)
            .map(AuctionItem::from)
            .collect();

        tracing::debug!(base_url = %self.base_url, active = items.len(), "Fetched auctions");
        Ok(items)
    }

    async fn place_bid(&self, request: BidRequest) -> voxta_core::Result<BidReceipt> {
        let body = BidWire {
            product_id: &request.item_id,
            bid_amount: request.amount,
            bidder_name: &request.bidder,
            bid_type: "voice",
            source: "voice_assistant",
            timestamp: request.placed_at.to_rfc3339(),
            session_id: &request.session_id,
        };

        let response = self
            .client
            .post(format!("{}/bid", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorWire>(&text)
                .ok()
                .and_then(|e| e.message)
                .unwrap_or_else(|| "Unknown error occurred".to_string());
            tracing::warn!(status = status.as_u16(), message = %message, "Bid rejected");
            return Err(IntegrationError::Rejected(message).into());
        }

        let parsed: BidResponseWire = serde_json::from_str(&text).unwrap_or_default();
        let item_name = parsed
            .product
            .map(|p| p.name)
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| request.item_id.clone());

        Ok(BidReceipt {
            item_id: request.item_id,
            item_name,
            amount: request.amount,
            previous_bid: parsed.previous_bid.unwrap_or(0.0),
        })
    }

    fn name(&self) -> &str {
        "http"
    }
}
