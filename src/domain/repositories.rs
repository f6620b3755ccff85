//! Interfaces for the collaborators the catalog engine talks to.
//!
//! The item store is consumed through `PageFetcher`; cart and order creation
//! are invoked through their gateways. None of them are implemented by the
//! engine itself.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::catalog_item::CatalogItem;
use super::errors::FetchError;
use super::pagination::PageInfo;
use super::predicate::Predicate;

/// `{ predicate, page, limit }` as sent to the store. Pages are 1-based.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRequest {
    pub predicate: Predicate,
    pub page: u32,
    pub limit: u32,
}

/// `{ items, pagination? }` as returned by the store.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PageResponse {
    pub items: Vec<CatalogItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PageInfo>,
}

#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_page(&self, request: &PageRequest) -> Result<PageResponse, FetchError>;
}

#[async_trait]
pub trait CartGateway: Send + Sync {
    async fn add_item(&self, item_id: &str, quantity: u32) -> anyhow::Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub item_id: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingDetails {
    pub recipient: String,
    pub address_line: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Card,
    BankTransfer,
    CashOnDelivery,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
    pub lines: Vec<OrderLine>,
    pub shipping: ShippingDetails,
    pub payment_method: PaymentMethod,
}

/// Identifier handed back by the order service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderReceipt {
    pub order_id: String,
}

#[async_trait]
pub trait OrderGateway: Send + Sync {
    async fn create_order(&self, draft: &OrderDraft) -> anyhow::Result<OrderReceipt>;
}
