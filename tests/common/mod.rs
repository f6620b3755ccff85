//! Shared fixtures for engine integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use storefront_catalog::domain::repositories::{OrderDraft, OrderReceipt};
use storefront_catalog::domain::{
    CartGateway, CatalogItem, FetchError, OrderGateway, PageFetcher, PageRequest, PageResponse,
};
use tokio::sync::{mpsc, oneshot};

pub fn item(id: &str, title: &str, category: &str, price: f64) -> CatalogItem {
    CatalogItem {
        id: id.to_string(),
        title: title.to_string(),
        category: category.to_string(),
        description: String::new(),
        price,
        original_price: None,
        rating: None,
        in_stock: true,
        images: Vec::new(),
        created_at: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
    }
}

/// `count` items priced 1.0, 2.0, ... in category "general".
pub fn numbered_items(count: u32) -> Vec<CatalogItem> {
    (1..=count)
        .map(|i| item(&format!("p{i}"), &format!("Item {i}"), "general", f64::from(i)))
        .collect()
}

/// A fetch parked until the test answers it.
pub struct PendingFetch {
    pub request: PageRequest,
    reply: oneshot::Sender<Result<PageResponse, FetchError>>,
}

impl PendingFetch {
    pub fn respond(self, items: Vec<CatalogItem>) {
        let _ = self.reply.send(Ok(PageResponse {
            items,
            pagination: None,
        }));
    }

    pub fn fail(self, error: FetchError) {
        let _ = self.reply.send(Err(error));
    }
}

/// Fetcher whose responses are released by the test in any order.
pub struct ControlledFetcher {
    pending_tx: mpsc::UnboundedSender<PendingFetch>,
}

impl ControlledFetcher {
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<PendingFetch>) {
        let (pending_tx, pending_rx) = mpsc::unbounded_channel();
        (Arc::new(Self { pending_tx }), pending_rx)
    }
}

#[async_trait]
impl PageFetcher for ControlledFetcher {
    async fn fetch_page(&self, request: &PageRequest) -> Result<PageResponse, FetchError> {
        let (reply, response) = oneshot::channel();
        self.pending_tx
            .send(PendingFetch {
                request: request.clone(),
                reply,
            })
            .map_err(|_| FetchError::Network("test harness gone".into()))?;
        response
            .await
            .map_err(|_| FetchError::Network("request abandoned".into()))?
    }
}

#[derive(Default)]
pub struct RecordingCart {
    pub added: Mutex<Vec<(String, u32)>>,
}

#[async_trait]
impl CartGateway for RecordingCart {
    async fn add_item(&self, item_id: &str, quantity: u32) -> anyhow::Result<()> {
        self.added
            .lock()
            .unwrap()
            .push((item_id.to_string(), quantity));
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingOrders {
    pub drafts: Mutex<Vec<OrderDraft>>,
}

#[async_trait]
impl OrderGateway for RecordingOrders {
    async fn create_order(&self, draft: &OrderDraft) -> anyhow::Result<OrderReceipt> {
        let mut drafts = self.drafts.lock().unwrap();
        drafts.push(draft.clone());
        Ok(OrderReceipt {
            order_id: format!("order-{}", drafts.len()),
        })
    }
}
