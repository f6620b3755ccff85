//! CatalogActor: async engine around `CatalogState`
//!
//! Responsibility:
//! - serialize user commands and fetch completions through one loop
//! - execute reducer effects (spawn fetches, arm the price debounce, emit events)
//! - publish the latest `CatalogView` over a watch channel
//!
//! `CatalogHandle` is the cloneable surface handed to presentation code. The
//! actor exits once every handle is dropped or `shutdown` is called.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info, warn, Instrument};
use uuid::Uuid;

use super::catalog_state::{
    CatalogAction, CatalogState, Effect, EngineSettings, FetchCommand, FetchTicket, ScreenProfile,
};
use super::debouncer::{Debouncer, DEFAULT_PRICE_DEBOUNCE};
use super::dto::CatalogView;
use super::events::CatalogEvent;
use super::scroll_trigger::ScrollMetrics;
use crate::domain::repositories::{OrderDraft, OrderReceipt};
use crate::domain::{
    CartGateway, EngineError, FetchError, OrderGateway, PageFetcher, PageResponse, PriceRange,
    SortKey, StockStatus,
};
use crate::infrastructure::config::CatalogConfig;

const COMMAND_CHANNEL_CAPACITY: usize = 64;
const EVENT_CHANNEL_CAPACITY: usize = 128;

#[derive(Debug)]
pub enum CatalogCommand {
    Dispatch(CatalogAction),
    /// Acknowledged once every earlier command has been applied.
    Flush(oneshot::Sender<()>),
    Shutdown,
}

#[derive(Debug)]
struct FetchCompletion {
    ticket: FetchTicket,
    outcome: Result<PageResponse, FetchError>,
}

struct CatalogActor {
    session_id: String,
    state: CatalogState,
    debouncer: Debouncer,
    fetcher: Arc<dyn PageFetcher>,
    completion_tx: mpsc::UnboundedSender<FetchCompletion>,
    view_tx: watch::Sender<CatalogView>,
    event_tx: broadcast::Sender<CatalogEvent>,
}

impl CatalogActor {
    async fn run(
        mut self,
        mut command_rx: mpsc::Receiver<CatalogCommand>,
        mut completion_rx: mpsc::UnboundedReceiver<FetchCompletion>,
        load_on_start: bool,
    ) {
        info!("🎬 Catalog engine {} starting", self.session_id);
        if load_on_start {
            self.dispatch(CatalogAction::Refresh);
        } else {
            self.publish();
        }

        loop {
            let deadline = self.debouncer.deadline();
            tokio::select! {
                biased;

                Some(done) = completion_rx.recv() => {
                    self.dispatch(CatalogAction::FetchCompleted {
                        ticket: done.ticket,
                        outcome: done.outcome,
                    });
                }

                () = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    if self.debouncer.take_if_ready() {
                        self.dispatch(CatalogAction::CommitPriceRange);
                    }
                }

                command = command_rx.recv() => match command {
                    Some(CatalogCommand::Dispatch(action)) => self.dispatch(action),
                    Some(CatalogCommand::Flush(ack)) => {
                        let _ = ack.send(());
                    }
                    Some(CatalogCommand::Shutdown) | None => {
                        info!("🛑 Catalog engine {} stopping", self.session_id);
                        break;
                    }
                },
            }
        }
    }

    fn dispatch(&mut self, action: CatalogAction) {
        for effect in self.state.apply(action) {
            match effect {
                Effect::Fetch(command) => self.spawn_fetch(command),
                Effect::ArmDebounce => self.debouncer.arm(),
                Effect::CancelDebounce => self.debouncer.cancel(),
                Effect::Emit(event) => {
                    // no subscribers is fine
                    let _ = self.event_tx.send(event);
                }
            }
        }
        self.publish();
    }

    fn publish(&self) {
        self.view_tx.send_replace(self.state.view());
    }

    fn spawn_fetch(&self, command: FetchCommand) {
        let fetcher = Arc::clone(&self.fetcher);
        let completion_tx = self.completion_tx.clone();
        let FetchCommand { ticket, request } = command;
        debug!(
            "Fetching page {} (limit {}) under {}",
            request.page, request.limit, ticket.version
        );
        tokio::spawn(
            async move {
                let outcome = fetcher.fetch_page(&request).await;
                if completion_tx.send(FetchCompletion { ticket, outcome }).is_err() {
                    debug!("Engine gone before page {} completed", ticket.page);
                }
            }
            .in_current_span(),
        );
    }
}

/// Builds and spawns a catalog engine.
pub struct CatalogEngineBuilder {
    fetcher: Arc<dyn PageFetcher>,
    settings: EngineSettings,
    debounce: Duration,
    cart: Option<Arc<dyn CartGateway>>,
    orders: Option<Arc<dyn OrderGateway>>,
    load_on_start: bool,
}

impl CatalogEngineBuilder {
    #[must_use]
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self {
            fetcher,
            settings: EngineSettings::default(),
            debounce: DEFAULT_PRICE_DEBOUNCE,
            cart: None,
            orders: None,
            load_on_start: true,
        }
    }

    /// Takes page size, strategy, threshold, search fields, sort and debounce
    /// from the loaded configuration. The screen profile is kept.
    #[must_use]
    pub fn with_config(mut self, config: &CatalogConfig) -> Self {
        let profile = self.settings.profile.clone();
        self.settings = EngineSettings::from_config(config).with_profile(profile);
        self.debounce = Duration::from_millis(config.price_debounce_ms);
        self
    }

    #[must_use]
    pub fn settings(mut self, settings: EngineSettings) -> Self {
        self.settings = settings;
        self
    }

    #[must_use]
    pub fn profile(mut self, profile: ScreenProfile) -> Self {
        self.settings.profile = profile;
        self
    }

    #[must_use]
    pub fn debounce(mut self, delay: Duration) -> Self {
        self.debounce = delay;
        self
    }

    #[must_use]
    pub fn cart(mut self, cart: Arc<dyn CartGateway>) -> Self {
        self.cart = Some(cart);
        self
    }

    #[must_use]
    pub fn orders(mut self, orders: Arc<dyn OrderGateway>) -> Self {
        self.orders = Some(orders);
        self
    }

    /// Whether the first page is requested as soon as the engine starts.
    #[must_use]
    pub fn load_on_start(mut self, enabled: bool) -> Self {
        self.load_on_start = enabled;
        self
    }

    /// Spawns the engine on the current tokio runtime.
    #[must_use]
    pub fn spawn(self) -> CatalogHandle {
        let session_id = Uuid::new_v4().to_string();
        let (command_tx, command_rx) = mpsc::channel(COMMAND_CHANNEL_CAPACITY);
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();
        let (view_tx, view_rx) = watch::channel(CatalogView::default());
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        let actor = CatalogActor {
            session_id: session_id.clone(),
            state: CatalogState::new(self.settings),
            debouncer: Debouncer::new(self.debounce),
            fetcher: self.fetcher,
            completion_tx,
            view_tx,
            event_tx: event_tx.clone(),
        };
        let span = tracing::info_span!("catalog_engine", session = %session_id);
        tokio::spawn(
            actor
                .run(command_rx, completion_rx, self.load_on_start)
                .instrument(span),
        );

        CatalogHandle {
            session_id,
            command_tx,
            view_rx,
            event_tx,
            cart: self.cart,
            orders: self.orders,
        }
    }
}

/// Cloneable entry point to a running catalog engine.
#[derive(Clone)]
pub struct CatalogHandle {
    session_id: String,
    command_tx: mpsc::Sender<CatalogCommand>,
    view_rx: watch::Receiver<CatalogView>,
    event_tx: broadcast::Sender<CatalogEvent>,
    cart: Option<Arc<dyn CartGateway>>,
    orders: Option<Arc<dyn OrderGateway>>,
}

impl CatalogHandle {
    #[must_use]
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Latest published snapshot.
    #[must_use]
    pub fn view(&self) -> CatalogView {
        self.view_rx.borrow().clone()
    }

    #[must_use]
    pub fn watch(&self) -> watch::Receiver<CatalogView> {
        self.view_rx.clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<CatalogEvent> {
        self.event_tx.subscribe()
    }

    async fn send(&self, action: CatalogAction) -> Result<(), EngineError> {
        self.command_tx
            .send(CatalogCommand::Dispatch(action))
            .await
            .map_err(|_| EngineError::Closed)
    }

    pub async fn set_search_term(&self, term: impl Into<String>) -> Result<(), EngineError> {
        self.send(CatalogAction::SetSearchTerm(term.into())).await
    }

    pub async fn set_categories(&self, categories: BTreeSet<String>) -> Result<(), EngineError> {
        self.send(CatalogAction::SetCategories(categories)).await
    }

    pub async fn toggle_category(&self, category: impl Into<String>) -> Result<(), EngineError> {
        self.send(CatalogAction::ToggleCategory(category.into())).await
    }

    pub async fn set_stock_status(&self, statuses: BTreeSet<StockStatus>) -> Result<(), EngineError> {
        self.send(CatalogAction::SetStockStatus(statuses)).await
    }

    pub async fn toggle_stock_status(&self, status: StockStatus) -> Result<(), EngineError> {
        self.send(CatalogAction::ToggleStockStatus(status)).await
    }

    pub async fn set_sort_key(&self, key: SortKey) -> Result<(), EngineError> {
        self.send(CatalogAction::SetSortKey(key)).await
    }

    /// Slider edit; committed after the debounce window.
    pub async fn set_price_range(&self, range: PriceRange) -> Result<(), EngineError> {
        self.send(CatalogAction::EditPriceRange(range)).await
    }

    /// Text edit of the price ends. Unparsable input falls back to the bounds.
    pub async fn set_price_inputs(
        &self,
        low: impl Into<String>,
        high: impl Into<String>,
    ) -> Result<(), EngineError> {
        self.send(CatalogAction::EditPriceInputs {
            low: low.into(),
            high: high.into(),
        })
        .await
    }

    pub async fn clear_filters(&self) -> Result<(), EngineError> {
        self.send(CatalogAction::ClearFilters).await
    }

    /// Reissues the first page for the current criteria, e.g. after an error.
    pub async fn refresh(&self) -> Result<(), EngineError> {
        self.send(CatalogAction::Refresh).await
    }

    pub async fn load_more(&self) -> Result<(), EngineError> {
        self.send(CatalogAction::LoadMore).await
    }

    pub async fn on_scroll(&self, metrics: ScrollMetrics) -> Result<(), EngineError> {
        self.send(CatalogAction::Scrolled(metrics)).await
    }

    /// Waits until the engine has applied every command sent before this one.
    pub async fn flush(&self) -> Result<(), EngineError> {
        let (ack_tx, ack_rx) = oneshot::channel();
        self.command_tx
            .send(CatalogCommand::Flush(ack_tx))
            .await
            .map_err(|_| EngineError::Closed)?;
        ack_rx.await.map_err(|_| EngineError::Closed)
    }

    pub async fn shutdown(&self) -> Result<(), EngineError> {
        self.command_tx
            .send(CatalogCommand::Shutdown)
            .await
            .map_err(|_| EngineError::Closed)
    }

    /// Adds a loaded item to the cart.
    pub async fn add_to_cart(&self, item_id: &str, quantity: u32) -> Result<(), EngineError> {
        if quantity == 0 {
            return Err(EngineError::InvalidQuantity(quantity));
        }
        self.ensure_loaded(item_id)?;
        let cart = self
            .cart
            .as_ref()
            .ok_or(EngineError::CollaboratorMissing("cart"))?;
        cart.add_item(item_id, quantity).await.map_err(|e| {
            warn!("Adding {} x{} to cart failed: {:#}", item_id, quantity, e);
            EngineError::Collaborator(format!("{e:#}"))
        })?;
        info!("🛒 Added {} x{} to cart", item_id, quantity);
        Ok(())
    }

    /// Submits an order for loaded items.
    pub async fn place_order(&self, draft: &OrderDraft) -> Result<OrderReceipt, EngineError> {
        if draft.lines.is_empty() {
            return Err(EngineError::EmptyOrder);
        }
        for line in &draft.lines {
            if line.quantity == 0 {
                return Err(EngineError::InvalidQuantity(line.quantity));
            }
            self.ensure_loaded(&line.item_id)?;
        }
        let orders = self
            .orders
            .as_ref()
            .ok_or(EngineError::CollaboratorMissing("order"))?;
        let receipt = orders.create_order(draft).await.map_err(|e| {
            warn!("Order creation failed: {:#}", e);
            EngineError::Collaborator(format!("{e:#}"))
        })?;
        info!("📦 Order {} created with {} lines", receipt.order_id, draft.lines.len());
        Ok(receipt)
    }

    fn ensure_loaded(&self, item_id: &str) -> Result<(), EngineError> {
        if self.view_rx.borrow().find_item(item_id).is_some() {
            Ok(())
        } else {
            Err(EngineError::ItemNotLoaded(item_id.to_string()))
        }
    }
}
