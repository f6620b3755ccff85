//! CatalogState: the single owner of a catalog screen's state
//!
//! Responsibility:
//! - apply every user edit and fetch completion through one reducer
//! - stamp each fetch with the criteria version it was issued under and drop
//!   completions whose version is no longer current
//! - keep the result set, pagination, bounds and sorted view consistent
//!
//! The reducer performs no I/O. It returns `Effect`s which the engine actor
//! (see `catalog_actor`) executes.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::dto::{CatalogView, LoadPhase};
use super::events::CatalogEvent;
use super::scroll_trigger::{ScrollMetrics, ScrollTrigger, DEFAULT_SCROLL_THRESHOLD};
use crate::domain::pagination::DEFAULT_PAGE_SIZE;
use crate::domain::query_translator::DEFAULT_SEARCH_FIELDS;
use crate::domain::{
    translate, BoundsEstimator, CatalogItem, CriteriaVersion, DerivedBounds, FetchError, FilterCriteria,
    HasNextStrategy, PageRequest, PageResponse, PaginationState, PriceRange, ResultSet, SortEngine,
    SortKey, StockStatus, TranslationContext,
};
use crate::infrastructure::config::CatalogConfig;

/// Which catalog screen the engine serves.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ScreenProfile {
    /// Whole-catalog browsing; categories come only from the user.
    #[default]
    Shop,
    /// Screen scoped to fixed categories. User selections are intersected
    /// with the pinned set.
    Category { pinned: BTreeSet<String> },
}

impl ScreenProfile {
    #[must_use]
    pub fn category<I, S>(pinned: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Category {
            pinned: pinned.into_iter().map(Into::into).collect(),
        }
    }

    fn pinned(&self) -> Option<&BTreeSet<String>> {
        match self {
            Self::Shop => None,
            Self::Category { pinned } => Some(pinned),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub page_size: u32,
    pub has_next_strategy: HasNextStrategy,
    pub scroll_threshold: f64,
    pub search_fields: Vec<String>,
    pub default_sort: SortKey,
    pub profile: ScreenProfile,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            has_next_strategy: HasNextStrategy::default(),
            scroll_threshold: DEFAULT_SCROLL_THRESHOLD,
            search_fields: DEFAULT_SEARCH_FIELDS.iter().map(ToString::to_string).collect(),
            default_sort: SortKey::default(),
            profile: ScreenProfile::Shop,
        }
    }
}

impl EngineSettings {
    #[must_use]
    pub fn from_config(config: &CatalogConfig) -> Self {
        Self {
            page_size: config.page_size,
            has_next_strategy: config.has_next_strategy,
            scroll_threshold: config.scroll_threshold,
            search_fields: config.search_fields.clone(),
            default_sort: config.default_sort,
            profile: ScreenProfile::Shop,
        }
    }

    #[must_use]
    pub fn with_profile(mut self, profile: ScreenProfile) -> Self {
        self.profile = profile;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    First,
    More,
}

/// Identity of one issued fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub version: CriteriaVersion,
    pub page: u32,
    pub kind: FetchKind,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FetchCommand {
    pub ticket: FetchTicket,
    pub request: PageRequest,
}

/// Side effects requested by the reducer.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Fetch(FetchCommand),
    /// Restart the price quiet window.
    ArmDebounce,
    CancelDebounce,
    Emit(CatalogEvent),
}

#[derive(Debug, Clone)]
pub enum CatalogAction {
    /// Issue a first-page fetch for the current criteria without changing
    /// them. Used for the initial load and for retry after a failure.
    Refresh,
    SetSearchTerm(String),
    SetCategories(BTreeSet<String>),
    ToggleCategory(String),
    SetStockStatus(BTreeSet<StockStatus>),
    ToggleStockStatus(StockStatus),
    /// Reorders locally; never refetches.
    SetSortKey(SortKey),
    /// Slider drag; committed after the quiet window.
    EditPriceRange(PriceRange),
    /// Raw text inputs for the price ends.
    EditPriceInputs { low: String, high: String },
    /// Quiet window elapsed.
    CommitPriceRange,
    ClearFilters,
    LoadMore,
    Scrolled(ScrollMetrics),
    FetchCompleted {
        ticket: FetchTicket,
        outcome: Result<PageResponse, FetchError>,
    },
}

#[derive(Debug)]
pub struct CatalogState {
    settings: EngineSettings,
    trigger: ScrollTrigger,
    criteria: FilterCriteria,
    version: CriteriaVersion,
    pending_price: Option<PriceRange>,
    results: ResultSet,
    /// Version the loaded page 1 was fetched under.
    results_version: Option<CriteriaVersion>,
    sorted: Vec<Arc<CatalogItem>>,
    pagination: PaginationState,
    bounds: BoundsEstimator,
    phase: LoadPhase,
    first_in_flight: Option<CriteriaVersion>,
    more_in_flight: Option<FetchTicket>,
    last_error: Option<String>,
}

impl CatalogState {
    #[must_use]
    pub fn new(settings: EngineSettings) -> Self {
        let trigger = ScrollTrigger::new(settings.scroll_threshold);
        let pagination = PaginationState::new(settings.page_size);
        let criteria = FilterCriteria::with_sort(settings.default_sort);
        Self {
            settings,
            trigger,
            criteria,
            version: CriteriaVersion::initial(),
            pending_price: None,
            results: ResultSet::new(),
            results_version: None,
            sorted: Vec::new(),
            pagination,
            bounds: BoundsEstimator::new(),
            phase: LoadPhase::Idle,
            first_in_flight: None,
            more_in_flight: None,
            last_error: None,
        }
    }

    #[must_use]
    pub const fn version(&self) -> CriteriaVersion {
        self.version
    }

    #[must_use]
    pub const fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    #[must_use]
    pub const fn phase(&self) -> LoadPhase {
        self.phase
    }

    #[must_use]
    pub const fn pagination(&self) -> &PaginationState {
        &self.pagination
    }

    #[must_use]
    pub const fn results(&self) -> &ResultSet {
        &self.results
    }

    #[must_use]
    pub fn sorted_items(&self) -> &[Arc<CatalogItem>] {
        &self.sorted
    }

    #[must_use]
    pub const fn pending_price(&self) -> Option<PriceRange> {
        self.pending_price
    }

    #[must_use]
    pub const fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.first_in_flight.is_some() || self.more_in_flight.is_some()
    }

    /// Snapshot for presentation.
    #[must_use]
    pub fn view(&self) -> CatalogView {
        let bounds = self.bounds.bounds();
        CatalogView {
            version: self.version,
            criteria: self.criteria.clone(),
            pending_price_range: self.pending_price,
            effective_price_range: self
                .pending_price
                .or_else(|| self.criteria.effective_price_range(bounds)),
            bounds,
            items: self.sorted.clone(),
            pagination: self.pagination.clone(),
            phase: self.phase,
            last_error: self.last_error.clone(),
        }
    }

    /// The predicate the store would receive for the current criteria.
    #[must_use]
    pub fn current_request(&self, page: u32) -> PageRequest {
        let empty = BTreeSet::new();
        let ctx = TranslationContext {
            bounds: self.bounds.bounds(),
            search_fields: &self.settings.search_fields,
            pinned_categories: self.settings.profile.pinned().unwrap_or(&empty),
        };
        PageRequest {
            predicate: translate(&self.criteria, &ctx),
            page,
            limit: self.pagination.limit,
        }
    }

    pub fn apply(&mut self, action: CatalogAction) -> Vec<Effect> {
        match action {
            CatalogAction::Refresh => self.load_first(),
            CatalogAction::SetSearchTerm(term) => self.edit(|c| c.search_term = term),
            CatalogAction::SetCategories(categories) => self.edit(|c| c.categories = categories),
            CatalogAction::ToggleCategory(category) => self.edit(|c| c.toggle_category(&category)),
            CatalogAction::SetStockStatus(statuses) => self.edit(|c| c.stock_status = statuses),
            CatalogAction::ToggleStockStatus(status) => {
                self.edit(|c| c.toggle_stock_status(status))
            }
            CatalogAction::SetSortKey(key) => {
                self.set_sort_key(key);
                Vec::new()
            }
            CatalogAction::EditPriceRange(range) => self.edit_price(range),
            CatalogAction::EditPriceInputs { low, high } => {
                self.edit_price(PriceRange::from_inputs(&low, &high, self.bounds.bounds()))
            }
            CatalogAction::CommitPriceRange => self.commit_price(),
            CatalogAction::ClearFilters => self.clear_filters(),
            CatalogAction::LoadMore => self.load_more(),
            CatalogAction::Scrolled(metrics) => {
                if self.trigger.is_near_bottom(&metrics) {
                    self.load_more()
                } else {
                    Vec::new()
                }
            }
            CatalogAction::FetchCompleted { ticket, outcome } => self.complete(ticket, outcome),
        }
    }

    /// Applies a non-price edit. A pending slider value is folded into the
    /// same version so it is not lost.
    fn edit(&mut self, mutate: impl FnOnce(&mut FilterCriteria)) -> Vec<Effect> {
        let mut effects = Vec::new();
        let mut next = self.criteria.clone();
        if let Some(range) = self.pending_price.take() {
            next.price_range = Some(range);
            effects.push(Effect::CancelDebounce);
        }
        mutate(&mut next);
        if next == self.criteria {
            return effects;
        }
        self.criteria = next;
        effects.extend(self.bump_and_load());
        effects
    }

    fn set_sort_key(&mut self, key: SortKey) {
        if self.criteria.sort_key == key {
            return;
        }
        debug!("Sort key changed to {:?}", key);
        self.criteria.sort_key = key;
        self.resort();
    }

    fn edit_price(&mut self, range: PriceRange) -> Vec<Effect> {
        let range = match self.bounds.bounds() {
            Some(bounds) => range.clamped_to(bounds),
            None => range,
        };
        self.pending_price = Some(range);
        vec![Effect::ArmDebounce]
    }

    fn commit_price(&mut self) -> Vec<Effect> {
        let Some(range) = self.pending_price.take() else {
            return Vec::new();
        };
        if self.criteria.price_range == Some(range) {
            return Vec::new();
        }
        debug!("Committing price range {}..={}", range.low, range.high);
        self.criteria.price_range = Some(range);
        self.bump_and_load()
    }

    fn clear_filters(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        if self.pending_price.take().is_some() {
            effects.push(Effect::CancelDebounce);
        }
        self.criteria.clear_filters();
        if let Some(bounds) = self.bounds.reset_from(self.results.iter()) {
            effects.push(Effect::Emit(CatalogEvent::BoundsInitialized { bounds }));
        }
        effects.extend(self.bump_and_load());
        effects
    }

    fn bump_and_load(&mut self) -> Vec<Effect> {
        self.version = self.version.next();
        // anything still in flight now belongs to an older version
        self.first_in_flight = None;
        self.more_in_flight = None;
        debug!("Criteria changed, now at {}", self.version);
        self.load_first()
    }

    fn load_first(&mut self) -> Vec<Effect> {
        if self.first_in_flight == Some(self.version) {
            return Vec::new();
        }
        let ticket = FetchTicket {
            version: self.version,
            page: 1,
            kind: FetchKind::First,
        };
        self.first_in_flight = Some(self.version);
        self.more_in_flight = None;
        self.phase = LoadPhase::LoadingFirst;
        vec![Effect::Fetch(FetchCommand {
            ticket,
            request: self.current_request(1),
        })]
    }

    fn load_more(&mut self) -> Vec<Effect> {
        if !self.pagination.has_next || self.is_loading() {
            return Vec::new();
        }
        if self.results_version != Some(self.version) {
            // page 1 of the current criteria has not loaded yet
            debug!(
                "Not loading more: results belong to {:?}, criteria at {}",
                self.results_version, self.version
            );
            return Vec::new();
        }
        let page = self.pagination.next_page();
        let ticket = FetchTicket {
            version: self.version,
            page,
            kind: FetchKind::More,
        };
        self.more_in_flight = Some(ticket);
        self.phase = LoadPhase::LoadingMore;
        debug!("Loading page {} under {}", page, self.version);
        vec![Effect::Fetch(FetchCommand {
            ticket,
            request: self.current_request(page),
        })]
    }

    fn complete(
        &mut self,
        ticket: FetchTicket,
        outcome: Result<PageResponse, FetchError>,
    ) -> Vec<Effect> {
        if ticket.version != self.version {
            debug!(
                "Discarding page {} issued under {} (current {})",
                ticket.page, ticket.version, self.version
            );
            return vec![Effect::Emit(CatalogEvent::StaleResponseDiscarded {
                issued: ticket.version,
                current: self.version,
                page: ticket.page,
            })];
        }

        let owned = match ticket.kind {
            FetchKind::First => self.first_in_flight.take_if(|v| *v == ticket.version).is_some(),
            FetchKind::More => self.more_in_flight.take_if(|t| *t == ticket).is_some(),
        };
        if !owned {
            // superseded by a refresh under the same version
            debug!("Ignoring superseded page {} for {}", ticket.page, ticket.version);
            return Vec::new();
        }

        match outcome {
            Ok(response) => self.apply_page(ticket, response),
            Err(error) => self.fail(ticket, &error),
        }
    }

    fn apply_page(&mut self, ticket: FetchTicket, response: PageResponse) -> Vec<Effect> {
        let mut effects = Vec::new();
        let count = response.items.len();
        self.results.merge(ticket.page, response.items);
        if ticket.kind == FetchKind::First {
            self.results_version = Some(ticket.version);
        }
        self.pagination.record_page(
            ticket.page,
            count,
            response.pagination.as_ref(),
            self.settings.has_next_strategy,
        );
        let mut price_now_applies = false;
        if let Some(bounds) = self.bounds.observe(self.results.iter()) {
            info!(
                "Price bounds initialized: {}..={}",
                bounds.min_price, bounds.max_price
            );
            effects.push(Effect::Emit(CatalogEvent::BoundsInitialized { bounds }));
            price_now_applies = self.clamp_prices_to(bounds);
        }
        self.resort();
        self.phase = LoadPhase::Ready;
        self.last_error = None;

        info!(
            "Loaded page {} ({} items, has_next={}) under {}",
            ticket.page, count, self.pagination.has_next, ticket.version
        );
        effects.push(Effect::Emit(CatalogEvent::PageLoaded {
            version: ticket.version,
            page: ticket.page,
            count,
            has_next: self.pagination.has_next,
        }));
        if price_now_applies {
            // the page was fetched without the price clause
            info!("Reloading with the price range chosen before bounds were known");
            effects.extend(self.bump_and_load());
        }
        effects
    }

    /// Pulls price selections made before bounds existed into the bounds.
    /// Returns true when the committed range now restricts the catalog.
    fn clamp_prices_to(&mut self, bounds: DerivedBounds) -> bool {
        self.pending_price = self.pending_price.map(|range| range.clamped_to(bounds));
        let Some(range) = self.criteria.price_range else {
            return false;
        };
        self.criteria.price_range = Some(range.clamped_to(bounds));
        self.criteria.has_custom_price(bounds)
    }

    fn fail(&mut self, ticket: FetchTicket, error: &FetchError) -> Vec<Effect> {
        warn!(
            "Fetch for page {} under {} failed: {}",
            ticket.page, ticket.version, error
        );
        let message = error.to_string();
        self.phase = LoadPhase::Error;
        self.last_error = Some(message.clone());
        vec![Effect::Emit(CatalogEvent::FetchFailed {
            version: ticket.version,
            page: ticket.page,
            message,
        })]
    }

    fn resort(&mut self) {
        self.sorted = SortEngine::sorted(self.results.items(), self.criteria.sort_key);
    }
}
