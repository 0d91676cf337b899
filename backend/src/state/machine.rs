//! Transaction state machine.
//!
//! Single-writer controller between the rendering layer and the transaction
//! service: it accepts one event at a time, computes the next application
//! state, and pushes it to observers over a broadcast channel. `dispatch`
//! takes `&mut self`, so one event's async body always runs to completion
//! before the next begins; callers queue events FIFO.
//!
//! Write operations never trust an optimistic in-memory append: after every
//! successful write the full list is re-fetched from the store, which is the
//! core's defense against cache divergence at the cost of one extra round
//! trip.

use crate::domain::{balance_service, TransactionService};
use crate::errors::{ErrorInfo, LedgerError};
use crate::state::filter::{self, FilterCriteria};
use crate::storage::RecordStore;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use log::warn;
use rust_decimal::Decimal;
use shared::{NewTransaction, Transaction, ValidationError};
use tokio::sync::broadcast;

const OBSERVER_CHANNEL_CAPACITY: usize = 32;
const RECENT_WINDOW_DAYS: i64 = 30;

/// Kind of write currently in flight, or just finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOperation {
    Add,
    Update,
    Delete,
    Clear,
}

/// The loaded view of the ledger: the authoritative list plus everything
/// derived from it.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedState {
    /// Every persisted transaction, in storage order
    pub all: Vec<Transaction>,
    /// Subset matching the active filters; empty and meaningless while no
    /// filter is set
    pub filtered: Vec<Transaction>,
    /// Advisory marker for a write in flight; observers use it to disable
    /// duplicate submissions
    pub pending_op: Option<WriteOperation>,
    /// The active filter criteria
    pub filters: FilterCriteria,
}

impl LoadedState {
    pub fn new(all: Vec<Transaction>) -> Self {
        Self {
            all,
            filtered: Vec::new(),
            pending_op: None,
            filters: FilterCriteria::default(),
        }
    }

    /// The list actually shown and aggregated: `filtered` while any filter
    /// is active, otherwise `all`.
    pub fn display_set(&self) -> &[Transaction] {
        if self.filters.is_active() {
            &self.filtered
        } else {
            &self.all
        }
    }

    pub fn current_balance(&self) -> Decimal {
        balance_service::calculate_balance(self.display_set())
    }

    pub fn total_income(&self) -> Decimal {
        balance_service::total_income(self.display_set())
    }

    pub fn total_expenses(&self) -> Decimal {
        balance_service::total_expenses(self.display_set())
    }

    /// Display-set members dated within the trailing 30-day window ending
    /// at the wall clock. Recomputed per read, never frozen into the state.
    pub fn recent_transactions(&self) -> Vec<Transaction> {
        self.recent_transactions_at(Utc::now())
    }

    pub fn recent_transactions_at(&self, now: DateTime<Utc>) -> Vec<Transaction> {
        let cutoff = now - Duration::days(RECENT_WINDOW_DAYS);
        self.display_set()
            .iter()
            .filter(|tx| tx.date > cutoff)
            .cloned()
            .collect()
    }

    /// Recompute `filtered` from the full base list.
    fn refilter(&mut self) {
        if self.filters.is_active() {
            self.filtered = filter::apply(&self.all, &self.filters);
        } else {
            self.filtered.clear();
        }
    }
}

/// Application state as observed by the rendering layer.
#[derive(Debug, Clone, PartialEq)]
pub enum AppState {
    Uninitialized,
    Loading,
    Loaded(LoadedState),
    Error {
        error: ErrorInfo,
        /// Last known-good list, so the display can keep showing stale data
        previous: Vec<Transaction>,
    },
    /// Transient success notification; always immediately followed by
    /// another `Loaded` emission
    OperationSucceeded {
        message: String,
        all: Vec<Transaction>,
        operation: WriteOperation,
    },
}

/// Everything a caller can ask the state machine to do.
#[derive(Debug, Clone)]
pub enum Event {
    Load,
    Refresh,
    Add(NewTransaction),
    Update(Transaction),
    Delete { id: i64 },
    ClearAll,
    Search { query: String },
    FilterByDateRange { start: NaiveDate, end: NaiveDate },
    FilterByType(Option<bool>),
    ClearFilters,
}

/// Event-driven controller owning the application state.
pub struct TransactionStateMachine<S: RecordStore> {
    service: TransactionService<S>,
    state: AppState,
    observers: broadcast::Sender<AppState>,
}

impl<S: RecordStore> TransactionStateMachine<S> {
    pub fn new(service: TransactionService<S>) -> Self {
        let (observers, _) = broadcast::channel(OBSERVER_CHANNEL_CAPACITY);
        Self {
            service,
            state: AppState::Uninitialized,
            observers,
        }
    }

    /// The state as of the last completed transition.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Register an observer. Every emitted state is delivered in order.
    pub fn subscribe(&self) -> broadcast::Receiver<AppState> {
        self.observers.subscribe()
    }

    /// Process one event to completion.
    ///
    /// Validation failures are returned to the caller with the state left
    /// untouched; every other failure is representable as an [`AppState::Error`]
    /// transition and yields `Ok(())`.
    pub async fn dispatch(&mut self, event: Event) -> Result<(), LedgerError> {
        match event {
            Event::Load => self.handle_load().await,
            Event::Refresh => self.handle_refresh().await,
            Event::Add(request) => self.handle_add(request).await,
            Event::Update(transaction) => self.handle_update(transaction).await,
            Event::Delete { id } => self.handle_delete(id).await,
            Event::ClearAll => self.handle_clear_all().await,
            Event::Search { query } => {
                self.handle_search(query);
                Ok(())
            }
            Event::FilterByDateRange { start, end } => {
                self.handle_date_range(start, end);
                Ok(())
            }
            Event::FilterByType(type_filter) => {
                self.handle_type_filter(type_filter);
                Ok(())
            }
            Event::ClearFilters => {
                self.handle_clear_filters();
                Ok(())
            }
        }
    }

    fn emit(&mut self, next: AppState) {
        self.state = next.clone();
        // Nobody listening is fine; the state is still queryable
        let _ = self.observers.send(next);
    }

    /// The last known-good list the current state carries.
    fn known_transactions(&self) -> Vec<Transaction> {
        match &self.state {
            AppState::Loaded(loaded) => loaded.all.clone(),
            AppState::Error { previous, .. } => previous.clone(),
            _ => Vec::new(),
        }
    }

    fn loaded(&self) -> Option<LoadedState> {
        match &self.state {
            AppState::Loaded(loaded) => Some(loaded.clone()),
            _ => None,
        }
    }

    fn fail(&mut self, error: &LedgerError, previous: Vec<Transaction>) {
        warn!("Operation failed: {}", error);
        self.emit(AppState::Error {
            error: ErrorInfo::from(error),
            previous,
        });
    }

    async fn handle_load(&mut self) -> Result<(), LedgerError> {
        self.emit(AppState::Loading);
        match self.service.get_all().await {
            Ok(all) => self.emit(AppState::Loaded(LoadedState::new(all))),
            Err(e) => self.fail(&e, Vec::new()),
        }
        Ok(())
    }

    /// Like `Load`, but keeps stale data visible: no `Loading` emission
    /// while already loaded, and failures preserve the prior list.
    async fn handle_refresh(&mut self) -> Result<(), LedgerError> {
        if !matches!(self.state, AppState::Loaded(_)) {
            self.emit(AppState::Loading);
        }
        let previous = self.known_transactions();
        match self.service.get_all().await {
            Ok(all) => self.emit(AppState::Loaded(LoadedState::new(all))),
            Err(e) => self.fail(&e, previous),
        }
        Ok(())
    }

    async fn handle_add(&mut self, request: NewTransaction) -> Result<(), LedgerError> {
        let Some(loaded) = self.loaded() else {
            warn!("Ignoring Add while not loaded");
            return Ok(());
        };
        // Raised before any I/O and before the pending marker is set; the
        // current state stays untouched
        self.service
            .validate_input(&request.title, request.value)?;

        let previous = loaded.all.clone();
        self.mark_pending(loaded, WriteOperation::Add);

        match self.service.add(request).await {
            Ok(_) => {
                self.finish_write(
                    WriteOperation::Add,
                    "Transaction added successfully",
                    previous,
                )
                .await
            }
            Err(e) => {
                self.fail(&e, previous);
                Ok(())
            }
        }
    }

    async fn handle_update(&mut self, transaction: Transaction) -> Result<(), LedgerError> {
        let Some(loaded) = self.loaded() else {
            warn!("Ignoring Update while not loaded");
            return Ok(());
        };
        if transaction.id.is_none() {
            return Err(ValidationError::MissingId.into());
        }
        self.service
            .validate_input(&transaction.title, transaction.value)?;

        let previous = loaded.all.clone();
        self.mark_pending(loaded, WriteOperation::Update);

        match self.service.update(&transaction).await {
            Ok(()) => {
                self.finish_write(
                    WriteOperation::Update,
                    "Transaction updated successfully",
                    previous,
                )
                .await
            }
            Err(e) => {
                self.fail(&e, previous);
                Ok(())
            }
        }
    }

    async fn handle_delete(&mut self, id: i64) -> Result<(), LedgerError> {
        let Some(loaded) = self.loaded() else {
            warn!("Ignoring Delete while not loaded");
            return Ok(());
        };
        let previous = loaded.all.clone();
        self.mark_pending(loaded, WriteOperation::Delete);

        match self.service.delete(id).await {
            Ok(()) => {
                self.finish_write(
                    WriteOperation::Delete,
                    "Transaction deleted successfully",
                    previous,
                )
                .await
            }
            Err(e) => {
                self.fail(&e, previous);
                Ok(())
            }
        }
    }

    async fn handle_clear_all(&mut self) -> Result<(), LedgerError> {
        let Some(loaded) = self.loaded() else {
            warn!("Ignoring ClearAll while not loaded");
            return Ok(());
        };
        let previous = loaded.all.clone();
        self.mark_pending(loaded, WriteOperation::Clear);

        match self.service.clear_all().await {
            Ok(()) => {
                self.emit(AppState::OperationSucceeded {
                    message: "All transactions cleared".to_string(),
                    all: Vec::new(),
                    operation: WriteOperation::Clear,
                });
                self.emit(AppState::Loaded(LoadedState::new(Vec::new())));
            }
            Err(e) => self.fail(&e, previous),
        }
        Ok(())
    }

    fn mark_pending(&mut self, mut loaded: LoadedState, operation: WriteOperation) {
        loaded.pending_op = Some(operation);
        self.emit(AppState::Loaded(loaded));
    }

    /// Refetch-after-write: rebuild the cache from the store, then emit the
    /// transient success state followed by the fresh loaded state.
    async fn finish_write(
        &mut self,
        operation: WriteOperation,
        message: &str,
        previous: Vec<Transaction>,
    ) -> Result<(), LedgerError> {
        match self.service.get_all().await {
            Ok(all) => {
                self.emit(AppState::OperationSucceeded {
                    message: message.to_string(),
                    all: all.clone(),
                    operation,
                });
                self.emit(AppState::Loaded(LoadedState::new(all)));
            }
            Err(e) => self.fail(&e, previous),
        }
        Ok(())
    }

    fn handle_search(&mut self, query: String) {
        let Some(mut loaded) = self.loaded() else {
            warn!("Ignoring Search while not loaded");
            return;
        };
        let trimmed = query.trim();
        loaded.filters.search_query = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
        loaded.refilter();
        self.emit(AppState::Loaded(loaded));
    }

    fn handle_date_range(&mut self, start: NaiveDate, end: NaiveDate) {
        let Some(mut loaded) = self.loaded() else {
            warn!("Ignoring FilterByDateRange while not loaded");
            return;
        };
        loaded.filters.date_range = Some((start, end));
        loaded.refilter();
        self.emit(AppState::Loaded(loaded));
    }

    fn handle_type_filter(&mut self, type_filter: Option<bool>) {
        let Some(mut loaded) = self.loaded() else {
            warn!("Ignoring FilterByType while not loaded");
            return;
        };
        loaded.filters.type_filter = type_filter;
        loaded.refilter();
        self.emit(AppState::Loaded(loaded));
    }

    fn handle_clear_filters(&mut self) {
        let Some(mut loaded) = self.loaded() else {
            warn!("Ignoring ClearFilters while not loaded");
            return;
        };
        loaded.filters = FilterCriteria::default();
        loaded.filtered.clear();
        self.emit(AppState::Loaded(loaded));
    }
}
