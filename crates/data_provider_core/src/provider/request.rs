//! Single-use selection request and its consumer-side handle.
//!
//! # Responsibility
//! - Carry exactly one fulfillment capability from host to provider callback.
//! - Let the consumer observe the outcome without polling the provider.
//!
//! # Invariants
//! - `select_data_table` consumes the request, so a table is delivered at most once.
//! - A request dropped without fulfillment resolves as `Abandoned`.
//! - An outcome, once set, never changes.
//! - Cell values are never logged.

use crate::model::table::{DataTable, DataTableValidationError};
use log::{debug, info, warn};
use parking_lot::{Condvar, Mutex};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// Stable identifier for one selection request.
pub type RequestId = Uuid;

/// Final state of one selection request as seen by the consumer.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionOutcome {
    /// The provider selected this table.
    Selected(DataTable),
    /// The provider selected a table that failed validation.
    Rejected(DataTableValidationError),
    /// The request was dropped without a selection.
    Abandoned,
}

impl SelectionOutcome {
    /// Returns the selected table, if any.
    pub fn into_table(self) -> Option<DataTable> {
        match self {
            Self::Selected(table) => Some(table),
            Self::Rejected(_) | Self::Abandoned => None,
        }
    }

    pub fn is_selected(&self) -> bool {
        matches!(self, Self::Selected(_))
    }
}

#[derive(Debug, Default)]
struct Slot {
    outcome: Option<SelectionOutcome>,
    consumer_gone: bool,
}

#[derive(Debug, Default)]
struct RequestState {
    slot: Mutex<Slot>,
    resolved: Condvar,
}

impl RequestState {
    fn resolve(&self, outcome: SelectionOutcome) {
        let mut slot = self.slot.lock();
        if slot.outcome.is_none() {
            slot.outcome = Some(outcome);
            self.resolved.notify_all();
        }
    }
}

/// The options passed to a provider callback for one consumer request.
///
/// Call `select_data_table` immediately, or keep the request and call it later
/// (for example after the user picks a table). Dropping it without a call
/// tells the consumer that no table will arrive.
#[derive(Debug)]
pub struct SelectDataTableRequest {
    request_id: RequestId,
    validate: bool,
    state: Arc<RequestState>,
    fulfilled: bool,
}

impl SelectDataTableRequest {
    /// Creates one request and the consumer handle observing it.
    pub(crate) fn pair(validate: bool) -> (Self, PendingDataTable) {
        let request_id = Uuid::new_v4();
        let state = Arc::new(RequestState::default());
        let request = Self {
            request_id,
            validate,
            state: Arc::clone(&state),
            fulfilled: false,
        };
        let pending = PendingDataTable { request_id, state };
        (request, pending)
    }

    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// Sends `data_table` to the consumer that issued this request.
    ///
    /// # Errors
    /// - `InvalidTable` when validation is enabled and the table is malformed;
    ///   the consumer observes `SelectionOutcome::Rejected`.
    /// - `ConsumerGone` when the consumer dropped its handle; the table is
    ///   returned unchanged.
    pub fn select_data_table(mut self, data_table: DataTable) -> Result<(), SelectDataTableError> {
        self.fulfilled = true;

        if self.validate {
            if let Err(err) = data_table.validate() {
                warn!(
                    "event=request_rejected module=data_provider status=error request_id={} reason={}",
                    self.request_id, err
                );
                self.state.resolve(SelectionOutcome::Rejected(err.clone()));
                return Err(SelectDataTableError::InvalidTable(err));
            }
        }

        let mut slot = self.state.slot.lock();
        if slot.consumer_gone {
            drop(slot);
            debug!(
                "event=consumer_gone module=data_provider status=skipped request_id={}",
                self.request_id
            );
            return Err(SelectDataTableError::ConsumerGone(data_table));
        }

        let column_count = data_table.columns.len();
        let row_count = data_table.row_count();
        slot.outcome = Some(SelectionOutcome::Selected(data_table));
        self.state.resolved.notify_all();
        drop(slot);

        info!(
            "event=request_fulfilled module=data_provider status=ok request_id={} columns={} rows={}",
            self.request_id, column_count, row_count
        );
        Ok(())
    }
}

impl Drop for SelectDataTableRequest {
    fn drop(&mut self) {
        if self.fulfilled {
            return;
        }
        info!(
            "event=request_abandoned module=data_provider status=abandoned request_id={}",
            self.request_id
        );
        self.state.resolve(SelectionOutcome::Abandoned);
    }
}

/// Consumer-side handle for one outstanding request.
///
/// The handle has no deadline of its own; use `wait_timeout` to bound waiting.
/// Dropping it signals that the consumer gave up.
#[derive(Debug)]
pub struct PendingDataTable {
    request_id: RequestId,
    state: Arc<RequestState>,
}

impl PendingDataTable {
    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// Returns whether the provider has resolved this request.
    pub fn is_resolved(&self) -> bool {
        self.state.slot.lock().outcome.is_some()
    }

    /// Takes the outcome without blocking, or hands the handle back.
    pub fn try_take(self) -> Result<SelectionOutcome, Self> {
        let taken = self.state.slot.lock().outcome.take();
        match taken {
            Some(outcome) => Ok(outcome),
            None => Err(self),
        }
    }

    /// Blocks until the request resolves.
    pub fn wait(self) -> SelectionOutcome {
        let mut slot = self.state.slot.lock();
        self.state
            .resolved
            .wait_while(&mut slot, |slot| slot.outcome.is_none());
        slot.outcome.take().unwrap_or(SelectionOutcome::Abandoned)
    }

    /// Blocks until the request resolves or `timeout` elapses.
    ///
    /// On timeout the handle is returned so the consumer can keep waiting.
    pub fn wait_timeout(self, timeout: Duration) -> Result<SelectionOutcome, Self> {
        let outcome = {
            let mut slot = self.state.slot.lock();
            self.state
                .resolved
                .wait_while_for(&mut slot, |slot| slot.outcome.is_none(), timeout);
            slot.outcome.take()
        };
        match outcome {
            Some(outcome) => Ok(outcome),
            None => Err(self),
        }
    }
}

impl Drop for PendingDataTable {
    fn drop(&mut self) {
        self.state.slot.lock().consumer_gone = true;
    }
}

/// Fulfillment errors returned to the provider.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectDataTableError {
    /// The consumer stopped waiting; carries the undelivered table.
    ConsumerGone(DataTable),
    InvalidTable(DataTableValidationError),
}

impl Display for SelectDataTableError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ConsumerGone(table) => write!(
                f,
                "data consumer is no longer waiting for table `{}`",
                table.name
            ),
            Self::InvalidTable(err) => write!(f, "data table rejected: {err}"),
        }
    }
}

impl Error for SelectDataTableError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::ConsumerGone(_) => None,
            Self::InvalidTable(err) => Some(err),
        }
    }
}
