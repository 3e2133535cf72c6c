//! Data provider capability and callback registration.
//!
//! # Responsibility
//! - Hold the single registered selection callback for one provider.
//! - Route each consumer request to that callback with a fresh request.
//!
//! # Invariants
//! - Each `request_data_table` call invokes the callback exactly once.
//! - The callback runs without the registration lock held, so it may register,
//!   clear, or issue nested requests.
//! - The process-wide provider is created lazily, once.

use crate::config::{DataProviderConfig, RegistrationPolicy};
use crate::provider::request::{PendingDataTable, SelectDataTableRequest};
use log::{info, warn};
use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// The callback that runs when a data consumer requests data.
pub type OnSelectDataTableCallback = Arc<dyn Fn(SelectDataTableRequest) + Send + Sync>;

static GLOBAL_PROVIDER: OnceCell<DataProvider> = OnceCell::new();

/// Returns the process-wide data provider, creating it on first use.
///
/// Uses `DataProviderConfig::default()`. Code that needs another config should
/// own a `DataProvider::new(config)` instead.
pub fn get_data_provider() -> &'static DataProvider {
    GLOBAL_PROVIDER.get_or_init(|| {
        info!("event=provider_init module=data_provider status=ok scope=process");
        DataProvider::new(DataProviderConfig::default())
    })
}

/// Capability object an extension uses to expose tables to consumers.
pub struct DataProvider {
    config: DataProviderConfig,
    callback: RwLock<Option<OnSelectDataTableCallback>>,
}

impl std::fmt::Debug for DataProvider {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataProvider")
            .field("config", &self.config)
            .field("has_callback", &self.has_callback())
            .finish()
    }
}

impl Default for DataProvider {
    fn default() -> Self {
        Self::new(DataProviderConfig::default())
    }
}

impl DataProvider {
    pub fn new(config: DataProviderConfig) -> Self {
        Self {
            config,
            callback: RwLock::new(None),
        }
    }

    pub fn config(&self) -> &DataProviderConfig {
        &self.config
    }

    /// Registers the callback that runs when a consumer requests data.
    ///
    /// When the callback runs it can either call `select_data_table` right away,
    /// or show a UI and call it once the user has picked a table.
    ///
    /// # Errors
    /// - `CallbackAlreadyRegistered` under `RegistrationPolicy::RejectDuplicate`
    ///   when a callback is already active. `Replace` never fails.
    pub fn on_select_data_table<F>(&self, callback: F) -> Result<(), DataProviderError>
    where
        F: Fn(SelectDataTableRequest) + Send + Sync + 'static,
    {
        self.register_callback(Arc::new(callback))
    }

    /// Registers an already shared callback.
    pub fn register_callback(
        &self,
        callback: OnSelectDataTableCallback,
    ) -> Result<(), DataProviderError> {
        let mut slot = self.callback.write();

        if slot.is_some() {
            match self.config.registration_policy {
                RegistrationPolicy::Replace => {
                    warn!("event=callback_replaced module=data_provider status=ok");
                }
                RegistrationPolicy::RejectDuplicate => {
                    warn!("event=callback_rejected module=data_provider status=error reason=already_registered");
                    return Err(DataProviderError::CallbackAlreadyRegistered);
                }
            }
        } else {
            info!("event=callback_registered module=data_provider status=ok");
        }

        *slot = Some(callback);
        Ok(())
    }

    /// Returns the slot to the unregistered state.
    ///
    /// Returns whether a callback was registered. Outstanding requests are not
    /// affected.
    pub fn clear_callback(&self) -> bool {
        let previous = self.callback.write().take();
        if previous.is_some() {
            info!("event=callback_cleared module=data_provider status=ok");
        }
        previous.is_some()
    }

    pub fn has_callback(&self) -> bool {
        self.callback.read().is_some()
    }

    /// Issues one consumer request to the registered callback.
    ///
    /// The returned handle resolves when the callback (or code it deferred to)
    /// selects a table, or when the request is dropped unfulfilled.
    ///
    /// # Errors
    /// - `NoCallbackRegistered` when no callback is registered.
    pub fn request_data_table(&self) -> Result<PendingDataTable, DataProviderError> {
        let callback = self
            .callback
            .read()
            .clone()
            .ok_or(DataProviderError::NoCallbackRegistered)?;

        let (request, pending) = SelectDataTableRequest::pair(self.config.validate_on_select);
        info!(
            "event=request_dispatched module=data_provider status=ok request_id={}",
            pending.request_id()
        );
        callback(request);
        Ok(pending)
    }
}

/// Registration and dispatch errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataProviderError {
    NoCallbackRegistered,
    CallbackAlreadyRegistered,
}

impl Display for DataProviderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoCallbackRegistered => {
                write!(f, "no select data table callback is registered")
            }
            Self::CallbackAlreadyRegistered => {
                write!(f, "a select data table callback is already registered")
            }
        }
    }
}

impl Error for DataProviderError {}
