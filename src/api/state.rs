//! Application state for the Rental Pricing Engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::config::ConfigLoader;
use crate::documents::{DocumentOutbox, DocumentRenderer, SummaryRenderer};
use crate::rentals::RentalRecord;

/// In-memory rental store.
///
/// Every mutation of a record happens under the write lock, so concurrent
/// payments against one rental are applied one after another.
pub type RentalStore = RwLock<HashMap<Uuid, RentalRecord>>;

/// Shared application state.
///
/// Contains resources that are shared across all request handlers: the
/// loaded tariff, the rental store, and the document outbox with the
/// renderer that drains it.
///
/// Handlers that touch both the store and the outbox lock the store first.
#[derive(Clone)]
pub struct AppState {
    config: Arc<ConfigLoader>,
    rentals: Arc<RentalStore>,
    outbox: Arc<Mutex<DocumentOutbox>>,
    renderer: Arc<dyn DocumentRenderer>,
}

impl AppState {
    /// Creates a state that renders documents with [`SummaryRenderer`].
    pub fn new(config: ConfigLoader) -> Self {
        Self::with_renderer(config, Arc::new(SummaryRenderer))
    }

    /// Creates a state with a custom document renderer.
    pub fn with_renderer(config: ConfigLoader, renderer: Arc<dyn DocumentRenderer>) -> Self {
        let max_attempts = config.policy().documents.max_attempts;
        Self {
            config: Arc::new(config),
            rentals: Arc::new(RwLock::new(HashMap::new())),
            outbox: Arc::new(Mutex::new(DocumentOutbox::new(max_attempts))),
            renderer,
        }
    }

    /// Returns a reference to the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// Returns the rental store.
    pub fn rentals(&self) -> &RentalStore {
        &self.rentals
    }

    /// Returns the document outbox.
    pub fn outbox(&self) -> &Mutex<DocumentOutbox> {
        &self.outbox
    }

    /// Returns the document renderer.
    pub fn renderer(&self) -> &dyn DocumentRenderer {
        self.renderer.as_ref()
    }
}
