//! Cached list with stale-response suppression

use crate::{ClientError, ClientResult};

/// Marks a load started under a given epoch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    epoch: u64,
}

/// A list the UI renders, plus its load epoch
///
/// A load is split in two steps: [`begin_load`](Self::begin_load) hands out a
/// ticket, [`apply`](Self::apply) installs the result. [`dismiss`](Self::dismiss)
/// bumps the epoch, so a response that lands after the view went away is
/// dropped instead of resurrecting stale rows.
#[derive(Debug, Clone)]
pub struct ListView<T> {
    items: Vec<T>,
    epoch: u64,
    loaded: bool,
    last_error: Option<ClientError>,
}

impl<T> Default for ListView<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            epoch: 0,
            loaded: false,
            last_error: None,
        }
    }
}

impl<T> ListView<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Error of the last load, if it failed
    pub fn last_error(&self) -> Option<&ClientError> {
        self.last_error.as_ref()
    }

    pub fn begin_load(&self) -> LoadTicket {
        LoadTicket { epoch: self.epoch }
    }

    /// Install a load result
    ///
    /// Returns `Ok(false)` when the ticket is stale and the result was
    /// discarded. A failed load keeps the previous rows, except when the
    /// session was invalidated.
    pub fn apply(&mut self, ticket: LoadTicket, result: ClientResult<Vec<T>>) -> ClientResult<bool> {
        if ticket.epoch != self.epoch {
            tracing::debug!(
                ticket = ticket.epoch,
                current = self.epoch,
                "Discarding stale list response"
            );
            return Ok(false);
        }

        match result {
            Ok(items) => {
                self.items = items;
                self.loaded = true;
                self.last_error = None;
                Ok(true)
            }
            Err(err) => {
                if err.is_session_invalidated() {
                    self.items.clear();
                    self.loaded = false;
                }
                self.last_error = Some(err.clone());
                Err(err)
            }
        }
    }

    /// The view went away; in-flight loads become stale
    pub fn dismiss(&mut self) {
        self.epoch += 1;
        self.items.clear();
        self.loaded = false;
        self.last_error = None;
    }
}
