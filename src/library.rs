use std::fmt;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::clock::{Clock, SystemClock};
use crate::error::{BookwormError, Result};
use crate::notify::{Notice, Notifier};
use crate::store::{IdGenerator, SequenceGenerator, Store};

/// The library: an entity store plus the clock and notifiers its operations
/// use. Catalog, membership, circulation and report operations are
/// implemented on this type in their own modules.
pub struct Library {
    pub(crate) store: Store,
    clock: Box<dyn Clock>,
    notifiers: Vec<Box<dyn Notifier>>,
}

impl Library {
    pub fn new(store: Store, clock: Box<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            notifiers: Vec::new(),
        }
    }
    /// An empty library on the system clock.
    pub fn empty() -> Self {
        Self::new(Store::with_sequence(), Box::new(SystemClock))
    }
    /// A library holding the seed collections on the system clock.
    pub fn seeded() -> Result<Self> {
        Self::seeded_with(Box::new(SequenceGenerator::new()), Box::new(SystemClock))
    }
    pub fn seeded_with(id_generator: Box<dyn IdGenerator>, clock: Box<dyn Clock>) -> Result<Self> {
        Ok(Self::new(Store::seeded(id_generator)?, clock))
    }
    pub fn register_notifier(&mut self, notifier: Box<dyn Notifier>) {
        self.notifiers.push(notifier);
    }
    pub fn store(&self) -> &Store {
        &self.store
    }
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }
    pub(crate) fn notify(&self, notice: Notice) {
        debug!(level = ?notice.level, text = %notice.message, "notify");
        for notifier in &self.notifiers {
            notifier.notify(&notice);
        }
    }
    // Every rejection goes out as an error notice before it reaches the caller.
    pub(crate) fn reject<T>(&self, err: BookwormError) -> Result<T> {
        self.notify(Notice::error(err.to_string()));
        Err(err)
    }
}

impl fmt::Debug for Library {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Library")
            .field("store", &self.store)
            .field("notifiers_count", &self.notifiers.len())
            .finish()
    }
}
