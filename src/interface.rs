//! Shared access to one [`Library`] from many callers.
//!
//! The library itself is single-threaded: every operation takes `&self` or
//! `&mut self` and finishes before returning. This module puts it behind a
//! mutex so the HTTP layer can hand it to concurrent requests; each request
//! runs exactly one operation while holding the lock, which keeps every
//! workflow step whole.

use std::sync::Mutex;
use std::time::Instant;

use tracing::debug;

use crate::error::{BookwormError, Result};
use crate::library::Library;

#[derive(Debug)]
pub struct LibraryInterface {
    library: Mutex<Library>,
}

impl LibraryInterface {
    pub fn new(library: Library) -> Self {
        Self {
            library: Mutex::new(library),
        }
    }

    /// Runs a read-only operation.
    pub fn read<T>(&self, operation: impl FnOnce(&Library) -> T) -> Result<T> {
        let started = Instant::now();
        let library = self
            .library
            .lock()
            .map_err(|e| BookwormError::Lock(e.to_string()))?;
        let result = operation(&library);
        debug!(elapsed_us = started.elapsed().as_micros() as u64, "read complete");
        Ok(result)
    }

    /// Runs an operation that may change the library.
    pub fn write<T>(&self, operation: impl FnOnce(&mut Library) -> Result<T>) -> Result<T> {
        let started = Instant::now();
        let mut library = self
            .library
            .lock()
            .map_err(|e| BookwormError::Lock(e.to_string()))?;
        let result = operation(&mut library);
        debug!(elapsed_us = started.elapsed().as_micros() as u64, ok = result.is_ok(), "write complete");
        result
    }

    pub fn into_inner(self) -> Result<Library> {
        self.library
            .into_inner()
            .map_err(|e| BookwormError::Lock(e.to_string()))
    }
}
