// Debounced write-behind for persisted stores.

use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::storage::{SharedStorage, StorageError};

/// Coalesces writes for a single storage key: each `schedule` supersedes the
/// pending one, and only a value that survives `delay` of quiet is written.
pub(crate) struct DebouncedWriter {
    key: &'static str,
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl DebouncedWriter {
    pub(crate) fn new(key: &'static str, delay: Duration) -> Self {
        Self {
            key,
            delay,
            pending: None,
        }
    }

    /// `on_done` runs on the runtime after the write attempt. It never runs
    /// for a write that was superseded before it fired.
    pub(crate) fn schedule<F>(
        &mut self,
        runtime: &Handle,
        storage: SharedStorage,
        value: String,
        on_done: F,
    ) where
        F: FnOnce(Result<(), StorageError>) + Send + 'static,
    {
        if self.is_pending() {
            tracing::trace!(key = self.key, "superseding pending write");
        }
        self.cancel();
        let key = self.key;
        let delay = self.delay;
        self.pending = Some(runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            // No await past this point: once the timer fires the write can't be torn by abort().
            let result = storage.set_item(key, &value);
            on_done(result);
        }));
    }

    pub(crate) fn cancel(&mut self) {
        if let Some(prev) = self.pending.take() {
            prev.abort();
        }
    }

    pub(crate) fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for DebouncedWriter {
    fn drop(&mut self) {
        self.cancel();
    }
}
