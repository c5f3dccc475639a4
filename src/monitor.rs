use std::future::Future;
use std::time::Duration;

use tracing::debug;

use crate::error::{Error, Result};
use crate::pipeline::Query;
use crate::system::relationship::annotate;
use crate::system::snapshot::Snapshot;
use crate::system::source::{ProcessTable, acquire};

/// Acquire, annotate, then transform: the one pipeline every shell runs.
pub struct Monitor<T: ProcessTable> {
    table: T,
}

impl<T: ProcessTable> Monitor<T> {
    pub fn new(table: T) -> Self {
        Monitor { table }
    }

    pub fn table(&self) -> &T {
        &self.table
    }

    pub fn snapshot(&mut self, query: &Query) -> Result<Snapshot> {
        let snapshot = acquire(&mut self.table)?;
        let snapshot = annotate(snapshot, &mut self.table)?;
        Ok(query.apply(snapshot))
    }

    /// Polls every `interval` until `shutdown` resolves, handing each snapshot
    /// to `render`. Polls never overlap. Returns the number of polls made.
    ///
    /// `shutdown` is polled across passes, so a signal that fires while a
    /// snapshot is being taken or rendered ends the loop after that pass.
    pub async fn watch<S, R, E>(
        &mut self,
        query: &Query,
        interval: Duration,
        shutdown: S,
        mut render: R,
    ) -> std::result::Result<usize, E>
    where
        S: Future,
        R: FnMut(&Snapshot) -> std::result::Result<(), E>,
        E: From<Error>,
    {
        let mut shutdown = std::pin::pin!(shutdown);
        let mut polls = 0;
        loop {
            let snapshot = self.snapshot(query)?;
            render(&snapshot)?;
            polls += 1;

            tokio::select! {
                biased;
                _ = &mut shutdown => break,
                _ = tokio::time::sleep(interval) => {}
            }
        }
        debug!(polls, "watch stopped");
        Ok(polls)
    }
}
