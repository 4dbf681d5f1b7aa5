//! Mapping ingestion channel.
//!
//! # Responsibilities
//! - Fan records in from any number of producers
//! - Apply them to the store from exactly one task
//!
//! # Design Decisions
//! - Unbounded: bulk initial scans of thousands of files never wait on
//!   the drain task
//! - No acknowledgement; producers fire and forget
//! - Per-producer order is the channel's FIFO order; producers may interleave

use tokio::sync::mpsc;

use crate::mapping::record::MappingRecord;
use crate::mapping::store::MappingStore;

/// Error returned when the drain side has gone away.
#[derive(Debug, thiserror::Error)]
#[error("mapping channel closed, dropped {0}")]
pub struct IngestError(pub MappingRecord);

/// Write-only handle producers use to submit records.
#[derive(Debug, Clone)]
pub struct MappingSender {
    tx: mpsc::UnboundedSender<MappingRecord>,
}

impl MappingSender {
    /// Queue a record for the store.
    pub fn send(&self, record: MappingRecord) -> Result<(), IngestError> {
        self.tx.send(record).map_err(|e| IngestError(e.0))
    }

    /// Queue every record from `records`, stopping at the first failure.
    pub fn send_all<I>(&self, records: I) -> Result<usize, IngestError>
    where
        I: IntoIterator<Item = MappingRecord>,
    {
        let mut sent = 0;
        for record in records {
            self.send(record)?;
            sent += 1;
        }
        Ok(sent)
    }
}

/// Read side of the ingestion channel. Owned by the drain task.
#[derive(Debug)]
pub struct MappingReceiver {
    rx: mpsc::UnboundedReceiver<MappingRecord>,
}

/// Create a new ingestion channel.
pub fn channel() -> (MappingSender, MappingReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (MappingSender { tx }, MappingReceiver { rx })
}

impl MappingReceiver {
    /// Apply records to `store` until every sender has been dropped.
    pub async fn drain(mut self, store: MappingStore) {
        tracing::debug!("Mapping ingest started");
        while let Some(record) = self.rx.recv().await {
            store.upsert(&record);
        }
        tracing::debug!("Mapping ingest stopped, all producers gone");
    }
}
