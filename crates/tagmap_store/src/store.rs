//! Store facade and write sequencer.

use crate::config::Config;
use crate::error::{StoreError, StoreResult};
use crate::record::Record;
use std::path::Path;
use std::sync::Arc;
use tagmap_codec::{to_envelope, EnvelopeDecoder, Value};
use tagmap_storage::{FileBackend, StorageBackend, StorageError, StorageResult};
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

/// One queued persistence operation: the fully encoded file text plus a
/// completion acknowledgement.
struct WriteJob {
    text: String,
    ack: oneshot::Sender<StorageResult<()>>,
}

/// A persistent map store over a single backing file.
///
/// The store keeps an insertion-ordered [`Record`] in memory and mirrors
/// it to one backing location through the envelope codec. Every mutation
/// re-encodes the whole record and enqueues a whole-file overwrite; a
/// dedicated writer task applies queued writes one at a time in issue
/// order, so the final on-disk content always reflects the last mutation.
///
/// Every operation begins by *draining*: waiting for all outstanding
/// writes, surfacing any write failure, and reloading the in-memory
/// record from the backing file. This collapses in-memory and on-disk
/// state back to one source of truth, so a read issued after a mutation
/// always observes that mutation, and no operation sees a half-applied
/// state.
///
/// All operations execute on one logical thread of control; the only
/// concurrency is the temporal overlap of queued persistence operations.
/// A stalled write stalls every subsequent operation.
///
/// # Example
///
/// ```rust,ignore
/// use tagmap_store::{MapStore, Value};
///
/// let mut store = MapStore::open(Path::new("app.db")).await?;
/// store.set(Value::from("greeting"), Value::from("hello")).await?;
/// assert_eq!(store.get(&Value::from("greeting")).await?, Some(Value::from("hello")));
/// ```
pub struct MapStore {
    /// Backing location adapter, shared with the writer task.
    backend: Arc<dyn StorageBackend>,
    /// Configuration.
    config: Config,
    /// The in-memory store record.
    data: Record,
    /// Snapshot of the record taken by the last `clear`, kept as a
    /// rollback reference. No restore operation is exposed over it.
    backup: Option<Record>,
    /// Acknowledgements of writes not yet confirmed complete, in issue
    /// order.
    pending: Vec<oneshot::Receiver<StorageResult<()>>>,
    /// Queue feeding the single-writer task.
    writer: mpsc::UnboundedSender<WriteJob>,
}

impl MapStore {
    /// Opens a store backed by the file at `path`.
    ///
    /// Creates the file (and parent directories) if absent. An empty
    /// file initializes an empty record, persisted immediately; existing
    /// content is decoded through the envelope codec and must be a map.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the location cannot be created or
    /// read, and an invalid-format error if existing content does not
    /// decode to a map envelope. Open failures are fatal to the store
    /// instance.
    pub async fn open(path: &Path) -> StoreResult<Self> {
        Self::open_with_config(path, Config::default()).await
    }

    /// Opens a file-backed store with custom configuration.
    pub async fn open_with_config(path: &Path, config: Config) -> StoreResult<Self> {
        Self::open_with_backend(Arc::new(FileBackend::new(path)), config).await
    }

    /// Opens a store over a pre-configured backend.
    ///
    /// This is a lower-level constructor for tests and ephemeral stores;
    /// for most use cases, prefer [`MapStore::open`].
    pub async fn open_with_backend(
        backend: Arc<dyn StorageBackend>,
        config: Config,
    ) -> StoreResult<Self> {
        backend.ensure_exists()?;

        let text = backend.read_all()?;
        let data = if text.is_empty() {
            let record = Record::new();
            backend.write_all(&encode_record(&record)?)?;
            record
        } else {
            decode_record(&text, config.strict_decode)?
        };

        debug!("opened store with {} entries", data.len());

        let (writer, receiver) = mpsc::unbounded_channel();
        spawn_writer(Arc::clone(&backend), receiver);

        Ok(Self {
            backend,
            config,
            data,
            backup: None,
            pending: Vec::new(),
            writer,
        })
    }

    /// Stores `value` under `key`, replacing any existing entry.
    ///
    /// The in-memory record is mutated synchronously; persistence is
    /// enqueued without waiting for it.
    pub async fn set(&mut self, key: Value, value: Value) -> StoreResult<bool> {
        self.drain().await?;
        self.data.insert(key, value);
        self.enqueue_persist()?;
        Ok(true)
    }

    /// Looks up the value under `key`.
    pub async fn get(&mut self, key: &Value) -> StoreResult<Option<Value>> {
        self.drain().await?;
        Ok(self.data.get(key).cloned())
    }

    /// Whether an entry exists under `key`.
    pub async fn has(&mut self, key: &Value) -> StoreResult<bool> {
        self.drain().await?;
        Ok(self.data.contains(key))
    }

    /// Removes the entry under `key`, returning whether it existed.
    pub async fn delete(&mut self, key: &Value) -> StoreResult<bool> {
        self.drain().await?;
        let removed = self.data.remove(key);
        self.enqueue_persist()?;
        Ok(removed)
    }

    /// Removes every entry, retaining the pre-clear record as an
    /// internal rollback snapshot.
    pub async fn clear(&mut self) -> StoreResult<()> {
        self.drain().await?;
        let snapshot = std::mem::take(&mut self.data);
        debug!("cleared store, retained snapshot of {} entries", snapshot.len());
        self.backup = Some(snapshot);
        self.enqueue_persist()?;
        Ok(())
    }

    /// The entries in insertion order.
    pub async fn entries(&mut self) -> StoreResult<Vec<(Value, Value)>> {
        self.drain().await?;
        Ok(self.data.entries().to_vec())
    }

    /// The keys in insertion order.
    pub async fn keys(&mut self) -> StoreResult<Vec<Value>> {
        self.drain().await?;
        Ok(self.data.keys().cloned().collect())
    }

    /// The values in insertion order.
    pub async fn values(&mut self) -> StoreResult<Vec<Value>> {
        self.drain().await?;
        Ok(self.data.values().cloned().collect())
    }

    /// Waits for every outstanding write, then reloads the in-memory
    /// record from the backing file.
    ///
    /// A failed write surfaces here as a storage error; in-memory state
    /// is left as issued so the next mutation re-persists the full
    /// record.
    async fn drain(&mut self) -> StoreResult<()> {
        if self.pending.is_empty() {
            return Ok(());
        }

        debug!("draining {} pending writes", self.pending.len());

        let pending = std::mem::take(&mut self.pending);
        let mut failure: Option<StoreError> = None;
        for ack in pending {
            match ack.await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    if failure.is_none() {
                        failure = Some(e.into());
                    }
                }
                Err(_) => {
                    if failure.is_none() {
                        failure = Some(StoreError::WriterClosed);
                    }
                }
            }
        }

        if let Some(error) = failure {
            return Err(error);
        }
        self.reload()
    }

    /// Replaces the in-memory record with what was actually persisted.
    fn reload(&mut self) -> StoreResult<()> {
        let text = self.backend.read_all()?;
        self.data = if text.is_empty() {
            Record::new()
        } else {
            decode_record(&text, self.config.strict_decode)?
        };
        Ok(())
    }

    /// Encodes the full record and queues a whole-file overwrite.
    fn enqueue_persist(&mut self) -> StoreResult<()> {
        let text = encode_record(&self.data)?;
        let (ack, done) = oneshot::channel();
        self.writer
            .send(WriteJob { text, ack })
            .map_err(|_| StoreError::WriterClosed)?;
        self.pending.push(done);
        Ok(())
    }
}

/// Spawns the single-writer task: queued jobs are applied one at a time
/// in issue order, and each outcome is reported on its acknowledgement
/// channel.
fn spawn_writer(
    backend: Arc<dyn StorageBackend>,
    mut receiver: mpsc::UnboundedReceiver<WriteJob>,
) {
    tokio::spawn(async move {
        while let Some(WriteJob { text, ack }) = receiver.recv().await {
            // Backend IO is synchronous; keep it off the runtime workers.
            let io = Arc::clone(&backend);
            let result = tokio::task::spawn_blocking(move || io.write_all(&text))
                .await
                .unwrap_or_else(|_| Err(StorageError::unavailable("write task panicked")));
            // The store may have been dropped without draining.
            let _ = ack.send(result);
        }
    });
}

fn encode_record(record: &Record) -> StoreResult<String> {
    Ok(to_envelope(&record.to_value())?)
}

fn decode_record(text: &str, strict: bool) -> StoreResult<Record> {
    let value = EnvelopeDecoder::new().strict(strict).decode_raw(text)?;
    Record::from_value(value)
        .ok_or_else(|| StoreError::invalid_format("backing file is not a map envelope"))
}
