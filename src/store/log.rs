//! Durable interaction log.
//!
//! The log is one pretty-printed JSON array. Every mutation is a
//! read-modify-write of the whole file, so all mutations for a path go
//! through a single writer task; handles only send it commands. The writer
//! replaces the file by renaming a fully written sibling, so snapshot readers
//! never see a partial array.

use chrono::Utc;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::{assign_legacy_ids, InteractionRecord, Rating};
use crate::error::LogError;

enum LogCommand {
    Append {
        record: InteractionRecord,
        respond_to: oneshot::Sender<Result<(), LogError>>,
    },
    Rate {
        id: Uuid,
        rating: Rating,
        respond_to: oneshot::Sender<Result<InteractionRecord, LogError>>,
    },
}

/// Handle to the single writer of one log file. Cheap to clone.
#[derive(Clone)]
pub struct InteractionLog {
    tx: mpsc::Sender<LogCommand>,
    path: PathBuf,
}

impl InteractionLog {
    /// Start the writer task for `path`. Must be called inside a Tokio runtime.
    /// Run at most one writer per path.
    pub fn spawn(path: PathBuf, queue_size: usize) -> Self {
        let (tx, rx) = mpsc::channel(queue_size.max(1));
        let writer = LogWriter { path: path.clone() };
        tokio::spawn(writer.run(rx));
        Self { tx, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append a record, preserving the order of earlier records.
    pub async fn append(&self, record: InteractionRecord) -> Result<(), LogError> {
        let (respond_to, response) = oneshot::channel();
        self.tx
            .send(LogCommand::Append { record, respond_to })
            .await
            .map_err(|_| LogError::Closed)?;
        response.await.map_err(|_| LogError::Closed)?
    }

    /// Set the rating of the record with `id` in place and return it.
    pub async fn rate(&self, id: Uuid, rating: Rating) -> Result<InteractionRecord, LogError> {
        let (respond_to, response) = oneshot::channel();
        self.tx
            .send(LogCommand::Rate {
                id,
                rating,
                respond_to,
            })
            .await
            .map_err(|_| LogError::Closed)?;
        response.await.map_err(|_| LogError::Closed)?
    }

    /// Read the log as it is on disk right now.
    pub async fn snapshot(&self) -> Result<Vec<InteractionRecord>, LogError> {
        load_records(&self.path).await
    }
}

struct Loaded {
    records: Vec<InteractionRecord>,
    corrupt: bool,
}

async fn read_log(path: &Path) -> Result<Loaded, LogError> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Ok(Loaded {
                records: Vec::new(),
                corrupt: false,
            })
        }
        Err(e) => return Err(LogError::Io(e)),
    };

    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Loaded {
            records: Vec::new(),
            corrupt: false,
        });
    }

    match serde_json::from_slice::<Vec<InteractionRecord>>(&bytes) {
        Ok(mut records) => {
            let assigned = assign_legacy_ids(&mut records);
            if assigned > 0 {
                debug!("📒 [LOG] Derived ids for {} legacy records", assigned);
            }
            Ok(Loaded {
                records,
                corrupt: false,
            })
        }
        Err(e) => {
            warn!(
                "⚠️ [LOG] {} is not a valid interaction log ({}) - reading as empty",
                path.display(),
                e
            );
            Ok(Loaded {
                records: Vec::new(),
                corrupt: true,
            })
        }
    }
}

/// Snapshot read. Absent, empty or unparsable logs read as empty;
/// only I/O failures are errors.
pub async fn load_records(path: &Path) -> Result<Vec<InteractionRecord>, LogError> {
    Ok(read_log(path).await?.records)
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "interactions.json".to_string());
    path.with_file_name(format!("{}{}", name, suffix))
}

/// `<log>.corrupt-<utc timestamp>-<random>`; never collides with an earlier copy.
fn quarantine_path(path: &Path) -> PathBuf {
    let stamp = Utc::now().format("%Y%m%dT%H%M%S%.6fZ");
    let tag = Uuid::new_v4().simple().to_string();
    sibling(path, &format!(".corrupt-{}-{}", stamp, &tag[..8]))
}

struct LogWriter {
    path: PathBuf,
}

impl LogWriter {
    async fn run(self, mut rx: mpsc::Receiver<LogCommand>) {
        info!("📒 [LOG] Writer started (log: {})", self.path.display());

        while let Some(command) = rx.recv().await {
            match command {
                LogCommand::Append { record, respond_to } => {
                    let result = self.append(record).await;
                    if let Err(e) = &result {
                        error!("📒 [LOG] Append failed: {}", e);
                    }
                    let _ = respond_to.send(result);
                }
                LogCommand::Rate {
                    id,
                    rating,
                    respond_to,
                } => {
                    let _ = respond_to.send(self.rate(id, rating).await);
                }
            }
        }

        info!("📒 [LOG] All handles dropped, writer stopping");
    }

    async fn append(&self, record: InteractionRecord) -> Result<(), LogError> {
        let mut records = self.load_for_write().await?;
        records.push(record);
        self.persist(&records).await?;
        debug!("📒 [LOG] Appended record #{}", records.len());
        Ok(())
    }

    async fn rate(&self, id: Uuid, rating: Rating) -> Result<InteractionRecord, LogError> {
        let mut records = self.load_for_write().await?;
        let record = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(LogError::NotFound { id })?;
        record.user_rating = Some(rating);
        let updated = record.clone();

        self.persist(&records).await?;
        info!("📒 [LOG] Rated {} as {:?}", id, rating);
        Ok(updated)
    }

    /// Load for mutation; an unparsable file is moved aside before it is overwritten.
    async fn load_for_write(&self) -> Result<Vec<InteractionRecord>, LogError> {
        let loaded = read_log(&self.path).await?;
        if loaded.corrupt {
            let quarantine = quarantine_path(&self.path);
            tokio::fs::rename(&self.path, &quarantine).await?;
            warn!(
                "⚠️ [LOG] Moved unreadable log to {} - starting a new log",
                quarantine.display()
            );
        }
        Ok(loaded.records)
    }

    async fn persist(&self, records: &[InteractionRecord]) -> Result<(), LogError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let bytes = serde_json::to_vec_pretty(records)?;
        let tmp = sibling(&self.path, ".tmp");
        tokio::fs::write(&tmp, &bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}
