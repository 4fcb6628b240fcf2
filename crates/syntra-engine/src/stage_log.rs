//! Stage log — append-only audit trail of every pipeline stage
//!
//! One JSON object per line:
//!
//! ```text
//! {"round_id":"…","stage":"affective_initial","timestamp":"2026-…Z","payload":{…}}
//! {"round_id":"…","stage":"analytical_initial",…}
//! …
//! {"round_id":"…","stage":"synthesis",…}
//! ```
//!
//! A round's six records are handed over as one batch and always land
//! contiguously, so concurrent rounds never interleave.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use syntra_core::{EngineError, Result, StageRecord};
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Destination for stage records. Shared across threads by the coordinator.
pub trait StageSink: Send + Sync {
    fn log(&self, record: &StageRecord) -> Result<()>;

    /// Log a whole round. Sinks that can interleave must override this to
    /// write the batch atomically.
    fn log_round(&self, records: &[StageRecord]) -> Result<()> {
        for record in records {
            self.log(record)?;
        }
        Ok(())
    }
}

/// Serialize records as JSONL, one line each.
fn encode_lines(records: &[StageRecord]) -> Result<String> {
    let mut out = String::new();
    for record in records {
        let line = serde_json::to_string(record)
            .map_err(|e| EngineError::logger_unavailable(format!("encode {}: {}", record.stage, e)))?;
        out.push_str(&line);
        out.push('\n');
    }
    Ok(out)
}

// ============================================================
// In-process sinks
// ============================================================

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullStageLog;

impl StageSink for NullStageLog {
    fn log(&self, _record: &StageRecord) -> Result<()> {
        Ok(())
    }
}

/// Keeps records in memory. Used by `--trace` and tests.
#[derive(Debug, Default)]
pub struct MemoryStageLog {
    records: Mutex<Vec<StageRecord>>,
}

impl MemoryStageLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<StageRecord> {
        match self.records.lock() {
            Ok(records) => records.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.records().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drain everything logged so far.
    pub fn take(&self) -> Vec<StageRecord> {
        match self.records.lock() {
            Ok(mut records) => std::mem::take(&mut *records),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl StageSink for MemoryStageLog {
    fn log(&self, record: &StageRecord) -> Result<()> {
        self.log_round(std::slice::from_ref(record))
    }

    fn log_round(&self, records: &[StageRecord]) -> Result<()> {
        let mut guard = self
            .records
            .lock()
            .map_err(|_| EngineError::logger_unavailable("memory log lock poisoned"))?;
        guard.extend_from_slice(records);
        Ok(())
    }
}

/// Forwards each round to every inner sink. All sinks are tried; the first
/// failure is reported.
#[derive(Default, Clone)]
pub struct FanoutStageLog {
    sinks: Vec<Arc<dyn StageSink>>,
}

impl FanoutStageLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, sink: Arc<dyn StageSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl StageSink for FanoutStageLog {
    fn log(&self, record: &StageRecord) -> Result<()> {
        self.log_round(std::slice::from_ref(record))
    }

    fn log_round(&self, records: &[StageRecord]) -> Result<()> {
        let mut first_error = None;
        for sink in &self.sinks {
            if let Err(e) = sink.log_round(records) {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

// ============================================================
// File sink
// ============================================================

/// Append-only JSONL file, written synchronously under a lock.
#[derive(Debug)]
pub struct JsonlStageLog {
    path: PathBuf,
    file: Mutex<File>,
}

impl JsonlStageLog {
    /// Open (creating parents) for append.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                EngineError::logger_unavailable(format!("{}: {}", parent.display(), e))
            })?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| EngineError::logger_unavailable(format!("{}: {}", path.display(), e)))?;
        info!("Stage log: {}", path.display());
        Ok(Self { path, file: Mutex::new(file) })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StageSink for JsonlStageLog {
    fn log(&self, record: &StageRecord) -> Result<()> {
        self.log_round(std::slice::from_ref(record))
    }

    fn log_round(&self, records: &[StageRecord]) -> Result<()> {
        let batch = encode_lines(records)?;
        let mut file = self
            .file
            .lock()
            .map_err(|_| EngineError::logger_unavailable("stage log lock poisoned"))?;
        file.write_all(batch.as_bytes())
            .and_then(|_| file.flush())
            .map_err(|e| EngineError::logger_unavailable(format!("{}: {}", self.path.display(), e)))
    }
}

// ============================================================
// Channel sink
// ============================================================

/// Rounds queued for the writer before `log_round` starts refusing.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

/// Hands rounds to a single tokio writer task. Logging never blocks the
/// caller on disk I/O; one writer keeps batches contiguous.
///
/// The queue is bounded. When the writer falls behind by a full queue, the
/// round is not logged and `log_round` returns `LoggerUnavailable`.
#[derive(Debug, Clone)]
pub struct ChannelStageLog {
    tx: mpsc::Sender<Vec<StageRecord>>,
}

impl ChannelStageLog {
    /// Open `path` for append and start the writer task. The task exits once
    /// every `ChannelStageLog` clone has been dropped.
    pub async fn spawn(path: impl Into<PathBuf>) -> Result<(Self, JoinHandle<()>)> {
        Self::spawn_with_capacity(path, DEFAULT_CHANNEL_CAPACITY).await
    }

    pub async fn spawn_with_capacity(
        path: impl Into<PathBuf>,
        capacity: usize,
    ) -> Result<(Self, JoinHandle<()>)> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                EngineError::logger_unavailable(format!("{}: {}", parent.display(), e))
            })?;
        }
        let file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|e| EngineError::logger_unavailable(format!("{}: {}", path.display(), e)))?;

        let (tx, rx) = mpsc::channel(capacity.max(1));
        let handle = tokio::spawn(write_loop(path, file, rx));
        Ok((Self { tx }, handle))
    }
}

async fn write_loop(
    path: PathBuf,
    mut file: tokio::fs::File,
    mut rx: mpsc::Receiver<Vec<StageRecord>>,
) {
    info!("Stage log writer started: {}", path.display());
    let mut rounds = 0usize;
    while let Some(batch) = rx.recv().await {
        let lines = match encode_lines(&batch) {
            Ok(lines) => lines,
            Err(e) => {
                warn!("Stage log: dropping round: {}", e);
                continue;
            }
        };
        if let Err(e) = file.write_all(lines.as_bytes()).await {
            warn!("Stage log write failed for {}: {}", path.display(), e);
            continue;
        }
        rounds += 1;
        debug!("Stage log: wrote {} records", batch.len());
    }
    if let Err(e) = file.flush().await {
        warn!("Stage log flush failed for {}: {}", path.display(), e);
    }
    info!("Stage log writer stopped after {} rounds", rounds);
}

impl StageSink for ChannelStageLog {
    fn log(&self, record: &StageRecord) -> Result<()> {
        self.log_round(std::slice::from_ref(record))
    }

    fn log_round(&self, records: &[StageRecord]) -> Result<()> {
        self.tx.try_send(records.to_vec()).map_err(|e| match e {
            TrySendError::Full(_) => EngineError::logger_unavailable("stage log queue is full"),
            TrySendError::Closed(_) => EngineError::logger_unavailable("stage log writer has stopped"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syntra_core::Stage;
    use uuid::Uuid;

    fn round(id: Uuid) -> Vec<StageRecord> {
        Stage::ORDER
            .iter()
            .map(|stage| StageRecord::new(id, *stage, &serde_json::json!({ "stage": stage.as_str() })))
            .collect()
    }

    fn read_lines(path: &Path) -> Vec<serde_json::Value> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn memory_log_keeps_order() {
        let log = MemoryStageLog::new();
        log.log_round(&round(Uuid::new_v4())).unwrap();
        let stages: Vec<Stage> = log.records().iter().map(|r| r.stage).collect();
        assert_eq!(stages, Stage::ORDER.to_vec());
        assert_eq!(log.take().len(), 6);
        assert!(log.is_empty());
    }

    #[test]
    fn null_log_accepts_everything() {
        assert!(NullStageLog.log_round(&round(Uuid::new_v4())).is_ok());
    }

    struct Refusing;

    impl StageSink for Refusing {
        fn log(&self, _record: &StageRecord) -> Result<()> {
            Err(EngineError::logger_unavailable("refused"))
        }
    }

    #[test]
    fn fanout_reaches_every_sink_despite_failure() {
        let memory = Arc::new(MemoryStageLog::new());
        let fanout = FanoutStageLog::new().with(Arc::new(Refusing)).with(memory.clone());
        assert_eq!(fanout.len(), 2);
        let err = fanout.log_round(&round(Uuid::new_v4())).unwrap_err();
        assert_eq!(err, EngineError::logger_unavailable("refused"));
        assert_eq!(memory.len(), 6);
    }

    #[test]
    fn jsonl_log_appends_across_opens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("stages.jsonl");

        let first = Uuid::new_v4();
        JsonlStageLog::open(&path).unwrap().log_round(&round(first)).unwrap();
        let second = Uuid::new_v4();
        JsonlStageLog::open(&path).unwrap().log_round(&round(second)).unwrap();

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 12);
        assert_eq!(lines[0]["round_id"], first.to_string());
        assert_eq!(lines[0]["stage"], "affective_initial");
        assert_eq!(lines[5]["stage"], "synthesis");
        assert_eq!(lines[6]["round_id"], second.to_string());
    }

    #[test]
    fn jsonl_open_fails_on_directory() {
        let dir = tempfile::tempdir().unwrap();
        let err = JsonlStageLog::open(dir.path()).unwrap_err();
        assert!(matches!(err, EngineError::LoggerUnavailable { .. }));
    }

    #[tokio::test]
    async fn channel_log_writes_after_senders_drop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stages.jsonl");
        let (log, handle) = ChannelStageLog::spawn(&path).await.unwrap();

        let id = Uuid::new_v4();
        log.log_round(&round(id)).unwrap();
        drop(log);
        handle.await.unwrap();

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 6);
        assert!(lines.iter().all(|l| l["round_id"] == id.to_string()));
    }

    #[tokio::test]
    async fn channel_log_refuses_rounds_when_queue_is_full() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stages.jsonl");
        let (log, handle) = ChannelStageLog::spawn_with_capacity(&path, 1).await.unwrap();

        // Current-thread runtime: the writer cannot drain until we yield.
        let kept = Uuid::new_v4();
        log.log_round(&round(kept)).unwrap();
        let err = log.log_round(&round(Uuid::new_v4())).unwrap_err();
        assert_eq!(err, EngineError::logger_unavailable("stage log queue is full"));

        drop(log);
        handle.await.unwrap();
        let lines = read_lines(&path);
        assert_eq!(lines.len(), 6);
        assert!(lines.iter().all(|l| l["round_id"] == kept.to_string()));
    }

    #[tokio::test]
    async fn channel_log_reports_stopped_writer() {
        let dir = tempfile::tempdir().unwrap();
        let (log, handle) = ChannelStageLog::spawn(dir.path().join("s.jsonl")).await.unwrap();
        handle.abort();
        let _ = handle.await;
        let err = log.log_round(&round(Uuid::new_v4())).unwrap_err();
        assert!(matches!(err, EngineError::LoggerUnavailable { .. }));
    }
}
