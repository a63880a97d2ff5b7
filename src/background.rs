//! File loading off the UI thread.
//!
//! Each load runs its decode on a blocking worker thread and reports back
//! over a single channel. Messages carry the generation of the load that
//! produced them, so results of superseded loads are dropped when they
//! arrive instead of overwriting newer state.

use polars::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use tokio::runtime::Runtime;
use tokio::{task, time};
use tracing::{debug, error, info};

use crate::error::{Result, ViewerError};
use crate::loader::{self, LoadOptions};

/// Error descriptor handed to the UI when a load fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadFailure {
    pub path: PathBuf,
    pub message: String,
}

/// Result of one load.
pub enum LoadOutcome {
    Success(DataFrame),
    Failure(LoadFailure),
}

/// Messages sent from background jobs.
pub enum JobUpdate {
    Progress(f32),
    Done(LoadOutcome),
}

struct Envelope {
    generation: u64,
    update: JobUpdate,
}

async fn run_with_progress<F>(generation: u64, tx: Sender<Envelope>, path: PathBuf, job: F)
where
    F: FnOnce() -> Result<DataFrame> + Send + 'static,
{
    let send = |update| {
        let _ = tx.send(Envelope { generation, update });
    };
    let handle = task::spawn_blocking(job);
    tokio::pin!(handle);
    let mut progress = 0.0f32;
    send(JobUpdate::Progress(progress));
    loop {
        tokio::select! {
            res = &mut handle => {
                let outcome = match res {
                    Ok(Ok(frame)) => {
                        send(JobUpdate::Progress(1.0));
                        LoadOutcome::Success(frame)
                    }
                    Ok(Err(e)) => failure(&path, e.to_string()),
                    Err(e) => failure(&path, e.to_string()),
                };
                send(JobUpdate::Done(outcome));
                break;
            }
            _ = time::sleep(time::Duration::from_millis(200)) => {
                progress = (progress + 0.05).min(0.95);
                send(JobUpdate::Progress(progress));
            }
        }
    }
}

fn failure(path: &Path, message: String) -> LoadOutcome {
    error!("Error loading {:?}: {}", path, message);
    LoadOutcome::Failure(LoadFailure {
        path: path.to_path_buf(),
        message,
    })
}

/// Asynchronously read a table, reporting on `tx` under `generation`.
async fn read_table(generation: u64, path: PathBuf, options: LoadOptions, tx: Sender<Envelope>) {
    let job_path = path.clone();
    run_with_progress(generation, tx, path, move || {
        loader::read_table(&job_path, &options)
    })
    .await;
}

/// Owns the worker runtime and the receiving end of the result channel.
pub struct BackgroundLoader {
    // Taken on drop to shut down without waiting for a running decode.
    runtime: Option<Runtime>,
    tx: Sender<Envelope>,
    rx: Receiver<Envelope>,
    generation: u64,
    in_flight: Option<PathBuf>,
}

impl BackgroundLoader {
    pub fn new() -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("table-loader")
            .enable_time()
            .build()
            .map_err(ViewerError::Runtime)?;
        let (tx, rx) = mpsc::channel();
        Ok(Self {
            runtime: Some(runtime),
            tx,
            rx,
            generation: 0,
            in_flight: None,
        })
    }

    /// Start loading `path`, superseding any load still in flight.
    pub fn load(&mut self, path: impl Into<PathBuf>, options: LoadOptions) -> u64 {
        let path = path.into();
        self.generation += 1;
        if let Some(previous) = self.in_flight.replace(path.clone()) {
            debug!("Load of {:?} superseded by {:?}", previous, path);
        }
        info!("Loading {:?} in the background", path);
        if let Some(runtime) = &self.runtime {
            runtime.spawn(read_table(self.generation, path, options, self.tx.clone()));
        }
        self.generation
    }

    /// Non-blocking check for news about the current load.
    ///
    /// Returns at most one update. A finished result wins over progress, and
    /// progress reports that piled up since the last poll collapse into the
    /// latest one.
    pub fn poll(&mut self) -> Option<JobUpdate> {
        let mut latest_progress = None;
        while let Ok(envelope) = self.rx.try_recv() {
            if envelope.generation != self.generation {
                if matches!(envelope.update, JobUpdate::Done(_)) {
                    debug!("Discarding stale result of load #{}", envelope.generation);
                }
                continue;
            }
            match envelope.update {
                JobUpdate::Progress(p) => latest_progress = Some(p),
                done @ JobUpdate::Done(_) => {
                    self.in_flight = None;
                    return Some(done);
                }
            }
        }
        latest_progress.map(JobUpdate::Progress)
    }

    /// Abandon the load in flight. Its result is discarded when it arrives.
    pub fn cancel(&mut self) {
        if let Some(path) = self.in_flight.take() {
            self.generation += 1;
            debug!("Load of {:?} cancelled", path);
        }
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn current_path(&self) -> Option<&Path> {
        self.in_flight.as_deref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl Drop for BackgroundLoader {
    fn drop(&mut self) {
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}
