//! Export coordination.
//!
//! The surface renders asynchronously and never reports that it finished. An
//! export therefore waits for quiescence: the backing server asks
//! [`ExportStatus::is_in_export`] while it serves the surface, and every such
//! query restarts an [`EXPORT_QUIET_PERIOD`] debounce. Once nobody has asked
//! for a full quiet period the export resolves with the current export
//! directory.
//!
//! # Sessions
//!
//! At most one session is pending per coordinator. Starting an export while
//! one is pending joins it and returns the same [`ExportFuture`]. Without a
//! timeout a surface that never settles keeps the session pending forever.

use std::future::Future;
use std::path::{Component, Path, PathBuf};
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use parking_lot::Mutex;
use tokio::sync::oneshot;
use tokio::task::AbortHandle;
use tracing::{debug, info, warn};

use crate::{Debounce, ExportError};

/// Quiet period after the last status query before an export resolves.
pub const EXPORT_QUIET_PERIOD: Duration = Duration::from_millis(800);

/// Outcome of an export: the export directory on success.
pub type ExportResult = Result<PathBuf, ExportError>;

/// Handle to the pending outcome of an export session.
///
/// Clones observe the same session; [`ptr_eq`](Self::ptr_eq) tells whether two
/// handles belong to the same session.
#[derive(Clone)]
pub struct ExportFuture {
	inner: Shared<BoxFuture<'static, ExportResult>>,
}

impl ExportFuture {
	fn new(rx: oneshot::Receiver<ExportResult>) -> Self {
		let inner = rx
			.map(|outcome| outcome.unwrap_or(Err(ExportError::Abandoned)))
			.boxed()
			.shared();
		Self { inner }
	}

	pub fn ptr_eq(&self, other: &Self) -> bool {
		self.inner.ptr_eq(&other.inner)
	}
}

impl std::fmt::Debug for ExportFuture {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ExportFuture").finish_non_exhaustive()
	}
}

impl Future for ExportFuture {
	type Output = ExportResult;

	fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
		Pin::new(&mut self.inner).poll(cx)
	}
}

/// Shared cell holding the directory an export writes into.
///
/// Absent while no document is bound.
#[derive(Debug, Clone, Default)]
pub struct ExportTarget(Arc<Mutex<Option<PathBuf>>>);

impl ExportTarget {
	pub fn set(&self, dir: Option<PathBuf>) {
		*self.0.lock() = dir;
	}

	pub fn get(&self) -> Option<PathBuf> {
		self.0.lock().clone()
	}
}

#[derive(Debug, Default)]
struct CoordinatorState {
	next_id: u64,
	session: Option<ExportSession>,
}

#[derive(Debug)]
struct ExportSession {
	id: u64,
	future: ExportFuture,
	debounce: Debounce,
	resolve: Option<oneshot::Sender<ExportResult>>,
	timeout: Option<AbortHandle>,
}

/// Debounce-gated export sessions.
#[derive(Debug, Clone)]
pub struct ExportCoordinator {
	state: Arc<Mutex<CoordinatorState>>,
	target: ExportTarget,
	quiet_period: Duration,
}

impl Default for ExportCoordinator {
	fn default() -> Self {
		Self::new(EXPORT_QUIET_PERIOD)
	}
}

impl ExportCoordinator {
	pub fn new(quiet_period: Duration) -> Self {
		Self {
			state: Arc::default(),
			target: ExportTarget::default(),
			quiet_period,
		}
	}

	pub fn target(&self) -> &ExportTarget {
		&self.target
	}

	/// Opens a session, or joins the pending one.
	///
	/// Returns the session's future and whether this call opened it. `timeout`
	/// only applies when a session is opened. Must be called from within a
	/// tokio runtime.
	pub fn start(&self, timeout: Option<Duration>) -> (ExportFuture, bool) {
		let mut state = self.state.lock();
		if let Some(session) = &state.session {
			debug!(session = session.id, "export.join");
			return (session.future.clone(), false);
		}

		state.next_id += 1;
		let id = state.next_id;
		let (tx, rx) = oneshot::channel();
		let future = ExportFuture::new(rx);
		let debounce = Debounce::new(self.quiet_period);

		let this = self.clone();
		debounce.arm(move || {
			let outcome = this.target.get().ok_or(ExportError::NoDocument);
			this.finish(id, outcome);
		});

		let timeout_task = timeout.map(|limit| {
			let this = self.clone();
			tokio::spawn(async move {
				tokio::time::sleep(limit).await;
				let timeout_ms = u64::try_from(limit.as_millis()).unwrap_or(u64::MAX);
				this.finish(id, Err(ExportError::TimedOut { timeout_ms }));
			})
			.abort_handle()
		});

		state.session = Some(ExportSession {
			id,
			future: future.clone(),
			debounce,
			resolve: Some(tx),
			timeout: timeout_task,
		});
		info!(session = id, ?timeout, "export.start");
		(future, true)
	}

	/// Reports whether an export is pending, restarting its quiet period.
	pub fn is_in_export(&self) -> bool {
		let state = self.state.lock();
		match &state.session {
			Some(session) => {
				session.debounce.extend();
				true
			}
			None => false,
		}
	}

	/// Read-only handle for collaborators that poll export status.
	pub fn status(&self) -> ExportStatus {
		ExportStatus(self.clone())
	}

	fn finish(&self, id: u64, outcome: ExportResult) {
		let session = {
			let mut state = self.state.lock();
			if state.session.as_ref().is_some_and(|session| session.id == id) {
				state.session.take()
			} else {
				None
			}
		};
		let Some(mut session) = session else {
			return;
		};
		session.debounce.disarm();
		if let Some(timeout) = session.timeout.take() {
			timeout.abort();
		}

		match &outcome {
			Ok(path) => info!(session = id, path = %path.display(), "export.resolved"),
			Err(error) => warn!(session = id, %error, "export.failed"),
		}
		if let Some(tx) = session.resolve.take() {
			let _ = tx.send(outcome);
		}
	}
}

/// Export status query handed to the backing server.
///
/// Every query while an export is pending delays its resolution.
#[derive(Debug, Clone)]
pub struct ExportStatus(ExportCoordinator);

impl ExportStatus {
	pub fn is_in_export(&self) -> bool {
		self.0.is_in_export()
	}
}

/// Writes exported content.
pub trait ExportWriter: Send + Sync {
	/// Stores `data` for `request_id` under `export_dir`, returning the written path.
	fn save_content(&self, export_dir: &Path, request_id: &str, data: &[u8]) -> Result<PathBuf, ExportError>;
}

/// Writes each request as a file named by its request id.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsExportWriter;

impl ExportWriter for FsExportWriter {
	fn save_content(&self, export_dir: &Path, request_id: &str, data: &[u8]) -> Result<PathBuf, ExportError> {
		let relative = Path::new(request_id.trim_start_matches('/'));
		let contained = relative
			.components()
			.all(|component| matches!(component, Component::Normal(_) | Component::CurDir));
		if !contained || relative.as_os_str().is_empty() {
			return Err(ExportError::InvalidRequestPath(request_id.to_string()));
		}

		let path = export_dir.join(relative);
		let write_error = |error| ExportError::Write {
			path: path.clone(),
			error: Arc::new(error),
		};
		if let Some(parent) = path.parent() {
			std::fs::create_dir_all(parent).map_err(write_error)?;
		}
		std::fs::write(&path, data).map_err(write_error)?;
		debug!(path = %path.display(), bytes = data.len(), "export.write");
		Ok(path)
	}
}

/// Save callback handed to the backing server.
#[derive(Clone)]
pub struct SaveHandle {
	target: ExportTarget,
	writer: Arc<dyn ExportWriter>,
}

impl std::fmt::Debug for SaveHandle {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("SaveHandle")
			.field("target", &self.target)
			.finish_non_exhaustive()
	}
}

impl SaveHandle {
	pub fn new(target: ExportTarget, writer: Arc<dyn ExportWriter>) -> Self {
		Self { target, writer }
	}

	/// Writes `data` for `request_id` into the current export directory.
	pub fn save(&self, request_id: &str, data: &[u8]) -> Result<PathBuf, ExportError> {
		let dir = self.target.get().ok_or(ExportError::NoDocument)?;
		self.writer.save_content(&dir, request_id, data)
	}
}

#[cfg(test)]
mod tests;
