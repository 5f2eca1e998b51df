use std::time::Duration;

use futures::FutureExt;
use tokio::time::Instant;

use super::*;

async fn settle() {
	for _ in 0..4 {
		tokio::task::yield_now().await;
	}
}

fn coordinator_with_target(dir: &str) -> ExportCoordinator {
	let coordinator = ExportCoordinator::default();
	coordinator.target().set(Some(PathBuf::from(dir)));
	coordinator
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn resolves_after_quiet_period() {
	let coordinator = coordinator_with_target("/deck/export");
	let started = Instant::now();

	let (future, opened) = coordinator.start(None);
	assert!(opened);
	assert!(coordinator.is_in_export());

	let path = future.await.unwrap();
	assert_eq!(path, PathBuf::from("/deck/export"));
	assert!(started.elapsed() >= EXPORT_QUIET_PERIOD);
	assert!(!coordinator.is_in_export());
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn second_start_joins_pending_session() {
	let coordinator = coordinator_with_target("/deck/export");

	let (first, opened_first) = coordinator.start(None);
	let (second, opened_second) = coordinator.start(None);
	assert!(opened_first);
	assert!(!opened_second);
	assert!(first.ptr_eq(&second));

	let (a, b) = tokio::join!(first, second);
	assert_eq!(a.unwrap(), b.unwrap());
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn new_session_after_resolution() {
	let coordinator = coordinator_with_target("/deck/export");

	let (first, _) = coordinator.start(None);
	first.clone().await.unwrap();

	let (second, opened) = coordinator.start(None);
	assert!(opened);
	assert!(!first.ptr_eq(&second));
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn status_queries_hold_the_export_open() {
	let coordinator = coordinator_with_target("/deck/export");
	let status = coordinator.status();
	let (future, _) = coordinator.start(None);
	settle().await;

	for _ in 0..20 {
		tokio::time::advance(Duration::from_millis(500)).await;
		settle().await;
		assert!(status.is_in_export());
		assert!(future.clone().now_or_never().is_none());
	}

	tokio::time::advance(Duration::from_millis(799)).await;
	settle().await;
	assert!(future.clone().now_or_never().is_none());

	tokio::time::advance(Duration::from_millis(1)).await;
	settle().await;
	assert_eq!(
		future.now_or_never().map(|r| r.unwrap()),
		Some(PathBuf::from("/deck/export"))
	);
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn target_is_read_when_the_debounce_fires() {
	let coordinator = coordinator_with_target("/old/export");
	let (future, _) = coordinator.start(None);
	coordinator.target().set(Some(PathBuf::from("/new/export")));

	assert_eq!(future.await.unwrap(), PathBuf::from("/new/export"));
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn settling_without_document_fails() {
	let coordinator = ExportCoordinator::default();
	let (future, _) = coordinator.start(None);

	assert!(matches!(future.await, Err(ExportError::NoDocument)));
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn timeout_turns_a_hang_into_an_error() {
	let coordinator = coordinator_with_target("/deck/export");
	let status = coordinator.status();
	let (future, _) = coordinator.start(Some(Duration::from_secs(3)));
	settle().await;

	for _ in 0..8 {
		tokio::time::advance(Duration::from_millis(500)).await;
		settle().await;
		status.is_in_export();
	}

	assert!(matches!(
		future.await,
		Err(ExportError::TimedOut { timeout_ms: 3000 })
	));
	assert!(!status.is_in_export());
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn resolved_sessions_release_their_tasks() {
	let coordinator = coordinator_with_target("/deck/export");

	for _ in 0..5 {
		let (future, _) = coordinator.start(Some(Duration::from_secs(3600)));
		assert!(future.await.is_ok());
		settle().await;
		assert_eq!(Arc::strong_count(&coordinator.state), 1);
	}
}

#[test]
fn dropped_runtime_abandons_the_export() {
	let rt = tokio::runtime::Builder::new_current_thread()
		.enable_time()
		.build()
		.unwrap();
	let future = rt.block_on(async {
		let coordinator = coordinator_with_target("/deck/export");
		coordinator.start(None).0
	});
	drop(rt);

	assert!(matches!(
		futures::executor::block_on(future),
		Err(ExportError::Abandoned)
	));
}

#[test]
fn writer_places_files_under_export_dir() {
	let dir = tempfile::tempdir().unwrap();
	let path = FsExportWriter
		.save_content(dir.path(), "/lib/css/theme.css", b"body {}")
		.unwrap();

	assert_eq!(path, dir.path().join("lib/css/theme.css"));
	assert_eq!(std::fs::read(&path).unwrap(), b"body {}");
}

#[test]
fn writer_rejects_escaping_paths() {
	let dir = tempfile::tempdir().unwrap();
	for request in ["../outside.html", "a/../../b", ""] {
		let err = FsExportWriter
			.save_content(dir.path(), request, b"x")
			.unwrap_err();
		assert!(matches!(err, ExportError::InvalidRequestPath(_)), "{request}");
	}
}

#[test]
fn save_requires_a_target() {
	let target = ExportTarget::default();
	let handle = SaveHandle::new(target.clone(), Arc::new(FsExportWriter));
	assert!(matches!(handle.save("index.html", b"<html>"), Err(ExportError::NoDocument)));

	let dir = tempfile::tempdir().unwrap();
	target.set(Some(dir.path().to_path_buf()));
	let written = handle.save("index.html", b"<html>").unwrap();
	assert_eq!(written, dir.path().join("index.html"));
}
