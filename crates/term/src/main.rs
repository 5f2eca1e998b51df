//! `slidesync` command-line driver.

mod cli;
mod host;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Command};
use host::{
	ExternalServer, FILE_EDITOR, FileEditor, FileSurface, NoLauncher, SlideOutline, StatusLine, open_in_browser,
	server_base_for,
};
use slidesync_config::{SettingsLoader, TomlSettings};
use slidesync_preview::{Collaborators, FsExportWriter, MarkdownSlideParser, Orchestrator};
use slidesync_primitives::Selection;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();
	init_tracing(cli.verbose);

	let settings = match &cli.config {
		Some(path) => TomlSettings::new(path),
		None => TomlSettings::from_default_location(),
	};
	let server = match cli.server {
		Some(server) => server,
		None => server_base_for(settings.load_configuration().server_port),
	};
	let mut preview = Orchestrator::new(Collaborators {
		server: Box::new(ExternalServer::new(server)),
		parser: Arc::new(MarkdownSlideParser),
		settings: Box::new(settings),
		writer: Arc::new(FsExportWriter),
		status_view: Box::new(StatusLine),
		slide_list: Box::new(SlideOutline),
		launcher: Box::new(NoLauncher),
	});

	match cli.command {
		Command::Uri {
			file,
			line,
			no_position,
		} => {
			preview.on_active_editor_changed(Some(Arc::new(FileEditor::open(&file)?)));
			if let Some(line) = line {
				preview.on_selection_changed(FILE_EDITOR, &[Selection::caret(line, 0)]);
			}
			let uri = preview
				.get_uri(!no_position)
				.with_context(|| format!("{} is not a markdown deck", file.display()))?;
			println!("{uri}");
		}
		Command::Export { file, surface } => {
			preview.refresh_web_view(Some(Box::new(FileSurface::new(surface))));
			preview.on_active_editor_changed(Some(Arc::new(FileEditor::open(&file)?)));
			let dir = preview.start_export().await?;
			println!("{}", dir.display());
			if preview.effective_configuration().open_browser_on_export {
				let index = dir.join("index.html");
				match open_in_browser(&index) {
					Ok(()) => info!(path = %index.display(), "export.browser_opened"),
					Err(error) => warn!(%error, path = %index.display(), "export.browser_failed"),
				}
			}
		}
	}
	Ok(())
}

fn init_tracing(verbose: bool) {
	let default = if verbose { "debug" } else { "warn" };
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.init();
}
