use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "slidesync")]
#[command(about = "Keep a markdown slide deck, its presentation and its preview in sync")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
	/// Settings file (defaults to $XDG_CONFIG_HOME/slidesync/config.toml)
	#[arg(long, short = 'c', global = true, value_name = "PATH")]
	pub config: Option<PathBuf>,

	/// Base address of the running presentation server (defaults to localhost on the configured `serverPort`)
	#[arg(long, short = 's', global = true, value_name = "URL", value_parser = parse_base_url)]
	pub server: Option<String>,

	/// Verbose logging
	#[arg(long, short = 'v', global = true)]
	pub verbose: bool,

	/// Subcommand to execute.
	#[command(subcommand)]
	pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
	/// Print the presentation address for a cursor line
	Uri {
		/// Markdown deck
		file: PathBuf,
		/// Zero-based cursor line
		#[arg(long, short = 'l')]
		line: Option<usize>,
		/// Print the base address without the slide fragment
		#[arg(long)]
		no_position: bool,
	},
	/// Export a deck once its preview settles, printing the export directory
	Export {
		/// Markdown deck
		file: PathBuf,
		/// File receiving the preview markup on every refresh
		#[arg(long, value_name = "HTML")]
		surface: PathBuf,
	},
}

fn parse_base_url(raw: &str) -> Result<String, String> {
	url::Url::parse(raw).map_err(|e| format!("invalid server address {raw:?}: {e}"))?;
	Ok(raw.to_string())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn uri_with_defaults() {
		let cli = Cli::try_parse_from(["slidesync", "uri", "deck.md", "--line", "12"]).unwrap();
		assert_eq!(cli.server, None);
		assert!(!cli.verbose);
		match cli.command {
			Command::Uri {
				file,
				line,
				no_position,
			} => {
				assert_eq!(file, PathBuf::from("deck.md"));
				assert_eq!(line, Some(12));
				assert!(!no_position);
			}
			other => panic!("unexpected command {other:?}"),
		}
	}

	#[test]
	fn global_flags_after_subcommand() {
		let cli = Cli::try_parse_from([
			"slidesync",
			"export",
			"deck.md",
			"--surface",
			"preview.html",
			"-v",
			"--server",
			"http://10.0.0.2:9000/",
		])
		.unwrap();
		assert!(cli.verbose);
		assert_eq!(cli.server.as_deref(), Some("http://10.0.0.2:9000/"));
		assert!(matches!(cli.command, Command::Export { .. }));
	}

	#[test]
	fn rejects_malformed_server() {
		assert!(Cli::try_parse_from(["slidesync", "--server", "not a url", "uri", "deck.md"]).is_err());
	}
}
