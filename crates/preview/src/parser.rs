//! Splitting markdown into slides.

use std::fmt;

use regex::Regex;
use slidesync_config::{ConfigOverlay, Configuration};
use slidesync_primitives::Slide;

use crate::ParseError;

const FRONT_MATTER_FENCE: &str = "+++";

/// Result of parsing a document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedDocument {
	pub slides: Vec<Slide>,
	/// Overrides declared in the document's front matter.
	pub front_matter: Option<ConfigOverlay>,
}

/// Turns document text into slides.
pub trait SlideParser: fmt::Debug + Send + Sync {
	fn parse(&self, text: &str, config: &Configuration) -> Result<ParsedDocument, ParseError>;
}

/// Reveal-style markdown splitter.
///
/// An optional TOML front matter block fenced by `+++` lines may open the
/// document; its keys override `config` for the separators used below.
/// Horizontal slides are split on lines matching `slideSeparator`, vertical
/// slides on `verticalSeparator`, and speaker notes start at the first line
/// matching `notesSeparator`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownSlideParser;

struct Separators {
	slide: Regex,
	vertical: Regex,
	notes: Regex,
}

impl Separators {
	fn compile(config: &Configuration) -> Result<Self, ParseError> {
		Ok(Self {
			slide: compile("slide", &config.slide_separator)?,
			vertical: compile("vertical", &config.vertical_separator)?,
			notes: compile("notes", &config.notes_separator)?,
		})
	}
}

fn compile(name: &'static str, pattern: &str) -> Result<Regex, ParseError> {
	Regex::new(pattern).map_err(|source| ParseError::InvalidSeparator {
		name,
		pattern: pattern.to_string(),
		source,
	})
}

impl SlideParser for MarkdownSlideParser {
	fn parse(&self, text: &str, config: &Configuration) -> Result<ParsedDocument, ParseError> {
		let lines: Vec<&str> = text.lines().collect();
		let (front_matter, body_start) = split_front_matter(&lines)?;

		let separators = match &front_matter {
			Some(overlay) => Separators::compile(&config.effective(overlay))?,
			None => Separators::compile(config)?,
		};

		let body = &lines[body_start..];
		if body.iter().all(|line| line.trim().is_empty()) {
			return Ok(ParsedDocument {
				slides: Vec::new(),
				front_matter,
			});
		}

		let mut slides = Vec::new();
		for chunk in split_on(body, body_start, &separators.slide) {
			let stack: Vec<Slide> = split_on(chunk.lines, chunk.start, &separators.vertical)
				.into_iter()
				.enumerate()
				.map(|(v, part)| build_slide(v, &part, &separators.notes))
				.collect();
			slides.push(stack_into_slide(slides.len(), stack));
		}

		Ok(ParsedDocument { slides, front_matter })
	}
}

/// Consecutive lines between two separators, `start` being the first line number.
struct Chunk<'a, 'b> {
	start: usize,
	lines: &'b [&'a str],
}

fn split_on<'a, 'b>(lines: &'b [&'a str], first_line: usize, separator: &Regex) -> Vec<Chunk<'a, 'b>> {
	let mut chunks = Vec::new();
	let mut start = 0;
	for (i, line) in lines.iter().enumerate() {
		if separator.is_match(line) {
			chunks.push(Chunk {
				start: first_line + start,
				lines: &lines[start..i],
			});
			start = i + 1;
		}
	}
	chunks.push(Chunk {
		start: first_line + start,
		lines: &lines[start..],
	});
	chunks
}

fn build_slide(index: usize, chunk: &Chunk<'_, '_>, notes: &Regex) -> Slide {
	let end_line = chunk.start + chunk.lines.len().saturating_sub(1);
	let split = chunk.lines.iter().position(|line| notes.is_match(line));

	let (body, notes) = match split {
		Some(at) => {
			let marker = chunk.lines[at];
			let rest = notes.find(marker).map_or("", |m| &marker[m.end()..]);
			let mut note_lines = vec![rest.trim()];
			note_lines.extend(chunk.lines[at + 1..].iter().copied());
			let text = note_lines.join("\n").trim().to_string();
			(&chunk.lines[..at], Some(text))
		}
		None => (chunk.lines, None),
	};

	Slide {
		index,
		text: body.join("\n"),
		start_line: chunk.start,
		end_line,
		notes,
		vertical: Vec::new(),
	}
}

/// Folds a vertical stack into its top-level slide.
fn stack_into_slide(index: usize, mut stack: Vec<Slide>) -> Slide {
	if stack.len() == 1 {
		let mut slide = stack.remove(0);
		slide.index = index;
		return slide;
	}
	let first = stack.first().cloned().unwrap_or_default();
	let end_line = stack.last().map_or(first.end_line, |s| s.end_line);
	Slide {
		index,
		text: first.text,
		start_line: first.start_line,
		end_line,
		notes: first.notes,
		vertical: stack,
	}
}

/// Returns the front matter table and the first body line.
fn split_front_matter(lines: &[&str]) -> Result<(Option<ConfigOverlay>, usize), ParseError> {
	if lines.first().map(|l| l.trim()) != Some(FRONT_MATTER_FENCE) {
		return Ok((None, 0));
	}
	let close = lines
		.iter()
		.skip(1)
		.position(|l| l.trim() == FRONT_MATTER_FENCE)
		.map(|i| i + 1)
		.ok_or(ParseError::UnterminatedFrontMatter)?;

	let table: ConfigOverlay = lines[1..close].join("\n").parse()?;
	Ok((Some(table), close + 1))
}
