use serde::{Deserialize, Serialize};

use crate::Position;

/// A parsed slide.
///
/// Top-level slides own their vertical stack in `vertical`. The first entry of
/// a stack is the top-level slide's own content, so `vertical` is empty for a
/// slide that has no nested slides. Line ranges are inclusive and zero-based.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slide {
	pub index: usize,
	pub text: String,
	pub start_line: usize,
	pub end_line: usize,
	pub notes: Option<String>,
	pub vertical: Vec<Slide>,
}

impl Slide {
	/// First non-empty line stripped of heading markers, used as a display title.
	pub fn title(&self) -> Option<&str> {
		self.text
			.lines()
			.map(str::trim)
			.find(|line| !line.is_empty())
			.map(|line| line.trim_start_matches('#').trim())
	}
}

/// Boundary table mapping document lines to slide positions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlideBoundaries {
	rows: Vec<(usize, Position)>,
}

impl SlideBoundaries {
	pub fn from_slides(slides: &[Slide]) -> Self {
		let mut rows = Vec::new();
		for (h, slide) in slides.iter().enumerate() {
			if slide.vertical.is_empty() {
				rows.push((slide.start_line, Position::new(h, 0)));
				continue;
			}
			for (v, child) in slide.vertical.iter().enumerate() {
				rows.push((child.start_line, Position::new(h, v)));
			}
		}
		rows.sort_by_key(|(line, _)| *line);
		Self { rows }
	}

	/// Position of the slide containing `line`.
	///
	/// Lines before the first slide (front matter) map to the origin.
	pub fn position_at(&self, line: usize) -> Position {
		let idx = self.rows.partition_point(|(start, _)| *start <= line);
		match idx {
			0 => Position::default(),
			n => self.rows[n - 1].1,
		}
	}

	/// Returns true if `position` names a slide in this table.
	pub fn contains(&self, position: Position) -> bool {
		self.rows.iter().any(|(_, p)| *p == position)
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	fn slide(index: usize, start_line: usize, end_line: usize) -> Slide {
		Slide {
			index,
			start_line,
			end_line,
			..Default::default()
		}
	}

	fn deck() -> Vec<Slide> {
		let mut second = slide(1, 4, 12);
		second.vertical = vec![slide(0, 4, 7), slide(1, 9, 12)];
		vec![slide(0, 0, 2), second, slide(2, 14, 20)]
	}

	#[test]
	fn maps_lines_to_positions() {
		let table = SlideBoundaries::from_slides(&deck());
		assert_eq!(table.position_at(0), Position::new(0, 0));
		assert_eq!(table.position_at(3), Position::new(0, 0));
		assert_eq!(table.position_at(5), Position::new(1, 0));
		assert_eq!(table.position_at(10), Position::new(1, 1));
		assert_eq!(table.position_at(99), Position::new(2, 0));
	}

	#[test]
	fn lines_before_first_slide_map_to_origin() {
		let table = SlideBoundaries::from_slides(&[slide(0, 5, 9)]);
		assert_eq!(table.position_at(2), Position::default());
	}

	#[test]
	fn empty_table_maps_to_origin() {
		let table = SlideBoundaries::from_slides(&[]);
		assert_eq!(table.position_at(42), Position::default());
	}

	#[test]
	fn contains_reports_known_positions() {
		let table = SlideBoundaries::from_slides(&deck());
		assert!(table.contains(Position::new(1, 1)));
		assert!(!table.contains(Position::new(1, 2)));
		assert!(!table.contains(Position::new(3, 0)));
	}

	#[test]
	fn title_strips_heading_markers() {
		let s = Slide {
			text: "\n## Intro\nbody".into(),
			..Default::default()
		};
		assert_eq!(s.title(), Some("Intro"));
	}
}
