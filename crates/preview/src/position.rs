use slidesync_primitives::{CursorLocation, Position, SlideBoundaries};
use tracing::trace;

/// Current slide coordinate of the bound document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PositionModel {
	current: Position,
}

impl PositionModel {
	pub fn current(&self) -> Position {
		self.current
	}

	/// Moves to the slide containing `cursor` according to `boundaries`.
	pub fn update_position(&mut self, boundaries: &SlideBoundaries, cursor: CursorLocation) {
		self.current = boundaries.position_at(cursor.line);
		trace!(line = cursor.line, position = %self.current, "position.update");
	}

	/// Sets the position directly. Indices are not validated.
	pub fn go_to_slide(&mut self, horizontal: usize, vertical: usize) {
		self.current = Position::new(horizontal, vertical);
	}
}

#[cfg(test)]
mod tests {
	use slidesync_primitives::Slide;

	use super::*;

	#[test]
	fn follows_cursor_line() {
		let slides = vec![
			Slide {
				index: 0,
				start_line: 0,
				end_line: 3,
				..Default::default()
			},
			Slide {
				index: 1,
				start_line: 5,
				end_line: 8,
				..Default::default()
			},
		];
		let table = SlideBoundaries::from_slides(&slides);
		let mut model = PositionModel::default();

		model.update_position(&table, CursorLocation::new(6, 2));
		assert_eq!(model.current(), Position::new(1, 0));

		model.update_position(&table, CursorLocation::new(1, 0));
		assert_eq!(model.current(), Position::new(0, 0));
	}

	#[test]
	fn go_to_slide_does_not_clamp() {
		let mut model = PositionModel::default();
		model.go_to_slide(40, 7);
		assert_eq!(model.current(), Position::new(40, 7));
	}
}
