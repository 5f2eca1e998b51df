//! Trailing-edge debounce timer.

use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::Instant;

/// A restartable deadline that runs a callback once it passes.
///
/// [`arm`](Self::arm) sets the deadline `window` from now and spawns the task
/// that waits for it. [`extend`](Self::extend) pushes an armed deadline out to a
/// full `window` from now. The callback fires once the deadline passes without
/// further extension. Re-arming or [`disarm`](Self::disarm)ing invalidates the
/// previous task through a generation check, so a stale task never fires.
///
/// Dropping every handle stops the task without firing.
#[derive(Debug, Clone)]
pub struct Debounce {
	state: Arc<Mutex<DebounceState>>,
}

#[derive(Debug)]
struct DebounceState {
	window: Duration,
	deadline: Option<Instant>,
	generation: u64,
}

impl Debounce {
	pub fn new(window: Duration) -> Self {
		Self {
			state: Arc::new(Mutex::new(DebounceState {
				window,
				deadline: None,
				generation: 0,
			})),
		}
	}

	/// Arms the timer. Must be called from within a tokio runtime.
	pub fn arm<F>(&self, on_fire: F)
	where
		F: FnOnce() + Send + 'static,
	{
		let generation = {
			let mut state = self.state.lock();
			state.generation += 1;
			state.deadline = Some(Instant::now() + state.window);
			state.generation
		};
		tracing::trace!(generation, "debounce.arm");
		tokio::spawn(wait_then_fire(Arc::downgrade(&self.state), generation, on_fire));
	}

	/// Restarts the window if armed. Returns whether the timer was armed.
	pub fn extend(&self) -> bool {
		let mut state = self.state.lock();
		let window = state.window;
		match state.deadline.as_mut() {
			Some(deadline) => {
				*deadline = Instant::now() + window;
				true
			}
			None => false,
		}
	}

	/// Cancels a pending fire.
	pub fn disarm(&self) {
		let mut state = self.state.lock();
		state.deadline = None;
		state.generation += 1;
	}
}

async fn wait_then_fire<F>(state: Weak<Mutex<DebounceState>>, generation: u64, on_fire: F)
where
	F: FnOnce(),
{
	loop {
		let deadline = {
			let Some(state) = state.upgrade() else {
				return;
			};
			let mut state = state.lock();
			if state.generation != generation {
				return;
			}
			match state.deadline {
				None => return,
				Some(deadline) if Instant::now() >= deadline => {
					state.deadline = None;
					break;
				}
				Some(deadline) => deadline,
			}
		};
		tokio::time::sleep_until(deadline).await;
	}
	tracing::trace!(generation, "debounce.fire");
	on_fire();
}
