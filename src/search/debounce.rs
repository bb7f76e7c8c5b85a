use std::time::{Duration, Instant};

/// Quiet period applied to keystrokes before a search is issued.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Collapses bursts of input into a single trigger.
///
/// Time is passed in by the caller so the event loop and tests share the same
/// clock.
#[derive(Debug, Clone)]
pub struct Debouncer {
	delay: Duration,
	deadline: Option<Instant>,
}

impl Default for Debouncer {
	fn default() -> Self {
		Self::new(DEFAULT_DEBOUNCE)
	}
}

impl Debouncer {
	#[must_use]
	pub fn new(delay: Duration) -> Self {
		Self {
			delay,
			deadline: None,
		}
	}

	#[must_use]
	pub fn delay(&self) -> Duration {
		self.delay
	}

	/// Restart the quiet period from `now`.
	pub fn schedule(&mut self, now: Instant) {
		self.deadline = Some(now + self.delay);
	}

	pub fn cancel(&mut self) {
		self.deadline = None;
	}

	#[must_use]
	pub fn is_pending(&self) -> bool {
		self.deadline.is_some()
	}

	/// Returns true once when the quiet period has elapsed.
	pub fn poll(&mut self, now: Instant) -> bool {
		match self.deadline {
			Some(deadline) if now >= deadline => {
				self.deadline = None;
				true
			}
			_ => false,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn burst_of_keystrokes_fires_once() {
		let start = Instant::now();
		let mut debouncer = Debouncer::default();
		let mut fired = 0;

		for step in 0..5u64 {
			let now = start + Duration::from_millis(step * 100);
			debouncer.schedule(now);
			if debouncer.poll(now) {
				fired += 1;
			}
		}
		// Last keystroke at 400ms, so nothing may fire before 700ms.
		assert!(!debouncer.poll(start + Duration::from_millis(699)));
		assert!(debouncer.poll(start + Duration::from_millis(700)));
		fired += 1;
		assert!(!debouncer.poll(start + Duration::from_millis(2_000)));
		assert_eq!(fired, 1);
	}

	#[test]
	fn cancel_drops_pending_trigger() {
		let start = Instant::now();
		let mut debouncer = Debouncer::new(Duration::from_millis(50));
		debouncer.schedule(start);
		assert!(debouncer.is_pending());
		debouncer.cancel();
		assert!(!debouncer.poll(start + Duration::from_secs(1)));
	}
}
