use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::mpsc::{Receiver, Sender, TryRecvError};

use crate::search::SearchRequest;
use crate::search::worker::{FetchResult, SearchCommand};

/// UI-side handle on one fetch worker.
///
/// Every issued request gets a fresh id which is also published to the
/// worker; only the result carrying the latest id is ever applied.
pub(crate) struct SearchRuntime {
	tx: Sender<SearchCommand>,
	rx: Receiver<FetchResult>,
	latest_id: Arc<AtomicU64>,
	next_id: u64,
	current_id: Option<u64>,
	in_flight: bool,
}

impl SearchRuntime {
	pub(crate) fn new(
		tx: Sender<SearchCommand>,
		rx: Receiver<FetchResult>,
		latest_id: Arc<AtomicU64>,
	) -> Self {
		Self {
			tx,
			rx,
			latest_id,
			next_id: 0,
			current_id: None,
			in_flight: false,
		}
	}

	pub(crate) fn shutdown(&self) {
		let _ = self.tx.send(SearchCommand::Shutdown);
	}

	pub(crate) fn issue(&mut self, request: SearchRequest) -> u64 {
		self.next_id = self.next_id.saturating_add(1);
		let id = self.next_id;
		self.current_id = Some(id);
		self.in_flight = true;
		self.latest_id.store(id, AtomicOrdering::Release);
		if self.tx.send(SearchCommand::Fetch { id, request }).is_err() {
			tracing::error!(id, "fetch worker is gone");
			self.in_flight = false;
		}
		id
	}

	pub(crate) fn matches_latest(&self, result_id: u64) -> bool {
		Some(result_id) == self.current_id
	}

	pub(crate) fn record_completion(&mut self) {
		self.in_flight = false;
	}

	pub(crate) fn has_issued(&self) -> bool {
		self.current_id.is_some()
	}

	pub(crate) fn is_in_flight(&self) -> bool {
		self.in_flight
	}

	pub(crate) fn try_recv(&mut self) -> Result<FetchResult, TryRecvError> {
		self.rx.try_recv()
	}
}
