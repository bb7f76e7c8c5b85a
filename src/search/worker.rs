use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use super::client::{SearchBackend, SearchError};
use super::request::SearchRequest;
use super::response::SearchResponse;

#[derive(Debug)]
pub enum SearchCommand {
	Fetch { id: u64, request: SearchRequest },
	Shutdown,
}

#[derive(Debug)]
pub struct FetchResult {
	pub id: u64,
	pub request: SearchRequest,
	pub outcome: Result<SearchResponse, SearchError>,
}

/// Start a fetch thread.
///
/// Returns the command sender, the result receiver and the shared id of the
/// most recently issued request. The thread skips any command whose id is no
/// longer the latest, so a burst of requests results in at most one stale
/// fetch.
pub fn spawn(
	backend: Arc<dyn SearchBackend>,
	name: &str,
) -> io::Result<(Sender<SearchCommand>, Receiver<FetchResult>, Arc<AtomicU64>)> {
	let (command_tx, command_rx) = mpsc::channel();
	let (result_tx, result_rx) = mpsc::channel();
	let latest_id = Arc::new(AtomicU64::new(0));
	let thread_latest = Arc::clone(&latest_id);

	thread::Builder::new()
		.name(format!("misp-search-{name}"))
		.spawn(move || {
			while let Ok(command) = command_rx.recv() {
				match command {
					SearchCommand::Fetch { id, request } => {
						if !process_fetch(backend.as_ref(), id, request, &result_tx, &thread_latest) {
							break;
						}
					}
					SearchCommand::Shutdown => break,
				}
			}
		})?;

	Ok((command_tx, result_rx, latest_id))
}

fn process_fetch(
	backend: &dyn SearchBackend,
	id: u64,
	request: SearchRequest,
	tx: &Sender<FetchResult>,
	latest_id: &AtomicU64,
) -> bool {
	if should_abort(id, latest_id) {
		tracing::trace!(id, "skipping superseded fetch");
		return true;
	}

	let outcome = backend.search(&request);
	if let Err(err) = &outcome {
		tracing::warn!(id, error = %err, "search request failed");
	}

	if should_abort(id, latest_id) {
		tracing::trace!(id, "dropping response for superseded fetch");
		return true;
	}

	tx.send(FetchResult {
		id,
		request,
		outcome,
	})
	.is_ok()
}

fn should_abort(id: u64, latest_id: &AtomicU64) -> bool {
	latest_id.load(AtomicOrdering::Acquire) != id
}

#[cfg(test)]
mod tests {
	use std::sync::Mutex;
	use std::time::Duration;

	use super::*;
	use crate::search::{FacetCatalog, SearchState};

	struct RecordingBackend {
		seen: Mutex<Vec<String>>,
	}

	impl SearchBackend for RecordingBackend {
		fn search(&self, request: &SearchRequest) -> Result<SearchResponse, SearchError> {
			if let Ok(mut seen) = self.seen.lock() {
				seen.push(request.query.clone());
			}
			Ok(SearchResponse::default())
		}
	}

	fn request(query: &str) -> SearchRequest {
		SearchRequest::from_state(&SearchState::new(query, Default::default()), 10, &FacetCatalog::default())
	}

	#[test]
	fn superseded_commands_are_skipped() {
		let backend = Arc::new(RecordingBackend {
			seen: Mutex::new(Vec::new()),
		});
		let (tx, rx, latest) = spawn(backend.clone(), "test").expect("spawn");

		// Queue three requests before the worker can run; only the last is current.
		latest.store(3, AtomicOrdering::Release);
		for (id, query) in [(1, "a"), (2, "ap"), (3, "apt")] {
			tx.send(SearchCommand::Fetch {
				id,
				request: request(query),
			})
			.expect("send");
		}

		let result = rx.recv_timeout(Duration::from_secs(5)).expect("result");
		assert_eq!(result.id, 3);
		assert_eq!(result.request.query, "apt");
		tx.send(SearchCommand::Shutdown).expect("shutdown");

		let seen = backend.seen.lock().expect("lock").clone();
		assert_eq!(seen, ["apt"]);
	}
}
