use crate::search::{
	Hit, IndexCatalog, IndexKind, Pagination, SearchError, SearchResponse, SearchState,
};

use super::card::build_card;
use super::highlight::Highlighter;
use super::tree::{PagerView, ResultsView};

/// Rendering switches that do not live in the search state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewOptions {
	pub page_size: u32,
	pub highlight: bool,
}

impl Default for ViewOptions {
	fn default() -> Self {
		Self {
			page_size: crate::search::DEFAULT_PAGE_SIZE,
			highlight: true,
		}
	}
}

/// Map a completed fetch to the results view.
///
/// Any failure collapses to [`ResultsView::Error`]; the cause is logged by
/// the fetch worker.
#[must_use]
pub fn build_results(
	outcome: Result<&SearchResponse, &SearchError>,
	state: &SearchState,
	catalog: &IndexCatalog,
	options: ViewOptions,
) -> ResultsView {
	match outcome {
		Ok(response) => build_cards(response, state, catalog, options),
		Err(_) => ResultsView::Error,
	}
}

/// Hits that belong on the current page. Extra hits beyond the page size
/// are dropped; multi-search bodies are limited per index.
#[must_use]
pub fn visible_hits<'a>(response: &'a SearchResponse, state: &SearchState, page_size: u32) -> Vec<&'a Hit> {
	page_sections(response, state.page, page_size)
		.into_iter()
		.flat_map(|section| section.hits)
		.collect()
}

/// One independently paged run of hits and the total reported for it.
struct PageSection<'a> {
	hits: &'a [Hit],
	total_hits: u64,
}

fn page_sections(response: &SearchResponse, page: u32, page_size: u32) -> Vec<PageSection<'_>> {
	let pagination = Pagination::new(page, page_size, response.total_hits);
	if response.sections.is_empty() {
		return vec![PageSection {
			hits: pagination.visible(&response.hits),
			total_hits: response.total_hits,
		}];
	}

	let mut start = 0;
	let mut sections = Vec::with_capacity(response.sections.len());
	for section in &response.sections {
		let end = (start + section.hit_count).min(response.hits.len());
		sections.push(PageSection {
			hits: pagination.visible(&response.hits[start..end]),
			total_hits: section.total_hits,
		});
		start = end;
	}
	sections
}

/// Pager for the page. Each section is paged on its own, so the page count
/// follows the largest section while the hit count is their sum.
fn pager_for(sections: &[PageSection<'_>], page: u32, page_size: u32) -> PagerView {
	let provisional = Pagination::new(page, page_size, 0);
	// Never report fewer hits than are already on screen.
	let totals: Vec<u64> = sections
		.iter()
		.map(|section| match section.hits.len() {
			0 => section.total_hits,
			shown => section.total_hits.max(provisional.offset() + shown as u64),
		})
		.collect();
	let longest = totals.iter().copied().max().unwrap_or(0);
	let mut pager = PagerView::from(Pagination::new(page, page_size, longest));
	pager.total_hits = totals.iter().sum();
	pager
}

fn build_cards(
	response: &SearchResponse,
	state: &SearchState,
	catalog: &IndexCatalog,
	options: ViewOptions,
) -> ResultsView {
	let sections = page_sections(response, state.page, options.page_size);
	if sections.iter().all(|section| section.hits.is_empty()) {
		return ResultsView::Empty;
	}
	let pager = pager_for(&sections, state.page, options.page_size);

	let highlighter = if options.highlight {
		Highlighter::new(&state.query)
	} else {
		Highlighter::disabled()
	};
	let fallback_kind = catalog.kind_for(state.index);

	let cards = sections
		.iter()
		.flat_map(|section| section.hits)
		.map(|hit| {
			let kind = hit
				.index_uid
				.as_deref()
				.map_or(fallback_kind, IndexKind::from_uid);
			build_card(hit, kind, &highlighter)
		})
		.collect();

	ResultsView::Cards { cards, pager }
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;
	use crate::search::IndexSelector;
	use crate::view::{FETCH_ERROR, NO_RESULTS};

	fn hit(value: serde_json::Value) -> Hit {
		match value {
			serde_json::Value::Object(map) => Hit::from_object(map),
			other => panic!("not an object: {other}"),
		}
	}

	fn galaxy_hits(count: usize) -> Vec<Hit> {
		(0..count)
			.map(|n| hit(json!({"value": format!("cluster {n}"), "galaxy": "tool"})))
			.collect()
	}

	#[test]
	fn second_page_of_fifteen_shows_five_without_next() {
		let response = SearchResponse {
			hits: galaxy_hits(5),
			total_hits: 15,
			..SearchResponse::default()
		};
		let state = SearchState::new("", IndexSelector::Position(0)).with_page(2);
		let view = build_results(
			Ok(&response),
			&state,
			&IndexCatalog::default(),
			ViewOptions::default(),
		);

		assert_eq!(view.cards().len(), 5);
		let pager = view.pager().expect("pager");
		assert_eq!(pager.page, 2);
		assert_eq!(pager.total_pages, 2);
		assert!(pager.has_previous);
		assert!(!pager.has_next);
	}

	#[test]
	fn oversized_pages_are_trimmed() {
		let response = SearchResponse {
			hits: galaxy_hits(12),
			total_hits: 40,
			..SearchResponse::default()
		};
		let view = build_results(
			Ok(&response),
			&SearchState::default(),
			&IndexCatalog::default(),
			ViewOptions::default(),
		);
		assert_eq!(view.cards().len(), 10);
		assert!(view.pager().expect("pager").has_next);
	}

	#[test]
	fn empty_and_failed_fetches_have_messages() {
		let empty = build_results(
			Ok(&SearchResponse::default()),
			&SearchState::default(),
			&IndexCatalog::default(),
			ViewOptions::default(),
		);
		assert_eq!(empty, ResultsView::Empty);
		assert_eq!(empty.message(), Some(NO_RESULTS));

		let err = SearchError::Status {
			url: "http://localhost/search".into(),
			status: 500,
		};
		let failed = build_results(
			Err(&err),
			&SearchState::default(),
			&IndexCatalog::default(),
			ViewOptions::default(),
		);
		assert_eq!(failed.message(), Some(FETCH_ERROR));
	}

	#[test]
	fn multi_search_sections_are_paged_per_index() {
		let clusters: Vec<serde_json::Value> = (0..10)
			.map(|n| json!({"value": format!("cluster {n}")}))
			.collect();
		let objects: Vec<serde_json::Value> = (0..10)
			.map(|n| json!({"name": format!("object {n}")}))
			.collect();
		let body = json!({"results": [
			{"indexUid": "misp-galaxy", "hits": clusters, "estimatedTotalHits": 25},
			{"indexUid": "misp-objects", "hits": objects, "estimatedTotalHits": 12}
		]});
		let response = SearchResponse::from_value(body).expect("parse");
		let state = SearchState::new("", IndexSelector::All);
		let view = build_results(
			Ok(&response),
			&state,
			&IndexCatalog::default(),
			ViewOptions::default(),
		);

		let cards = view.cards();
		assert_eq!(cards.len(), 20);
		let objects = cards
			.iter()
			.filter(|card| card.kind == IndexKind::Object)
			.count();
		assert_eq!(objects, 10);
		assert_eq!(visible_hits(&response, &state, 10).len(), 20);

		let pager = view.pager().expect("pager");
		assert_eq!(pager.total_hits, 37);
		assert_eq!(pager.total_pages, 3);
		assert!(pager.has_next);
	}

	#[test]
	fn oversized_sections_are_trimmed_individually() {
		let mut response = SearchResponse {
			hits: galaxy_hits(14),
			total_hits: 14,
			..SearchResponse::default()
		};
		response.sections = vec![
			crate::search::IndexSection {
				index_uid: Some("misp-galaxy".into()),
				hit_count: 12,
				total_hits: 12,
			},
			crate::search::IndexSection {
				index_uid: Some("misp-taxonomies".into()),
				hit_count: 2,
				total_hits: 2,
			},
		];
		let titles: Vec<&str> = visible_hits(&response, &SearchState::default(), 10)
			.into_iter()
			.filter_map(|hit| hit.str_field("value"))
			.collect();
		assert_eq!(titles.len(), 12);
		assert_eq!(titles[9], "cluster 9");
		assert_eq!(titles[10], "cluster 12");
	}

	#[test]
	fn federated_hits_use_their_own_index_kind() {
		let object = hit(json!({"name": "domain-ip", "_federation": {"indexUid": "misp-objects"}}));
		let response = SearchResponse {
			hits: vec![object],
			total_hits: 1,
			..SearchResponse::default()
		};
		let state = SearchState::new("domain", IndexSelector::All);
		let view = build_results(
			Ok(&response),
			&state,
			&IndexCatalog::default(),
			ViewOptions::default(),
		);
		let card = &view.cards()[0];
		assert_eq!(card.kind, IndexKind::Object);
		assert_eq!(card.title.to_marked(), "<mark>domain</mark>-ip");
	}
}
