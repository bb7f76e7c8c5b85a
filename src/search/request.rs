use super::facets::{FacetCatalog, Filters};
use super::index::IndexSelector;
use super::state::SearchState;
use super::url_state::{self, join_values};

/// Results per page when nothing else is configured.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Parameters for one `GET /search` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
	pub query: String,
	pub index: IndexSelector,
	pub page: u32,
	pub page_size: u32,
	pub filters: Filters,
	/// Facet attributes to count; empty when no distribution is wanted.
	pub facets: Vec<String>,
	filter_order: Vec<String>,
}

impl SearchRequest {
	/// Request for the results page described by `state`.
	#[must_use]
	pub fn from_state(state: &SearchState, page_size: u32, catalog: &FacetCatalog) -> Self {
		Self {
			query: state.query.clone(),
			index: state.index,
			page: state.page.max(1),
			page_size: page_size.max(1),
			filters: state.filters.clone(),
			facets: Vec::new(),
			filter_order: filter_order(state, catalog),
		}
	}

	/// Request that only asks for facet counts. Filters are left out so every
	/// option stays visible in the filter panel.
	#[must_use]
	pub fn facet_request(state: &SearchState, catalog: &FacetCatalog) -> Self {
		Self {
			query: state.query.clone(),
			index: state.index,
			page: 1,
			page_size: 1,
			filters: Filters::new(),
			facets: catalog.fields(),
			filter_order: Vec::new(),
		}
	}

	/// Search state this request was built from.
	#[must_use]
	pub fn state(&self) -> SearchState {
		SearchState {
			query: self.query.clone(),
			index: self.index,
			page: self.page,
			filters: self.filters.clone(),
		}
	}

	/// Query string pairs in wire order.
	#[must_use]
	pub fn query_pairs(&self) -> Vec<(String, String)> {
		let mut pairs = vec![
			("q".to_string(), self.query.clone()),
			("index".to_string(), self.index.as_param()),
			("page".to_string(), self.page.to_string()),
			("pageSize".to_string(), self.page_size.to_string()),
		];
		for param in &self.filter_order {
			if let Some(values) = self.filters.get(param).filter(|values| !values.is_empty()) {
				pairs.push((param.clone(), join_values(values)));
			}
		}
		if !self.facets.is_empty() {
			let encoded = serde_json::Value::from(self.facets.clone()).to_string();
			pairs.push(("facetsDistribution".to_string(), encoded));
		}
		pairs
	}
}

fn filter_order(state: &SearchState, catalog: &FacetCatalog) -> Vec<String> {
	url_state::ordered_filters(state, catalog)
		.into_iter()
		.map(|(param, _)| param.to_string())
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	fn encoded(request: &SearchRequest) -> String {
		request
			.query_pairs()
			.into_iter()
			.map(|(key, value)| format!("{key}={value}"))
			.collect::<Vec<_>>()
			.join("&")
	}

	#[test]
	fn results_request_carries_page_and_filters() {
		let state = SearchState::new("apt", IndexSelector::Position(0))
			.with_page(3)
			.with_filter("galaxy", ["threat-actor", "tool"]);
		let request = SearchRequest::from_state(&state, 25, &FacetCatalog::default());
		insta::assert_snapshot!(
			encoded(&request),
			@"q=apt&index=0&page=3&pageSize=25&galaxy=threat-actor,tool"
		);
	}

	#[test]
	fn request_remembers_its_state() {
		let state = SearchState::new("apt", IndexSelector::All)
			.with_page(2)
			.with_filter("taxonomies", ["tlp"]);
		let request = SearchRequest::from_state(&state, 10, &FacetCatalog::default());
		assert_eq!(request.state(), state);
	}

	#[test]
	fn empty_query_is_still_sent() {
		let request = SearchRequest::from_state(&SearchState::default(), 10, &FacetCatalog::default());
		let pairs = request.query_pairs();
		assert_eq!(pairs[0], ("q".to_string(), String::new()));
	}

	#[test]
	fn facet_request_asks_for_every_catalog_field() {
		let state = SearchState::new("sofacy", IndexSelector::All)
			.with_page(4)
			.with_filter("galaxy", ["tool"]);
		let request = SearchRequest::facet_request(&state, &FacetCatalog::default());
		insta::assert_snapshot!(
			encoded(&request),
			@r#"q=sofacy&index=all&page=1&pageSize=1&facetsDistribution=["namespace","galaxy"]"#
		);
	}
}
