//! Encode and decode [`SearchState`] as a state link.
//!
//! The link uses the same parameters as the web front-end (`q`, `index`,
//! `page`, plus one comma-separated parameter per filter category) so it can
//! be opened in a browser or handed back to the client with `--link`.

use std::collections::BTreeSet;

use reqwest::Url;

use super::facets::FacetCatalog;
use super::index::IndexSelector;
use super::state::SearchState;

pub const QUERY_PARAM: &str = "q";
pub const INDEX_PARAM: &str = "index";
pub const PAGE_PARAM: &str = "page";

/// Write `state` into the query string of `base`, replacing any existing one.
#[must_use]
pub fn encode(state: &SearchState, base: &Url, facets: &FacetCatalog) -> Url {
	let mut url = base.clone();
	url.set_fragment(None);
	{
		let mut pairs = url.query_pairs_mut();
		pairs.clear();
		pairs.append_pair(QUERY_PARAM, &state.query);
		pairs.append_pair(INDEX_PARAM, &state.index.as_param());
		pairs.append_pair(PAGE_PARAM, &state.page.to_string());
		for (param, values) in ordered_filters(state, facets) {
			pairs.append_pair(param, &join_values(values));
		}
	}
	url
}

/// Restore a [`SearchState`] from a state link.
///
/// Unknown parameters are ignored; missing or malformed ones fall back to
/// their defaults.
#[must_use]
pub fn decode(url: &Url, facets: &FacetCatalog, default_index: IndexSelector) -> SearchState {
	let mut state = SearchState::new(String::new(), default_index);
	for (key, value) in url.query_pairs() {
		match key.as_ref() {
			QUERY_PARAM => state.query = value.into_owned(),
			INDEX_PARAM => state.index = IndexSelector::parse_or(&value, default_index),
			PAGE_PARAM => state.page = parse_page(&value),
			param if facets.by_param(param).is_some() => {
				let values = split_values(&value);
				if values.is_empty() {
					state.filters.remove(param);
				} else {
					state.filters.insert(param.to_string(), values);
				}
			}
			_ => {}
		}
	}
	state
}

/// Parse a `--link` argument, accepting either a full URL or a bare query
/// string relative to `base`.
#[must_use]
pub fn parse_link(link: &str, base: &Url) -> Option<Url> {
	Url::parse(link)
		.ok()
		.or_else(|| base.join(&format!("?{}", link.trim_start_matches('?'))).ok())
}

fn parse_page(value: &str) -> u32 {
	value.trim().parse::<u32>().map_or(1, |page| page.max(1))
}

fn split_values(value: &str) -> BTreeSet<String> {
	value
		.split(',')
		.map(str::trim)
		.filter(|piece| !piece.is_empty())
		.map(str::to_string)
		.collect()
}

pub(crate) fn join_values(values: &BTreeSet<String>) -> String {
	values.iter().map(String::as_str).collect::<Vec<_>>().join(",")
}

/// Filters in catalog order, followed by any categories the catalog does not
/// know about.
pub(crate) fn ordered_filters<'a>(
	state: &'a SearchState,
	facets: &'a FacetCatalog,
) -> Vec<(&'a str, &'a BTreeSet<String>)> {
	let mut ordered: Vec<(&str, &BTreeSet<String>)> = facets
		.params()
		.filter_map(|param| {
			state
				.filters
				.get(param)
				.filter(|values| !values.is_empty())
				.map(|values| (param, values))
		})
		.collect();
	for (param, values) in &state.filters {
		if values.is_empty() || facets.by_param(param).is_some() {
			continue;
		}
		ordered.push((param.as_str(), values));
	}
	ordered
}

#[cfg(test)]
mod tests {
	use super::*;

	fn base() -> Url {
		Url::parse("http://localhost:8001/").expect("base url")
	}

	#[test]
	fn encodes_parameters_in_a_stable_order() {
		let state = SearchState::new("apt 28", IndexSelector::Position(1))
			.with_page(2)
			.with_filter("galaxy", ["tool", "threat-actor"])
			.with_filter("taxonomies", ["tlp"]);
		let link = encode(&state, &base(), &FacetCatalog::default());
		insta::assert_snapshot!(
			link.as_str(),
			@"http://localhost:8001/?q=apt+28&index=1&page=2&taxonomies=tlp&galaxy=threat-actor%2Ctool"
		);
	}

	#[test]
	fn round_trip_reproduces_state() {
		let facets = FacetCatalog::default();
		let states = [
			SearchState::default(),
			SearchState::new("Sofacy & friends", IndexSelector::All).with_page(7),
			SearchState::new("tlp:red", IndexSelector::Position(2))
				.with_filter("taxonomies", ["tlp", "admiralty-scale"])
				.with_filter("galaxy", ["mitre-attack-pattern"]),
		];
		for state in states {
			let link = encode(&state, &base(), &facets);
			let restored = decode(&link, &facets, IndexSelector::default());
			assert_eq!(restored, state, "link {link}");
		}
	}

	#[test]
	fn decoding_tolerates_missing_and_invalid_values() {
		let url = Url::parse("http://localhost:8001/?index=nope&page=0&galaxy=%2C+tool+%2C&utm=x")
			.expect("url");
		let state = decode(&url, &FacetCatalog::default(), IndexSelector::All);
		assert_eq!(state.query, "");
		assert_eq!(state.index, IndexSelector::All);
		assert_eq!(state.page, 1);
		assert_eq!(
			state.filters_for("galaxy"),
			Some(&BTreeSet::from(["tool".to_string()]))
		);
		assert_eq!(state.filters.len(), 1);
	}

	#[test]
	fn bare_query_strings_are_resolved_against_base() {
		let url = parse_link("?q=ransomware&index=all", &base()).expect("link");
		assert_eq!(url.as_str(), "http://localhost:8001/?q=ransomware&index=all");
		let state = decode(&url, &FacetCatalog::default(), IndexSelector::default());
		assert_eq!(state.query, "ransomware");
		assert_eq!(state.index, IndexSelector::All);
	}
}
