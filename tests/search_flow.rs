use std::time::Duration;

use misp_search::search::url_state;
use misp_search::view::NO_RESULTS;
use misp_search::{
	FacetCatalog, HttpSearchClient, IndexCatalog, IndexSelector, ResultsView, SearchBackend,
	SearchRequest, SearchState, ViewOptions, build_results,
};
use mockito::Matcher;
use reqwest::Url;

const GALAXY_BODY: &str = r#"{
	"hits": [
		{
			"value": "Fancy Bear",
			"description": "Russian threat actor",
			"galaxy": "threat-actor",
			"uuid": "5b4ee3ea-eee3-4c8e-8323-85ae32658754",
			"_formatted": {"value": "<mark>Fancy</mark> Bear"}
		},
		{
			"value": "Sofacy",
			"galaxy": "threat-actor"
		}
	],
	"estimatedTotalHits": 12
}"#;

fn client_for(server: &mockito::ServerGuard) -> (Url, HttpSearchClient) {
	let base = Url::parse(&server.url()).expect("server url");
	let client = HttpSearchClient::new(&base, Duration::from_secs(5)).expect("client");
	(base, client)
}

#[test]
fn state_link_drives_a_rendered_page() {
	let mut server = mockito::Server::new();
	let mock = server
		.mock("GET", "/search")
		.match_query(Matcher::AllOf(vec![
			Matcher::UrlEncoded("q".into(), "fancy".into()),
			Matcher::UrlEncoded("index".into(), "0".into()),
			Matcher::UrlEncoded("page".into(), "2".into()),
			Matcher::UrlEncoded("galaxy".into(), "threat-actor".into()),
		]))
		.with_status(200)
		.with_header("content-type", "application/json")
		.with_body(GALAXY_BODY)
		.create();

	let (base, client) = client_for(&server);
	let facets = FacetCatalog::default();
	let indexes = IndexCatalog::default();
	let link = url_state::parse_link("q=fancy&index=0&page=2&galaxy=threat-actor", &base)
		.expect("link");
	let state = url_state::decode(&link, &facets, IndexSelector::default());

	let request = SearchRequest::from_state(&state, 10, &facets);
	let response = client.search(&request);
	mock.assert();

	let view = build_results(response.as_ref(), &state, &indexes, ViewOptions::default());
	let cards = view.cards();
	assert_eq!(cards.len(), 2);
	assert_eq!(cards[0].title.plain_text(), "Fancy Bear");
	assert_eq!(cards[0].title.to_marked(), "<mark>Fancy</mark> Bear");
	assert_eq!(
		cards[0].link.as_ref().map(|link| link.href.as_str()),
		Some("https://misp-galaxy.org/threat-actor/#fancy-bear")
	);

	let pager = view.pager().expect("pager");
	assert_eq!(pager.page, 2);
	assert_eq!(pager.total_pages, 2);
	assert!(pager.has_previous);
	assert!(!pager.has_next);

	let encoded = url_state::encode(&state, &base, &facets);
	assert_eq!(url_state::decode(&encoded, &facets, IndexSelector::default()), state);
}

#[test]
fn failures_and_empty_pages_render_messages() {
	let mut server = mockito::Server::new();
	let _broken = server
		.mock("GET", "/search")
		.match_query(Matcher::UrlEncoded("q".into(), "broken".into()))
		.with_status(500)
		.create();
	let _empty = server
		.mock("GET", "/search")
		.match_query(Matcher::UrlEncoded("q".into(), "nothing".into()))
		.with_status(200)
		.with_body(r#"{"hits": [], "estimatedTotalHits": 0}"#)
		.create();

	let (_, client) = client_for(&server);
	let facets = FacetCatalog::default();
	let indexes = IndexCatalog::default();

	let broken = SearchState::new("broken", IndexSelector::All);
	let response = client.search(&SearchRequest::from_state(&broken, 10, &facets));
	assert!(response.is_err());
	let view = build_results(response.as_ref(), &broken, &indexes, ViewOptions::default());
	assert_eq!(view, ResultsView::Error);
	assert_eq!(view.message(), Some("Error retrieving search results"));

	let empty = SearchState::new("nothing", IndexSelector::All);
	let response = client.search(&SearchRequest::from_state(&empty, 10, &facets));
	let view = build_results(response.as_ref(), &empty, &indexes, ViewOptions::default());
	assert_eq!(view.message(), Some(NO_RESULTS));
}
