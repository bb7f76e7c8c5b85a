use std::time::Duration;

use reqwest::Url;
use reqwest::blocking::Client;

use super::request::SearchRequest;
use super::response::{ResponseError, SearchResponse};

pub const DEFAULT_SERVER_URL: &str = "http://localhost:8001";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
	#[error("invalid search endpoint '{url}': {reason}")]
	InvalidEndpoint { url: String, reason: String },
	#[error("request to {url} failed: {source}")]
	Transport {
		url: String,
		#[source]
		source: reqwest::Error,
	},
	#[error("search service answered {status} for {url}")]
	Status { url: String, status: u16 },
	#[error("malformed search response: {0}")]
	Malformed(#[from] ResponseError),
}

/// Anything that can answer a [`SearchRequest`].
///
/// The terminal UI and headless mode talk to this trait so tests can swap in
/// canned responses.
pub trait SearchBackend: Send + Sync {
	fn search(&self, request: &SearchRequest) -> Result<SearchResponse, SearchError>;
}

/// Blocking HTTP client for `GET <base>/search`.
#[derive(Debug, Clone)]
pub struct HttpSearchClient {
	http: Client,
	endpoint: Url,
}

impl HttpSearchClient {
	/// Build a client for the front-end at `base` (for example
	/// `http://localhost:8001`).
	pub fn new(base: &Url, timeout: Duration) -> Result<Self, SearchError> {
		let endpoint = search_endpoint(base)?;
		let http = Client::builder()
			.timeout(timeout)
			.user_agent(concat!("misp-search/", env!("CARGO_PKG_VERSION")))
			.build()
			.map_err(|source| SearchError::Transport {
				url: endpoint.to_string(),
				source,
			})?;
		Ok(Self { http, endpoint })
	}

	#[must_use]
	pub fn endpoint(&self) -> &Url {
		&self.endpoint
	}
}

impl SearchBackend for HttpSearchClient {
	fn search(&self, request: &SearchRequest) -> Result<SearchResponse, SearchError> {
		let pairs = request.query_pairs();
		tracing::debug!(endpoint = %self.endpoint, ?pairs, "issuing search");

		let response = self
			.http
			.get(self.endpoint.clone())
			.query(&pairs)
			.send()
			.map_err(|source| SearchError::Transport {
				url: self.endpoint.to_string(),
				source,
			})?;

		let status = response.status();
		if !status.is_success() {
			return Err(SearchError::Status {
				url: response.url().to_string(),
				status: status.as_u16(),
			});
		}

		let body = response.text().map_err(|source| SearchError::Transport {
			url: self.endpoint.to_string(),
			source,
		})?;
		let parsed = SearchResponse::from_json(&body)?;
		tracing::debug!(
			hits = parsed.hits.len(),
			total = parsed.total_hits,
			"search completed"
		);
		Ok(parsed)
	}
}

/// Resolve `<base>/search`, keeping any path prefix on `base`.
pub fn search_endpoint(base: &Url) -> Result<Url, SearchError> {
	if base.cannot_be_a_base() {
		return Err(SearchError::InvalidEndpoint {
			url: base.to_string(),
			reason: "URL cannot carry a path".to_string(),
		});
	}
	let mut prefix = base.clone();
	prefix.set_query(None);
	prefix.set_fragment(None);
	if !prefix.path().ends_with('/') {
		let path = format!("{}/", prefix.path());
		prefix.set_path(&path);
	}
	prefix
		.join("search")
		.map_err(|err| SearchError::InvalidEndpoint {
			url: base.to_string(),
			reason: err.to_string(),
		})
}

#[cfg(test)]
mod tests {
	use mockito::Matcher;

	use super::*;
	use crate::search::{FacetCatalog, IndexSelector, SearchState};

	fn client_for(server: &mockito::ServerGuard) -> HttpSearchClient {
		let base = Url::parse(&server.url()).expect("server url");
		HttpSearchClient::new(&base, Duration::from_secs(5)).expect("client")
	}

	#[test]
	fn endpoint_keeps_path_prefix() {
		let base = Url::parse("https://search.example.org/misp?x=1").expect("url");
		let endpoint = search_endpoint(&base).expect("endpoint");
		assert_eq!(endpoint.as_str(), "https://search.example.org/misp/search");

		let root = Url::parse("http://localhost:8001").expect("url");
		assert_eq!(
			search_endpoint(&root).expect("endpoint").as_str(),
			"http://localhost:8001/search"
		);
	}

	#[test]
	fn sends_state_as_query_parameters() {
		let mut server = mockito::Server::new();
		let mock = server
			.mock("GET", "/search")
			.match_query(Matcher::AllOf(vec![
				Matcher::UrlEncoded("q".into(), "apt 28".into()),
				Matcher::UrlEncoded("index".into(), "all".into()),
				Matcher::UrlEncoded("page".into(), "2".into()),
				Matcher::UrlEncoded("pageSize".into(), "10".into()),
				Matcher::UrlEncoded("galaxy".into(), "threat-actor".into()),
			]))
			.with_status(200)
			.with_header("content-type", "application/json")
			.with_body(r#"{"hits": [{"value": "APT28"}], "estimatedTotalHits": 11}"#)
			.create();

		let state = SearchState::new("apt 28", IndexSelector::All)
			.with_page(2)
			.with_filter("galaxy", ["threat-actor"]);
		let request = SearchRequest::from_state(&state, 10, &FacetCatalog::default());
		let response = client_for(&server).search(&request).expect("search");

		mock.assert();
		assert_eq!(response.total_hits, 11);
		assert_eq!(response.hits[0].str_field("value"), Some("APT28"));
	}

	#[test]
	fn server_errors_map_to_status() {
		let mut server = mockito::Server::new();
		let _mock = server
			.mock("GET", "/search")
			.match_query(Matcher::Any)
			.with_status(502)
			.create();

		let request = SearchRequest::from_state(&SearchState::default(), 10, &FacetCatalog::default());
		let err = client_for(&server).search(&request).expect_err("should fail");
		assert!(matches!(err, SearchError::Status { status: 502, .. }), "{err}");
	}

	#[test]
	fn html_bodies_are_malformed() {
		let mut server = mockito::Server::new();
		let _mock = server
			.mock("GET", "/search")
			.match_query(Matcher::Any)
			.with_status(200)
			.with_body("<html>oops</html>")
			.create();

		let request = SearchRequest::from_state(&SearchState::default(), 10, &FacetCatalog::default());
		let err = client_for(&server).search(&request).expect_err("should fail");
		assert!(matches!(err, SearchError::Malformed(_)), "{err}");
	}

	#[test]
	fn unreachable_server_is_a_transport_error() {
		let base = Url::parse("http://127.0.0.1:9").expect("url");
		let client = HttpSearchClient::new(&base, Duration::from_millis(500)).expect("client");
		let request = SearchRequest::from_state(&SearchState::default(), 10, &FacetCatalog::default());
		let err = client.search(&request).expect_err("should fail");
		assert!(matches!(err, SearchError::Transport { .. }), "{err}");
	}
}
