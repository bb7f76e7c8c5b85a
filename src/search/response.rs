use serde::Deserialize;
use serde_json::{Map, Value};

use super::facets::FacetDistribution;

/// One result record. Its shape depends on the index it came from.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Hit {
	/// Document fields in the order the service sent them, without the
	/// `_`-prefixed metadata keys.
	pub fields: Map<String, Value>,
	/// Server-highlighted copy of the document (`_formatted`).
	pub formatted: Option<Map<String, Value>>,
	/// Source index for federated and multi-index searches.
	pub index_uid: Option<String>,
}

impl Hit {
	/// Split a raw hit object into document fields and metadata.
	#[must_use]
	pub fn from_object(object: Map<String, Value>) -> Self {
		let mut hit = Self::default();
		for (key, value) in object {
			match key.as_str() {
				"_formatted" => {
					if let Value::Object(formatted) = value {
						hit.formatted = Some(formatted);
					}
				}
				"_federation" => {
					hit.index_uid = value
						.get("indexUid")
						.and_then(Value::as_str)
						.map(str::to_string);
				}
				meta if meta.starts_with('_') => {}
				_ => {
					hit.fields.insert(key, value);
				}
			}
		}
		hit
	}

	#[must_use]
	pub fn str_field(&self, key: &str) -> Option<&str> {
		self.fields
			.get(key)
			.and_then(Value::as_str)
			.filter(|value| !value.is_empty())
	}

	/// Server-highlighted version of a string field, if present.
	#[must_use]
	pub fn formatted_str(&self, key: &str) -> Option<&str> {
		self.formatted
			.as_ref()?
			.get(key)
			.and_then(Value::as_str)
			.filter(|value| !value.is_empty())
	}
}

/// Parsed body of a `/search` response.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchResponse {
	pub hits: Vec<Hit>,
	pub total_hits: u64,
	pub facet_distribution: FacetDistribution,
	/// Per-index slices of `hits` for multi-search bodies, in order. Empty for
	/// single-index and federated bodies, whose hits form one ranked list.
	pub sections: Vec<IndexSection>,
}

/// One index's share of a multi-search body. Each index is paged on its
/// own, so every section holds up to a page of hits.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IndexSection {
	pub index_uid: Option<String>,
	/// Number of consecutive entries in [`SearchResponse::hits`].
	pub hit_count: usize,
	pub total_hits: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum ResponseError {
	#[error("response body is not valid JSON: {0}")]
	Json(#[from] serde_json::Error),
	#[error("response body is not a JSON object")]
	NotAnObject,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawIndexResult {
	#[serde(default)]
	index_uid: Option<String>,
	#[serde(default)]
	hits: Vec<Value>,
	#[serde(default)]
	estimated_total_hits: Option<u64>,
	#[serde(default)]
	nb_hits: Option<u64>,
	#[serde(default)]
	total_hits: Option<u64>,
	#[serde(default)]
	facet_distribution: Option<FacetDistribution>,
}

impl RawIndexResult {
	fn reported_total(&self) -> Option<u64> {
		self.estimated_total_hits.or(self.nb_hits).or(self.total_hits)
	}
}

#[derive(Debug, Default, Deserialize)]
struct RawResponse {
	#[serde(flatten)]
	single: RawIndexResult,
	#[serde(default)]
	results: Option<Vec<RawIndexResult>>,
}

impl SearchResponse {
	/// Parse a response body.
	///
	/// Accepts single-index and federated bodies (`hits` at the top level) as
	/// well as multi-search bodies (`results`), whose hits are flattened and
	/// tagged with their index uid.
	pub fn from_json(body: &str) -> Result<Self, ResponseError> {
		let value: Value = serde_json::from_str(body)?;
		Self::from_value(value)
	}

	pub fn from_value(value: Value) -> Result<Self, ResponseError> {
		if !value.is_object() {
			return Err(ResponseError::NotAnObject);
		}
		let raw: RawResponse = serde_json::from_value(value)?;

		let mut response = Self::default();
		let mut reported = None;
		let multi = raw.results.is_some();
		let sections = std::iter::once((false, raw.single))
			.chain(raw.results.into_iter().flatten().map(|section| (true, section)));
		for (from_results, section) in sections {
			let section_total = section.reported_total();
			if let Some(total) = section_total {
				reported = Some(reported.unwrap_or(0) + total);
			}
			if let Some(distribution) = section.facet_distribution {
				merge_distribution(&mut response.facet_distribution, distribution);
			}
			let start = response.hits.len();
			for value in section.hits {
				match value {
					Value::Object(object) => {
						let mut hit = Hit::from_object(object);
						if hit.index_uid.is_none() {
							hit.index_uid.clone_from(&section.index_uid);
						}
						response.hits.push(hit);
					}
					other => tracing::warn!(hit = ?other, "skipping non-object hit"),
				}
			}
			let hit_count = response.hits.len() - start;
			if multi && (from_results || hit_count > 0) {
				response.sections.push(IndexSection {
					index_uid: section.index_uid,
					hit_count,
					total_hits: section_total.unwrap_or(hit_count as u64),
				});
			}
		}
		response.total_hits = reported.unwrap_or(response.hits.len() as u64);
		Ok(response)
	}
}

fn merge_distribution(into: &mut FacetDistribution, from: FacetDistribution) {
	for (field, counts) in from {
		let entry = into.entry(field).or_default();
		for (value, count) in counts {
			*entry.entry(value).or_default() += count;
		}
	}
}
