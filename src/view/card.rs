//! Map a [`Hit`] to a [`CardView`].
//!
//! Known fields for each index kind fill the title, description and link
//! slots; every other field lands in the details table.

use reqwest::Url;
use serde_json::{Map, Value};

use crate::search::{Hit, IndexKind};

use super::highlight::{Highlighter, RichText, parse_marked};
use super::tree::{CardView, LinkView, NO_DESCRIPTION, NO_TITLE, TableRow, TableView, ValueView};

const GALAXY_SITE: &str = "https://misp-galaxy.org/";
const OBJECTS_PAGE: &str = "https://www.misp-project.org/objects.html";
const TAXONOMIES_PAGE: &str = "https://www.misp-project.org/taxonomies.html";

#[must_use]
pub fn build_card(hit: &Hit, kind: IndexKind, highlighter: &Highlighter) -> CardView {
	let slots = match kind {
		IndexKind::Galaxy => galaxy_slots(hit, highlighter),
		IndexKind::Object => object_slots(hit, highlighter),
		IndexKind::Taxonomy => taxonomy_slots(hit, highlighter),
		IndexKind::Generic => generic_slots(hit, highlighter),
	};

	let details = table_view(
		hit.fields
			.iter()
			.filter(|(key, _)| !slots.consumed.iter().any(|used| *used == key.as_str())),
		hit.formatted.as_ref(),
		highlighter,
	);

	CardView {
		kind,
		index_uid: hit.index_uid.clone(),
		title: slots.title.unwrap_or_else(|| RichText::plain(NO_TITLE)),
		link: slots.link,
		description: slots
			.description
			.unwrap_or_else(|| RichText::plain(NO_DESCRIPTION)),
		details,
	}
}

#[derive(Default)]
struct Slots {
	title: Option<RichText>,
	description: Option<RichText>,
	link: Option<LinkView>,
	consumed: Vec<&'static str>,
}

fn galaxy_slots(hit: &Hit, highlighter: &Highlighter) -> Slots {
	let link = match (hit.str_field("galaxy"), hit.str_field("value")) {
		(Some(galaxy), Some(value)) => galaxy_link(galaxy, value),
		_ => None,
	};
	Slots {
		title: rich_field(hit, "value", highlighter),
		description: rich_field(hit, "description", highlighter),
		link,
		consumed: vec!["value", "description"],
	}
}

fn object_slots(hit: &Hit, highlighter: &Highlighter) -> Slots {
	let link = hit.str_field("name").and_then(|name| {
		page_link(OBJECTS_PAGE, name, "Go to MISP Objects")
	});
	Slots {
		title: rich_field(hit, "name", highlighter),
		description: rich_field(hit, "description", highlighter),
		link,
		consumed: vec!["name", "description"],
	}
}

/// Taxonomy documents come in three shapes: the whole namespace, a predicate
/// (`value` set) and an entry (`predicate` and `value` set). The title is the
/// corresponding machine tag.
fn taxonomy_slots(hit: &Hit, highlighter: &Highlighter) -> Slots {
	let namespace = hit.str_field("namespace");
	let predicate = hit.str_field("predicate");
	let value = hit.str_field("value");

	let (tag, mut consumed) = match (namespace, predicate, value) {
		(Some(ns), Some(predicate), Some(value)) => (
			Some(format!("{ns}:{predicate}=\"{value}\"")),
			vec!["namespace", "predicate", "value"],
		),
		(Some(ns), None, Some(value)) => (Some(format!("{ns}:{value}")), vec!["namespace", "value"]),
		(Some(ns), _, None) => (Some(ns.to_string()), vec!["namespace"]),
		(None, _, Some(value)) => (Some(value.to_string()), vec!["value"]),
		(None, _, None) => (None, Vec::new()),
	};

	let description = match rich_field(hit, "description", highlighter) {
		Some(description) => {
			consumed.push("description");
			Some(description)
		}
		None => {
			let expanded = rich_field(hit, "expanded", highlighter);
			if expanded.is_some() {
				consumed.push("expanded");
			}
			expanded
		}
	};

	let link = namespace.and_then(|ns| {
		page_link(TAXONOMIES_PAGE, &format!("_{ns}"), "Go to MISP Taxonomies")
	});

	Slots {
		title: tag.map(|tag| highlighter.highlight(&tag)),
		description,
		link,
		consumed,
	}
}

fn generic_slots(hit: &Hit, highlighter: &Highlighter) -> Slots {
	let title_key = ["value", "name", "title", "uuid"]
		.into_iter()
		.find(|key| hit.str_field(key).is_some());
	let mut consumed = vec!["description"];
	consumed.extend(title_key);
	Slots {
		title: title_key.and_then(|key| rich_field(hit, key, highlighter)),
		description: rich_field(hit, "description", highlighter),
		link: None,
		consumed,
	}
}

/// A string field, preferring the server's highlighted copy when
/// highlighting is on.
fn rich_field(hit: &Hit, key: &str, highlighter: &Highlighter) -> Option<RichText> {
	if highlighter.is_active()
		&& let Some(formatted) = hit.formatted_str(key)
	{
		return Some(parse_marked(formatted));
	}
	hit.str_field(key).map(|value| highlighter.highlight(value))
}

fn table_view<'a>(
	entries: impl Iterator<Item = (&'a String, &'a Value)>,
	formatted: Option<&'a Map<String, Value>>,
	highlighter: &Highlighter,
) -> TableView {
	let rows = entries
		.map(|(key, value)| TableRow {
			key: key.clone(),
			value: value_view(value, formatted.and_then(|map| map.get(key)), highlighter),
		})
		.collect();
	TableView { rows }
}

fn value_view(value: &Value, formatted: Option<&Value>, highlighter: &Highlighter) -> ValueView {
	match value {
		Value::String(text) => {
			let marked = formatted
				.and_then(Value::as_str)
				.filter(|_| highlighter.is_active());
			ValueView::Text(match marked {
				Some(marked) => parse_marked(marked),
				None => highlighter.highlight(text),
			})
		}
		Value::Array(items) => {
			let formatted_items = formatted.and_then(Value::as_array);
			ValueView::List(
				items
					.iter()
					.enumerate()
					.map(|(position, item)| {
						let formatted_item = formatted_items.and_then(|items| items.get(position));
						value_view(item, formatted_item, highlighter)
					})
					.collect(),
			)
		}
		Value::Object(map) => ValueView::Table(table_view(
			map.iter(),
			formatted.and_then(Value::as_object),
			highlighter,
		)),
		Value::Null => ValueView::Text(highlighter.highlight("null")),
		Value::Bool(flag) => ValueView::Text(highlighter.highlight(&flag.to_string())),
		Value::Number(number) => ValueView::Text(highlighter.highlight(&number.to_string())),
	}
}

/// Lowercase and replace each run of whitespace with a single `-`.
fn slugify(value: &str) -> String {
	let mut slug = String::with_capacity(value.len());
	let mut in_space = false;
	for ch in value.chars() {
		if ch.is_whitespace() {
			if !in_space {
				slug.push('-');
			}
			in_space = true;
		} else {
			slug.extend(ch.to_lowercase());
			in_space = false;
		}
	}
	slug
}

fn galaxy_link(galaxy: &str, value: &str) -> Option<LinkView> {
	let mut url = Url::parse(GALAXY_SITE).ok()?;
	url.path_segments_mut().ok()?.push(galaxy).push("");
	url.set_fragment(Some(&urlencoding::encode(&slugify(value))));
	Some(LinkView {
		label: "Go to MISP-Galaxy".to_string(),
		href: url.to_string(),
	})
}

fn page_link(page: &str, anchor: &str, label: &str) -> Option<LinkView> {
	let mut url = Url::parse(page).ok()?;
	url.set_fragment(Some(anchor));
	Some(LinkView {
		label: label.to_string(),
		href: url.to_string(),
	})
}
