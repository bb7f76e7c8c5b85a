use anyhow::Result;
use misp_search::view::{CardView, ResultsView, TableView, ValueView};
use misp_search::{SearchOutcome, SearchState};
use serde_json::{Value, json};

use super::OutputFormat;

/// Print how the interactive session ended.
pub(crate) fn print_outcome(format: OutputFormat, outcome: &SearchOutcome) -> Result<()> {
	match format {
		OutputFormat::Plain => println!("{}", format_outcome_plain(outcome)),
		OutputFormat::Json => println!("{}", format_outcome_json(outcome)?),
	}
	Ok(())
}

/// Print a headless result page.
pub(crate) fn print_results(format: OutputFormat, view: &ResultsView, link: &str) -> Result<()> {
	match format {
		OutputFormat::Plain => println!("{}", format_results_plain(view, link)),
		OutputFormat::Json => println!("{}", format_results_json(view, link)?),
	}
	Ok(())
}

fn format_outcome_plain(outcome: &SearchOutcome) -> String {
	if !outcome.accepted {
		return format!("Search cancelled ({})", outcome.link);
	}
	match &outcome.selection {
		Some(selection) => match &selection.link {
			Some(link) => format!("{}\n{link}", selection.title),
			None => selection.title.clone(),
		},
		None => "No selection".to_string(),
	}
}

fn format_outcome_json(outcome: &SearchOutcome) -> Result<String> {
	let selection = match &outcome.selection {
		Some(selection) => json!({
			"kind": selection.kind.label(),
			"title": selection.title,
			"link": selection.link,
			"index": selection.hit.index_uid,
			"fields": selection.hit.fields,
		}),
		None => Value::Null,
	};

	let payload = json!({
		"accepted": outcome.accepted,
		"state": state_json(&outcome.state),
		"link": outcome.link,
		"selection": selection,
	});
	Ok(serde_json::to_string_pretty(&payload)?)
}

fn state_json(state: &SearchState) -> Value {
	json!({
		"query": state.query,
		"index": state.index.as_param(),
		"page": state.page,
		"filters": state.filters,
	})
}

fn format_results_plain(view: &ResultsView, link: &str) -> String {
	let mut out = String::new();
	if let Some(message) = view.message() {
		out.push_str(message);
		out.push('\n');
	}
	for card in view.cards() {
		out.push_str(&format!("[{}] {}\n", card.kind.label(), card.title.plain_text()));
		if let Some(link) = &card.link {
			out.push_str(&format!("  {}\n", link.href));
		}
		out.push_str(&format!("  {}\n", card.description.plain_text()));
		push_table_plain(&mut out, &card.details, 1);
	}
	if let Some(pager) = view.pager() {
		out.push_str(&format!(
			"Page {} of {} ({} results)\n",
			pager.page, pager.total_pages, pager.total_hits
		));
	}
	out.push_str(link);
	out
}

fn push_table_plain(out: &mut String, table: &TableView, depth: usize) {
	let indent = "  ".repeat(depth);
	for row in &table.rows {
		match &row.value {
			ValueView::Text(text) => {
				out.push_str(&format!("{indent}{}: {}\n", row.key, text.plain_text()));
			}
			nested => {
				out.push_str(&format!("{indent}{}:\n", row.key));
				push_value_plain(out, nested, depth + 1);
			}
		}
	}
}

fn push_value_plain(out: &mut String, value: &ValueView, depth: usize) {
	match value {
		ValueView::Text(text) => {
			out.push_str(&format!("{}{}\n", "  ".repeat(depth), text.plain_text()));
		}
		ValueView::Table(table) => push_table_plain(out, table, depth),
		ValueView::List(items) => {
			let indent = "  ".repeat(depth);
			for item in items {
				match item {
					ValueView::Text(text) => {
						out.push_str(&format!("{indent}- {}\n", text.plain_text()));
					}
					nested => {
						out.push_str(&format!("{indent}-\n"));
						push_value_plain(out, nested, depth + 1);
					}
				}
			}
		}
	}
}

fn format_results_json(view: &ResultsView, link: &str) -> Result<String> {
	let results: Vec<Value> = view.cards().iter().map(card_json).collect();
	let pager = view.pager().map(|pager| {
		json!({
			"page": pager.page,
			"total_pages": pager.total_pages,
			"total_hits": pager.total_hits,
			"has_previous": pager.has_previous,
			"has_next": pager.has_next,
		})
	});
	let payload = json!({
		"link": link,
		"message": view.message(),
		"pager": pager,
		"results": results,
	});
	Ok(serde_json::to_string_pretty(&payload)?)
}

fn card_json(card: &CardView) -> Value {
	json!({
		"kind": card.kind.label(),
		"index": card.index_uid,
		"title": card.title.plain_text(),
		"title_marked": card.title.to_marked(),
		"link": card.link.as_ref().map(|link| link.href.clone()),
		"description": card.description.plain_text(),
		"details": table_json(&card.details),
	})
}

fn table_json(table: &TableView) -> Value {
	let mut object = serde_json::Map::new();
	for row in &table.rows {
		object.insert(row.key.clone(), value_json(&row.value));
	}
	Value::Object(object)
}

fn value_json(value: &ValueView) -> Value {
	match value {
		ValueView::Text(text) => Value::String(text.plain_text()),
		ValueView::List(items) => Value::Array(items.iter().map(value_json).collect()),
		ValueView::Table(table) => table_json(table),
	}
}
