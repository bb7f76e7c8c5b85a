use std::collections::{BTreeMap, BTreeSet};

use serde::Deserialize;

/// Selected filter values keyed by their query parameter name.
pub type Filters = BTreeMap<String, BTreeSet<String>>;

/// Facet counts as returned by the service: `field -> value -> count`.
pub type FacetDistribution = BTreeMap<String, BTreeMap<String, u64>>;

/// Describes one filterable category.
///
/// `param` is the query parameter carrying the selection (`galaxy`,
/// `taxonomies`), `field` is the facet attribute counted by the service
/// (`galaxy`, `namespace`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FacetSpec {
	pub param: String,
	pub field: String,
	#[serde(default)]
	pub label: Option<String>,
}

impl FacetSpec {
	pub fn new(param: impl Into<String>, field: impl Into<String>, label: impl Into<String>) -> Self {
		Self {
			param: param.into(),
			field: field.into(),
			label: Some(label.into()),
		}
	}

	#[must_use]
	pub fn display_label(&self) -> &str {
		self.label.as_deref().unwrap_or(&self.param)
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacetCatalog {
	specs: Vec<FacetSpec>,
}

impl Default for FacetCatalog {
	fn default() -> Self {
		Self::new(vec![
			FacetSpec::new("taxonomies", "namespace", "Taxonomies"),
			FacetSpec::new("galaxy", "galaxy", "Galaxy"),
		])
	}
}

impl FacetCatalog {
	#[must_use]
	pub fn new(specs: Vec<FacetSpec>) -> Self {
		Self { specs }
	}

	#[must_use]
	pub fn specs(&self) -> &[FacetSpec] {
		&self.specs
	}

	#[must_use]
	pub fn params(&self) -> impl Iterator<Item = &str> {
		self.specs.iter().map(|spec| spec.param.as_str())
	}

	#[must_use]
	pub fn fields(&self) -> Vec<String> {
		self.specs.iter().map(|spec| spec.field.clone()).collect()
	}

	#[must_use]
	pub fn by_param(&self, param: &str) -> Option<&FacetSpec> {
		self.specs.iter().find(|spec| spec.param == param)
	}
}

/// One checkbox in the filter panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacetOption {
	pub value: String,
	pub count: u64,
	pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterGroup {
	pub spec: FacetSpec,
	pub options: Vec<FacetOption>,
}

/// Editable copy of the filter selection shown in the filter popup.
///
/// Edits stay local until the caller reads [`FilterPanel::selection`] and
/// applies it to the search state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterPanel {
	groups: Vec<FilterGroup>,
	cursor: usize,
	loading: bool,
	pending: Filters,
}

impl FilterPanel {
	/// Panel waiting for facet counts; the current selection is kept aside
	/// until [`FilterPanel::populate`] runs.
	#[must_use]
	pub fn loading(catalog: &FacetCatalog, selection: &Filters) -> Self {
		let mut panel = Self {
			groups: Vec::new(),
			cursor: 0,
			loading: true,
			pending: selection.clone(),
		};
		panel.rebuild(catalog, &FacetDistribution::new());
		panel
	}

	#[must_use]
	pub fn new(catalog: &FacetCatalog, distribution: &FacetDistribution, selection: &Filters) -> Self {
		let mut panel = Self::loading(catalog, selection);
		panel.populate(catalog, distribution);
		panel
	}

	/// Fill the panel with facet counts, keeping the edits made so far.
	pub fn populate(&mut self, catalog: &FacetCatalog, distribution: &FacetDistribution) {
		self.pending = self.selection();
		self.rebuild(catalog, distribution);
		self.loading = false;
		self.cursor = self.cursor.min(self.option_count().saturating_sub(1));
	}

	fn rebuild(&mut self, catalog: &FacetCatalog, distribution: &FacetDistribution) {
		self.groups = catalog
			.specs()
			.iter()
			.map(|spec| {
				let selected = self.pending.get(&spec.param);
				let mut options: Vec<FacetOption> = distribution
					.get(&spec.field)
					.into_iter()
					.flatten()
					.map(|(value, count)| FacetOption {
						value: value.clone(),
						count: *count,
						selected: selected.is_some_and(|set| set.contains(value)),
					})
					.collect();
				for value in selected.into_iter().flatten() {
					if !options.iter().any(|option| &option.value == value) {
						options.push(FacetOption {
							value: value.clone(),
							count: 0,
							selected: true,
						});
					}
				}
				options.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)));
				FilterGroup {
					spec: spec.clone(),
					options,
				}
			})
			.collect();
	}

	#[must_use]
	pub fn groups(&self) -> &[FilterGroup] {
		&self.groups
	}

	#[must_use]
	pub fn is_loading(&self) -> bool {
		self.loading
	}

	#[must_use]
	pub fn cursor(&self) -> usize {
		self.cursor
	}

	#[must_use]
	pub fn option_count(&self) -> usize {
		self.groups.iter().map(|group| group.options.len()).sum()
	}

	pub fn move_up(&mut self) {
		self.cursor = self.cursor.saturating_sub(1);
	}

	pub fn move_down(&mut self) {
		if self.cursor + 1 < self.option_count() {
			self.cursor += 1;
		}
	}

	/// Flip the option under the cursor.
	pub fn toggle(&mut self) {
		if let Some(option) = self.option_mut(self.cursor) {
			option.selected = !option.selected;
		}
	}

	/// Deselect everything.
	pub fn clear(&mut self) {
		for group in &mut self.groups {
			for option in &mut group.options {
				option.selected = false;
			}
		}
		self.pending.clear();
	}

	/// Current selection, including values kept aside while loading.
	#[must_use]
	pub fn selection(&self) -> Filters {
		if self.loading {
			return self.pending.clone();
		}
		let mut filters = Filters::new();
		for group in &self.groups {
			let values: BTreeSet<String> = group
				.options
				.iter()
				.filter(|option| option.selected)
				.map(|option| option.value.clone())
				.collect();
			if !values.is_empty() {
				filters.insert(group.spec.param.clone(), values);
			}
		}
		filters
	}

	fn option_mut(&mut self, mut index: usize) -> Option<&mut FacetOption> {
		for group in &mut self.groups {
			if index < group.options.len() {
				return group.options.get_mut(index);
			}
			index -= group.options.len();
		}
		None
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn distribution() -> FacetDistribution {
		let mut distribution = FacetDistribution::new();
		distribution.insert(
			"galaxy".into(),
			BTreeMap::from([("threat-actor".into(), 12), ("tool".into(), 40)]),
		);
		distribution.insert(
			"namespace".into(),
			BTreeMap::from([("tlp".into(), 3)]),
		);
		distribution
	}

	#[test]
	fn options_are_ordered_by_count() {
		let panel = FilterPanel::new(&FacetCatalog::default(), &distribution(), &Filters::new());
		let galaxy = &panel.groups()[1];
		assert_eq!(galaxy.spec.param, "galaxy");
		let values: Vec<_> = galaxy.options.iter().map(|o| o.value.as_str()).collect();
		assert_eq!(values, ["tool", "threat-actor"]);
		assert_eq!(panel.option_count(), 3);
	}

	#[test]
	fn toggling_walks_across_groups() {
		let mut panel = FilterPanel::new(&FacetCatalog::default(), &distribution(), &Filters::new());
		panel.move_down();
		panel.move_down();
		panel.toggle();
		let selection = panel.selection();
		assert_eq!(
			selection.get("galaxy"),
			Some(&BTreeSet::from(["threat-actor".to_string()]))
		);
		assert!(!selection.contains_key("taxonomies"));

		panel.move_down();
		assert_eq!(panel.cursor(), 2, "cursor stops at the last option");
	}

	#[test]
	fn selected_values_missing_from_counts_are_kept() {
		let selection = Filters::from([(
			"galaxy".to_string(),
			BTreeSet::from(["ransomware".to_string()]),
		)]);
		let panel = FilterPanel::new(&FacetCatalog::default(), &distribution(), &selection);
		let galaxy = &panel.groups()[1];
		let kept = galaxy
			.options
			.iter()
			.find(|option| option.value == "ransomware")
			.expect("kept option");
		assert!(kept.selected);
		assert_eq!(kept.count, 0);
		assert_eq!(panel.selection(), selection);
	}

	#[test]
	fn loading_panel_preserves_selection_until_populated() {
		let selection = Filters::from([("galaxy".to_string(), BTreeSet::from(["tool".to_string()]))]);
		let mut panel = FilterPanel::loading(&FacetCatalog::default(), &selection);
		assert!(panel.is_loading());
		assert_eq!(panel.selection(), selection);

		panel.populate(&FacetCatalog::default(), &distribution());
		assert!(!panel.is_loading());
		assert_eq!(panel.selection(), selection);

		panel.clear();
		assert!(panel.selection().is_empty());
	}
}
