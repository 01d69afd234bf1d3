use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::data::aggregate::AggregateResult;
use crate::data::breakdown::Breakdowns;
use crate::data::error::FilterError;
use crate::data::filter::{FilterSpec, Predicate};
use crate::data::loader::load_file;
use crate::data::model::{Attribute, ExamRecord, ExamTable, FieldValue, KnowledgeArea};
use crate::data::pipeline::apply;

/// Rows shown in the subset preview table.
pub const PREVIEW_ROWS: usize = 200;

// ---------------------------------------------------------------------------
// Filter selections – the sidebar widget state
// ---------------------------------------------------------------------------

/// Raw widget values. `None` means "All".
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSelections {
    pub knowledge_area: Option<KnowledgeArea>,
    /// Minimum score for `knowledge_area`; ignored when no area is chosen.
    pub min_score: f64,
    pub gender: Option<String>,
    /// Inclusive `(lower, upper)` family income.
    pub income: (f64, f64),
    pub internet_access: Option<bool>,
    pub computer_count: Option<u32>,
}

impl FilterSelections {
    /// Everything selected: the identity filter for `table`.
    pub fn for_table(table: &ExamTable) -> Self {
        FilterSelections {
            knowledge_area: None,
            min_score: 0.0,
            gender: None,
            income: table.income_range,
            internet_access: None,
            computer_count: None,
        }
    }

    /// Translate widget values into predicates. "All" adds no predicate; the
    /// income range is always present.
    pub fn to_filter_spec(&self) -> FilterSpec {
        let mut spec = FilterSpec::new();
        if let Some(area) = self.knowledge_area {
            spec.insert(area.attribute(), Predicate::at_least(self.min_score));
        }
        if let Some(gender) = &self.gender {
            spec.insert(Attribute::Gender, Predicate::Equals(FieldValue::Text(gender.clone())));
        }
        spec.insert(Attribute::FamilyIncome, Predicate::between(self.income.0, self.income.1));
        if let Some(flag) = self.internet_access {
            spec.insert(Attribute::InternetAccess, Predicate::Equals(FieldValue::Flag(flag)));
        }
        if let Some(n) = self.computer_count {
            spec.insert(Attribute::ComputerCount, Predicate::Equals(FieldValue::Count(n)));
        }
        spec
    }
}

// ---------------------------------------------------------------------------
// Dashboard view – render-ready output of one interaction
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct DashboardView {
    pub aggregates: AggregateResult,
    pub breakdowns: Breakdowns,
    /// First [`PREVIEW_ROWS`] records of the subset.
    pub preview: Vec<ExamRecord>,
}

/// Handle one interaction: filter, aggregate, summarise.
pub fn build_view(table: &ExamTable, selections: &FilterSelections) -> Result<DashboardView, FilterError> {
    let (subset, aggregates) = apply(table, &selections.to_filter_spec())?;
    Ok(DashboardView {
        breakdowns: Breakdowns::compute(&subset),
        preview: subset.records().take(PREVIEW_ROWS).cloned().collect(),
        aggregates,
    })
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DistributionTab {
    #[default]
    Histograms,
    Boxplots,
}

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset. Replaced wholesale, never mutated.
    pub table: ExamTable,

    /// Where `table` came from.
    pub source: PathBuf,

    /// Current widget values.
    pub selections: FilterSelections,

    /// Selections the current `view` was computed from.
    applied: Option<FilterSelections>,

    /// Output of the last successful interaction.
    pub view: Option<DashboardView>,

    pub distribution_tab: DistributionTab,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(table: ExamTable, source: PathBuf) -> Self {
        let selections = FilterSelections::for_table(&table);
        let mut state = AppState {
            table,
            source,
            selections,
            applied: None,
            view: None,
            distribution_tab: DistributionTab::default(),
            status_message: None,
        };
        state.refresh();
        state
    }

    /// Load a table from `path`. Used once at startup.
    pub fn load(path: &Path) -> Result<Self> {
        let table = load_file(path).with_context(|| format!("loading dataset {}", path.display()))?;
        Ok(Self::new(table, path.to_path_buf()))
    }

    /// Swap in a different dataset; on failure the current one is kept.
    pub fn open(&mut self, path: &Path) {
        match load_file(path) {
            Ok(table) => {
                *self = Self::new(table, path.to_path_buf());
            }
            Err(e) => {
                log::error!("Failed to load file: {e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Recompute the view if the selections changed since the last run.
    pub fn refresh(&mut self) {
        if self.applied.as_ref() == Some(&self.selections) {
            return;
        }
        self.applied = Some(self.selections.clone());

        match build_view(&self.table, &self.selections) {
            Ok(view) => {
                log::debug!("Recomputed dashboard for {} records", view.aggregates.count);
                self.view = Some(view);
                self.status_message = None;
            }
            Err(e) => {
                log::error!("Invalid filter: {e}");
                self.view = None;
                self.status_message = Some(format!("Invalid filter: {e}"));
            }
        }
    }

    /// Number of records matching the current selections.
    pub fn filtered_count(&self) -> usize {
        self.view.as_ref().map_or(0, |v| v.aggregates.count)
    }
}
