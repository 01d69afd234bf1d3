//! Group-by summaries of the overall score, used by the socioeconomic,
//! demographic and technology sections of the dashboard.

use std::collections::BTreeMap;

use super::aggregate::{mean, Aggregate, Histogram, Quartiles};
use super::model::{Attribute, FieldRef, FieldValue, SCORE_DOMAIN};
use super::pipeline::Subset;

/// Buckets for the internet-access histograms of the overall score.
pub const OVERALL_BINS: usize = 50;

/// Score bins of the income crosstab (over the observed overall range).
pub const CROSSTAB_BINS: usize = 8;

// ---------------------------------------------------------------------------
// Group summaries
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct GroupSummary {
    pub key: FieldValue,
    pub count: usize,
    pub mean: f64,
    pub quartiles: Quartiles,
}

/// Summarise the overall score per distinct value of `attribute`, sorted by
/// key. Groups only exist for values present in the subset, so every group is
/// non-empty.
pub fn group_by(subset: &Subset<'_>, attribute: Attribute) -> Vec<GroupSummary> {
    let mut groups: BTreeMap<FieldRef<'_>, Vec<f64>> = BTreeMap::new();
    for rec in subset.records() {
        groups
            .entry(rec.field(attribute))
            .or_default()
            .push(rec.average());
    }

    groups
        .into_iter()
        .filter_map(|(key, values)| {
            Some(GroupSummary {
                count: values.len(),
                mean: mean(&values)?,
                quartiles: Quartiles::from_values(&values)?,
                key: key.to_value(),
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Crosstab: income level × overall-score bin
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Crosstab {
    /// `(lower, upper)` edges of each score bin.
    pub bin_edges: Vec<(f64, f64)>,
    /// Income levels, ascending.
    pub rows: Vec<f64>,
    /// `shares[row][bin]`: proportion of that income level falling in `bin`.
    /// Each row sums to 1.
    pub shares: Vec<Vec<f64>>,
}

impl Crosstab {
    /// Interval label of score bin `i`. Bins are left-closed like
    /// [`Histogram::over`]; the last one also includes its upper edge.
    pub fn bin_label(&self, i: usize) -> String {
        let (lo, hi) = self.bin_edges[i];
        let close = if i + 1 == self.bin_edges.len() { ']' } else { ')' };
        format!("[{lo:.0}, {hi:.0}{close}")
    }
}

/// Distribution of overall-score bins within each income level.
///
/// Bins span the observed overall-score range of the subset. A subset whose
/// records all share one score gets a single-width range around that score.
pub fn income_score_crosstab(subset: &Subset<'_>, bins: usize) -> Aggregate<Crosstab> {
    let averages = subset.averages();
    let (Some(lo), Some(hi)) = (
        averages.iter().copied().reduce(f64::min),
        averages.iter().copied().reduce(f64::max),
    ) else {
        return Aggregate::NoData;
    };
    let (lo, hi) = if hi > lo { (lo, hi) } else { (lo - 0.5, hi + 0.5) };

    let mut by_income: BTreeMap<FieldValue, Vec<f64>> = BTreeMap::new();
    for (rec, avg) in subset.records().zip(averages.iter()) {
        by_income
            .entry(FieldValue::Number(rec.family_income))
            .or_default()
            .push(*avg);
    }

    let mut rows = Vec::with_capacity(by_income.len());
    let mut shares = Vec::with_capacity(by_income.len());
    for (income, values) in by_income {
        let Some(hist) = Histogram::over(&values, (lo, hi), bins) else {
            continue;
        };
        let total = hist.total() as f64;
        rows.push(income.as_f64().unwrap_or_default());
        shares.push(hist.counts.iter().map(|&c| c as f64 / total).collect());
    }

    let width = (hi - lo) / bins as f64;
    let bin_edges = (0..bins)
        .map(|i| (lo + i as f64 * width, lo + (i + 1) as f64 * width))
        .collect();

    Aggregate::Value(Crosstab {
        bin_edges,
        rows,
        shares,
    })
}

// ---------------------------------------------------------------------------
// Technology access
// ---------------------------------------------------------------------------

/// Overall-score histograms split by internet access (`false` first).
pub fn internet_histograms(subset: &Subset<'_>) -> Vec<(bool, Histogram)> {
    let mut split: BTreeMap<bool, Vec<f64>> = BTreeMap::new();
    for rec in subset.records() {
        split.entry(rec.internet_access).or_default().push(rec.average());
    }
    split
        .into_iter()
        .filter_map(|(flag, values)| Histogram::over(&values, SCORE_DOMAIN, OVERALL_BINS).map(|h| (flag, h)))
        .collect()
}

/// Mean overall score per computer count, separately for each internet flag.
pub fn mean_by_computers(subset: &Subset<'_>) -> BTreeMap<bool, Vec<(u32, f64)>> {
    let mut cells: BTreeMap<(bool, u32), Vec<f64>> = BTreeMap::new();
    for rec in subset.records() {
        cells
            .entry((rec.internet_access, rec.computer_count))
            .or_default()
            .push(rec.average());
    }

    let mut lines: BTreeMap<bool, Vec<(u32, f64)>> = BTreeMap::new();
    for ((flag, computers), values) in cells {
        if let Some(m) = mean(&values) {
            lines.entry(flag).or_default().push((computers, m));
        }
    }
    lines
}

// ---------------------------------------------------------------------------
// Breakdowns – everything beyond the knowledge-area charts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Breakdowns {
    pub by_gender: Vec<GroupSummary>,
    pub by_income: Vec<GroupSummary>,
    pub by_internet: Vec<GroupSummary>,
    pub by_computers: Vec<GroupSummary>,
    pub crosstab: Aggregate<Crosstab>,
    pub internet_histograms: Vec<(bool, Histogram)>,
    pub computers_lines: BTreeMap<bool, Vec<(u32, f64)>>,
}

impl Breakdowns {
    pub fn compute(subset: &Subset<'_>) -> Self {
        Breakdowns {
            by_gender: group_by(subset, Attribute::Gender),
            by_income: group_by(subset, Attribute::FamilyIncome),
            by_internet: group_by(subset, Attribute::InternetAccess),
            by_computers: group_by(subset, Attribute::ComputerCount),
            crosstab: income_score_crosstab(subset, CROSSTAB_BINS),
            internet_histograms: internet_histograms(subset),
            computers_lines: mean_by_computers(subset),
        }
    }
}
