use super::model::{KnowledgeArea, SCORE_DOMAIN};

/// Equal-width buckets per knowledge-area histogram (width 25 over 0..=1000).
pub const SCORE_BINS: usize = 40;

// ---------------------------------------------------------------------------
// Aggregate – value or explicit "no data"
// ---------------------------------------------------------------------------

/// A statistic that may be undefined because its input was empty.
///
/// Renderers match on `NoData` and draw an empty chart; a `NaN` never reaches
/// them.
#[derive(Debug, Clone, PartialEq)]
pub enum Aggregate<T> {
    Value(T),
    NoData,
}

impl<T> Aggregate<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            Aggregate::Value(v) => Some(v),
            Aggregate::NoData => None,
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, Aggregate::NoData)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Aggregate<U> {
        match self {
            Aggregate::Value(v) => Aggregate::Value(f(v)),
            Aggregate::NoData => Aggregate::NoData,
        }
    }
}

impl<T> From<Option<T>> for Aggregate<T> {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Aggregate::NoData, Aggregate::Value)
    }
}

// ---------------------------------------------------------------------------
// Primitive statistics
// ---------------------------------------------------------------------------

/// Arithmetic mean, summed in input order so repeated calls are bit-identical.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Percentile `p` in `[0, 1]` of an ascending slice, by linear interpolation
/// between closest ranks (inclusive method, `h = (n - 1) p`).
pub fn quantile_sorted(sorted: &[f64], p: f64) -> Option<f64> {
    let n = sorted.len();
    if n == 0 {
        return None;
    }
    let h = (n - 1) as f64 * p.clamp(0.0, 1.0);
    let lo = h.floor() as usize;
    let hi = (lo + 1).min(n - 1);
    Some(sorted[lo] + (h - lo as f64) * (sorted[hi] - sorted[lo]))
}

fn sorted_copy(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

// ---------------------------------------------------------------------------
// Quartiles – box-plot geometry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quartiles {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    /// Smallest observation within `q1 - 1.5 IQR`, never above `q1`.
    pub lower_whisker: f64,
    /// Largest observation within `q3 + 1.5 IQR`, never below `q3`.
    pub upper_whisker: f64,
}

impl Quartiles {
    pub fn from_values(values: &[f64]) -> Option<Self> {
        Self::from_sorted(&sorted_copy(values))
    }

    pub fn from_sorted(sorted: &[f64]) -> Option<Self> {
        let q1 = quantile_sorted(sorted, 0.25)?;
        let median = quantile_sorted(sorted, 0.5)?;
        let q3 = quantile_sorted(sorted, 0.75)?;
        let fence = 1.5 * (q3 - q1);

        let lower_whisker = sorted
            .iter()
            .copied()
            .find(|&v| v >= q1 - fence)
            .map_or(q1, |v| v.min(q1));
        let upper_whisker = sorted
            .iter()
            .rev()
            .copied()
            .find(|&v| v <= q3 + fence)
            .map_or(q3, |v| v.max(q3));

        Some(Quartiles {
            q1,
            median,
            q3,
            lower_whisker,
            upper_whisker,
        })
    }

    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }
}

// ---------------------------------------------------------------------------
// Histogram – fixed-domain equal-width buckets
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// Lower edge of the first bucket.
    pub start: f64,
    /// Upper edge of the last bucket.
    pub end: f64,
    /// One count per bucket.
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Bucket `values` over `[start, end]`. Buckets are left-closed, the last
    /// one is closed on both sides; values outside the domain are clamped into
    /// the outermost buckets.
    ///
    /// Returns `None` for empty input or a degenerate domain.
    pub fn over(values: &[f64], (start, end): (f64, f64), bins: usize) -> Option<Self> {
        if values.is_empty() || bins == 0 || !(end > start) {
            return None;
        }
        let width = (end - start) / bins as f64;
        let mut counts = vec![0usize; bins];
        for &v in values {
            let idx = ((v - start) / width).floor();
            let idx = if idx.is_nan() || idx < 0.0 {
                0
            } else {
                (idx as usize).min(bins - 1)
            };
            counts[idx] += 1;
        }
        Some(Histogram { start, end, counts })
    }

    pub fn bin_width(&self) -> f64 {
        (self.end - self.start) / self.counts.len() as f64
    }

    /// Centre of bucket `i`, for bar placement.
    pub fn bin_center(&self, i: usize) -> f64 {
        self.start + (i as f64 + 0.5) * self.bin_width()
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

// ---------------------------------------------------------------------------
// Per-area and whole-subset results
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct AreaAggregate {
    pub area: KnowledgeArea,
    pub mean: Aggregate<f64>,
    pub histogram: Aggregate<Histogram>,
    pub quartiles: Aggregate<Quartiles>,
}

impl AreaAggregate {
    pub fn compute(area: KnowledgeArea, values: &[f64]) -> Self {
        AreaAggregate {
            area,
            mean: mean(values).into(),
            histogram: Histogram::over(values, SCORE_DOMAIN, SCORE_BINS).into(),
            quartiles: Quartiles::from_values(values).into(),
        }
    }
}

/// Everything the knowledge-area charts need for one filtered subset.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateResult {
    pub count: usize,
    /// Mean of each record's overall (four-area) score.
    pub overall_mean: Aggregate<f64>,
    /// Indexed by [`KnowledgeArea::index`].
    pub areas: [AreaAggregate; 4],
}

impl AggregateResult {
    /// Compute all statistics from per-area score columns.
    pub fn from_columns(columns: &[Vec<f64>; 4], overall: &[f64]) -> Self {
        let areas = KnowledgeArea::ALL.map(|area| AreaAggregate::compute(area, &columns[area.index()]));
        AggregateResult {
            count: overall.len(),
            overall_mean: mean(overall).into(),
            areas,
        }
    }

    pub fn area(&self, area: KnowledgeArea) -> &AreaAggregate {
        &self.areas[area.index()]
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Area means in ascending order, for the horizontal bar chart.
    pub fn means_ascending(&self) -> Vec<(KnowledgeArea, f64)> {
        let mut means: Vec<(KnowledgeArea, f64)> = self
            .areas
            .iter()
            .filter_map(|a| a.mean.value().map(|m| (a.area, *m)))
            .collect();
        means.sort_by(|a, b| a.1.total_cmp(&b.1));
        means
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn quantiles_interpolate_linearly() {
        let q = Quartiles::from_values(&[800.0, 600.0]).unwrap();
        assert_relative_eq!(q.q1, 650.0);
        assert_relative_eq!(q.median, 700.0);
        assert_relative_eq!(q.q3, 750.0);

        let sorted = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(quantile_sorted(&sorted, 0.25), Some(2.0));
        assert_eq!(quantile_sorted(&sorted, 0.0), Some(1.0));
        assert_eq!(quantile_sorted(&sorted, 1.0), Some(5.0));
        assert_relative_eq!(quantile_sorted(&[10.0, 20.0, 30.0, 40.0], 0.5).unwrap(), 25.0);
    }

    #[test]
    fn single_value_collapses_box() {
        let q = Quartiles::from_values(&[512.5]).unwrap();
        assert_eq!((q.q1, q.median, q.q3), (512.5, 512.5, 512.5));
        assert_eq!((q.lower_whisker, q.upper_whisker), (512.5, 512.5));
    }

    #[test]
    fn whiskers_stop_at_outlier_fence() {
        let values = [400.0, 410.0, 420.0, 430.0, 440.0, 990.0];
        let q = Quartiles::from_values(&values).unwrap();
        assert!(q.upper_whisker < 990.0);
        assert_eq!(q.lower_whisker, 400.0);
        assert!(q.q1 <= q.median && q.median <= q.q3);
    }

    #[test]
    fn whiskers_never_cross_the_box() {
        let q = Quartiles::from_values(&[0.0, 100.0, 100.0, 100.0]).unwrap();
        assert_relative_eq!(q.q1, 75.0);
        assert!(q.lower_whisker <= q.q1);
        assert!(q.q3 <= q.upper_whisker);
    }

    #[test]
    fn histogram_uses_fixed_domain() {
        let h = Histogram::over(&[0.0, 24.9, 25.0, 999.0, 1000.0], SCORE_DOMAIN, SCORE_BINS).unwrap();
        assert_eq!(h.counts.len(), SCORE_BINS);
        assert_eq!(h.counts[0], 2);
        assert_eq!(h.counts[1], 1);
        assert_eq!(h.counts[SCORE_BINS - 1], 2);
        assert_eq!(h.total(), 5);
        assert_relative_eq!(h.bin_width(), 25.0);
        assert_relative_eq!(h.bin_center(0), 12.5);
    }

    #[test]
    fn empty_input_yields_no_data() {
        let agg = AreaAggregate::compute(KnowledgeArea::Language, &[]);
        assert!(agg.mean.is_no_data());
        assert!(agg.histogram.is_no_data());
        assert!(agg.quartiles.is_no_data());
        assert_eq!(mean(&[]), None);
        assert_eq!(Histogram::over(&[1.0], (5.0, 5.0), 10), None);
    }

    #[test]
    fn means_sorted_ascending() {
        let columns = [vec![500.0], vec![400.0], vec![700.0], vec![600.0]];
        let result = AggregateResult::from_columns(&columns, &[550.0]);
        let order: Vec<_> = result.means_ascending().into_iter().map(|(a, _)| a).collect();
        assert_eq!(
            order,
            vec![
                KnowledgeArea::HumanSciences,
                KnowledgeArea::NaturalSciences,
                KnowledgeArea::Mathematics,
                KnowledgeArea::Language,
            ]
        );
        assert_eq!(result.overall_mean, Aggregate::Value(550.0));
    }
}
