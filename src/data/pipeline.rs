use super::aggregate::AggregateResult;
use super::error::FilterError;
use super::filter::{filtered_indices, FilterSpec};
use super::model::{ExamRecord, ExamTable, KnowledgeArea};

// ---------------------------------------------------------------------------
// Subset – an order-preserving view into the table
// ---------------------------------------------------------------------------

/// The records of a table that survived filtering, by index, in table order.
#[derive(Debug, Clone)]
pub struct Subset<'a> {
    table: &'a ExamTable,
    indices: Vec<usize>,
}

impl<'a> Subset<'a> {
    /// A view containing every record.
    pub fn all(table: &'a ExamTable) -> Self {
        Subset {
            table,
            indices: (0..table.len()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn records(&self) -> impl Iterator<Item = &'a ExamRecord> + '_ {
        let records = self.table.records();
        self.indices.iter().map(move |&i| &records[i])
    }

    /// One score column for `area`, in subset order.
    pub fn scores(&self, area: KnowledgeArea) -> Vec<f64> {
        self.records().map(|r| r.score(area)).collect()
    }

    /// Each record's overall score, in subset order.
    pub fn averages(&self) -> Vec<f64> {
        self.records().map(ExamRecord::average).collect()
    }

    /// Per-area statistics over this subset.
    pub fn aggregate(&self) -> AggregateResult {
        let columns = KnowledgeArea::ALL.map(|area| self.scores(area));
        AggregateResult::from_columns(&columns, &self.averages())
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Narrow `table` by `filters` and compute the chart aggregates.
///
/// Pure: the table is only read, and equal inputs give identical outputs.
/// An empty subset is not an error; its aggregates are `NoData`.
pub fn apply<'a>(
    table: &'a ExamTable,
    filters: &FilterSpec,
) -> Result<(Subset<'a>, AggregateResult), FilterError> {
    let indices = filtered_indices(table, filters)?;
    let subset = Subset { table, indices };
    let aggregates = subset.aggregate();

    if subset.is_empty() {
        log::warn!("No records match {} active filter(s)", filters.len());
    } else {
        log::debug!("{} of {} records match the active filters", subset.len(), table.len());
    }

    Ok((subset, aggregates))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::aggregate::Aggregate;
    use crate::data::filter::Predicate;
    use crate::data::model::fixtures::{four_record_table, record};
    use crate::data::model::{Attribute, FieldValue};
    use approx::assert_relative_eq;

    fn gender(g: &str) -> Predicate {
        Predicate::Equals(FieldValue::Text(g.to_string()))
    }

    fn ids(subset: &Subset<'_>) -> Vec<String> {
        subset.records().map(|r| r.id.clone()).collect()
    }

    fn varied_table() -> ExamTable {
        let records = (0..40)
            .map(|i| {
                let mut r = record(&format!("r{i}"), 300.0 + (i * 17 % 600) as f64, if i % 3 == 0 { "F" } else { "M" });
                r.scores[0] = 350.0 + (i * 29 % 500) as f64;
                r.family_income = 1000.0 * (i % 7) as f64;
                r.internet_access = i % 2 == 0;
                r.computer_count = (i % 4) as u32;
                r
            })
            .collect();
        ExamTable::from_records(records).unwrap()
    }

    #[test]
    fn gender_filter_scenario() {
        let table = four_record_table();
        let spec = FilterSpec::new().with(Attribute::Gender, gender("F"));
        let (subset, agg) = apply(&table, &spec).unwrap();

        assert_eq!(subset.len(), 2);
        assert_eq!(agg.count, 2);
        let math = agg.area(KnowledgeArea::Mathematics);
        assert_eq!(math.mean, Aggregate::Value(700.0));
        let q = math.quartiles.value().unwrap();
        assert_relative_eq!(q.q1, 650.0);
        assert_relative_eq!(q.median, 700.0);
        assert_relative_eq!(q.q3, 750.0);
    }

    #[test]
    fn unmatched_income_range_yields_sentinels() {
        let table = four_record_table();
        let spec = FilterSpec::new().with(Attribute::FamilyIncome, Predicate::between(10000.0, 20000.0));
        let (subset, agg) = apply(&table, &spec).unwrap();

        assert!(subset.is_empty());
        assert_eq!(agg.count, 0);
        assert!(agg.is_empty());
        assert!(agg.overall_mean.is_no_data());
        for area in &agg.areas {
            assert!(area.mean.is_no_data());
            assert!(area.histogram.is_no_data());
            assert!(area.quartiles.is_no_data());
        }
    }

    #[test]
    fn identity_filter_returns_whole_table() {
        let table = varied_table();
        let (subset, agg) = apply(&table, &FilterSpec::new()).unwrap();
        assert_eq!(subset.len(), table.len());
        assert_eq!(subset.indices(), Subset::all(&table).indices());
        assert_eq!(agg, Subset::all(&table).aggregate());
        let hist = agg.area(KnowledgeArea::Mathematics).histogram.value().unwrap();
        assert_eq!(hist.total(), table.len());
    }

    #[test]
    fn subset_members_satisfy_every_predicate() {
        let table = varied_table();
        let spec = FilterSpec::new()
            .with(Attribute::Gender, gender("M"))
            .with(Attribute::InternetAccess, Predicate::Equals(FieldValue::Flag(true)))
            .with(Attribute::NaturalSciences, Predicate::at_least(500.0));
        let (subset, _) = apply(&table, &spec).unwrap();

        assert!(!subset.is_empty());
        let all_ids = ids(&Subset::all(&table));
        for rec in subset.records() {
            assert!(all_ids.contains(&rec.id));
            assert_eq!(rec.gender, "M");
            assert!(rec.internet_access);
            assert!(rec.score(KnowledgeArea::NaturalSciences) >= 500.0);
        }
        // relative order preserved
        assert!(subset.indices().windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn reapplying_is_bitwise_identical() {
        let table = varied_table();
        let spec = FilterSpec::new().with(Attribute::ComputerCount, Predicate::between(1.0, 2.0));
        let (a, agg_a) = apply(&table, &spec).unwrap();
        let (b, agg_b) = apply(&table, &spec).unwrap();

        assert_eq!(a.indices(), b.indices());
        assert_eq!(agg_a, agg_b);
        for (x, y) in agg_a.areas.iter().zip(agg_b.areas.iter()) {
            let (mx, my) = (x.mean.value().unwrap(), y.mean.value().unwrap());
            assert_eq!(mx.to_bits(), my.to_bits());
        }
    }

    #[test]
    fn adding_predicates_never_grows_subset() {
        let table = varied_table();
        let steps = [
            (Attribute::InternetAccess, Predicate::Equals(FieldValue::Flag(false))),
            (Attribute::FamilyIncome, Predicate::between(1000.0, 5000.0)),
            (Attribute::Mathematics, Predicate::at_least(450.0)),
            (Attribute::Gender, gender("F")),
        ];

        let mut spec = FilterSpec::new();
        let mut previous = table.len();
        for (attr, pred) in steps {
            spec.insert(attr, pred);
            let (subset, _) = apply(&table, &spec).unwrap();
            assert!(subset.len() <= previous);
            previous = subset.len();
        }
    }

    #[test]
    fn quartiles_are_ordered_for_every_area() {
        let table = varied_table();
        for g in ["F", "M"] {
            let spec = FilterSpec::new().with(Attribute::Gender, gender(g));
            let (_, agg) = apply(&table, &spec).unwrap();
            for area in &agg.areas {
                let q = area.quartiles.value().unwrap();
                assert!(q.lower_whisker <= q.q1);
                assert!(q.q1 <= q.median && q.median <= q.q3);
                assert!(q.q3 <= q.upper_whisker);
            }
        }
    }

    #[test]
    fn invalid_filter_is_an_error_not_match_all() {
        let table = four_record_table();
        let spec = FilterSpec::new().with(Attribute::Mathematics, Predicate::between(900.0, 100.0));
        assert!(apply(&table, &spec).is_err());
    }
}
