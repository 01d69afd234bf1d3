use std::collections::BTreeMap;

use super::error::FilterError;
use super::model::{Attribute, AttributeKind, ExamRecord, ExamTable, FieldRef, FieldValue};

// ---------------------------------------------------------------------------
// Predicate: accepted values for one attribute
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Exact match (categorical attributes, flags and counts).
    Equals(FieldValue),
    /// Inclusive numeric range. Either bound may be infinite.
    Range { lower: f64, upper: f64 },
}

impl Predicate {
    pub fn between(lower: f64, upper: f64) -> Self {
        Predicate::Range { lower, upper }
    }

    /// `value >= lower`, the "minimum score" slider.
    pub fn at_least(lower: f64) -> Self {
        Predicate::Range {
            lower,
            upper: f64::INFINITY,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Predicate::Equals(_) => "exact-match",
            Predicate::Range { .. } => "range",
        }
    }

    /// Check the predicate makes sense for `attribute`.
    fn validate(&self, attribute: Attribute) -> Result<(), FilterError> {
        let mismatch = || FilterError::PredicateMismatch {
            attribute,
            predicate: self.name(),
        };

        match (self, attribute.kind()) {
            (Predicate::Range { lower, upper }, AttributeKind::Numeric | AttributeKind::Count) => {
                if lower.is_nan() || upper.is_nan() {
                    return Err(FilterError::NonFiniteBound(attribute));
                }
                if lower > upper {
                    return Err(FilterError::InvertedRange {
                        attribute,
                        lower: *lower,
                        upper: *upper,
                    });
                }
                Ok(())
            }
            (Predicate::Equals(FieldValue::Text(_)), AttributeKind::Categorical)
            | (Predicate::Equals(FieldValue::Flag(_)), AttributeKind::Flag)
            | (Predicate::Equals(FieldValue::Count(_)), AttributeKind::Count) => Ok(()),
            _ => Err(mismatch()),
        }
    }

    fn matches(&self, value: FieldRef<'_>) -> bool {
        match self {
            Predicate::Equals(expected) => expected.as_field_ref() == value,
            Predicate::Range { lower, upper } => value
                .as_f64()
                .is_some_and(|v| *lower <= v && v <= *upper),
        }
    }
}

// ---------------------------------------------------------------------------
// FilterSpec: the AND of all active predicates
// ---------------------------------------------------------------------------

/// Active predicates keyed by attribute. An empty spec matches everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSpec {
    predicates: BTreeMap<Attribute, Predicate>,
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a predicate, replacing any previous one on the same attribute.
    pub fn insert(&mut self, attribute: Attribute, predicate: Predicate) {
        self.predicates.insert(attribute, predicate);
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, attribute: Attribute, predicate: Predicate) -> Self {
        self.insert(attribute, predicate);
        self
    }

    /// Add a predicate addressed by column header, as the UI boundary does.
    pub fn insert_named(&mut self, column: &str, predicate: Predicate) -> Result<(), FilterError> {
        let attribute = Attribute::from_column_name(column)
            .ok_or_else(|| FilterError::UnknownAttribute(column.to_string()))?;
        self.insert(attribute, predicate);
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Attribute, &Predicate)> {
        self.predicates.iter()
    }

    /// Validate every predicate before any record is visited.
    pub fn validate(&self) -> Result<(), FilterError> {
        self.predicates
            .iter()
            .try_for_each(|(attr, pred)| pred.validate(*attr))
    }

    /// Whether `record` satisfies every predicate. Assumes `validate` passed.
    pub fn matches(&self, record: &ExamRecord) -> bool {
        self.predicates
            .iter()
            .all(|(attr, pred)| pred.matches(record.field(*attr)))
    }
}

/// Return indices of records that pass all predicates, in table order.
pub fn filtered_indices(table: &ExamTable, filters: &FilterSpec) -> Result<Vec<usize>, FilterError> {
    filters.validate()?;
    Ok(table
        .records()
        .iter()
        .enumerate()
        .filter(|(_, rec)| filters.matches(rec))
        .map(|(i, _)| i)
        .collect())
}
