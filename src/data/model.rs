use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use super::error::SchemaError;

/// Valid range of every knowledge-area score.
pub const SCORE_DOMAIN: (f64, f64) = (0.0, 1000.0);

// ---------------------------------------------------------------------------
// KnowledgeArea – the four scored subjects
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum KnowledgeArea {
    NaturalSciences,
    HumanSciences,
    Language,
    Mathematics,
}

impl KnowledgeArea {
    pub const ALL: [KnowledgeArea; 4] = [
        KnowledgeArea::NaturalSciences,
        KnowledgeArea::HumanSciences,
        KnowledgeArea::Language,
        KnowledgeArea::Mathematics,
    ];

    /// Human-readable label, identical to the source column header.
    pub fn label(self) -> &'static str {
        self.attribute().column_name()
    }

    pub fn attribute(self) -> Attribute {
        match self {
            KnowledgeArea::NaturalSciences => Attribute::NaturalSciences,
            KnowledgeArea::HumanSciences => Attribute::HumanSciences,
            KnowledgeArea::Language => Attribute::Language,
            KnowledgeArea::Mathematics => Attribute::Mathematics,
        }
    }

    /// Position inside per-area arrays.
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for KnowledgeArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Attribute – the enumerated schema
// ---------------------------------------------------------------------------

/// Every column of the exam table. Replaces lookups by column name at call
/// sites; names only appear at the file and UI boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Attribute {
    Id,
    NaturalSciences,
    HumanSciences,
    Language,
    Mathematics,
    Gender,
    FamilyIncome,
    InternetAccess,
    ComputerCount,
}

/// Broad kind of an attribute, which decides the predicates it accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    /// Free text compared by equality (identifier, gender).
    Categorical,
    /// Real number compared by range.
    Numeric,
    /// Two-valued flag compared by equality.
    Flag,
    /// Non-negative integer, accepts both equality and range.
    Count,
}

impl Attribute {
    pub const ALL: [Attribute; 9] = [
        Attribute::Id,
        Attribute::NaturalSciences,
        Attribute::HumanSciences,
        Attribute::Language,
        Attribute::Mathematics,
        Attribute::Gender,
        Attribute::FamilyIncome,
        Attribute::InternetAccess,
        Attribute::ComputerCount,
    ];

    /// Header of the column in the preprocessed dataset.
    pub fn column_name(self) -> &'static str {
        match self {
            Attribute::Id => "ID",
            Attribute::NaturalSciences => "Natural Sciences",
            Attribute::HumanSciences => "Human Sciences",
            Attribute::Language => "Language",
            Attribute::Mathematics => "Mathematics",
            Attribute::Gender => "Sex",
            Attribute::FamilyIncome => "Family Income",
            Attribute::InternetAccess => "Internet Access",
            Attribute::ComputerCount => "Number of Computers",
        }
    }

    pub fn from_column_name(name: &str) -> Option<Attribute> {
        Attribute::ALL
            .into_iter()
            .find(|attr| attr.column_name() == name)
    }

    pub fn kind(self) -> AttributeKind {
        match self {
            Attribute::Id | Attribute::Gender => AttributeKind::Categorical,
            Attribute::NaturalSciences
            | Attribute::HumanSciences
            | Attribute::Language
            | Attribute::Mathematics
            | Attribute::FamilyIncome => AttributeKind::Numeric,
            Attribute::InternetAccess => AttributeKind::Flag,
            Attribute::ComputerCount => AttributeKind::Count,
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

// ---------------------------------------------------------------------------
// FieldValue – a single typed cell
// ---------------------------------------------------------------------------

/// A typed cell value. Ordered so it can key `BTreeMap`s for group-by output.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Flag(bool),
    Count(u32),
}

impl Eq for FieldValue {}

impl PartialOrd for FieldValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FieldValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.as_field_ref().cmp(&other.as_field_ref())
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => write!(f, "{s}"),
            FieldValue::Number(v) => write!(f, "{v:.2}"),
            FieldValue::Flag(true) => write!(f, "Yes"),
            FieldValue::Flag(false) => write!(f, "No"),
            FieldValue::Count(n) => write!(f, "{n}"),
        }
    }
}

impl FieldValue {
    /// Numeric view used by range predicates.
    pub fn as_f64(&self) -> Option<f64> {
        self.as_field_ref().as_f64()
    }

    pub fn as_field_ref(&self) -> FieldRef<'_> {
        match self {
            FieldValue::Text(s) => FieldRef::Text(s),
            FieldValue::Number(v) => FieldRef::Number(*v),
            FieldValue::Flag(b) => FieldRef::Flag(*b),
            FieldValue::Count(n) => FieldRef::Count(*n),
        }
    }
}

/// Borrowed form of [`FieldValue`], read straight out of a record without
/// copying text. Orders exactly like the owned value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldRef<'a> {
    Text(&'a str),
    Number(f64),
    Flag(bool),
    Count(u32),
}

impl Eq for FieldRef<'_> {}

impl PartialOrd for FieldRef<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FieldRef<'_> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use FieldRef::*;
        fn discriminant(v: &FieldRef<'_>) -> u8 {
            match v {
                Flag(_) => 0,
                Count(_) => 1,
                Number(_) => 2,
                Text(_) => 3,
            }
        }
        match (self, other) {
            (Flag(a), Flag(b)) => a.cmp(b),
            (Count(a), Count(b)) => a.cmp(b),
            (Number(a), Number(b)) => a.total_cmp(b),
            (Text(a), Text(b)) => a.cmp(b),
            _ => discriminant(self).cmp(&discriminant(other)),
        }
    }
}

impl FieldRef<'_> {
    pub fn as_f64(self) -> Option<f64> {
        match self {
            FieldRef::Number(v) => Some(v),
            FieldRef::Count(n) => Some(f64::from(n)),
            _ => None,
        }
    }

    pub fn to_value(self) -> FieldValue {
        match self {
            FieldRef::Text(s) => FieldValue::Text(s.to_string()),
            FieldRef::Number(v) => FieldValue::Number(v),
            FieldRef::Flag(b) => FieldValue::Flag(b),
            FieldRef::Count(n) => FieldValue::Count(n),
        }
    }
}

// ---------------------------------------------------------------------------
// ExamRecord – one exam taker
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct ExamRecord {
    pub id: String,
    /// Scores indexed by [`KnowledgeArea::index`].
    pub scores: [f64; 4],
    pub gender: String,
    pub family_income: f64,
    pub internet_access: bool,
    pub computer_count: u32,
}

impl ExamRecord {
    pub fn score(&self, area: KnowledgeArea) -> f64 {
        self.scores[area.index()]
    }

    /// Overall score: plain mean of the four knowledge areas.
    pub fn average(&self) -> f64 {
        self.scores.iter().sum::<f64>() / self.scores.len() as f64
    }

    /// Read an attribute without copying, for predicate checks and grouping.
    pub fn field(&self, attribute: Attribute) -> FieldRef<'_> {
        match attribute {
            Attribute::Id => FieldRef::Text(&self.id),
            Attribute::NaturalSciences => FieldRef::Number(self.score(KnowledgeArea::NaturalSciences)),
            Attribute::HumanSciences => FieldRef::Number(self.score(KnowledgeArea::HumanSciences)),
            Attribute::Language => FieldRef::Number(self.score(KnowledgeArea::Language)),
            Attribute::Mathematics => FieldRef::Number(self.score(KnowledgeArea::Mathematics)),
            Attribute::Gender => FieldRef::Text(&self.gender),
            Attribute::FamilyIncome => FieldRef::Number(self.family_income),
            Attribute::InternetAccess => FieldRef::Flag(self.internet_access),
            Attribute::ComputerCount => FieldRef::Count(self.computer_count),
        }
    }

    /// Read an attribute as an owned typed value.
    pub fn value(&self, attribute: Attribute) -> FieldValue {
        self.field(attribute).to_value()
    }
}

// ---------------------------------------------------------------------------
// ExamTable – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The immutable table of exam records, with the value domains the filter
/// widgets need precomputed at construction.
#[derive(Debug, Clone)]
pub struct ExamTable {
    records: Vec<ExamRecord>,
    /// Sorted distinct genders.
    pub genders: BTreeSet<String>,
    /// Sorted distinct computer counts.
    pub computer_counts: BTreeSet<u32>,
    /// Distinct family-income levels, ascending.
    pub income_levels: Vec<f64>,
    /// Observed (min, max) family income.
    pub income_range: (f64, f64),
    /// Observed (min, max) per knowledge area.
    pub score_ranges: [(f64, f64); 4],
}

impl ExamTable {
    /// Validate the records and build the widget domains.
    ///
    /// Fails when `records` is empty or an identifier occurs twice.
    pub fn from_records(records: Vec<ExamRecord>) -> Result<Self, SchemaError> {
        if records.is_empty() {
            return Err(SchemaError::Empty);
        }

        let mut seen: BTreeMap<&str, usize> = BTreeMap::new();
        for (row, rec) in records.iter().enumerate() {
            if let Some(first) = seen.insert(rec.id.as_str(), row + 1) {
                return Err(SchemaError::DuplicateId {
                    id: rec.id.clone(),
                    first_row: first,
                    row: row + 1,
                });
            }
        }

        let mut genders = BTreeSet::new();
        let mut computer_counts = BTreeSet::new();
        let mut score_ranges = [(f64::INFINITY, f64::NEG_INFINITY); 4];

        for rec in &records {
            genders.insert(rec.gender.clone());
            computer_counts.insert(rec.computer_count);
            for (range, &score) in score_ranges.iter_mut().zip(rec.scores.iter()) {
                range.0 = range.0.min(score);
                range.1 = range.1.max(score);
            }
        }

        let mut income_levels: Vec<f64> = records.iter().map(|r| r.family_income).collect();
        income_levels.sort_by(f64::total_cmp);
        income_levels.dedup();
        let income_range = match (income_levels.first(), income_levels.last()) {
            (Some(&lo), Some(&hi)) => (lo, hi),
            _ => return Err(SchemaError::Empty),
        };

        Ok(ExamTable {
            records,
            genders,
            computer_counts,
            income_levels,
            income_range,
            score_ranges,
        })
    }

    pub fn records(&self) -> &[ExamRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Always false for a constructed table; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn score_range(&self, area: KnowledgeArea) -> (f64, f64) {
        self.score_ranges[area.index()]
    }
}
