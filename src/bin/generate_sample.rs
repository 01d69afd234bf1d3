use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, BooleanArray, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

use enem_dashboard::data::model::Attribute;

const DEFAULT_OUTPUT: &str = "data/processed/preprocessed_data.csv";
const STUDENTS: usize = 20_000;

/// Income brackets in R$, as the preprocessed dataset encodes them.
const INCOME_LEVELS: [f64; 8] = [0.0, 998.0, 1497.0, 1996.0, 2994.0, 4990.0, 9980.0, 19960.0];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next_f64() * n as f64) as usize % n
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// One output row; field names match the loader's column contract.
#[derive(Debug, Serialize)]
struct SampleRow {
    #[serde(rename = "ID")]
    id: String,
    #[serde(rename = "Natural Sciences")]
    natural_sciences: f64,
    #[serde(rename = "Human Sciences")]
    human_sciences: f64,
    #[serde(rename = "Language")]
    language: f64,
    #[serde(rename = "Mathematics")]
    mathematics: f64,
    #[serde(rename = "Sex")]
    sex: &'static str,
    #[serde(rename = "Family Income")]
    family_income: f64,
    #[serde(rename = "Internet Access")]
    internet_access: u8,
    #[serde(rename = "Number of Computers")]
    computers: u32,
}

fn generate(rng: &mut SimpleRng) -> Vec<SampleRow> {
    let score = |rng: &mut SimpleRng, mean: f64| (rng.gauss(mean, 75.0).clamp(0.0, 1000.0) * 10.0).round() / 10.0;

    (0..STUDENTS)
        .map(|i| {
            let bracket = rng.below(INCOME_LEVELS.len());
            let internet = rng.next_f64() < 0.35 + 0.08 * bracket as f64;
            let computers = if internet { rng.below(bracket / 2 + 2) as u32 } else { rng.below(2) as u32 };
            // better-off households score higher on average
            let lift = 12.0 * bracket as f64 + if internet { 15.0 } else { 0.0 } + 6.0 * f64::from(computers);

            SampleRow {
                id: (190_000_000_000u64 + i as u64).to_string(),
                natural_sciences: score(rng, 470.0 + lift),
                human_sciences: score(rng, 500.0 + lift),
                language: score(rng, 510.0 + lift),
                mathematics: score(rng, 520.0 + 1.3 * lift),
                sex: if rng.next_f64() < 0.59 { "F" } else { "M" },
                family_income: INCOME_LEVELS[bracket],
                internet_access: u8::from(internet),
                computers,
            }
        })
        .collect()
}

fn write_csv(path: &Path, rows: &[SampleRow]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV writer")?;
    for row in rows {
        writer.serialize(row).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn write_parquet(path: &Path, rows: &[SampleRow]) -> Result<()> {
    let field = |attr: Attribute, dtype: DataType| Field::new(attr.column_name(), dtype, false);
    let schema = Arc::new(Schema::new(vec![
        field(Attribute::Id, DataType::Utf8),
        field(Attribute::NaturalSciences, DataType::Float64),
        field(Attribute::HumanSciences, DataType::Float64),
        field(Attribute::Language, DataType::Float64),
        field(Attribute::Mathematics, DataType::Float64),
        field(Attribute::Gender, DataType::Utf8),
        field(Attribute::FamilyIncome, DataType::Float64),
        field(Attribute::InternetAccess, DataType::Boolean),
        field(Attribute::ComputerCount, DataType::Int64),
    ]));

    let floats = |f: fn(&SampleRow) -> f64| -> ArrayRef { Arc::new(rows.iter().map(|r| Some(f(r))).collect::<Float64Array>()) };
    let columns: Vec<ArrayRef> = vec![
        Arc::new(rows.iter().map(|r| Some(r.id.as_str())).collect::<StringArray>()),
        floats(|r| r.natural_sciences),
        floats(|r| r.human_sciences),
        floats(|r| r.language),
        floats(|r| r.mathematics),
        Arc::new(rows.iter().map(|r| Some(r.sex)).collect::<StringArray>()),
        floats(|r| r.family_income),
        Arc::new(rows.iter().map(|r| Some(r.internet_access == 1)).collect::<BooleanArray>()),
        Arc::new(rows.iter().map(|r| Some(i64::from(r.computers))).collect::<Int64Array>()),
    ];

    let batch = RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;
    let file = std::fs::File::create(path).context("creating output file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing record batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let output = std::env::args()
        .nth(1)
        .map_or_else(|| PathBuf::from(DEFAULT_OUTPUT), PathBuf::from);

    if let Some(dir) = output.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }

    let mut rng = SimpleRng::new(42);
    let rows = generate(&mut rng);

    let is_parquet = output
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("parquet") || e.eq_ignore_ascii_case("pq"));
    if is_parquet {
        write_parquet(&output, &rows)?;
    } else {
        write_csv(&output, &rows)?;
    }

    println!("Wrote {} students to {}", rows.len(), output.display());
    Ok(())
}
