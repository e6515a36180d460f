use std::fs::File;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

const CSV_PATH: &str = "sample_launches.csv";
const PARQUET_PATH: &str = "sample_launches.parquet";

const HEADERS: [&str; 6] = [
    "Flight Number",
    "Launch Site",
    "class",
    "Payload Mass (kg)",
    "Booster Version",
    "Booster Version Category",
];

const SITES: [&str; 4] = ["CCAFS LC-40", "VAFB SLC-4E", "KSC LC-39A", "CCAFS SLC-40"];

/// Booster categories in flight order: (name, payload ceiling kg, success rate).
const BOOSTERS: [(&str, f64, f64); 5] = [
    ("v1.0", 700.0, 0.2),
    ("v1.1", 4500.0, 0.35),
    ("FT", 9600.0, 0.75),
    ("B4", 7000.0, 0.6),
    ("B5", 9600.0, 0.9),
];

const FLIGHTS: usize = 56;

/// Deterministic splitmix64 stream; the same seed always yields the same file.
struct SimpleRng {
    state: u64,
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        SimpleRng { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform in `[0, 1)`.
    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Whole-kilogram payload up to `ceiling`.
    fn payload(&mut self, ceiling: f64) -> f64 {
        (self.next_f64() * ceiling).round()
    }

    /// 1 with probability `success_rate`, else 0.
    fn outcome(&mut self, success_rate: f64) -> i64 {
        i64::from(self.next_f64() < success_rate)
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }
}

struct Launch {
    flight_number: i64,
    site: String,
    class: i64,
    payload: f64,
    booster_version: String,
    booster_category: String,
}

fn generate(rng: &mut SimpleRng) -> Vec<Launch> {
    (0..FLIGHTS)
        .map(|i| {
            // Later flights fly newer boosters.
            let era = (i * BOOSTERS.len() / FLIGHTS).min(BOOSTERS.len() - 1);
            let (category, ceiling, success_rate) = BOOSTERS[era];
            let payload = rng.payload(ceiling);
            let class = rng.outcome(success_rate);
            Launch {
                flight_number: i as i64 + 1,
                site: rng.pick(&SITES).to_string(),
                class,
                payload,
                booster_version: format!("F9 {category} B{:04}", 1000 + i),
                booster_category: category.to_string(),
            }
        })
        .collect()
}

fn write_csv(launches: &[Launch]) -> Result<()> {
    let mut writer = csv::Writer::from_path(CSV_PATH).context("creating CSV file")?;
    writer.write_record(HEADERS).context("writing CSV header")?;
    for l in launches {
        writer
            .write_record([
                l.flight_number.to_string(),
                l.site.clone(),
                l.class.to_string(),
                l.payload.to_string(),
                l.booster_version.clone(),
                l.booster_category.clone(),
            ])
            .context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV file")?;
    Ok(())
}

fn write_parquet(launches: &[Launch]) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new(HEADERS[0], DataType::Int64, false),
        Field::new(HEADERS[1], DataType::Utf8, false),
        Field::new(HEADERS[2], DataType::Int64, false),
        Field::new(HEADERS[3], DataType::Float64, false),
        Field::new(HEADERS[4], DataType::Utf8, false),
        Field::new(HEADERS[5], DataType::Utf8, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from_iter_values(launches.iter().map(|l| l.flight_number))),
            Arc::new(StringArray::from_iter_values(launches.iter().map(|l| &l.site))),
            Arc::new(Int64Array::from_iter_values(launches.iter().map(|l| l.class))),
            Arc::new(Float64Array::from_iter_values(launches.iter().map(|l| l.payload))),
            Arc::new(StringArray::from_iter_values(launches.iter().map(|l| &l.booster_version))),
            Arc::new(StringArray::from_iter_values(launches.iter().map(|l| &l.booster_category))),
        ],
    )
    .context("building record batch")?;

    let file = File::create(PARQUET_PATH).context("creating Parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating Parquet writer")?;
    writer.write(&batch).context("writing Parquet batch")?;
    writer.close().context("closing Parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let launches = generate(&mut rng);

    write_csv(&launches)?;
    write_parquet(&launches)?;

    let successes = launches.iter().filter(|l| l.class == 1).count();
    println!(
        "Wrote {} launches ({successes} successful) to {CSV_PATH} and {PARQUET_PATH}",
        launches.len()
    );
    Ok(())
}
