use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Date32Array, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{Duration, NaiveDate};
use parquet::arrow::ArrowWriter;

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

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }

    fn jitter(&mut self, spread: f64) -> f64 {
        (self.next_f64() - 0.5) * 2.0 * spread
    }
}

/// (scientific name, common name)
const SPECIES: [(&str, &str); 6] = [
    ("Ursus americanus", "American Black Bear"),
    ("Lynx rufus", "Bobcat"),
    ("Canis latrans", "Coyote"),
    ("Phrynosoma cornutum", "Texas Horned Lizard"),
    ("Tympanuchus cupido attwateri", "Attwater's Prairie Chicken"),
    ("Eurycea nana", "San Marcos Salamander"),
];

/// (county, approximate centre latitude, longitude)
const COUNTIES: [(&str, f64, f64); 6] = [
    ("Brewster", 29.81, -103.25),
    ("Travis", 30.33, -97.78),
    ("Hays", 30.06, -98.03),
    ("Colorado", 29.62, -96.53),
    ("Kenedy", 26.93, -97.63),
    ("Jeff Davis", 30.71, -104.14),
];

const SRP_NUMBERS: [i64; 5] = [2019001, 2020017, 2021044, 2022008, 2023102];

const OBSERVERS: [&str; 4] = ["J. Alvarez", "K. Nguyen", "M. Okafor", "R. Smith"];

struct Row {
    srp_id: String,
    srp_num: i64,
    scientific_name: &'static str,
    common_name: &'static str,
    county: &'static str,
    date: NaiveDate,
    latitude: Option<f64>,
    longitude: Option<f64>,
    observer: &'static str,
    notes: String,
}

fn generate_rows(count: usize, rng: &mut SimpleRng) -> Vec<Row> {
    let first_day = NaiveDate::from_ymd_opt(2019, 1, 1).unwrap_or_default();
    let span_days = 5 * 365;

    (0..count)
        .map(|i| {
            let srp_num = *rng.pick(&SRP_NUMBERS);
            let (scientific_name, common_name) = *rng.pick(&SPECIES);
            let (county, lat, lon) = *rng.pick(&COUNTIES);
            let date = first_day + Duration::days((rng.next_u64() % span_days) as i64);

            // Every 25th record has no latitude, like transects entered without a start point.
            let latitude = (i % 25 != 24).then(|| lat + rng.jitter(0.25));
            let longitude = Some(lon + rng.jitter(0.25));

            let notes = match i % 7 {
                0 => "Tracks observed, no visual".to_string(),
                3 => format!("Camera trap {}, \"night\" capture", i / 7),
                5 => "Den site\nrevisit recommended".to_string(),
                _ => String::new(),
            };

            Row {
                srp_id: format!("SRP-{srp_num}-{:04}", i + 1),
                srp_num,
                scientific_name,
                common_name,
                county,
                date,
                latitude,
                longitude,
                observer: *rng.pick(&OBSERVERS),
                notes,
            }
        })
        .collect()
}

const HEADERS: [&str; 10] = [
    "SRP_ID",
    "SRP_Num",
    "Scientific_Name",
    "Common_Name",
    "County",
    "Observation_Date",
    "Latitude_or_transect_start_latitude",
    "Longitude_or_transect_start_longitude",
    "Observer",
    "Notes",
];

fn write_csv(path: &Path, rows: &[Row]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV file")?;
    writer.write_record(HEADERS)?;
    for row in rows {
        let coord = |v: Option<f64>| v.map(|v| format!("{v:.5}")).unwrap_or_default();
        writer.write_record([
            row.srp_id.clone(),
            row.srp_num.to_string(),
            row.scientific_name.to_string(),
            row.common_name.to_string(),
            row.county.to_string(),
            row.date.format("%Y-%m-%d").to_string(),
            coord(row.latitude),
            coord(row.longitude),
            row.observer.to_string(),
            row.notes.clone(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(path: &Path, rows: &[Row]) -> Result<()> {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default();
    let text = |f: fn(&Row) -> &str| StringArray::from(rows.iter().map(f).collect::<Vec<_>>());

    let schema = Arc::new(Schema::new(vec![
        Field::new(HEADERS[0], DataType::Utf8, false),
        Field::new(HEADERS[1], DataType::Int64, false),
        Field::new(HEADERS[2], DataType::Utf8, false),
        Field::new(HEADERS[3], DataType::Utf8, false),
        Field::new(HEADERS[4], DataType::Utf8, false),
        Field::new(HEADERS[5], DataType::Date32, false),
        Field::new(HEADERS[6], DataType::Float64, true),
        Field::new(HEADERS[7], DataType::Float64, true),
        Field::new(HEADERS[8], DataType::Utf8, false),
        Field::new(HEADERS[9], DataType::Utf8, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(text(|r| r.srp_id.as_str())),
            Arc::new(Int64Array::from(rows.iter().map(|r| r.srp_num).collect::<Vec<_>>())),
            Arc::new(text(|r| r.scientific_name)),
            Arc::new(text(|r| r.common_name)),
            Arc::new(text(|r| r.county)),
            Arc::new(Date32Array::from(
                rows.iter()
                    .map(|r| (r.date - epoch).num_days() as i32)
                    .collect::<Vec<_>>(),
            )),
            Arc::new(Float64Array::from(rows.iter().map(|r| r.latitude).collect::<Vec<_>>())),
            Arc::new(Float64Array::from(rows.iter().map(|r| r.longitude).collect::<Vec<_>>())),
            Arc::new(text(|r| r.observer)),
            Arc::new(text(|r| r.notes.as_str())),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let rows = generate_rows(400, &mut rng);

    let out_dir = Path::new("sample_data");
    std::fs::create_dir_all(out_dir).context("creating sample_data directory")?;

    let csv_path = out_dir.join("srp_survey.csv");
    write_csv(&csv_path, &rows)?;
    let parquet_path = out_dir.join("srp_survey.parquet");
    write_parquet(&parquet_path, &rows)?;

    println!(
        "Wrote {} survey records to {} and {}",
        rows.len(),
        csv_path.display(),
        parquet_path.display()
    );
    Ok(())
}
