use std::collections::HashSet;
use std::fmt;

use chrono::NaiveDate;

use super::columns::ColumnMapping;

// ---------------------------------------------------------------------------
// FieldValue – a single cell of the survey spreadsheet
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring common spreadsheet dtypes.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Date(NaiveDate),
    Null,
}

/// Display form used by the table view. Null renders as an empty cell.
impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::String(s) => write!(f, "{s}"),
            FieldValue::Integer(i) => write!(f, "{i}"),
            FieldValue::Float(v) => write!(f, "{v}"),
            FieldValue::Bool(b) => write!(f, "{b}"),
            FieldValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            FieldValue::Null => Ok(()),
        }
    }
}

impl FieldValue {
    /// Interpret the cell as a finite number. Numeric text is accepted.
    pub fn as_f64(&self) -> Option<f64> {
        let v = match self {
            FieldValue::Float(v) => *v,
            FieldValue::Integer(i) => *i as f64,
            FieldValue::String(s) => s.trim().parse::<f64>().ok()?,
            _ => return None,
        };
        v.is_finite().then_some(v)
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            FieldValue::Date(d) => Some(*d),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// ObservationRecord – one row of the survey
// ---------------------------------------------------------------------------

/// A single survey observation. The modelled fields are extracted once at
/// load time; `fields` keeps every source cell in source column order.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationRecord {
    pub srp_number: String,
    pub scientific_name: String,
    pub common_name: String,
    pub county: String,
    pub srp_id: String,
    /// Absent when the cell is empty or not a calendar date.
    pub observation_date: Option<NaiveDate>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub fields: Vec<FieldValue>,
}

impl ObservationRecord {
    /// Build a record from a row of cells laid out as `columns`.
    pub fn from_fields(columns: &[String], mapping: &ColumnMapping, fields: Vec<FieldValue>) -> Self {
        let cell = |name: &String| lookup(columns, &fields, name);
        let text = |name: &String| cell(name).map(|v| v.to_string()).unwrap_or_default();

        let srp_number = text(&mapping.srp_number);
        let scientific_name = text(&mapping.scientific_name);
        let common_name = text(&mapping.common_name);
        let county = text(&mapping.county);
        let srp_id = text(&mapping.srp_id);
        let observation_date = cell(&mapping.observation_date).and_then(FieldValue::as_date);
        let latitude = cell(&mapping.latitude).and_then(FieldValue::as_f64);
        let longitude = cell(&mapping.longitude).and_then(FieldValue::as_f64);

        Self {
            srp_number,
            scientific_name,
            common_name,
            county,
            srp_id,
            observation_date,
            latitude,
            longitude,
            fields,
        }
    }

    /// Latitude/longitude pair, when both are present and numeric.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        Some((self.latitude?, self.longitude?))
    }
}

// ---------------------------------------------------------------------------
// RecordStore – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The read-only survey dataset plus the facts derived from it at load time.
#[derive(Debug, Clone)]
pub struct RecordStore {
    /// Source column names, in file order.
    pub columns: Vec<String>,
    /// All records, in file row order.
    pub records: Vec<ObservationRecord>,
    /// Distinct non-empty SRP numbers in first-occurrence order.
    pub srp_numbers: Vec<String>,
    /// Distinct non-empty scientific names in first-occurrence order.
    pub scientific_names: Vec<String>,
    /// Earliest and latest observation date present, if any.
    pub date_bounds: Option<(NaiveDate, NaiveDate)>,
}

impl RecordStore {
    /// Build option lists and date bounds from the loaded records.
    pub fn from_records(columns: Vec<String>, records: Vec<ObservationRecord>) -> Self {
        let srp_numbers = distinct_in_order(records.iter().map(|r| r.srp_number.as_str()));
        let scientific_names =
            distinct_in_order(records.iter().map(|r| r.scientific_name.as_str()));

        let date_bounds = records
            .iter()
            .filter_map(|r| r.observation_date)
            .fold(None, |acc: Option<(NaiveDate, NaiveDate)>, d| match acc {
                None => Some((d, d)),
                Some((lo, hi)) => Some((lo.min(d), hi.max(d))),
            });

        RecordStore {
            columns,
            records,
            srp_numbers,
            scientific_names,
            date_bounds,
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn lookup<'a>(columns: &[String], fields: &'a [FieldValue], name: &str) -> Option<&'a FieldValue> {
    columns
        .iter()
        .position(|c| c == name)
        .and_then(|idx| fields.get(idx))
}

fn distinct_in_order<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .filter(|v| !v.is_empty() && seen.insert(*v))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(srp: &str, sci: &str, date: Option<(i32, u32, u32)>) -> ObservationRecord {
        ObservationRecord {
            srp_number: srp.into(),
            scientific_name: sci.into(),
            common_name: String::new(),
            county: String::new(),
            srp_id: String::new(),
            observation_date: date.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
            latitude: None,
            longitude: None,
            fields: Vec::new(),
        }
    }

    #[test]
    fn option_lists_keep_first_occurrence_order() {
        let store = RecordStore::from_records(
            Vec::new(),
            vec![
                record("300", "Lynx rufus", None),
                record("100", "Ursus americanus", None),
                record("300", "Lynx rufus", None),
                record("", "", None),
                record("200", "Ursus americanus", None),
            ],
        );

        assert_eq!(store.srp_numbers, vec!["300", "100", "200"]);
        assert_eq!(store.scientific_names, vec!["Lynx rufus", "Ursus americanus"]);
    }

    #[test]
    fn date_bounds_skip_missing_dates() {
        let store = RecordStore::from_records(
            Vec::new(),
            vec![
                record("1", "a", Some((2023, 6, 1))),
                record("2", "b", None),
                record("3", "c", Some((2021, 2, 3))),
            ],
        );

        assert_eq!(
            store.date_bounds,
            Some((
                NaiveDate::from_ymd_opt(2021, 2, 3).unwrap(),
                NaiveDate::from_ymd_opt(2023, 6, 1).unwrap()
            ))
        );
    }

    #[test]
    fn from_fields_extracts_modelled_columns() {
        let mapping = ColumnMapping::default();
        let columns: Vec<String> = [
            "SRP_ID",
            "SRP_Num",
            "Scientific_Name",
            "Common_Name",
            "County",
            "Observation_Date",
            "Latitude_or_transect_start_latitude",
            "Longitude_or_transect_start_longitude",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        let rec = ObservationRecord::from_fields(
            &columns,
            &mapping,
            vec![
                FieldValue::String("A-1".into()),
                FieldValue::Integer(100),
                FieldValue::String("Ursus americanus".into()),
                FieldValue::String("Black Bear".into()),
                FieldValue::String("Brewster".into()),
                FieldValue::Date(NaiveDate::from_ymd_opt(2023, 1, 10).unwrap()),
                FieldValue::String("29.5".into()),
                FieldValue::Null,
            ],
        );

        assert_eq!(rec.srp_number, "100");
        assert_eq!(rec.srp_id, "A-1");
        assert_eq!(rec.latitude, Some(29.5));
        assert_eq!(rec.longitude, None);
        assert_eq!(rec.coordinates(), None);
        assert_eq!(rec.observation_date, NaiveDate::from_ymd_opt(2023, 1, 10));
    }

    #[test]
    fn non_finite_coordinates_count_as_missing() {
        assert_eq!(FieldValue::Float(f64::NAN).as_f64(), None);
        assert_eq!(FieldValue::String("n/a".into()).as_f64(), None);
        assert_eq!(FieldValue::Integer(-98).as_f64(), Some(-98.0));
    }
}
