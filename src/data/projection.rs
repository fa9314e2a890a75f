use std::collections::HashSet;

use super::filter::{apply, FilterSpec};
use super::model::{ObservationRecord, RecordStore};

// ---------------------------------------------------------------------------
// Map points
// ---------------------------------------------------------------------------

/// Hover details shown for a map marker.
#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    pub srp_id: String,
    pub scientific_name: String,
    pub common_name: String,
    pub county: String,
    pub srp_number: String,
}

impl Tooltip {
    /// Label/value pairs in display order.
    pub fn entries(&self) -> [(&'static str, &str); 5] {
        [
            ("SRP ID", self.srp_id.as_str()),
            ("Scientific name", self.scientific_name.as_str()),
            ("Common name", self.common_name.as_str()),
            ("County", self.county.as_str()),
            ("SRP number", self.srp_number.as_str()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapPoint {
    pub lat: f64,
    pub lon: f64,
    pub tooltip: Tooltip,
}

/// One marker per record with numeric coordinates; the rest are skipped.
pub fn map_points(records: &[&ObservationRecord]) -> Vec<MapPoint> {
    records
        .iter()
        .filter_map(|r| {
            let (lat, lon) = r.coordinates()?;
            Some(MapPoint {
                lat,
                lon,
                tooltip: Tooltip {
                    srp_id: r.srp_id.clone(),
                    scientific_name: r.scientific_name.clone(),
                    common_name: r.common_name.clone(),
                    county: r.county.clone(),
                    srp_number: r.srp_number.clone(),
                },
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Table rows
// ---------------------------------------------------------------------------

/// Every record as ordered `(column, value)` pairs, in source column order.
pub fn table_rows(columns: &[String], records: &[&ObservationRecord]) -> Vec<Vec<(String, String)>> {
    records
        .iter()
        .map(|r| {
            columns
                .iter()
                .enumerate()
                .map(|(i, col)| {
                    let value = r.fields.get(i).map(|v| v.to_string()).unwrap_or_default();
                    (col.clone(), value)
                })
                .collect()
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatisticsSummary {
    pub srp_count: usize,
    pub scientific_name_count: usize,
}

/// Distinct SRP numbers and distinct scientific names in the collection.
pub fn statistics(records: &[&ObservationRecord]) -> StatisticsSummary {
    let srp: HashSet<&str> = records.iter().map(|r| r.srp_number.as_str()).collect();
    let sci: HashSet<&str> = records.iter().map(|r| r.scientific_name.as_str()).collect();
    StatisticsSummary {
        srp_count: srp.len(),
        scientific_name_count: sci.len(),
    }
}

// ---------------------------------------------------------------------------
// Dashboard views: one filter pass fanned out to every projection
// ---------------------------------------------------------------------------

/// Everything the dashboard displays for one filter state.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardViews {
    pub record_count: usize,
    pub map_points: Vec<MapPoint>,
    pub columns: Vec<String>,
    pub table: Vec<Vec<(String, String)>>,
    pub statistics: StatisticsSummary,
}

impl DashboardViews {
    /// The single record-count caption shown on both the map and table tabs.
    pub fn record_count_label(&self) -> String {
        format!("Record Count: {}", self.record_count)
    }
}

/// Recompute every view for a filter snapshot.
pub fn update_views(store: &RecordStore, spec: &FilterSpec) -> DashboardViews {
    let filtered = apply(&store.records, spec);
    if spec.is_unconstrained() {
        log::debug!("No active filters, showing all {} records", store.len());
    } else {
        log::debug!(
            "Filter {:?} kept {} of {} records",
            spec,
            filtered.len(),
            store.len()
        );
    }

    DashboardViews {
        record_count: filtered.len(),
        map_points: map_points(&filtered),
        columns: store.columns.clone(),
        table: table_rows(&store.columns, &filtered),
        statistics: statistics(&filtered),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::DateInterval;
    use crate::data::model::FieldValue;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeSet;

    fn columns() -> Vec<String> {
        ["SRP_Num", "Scientific_Name", "Observation_Date", "Notes"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    fn record(srp: &str, sci: &str, ymd: (i32, u32, u32), coords: Option<(f64, f64)>) -> ObservationRecord {
        let date = NaiveDate::from_ymd_opt(ymd.0, ymd.1, ymd.2).unwrap();
        ObservationRecord {
            srp_number: srp.into(),
            scientific_name: sci.into(),
            common_name: "Common".into(),
            county: "Travis".into(),
            srp_id: format!("{srp}-1"),
            observation_date: Some(date),
            latitude: coords.map(|c| c.0),
            longitude: coords.map(|c| c.1),
            fields: vec![
                FieldValue::String(srp.into()),
                FieldValue::String(sci.into()),
                FieldValue::Date(date),
                FieldValue::Null,
            ],
        }
    }

    fn store() -> RecordStore {
        RecordStore::from_records(
            columns(),
            vec![
                record("100", "Ursus americanus", (2023, 1, 10), Some((29.5, -103.2))),
                record("200", "Lynx rufus", (2023, 6, 1), None),
            ],
        )
    }

    #[test]
    fn statistics_count_distinct_values() {
        let store = store();
        let all: Vec<&ObservationRecord> = store.records.iter().collect();
        assert_eq!(
            statistics(&all),
            StatisticsSummary {
                srp_count: 2,
                scientific_name_count: 2,
            }
        );
        assert_eq!(statistics(&[]), StatisticsSummary::default());
    }

    #[test]
    fn record_without_latitude_is_only_missing_from_map() {
        let views = update_views(&store(), &FilterSpec::default());

        assert_eq!(views.record_count, 2);
        assert_eq!(views.table.len(), 2);
        assert_eq!(views.statistics.srp_count, 2);
        assert_eq!(views.map_points.len(), 1);
        assert_eq!(views.map_points[0].tooltip.srp_number, "100");
        assert_eq!(views.map_points[0].tooltip.srp_id, "100-1");
        assert_eq!((views.map_points[0].lat, views.map_points[0].lon), (29.5, -103.2));
    }

    #[test]
    fn table_rows_follow_source_column_order() {
        let views = update_views(&store(), &FilterSpec::default());
        let row = &views.table[1];

        assert_eq!(
            row,
            &vec![
                ("SRP_Num".to_string(), "200".to_string()),
                ("Scientific_Name".to_string(), "Lynx rufus".to_string()),
                ("Observation_Date".to_string(), "2023-06-01".to_string()),
                ("Notes".to_string(), String::new()),
            ]
        );
        assert_eq!(views.columns, columns());
    }

    #[test]
    fn record_count_label_is_shared() {
        let spec = FilterSpec {
            srp_numbers: BTreeSet::from(["200".to_string()]),
            ..Default::default()
        };
        let views = update_views(&store(), &spec);

        assert_eq!(views.record_count, views.table.len());
        assert_eq!(views.record_count_label(), "Record Count: 1");
    }

    #[test]
    fn empty_result_is_valid() {
        let spec = FilterSpec {
            date_range: DateInterval {
                start: NaiveDate::from_ymd_opt(2024, 1, 1),
                end: NaiveDate::from_ymd_opt(2024, 12, 31),
            },
            ..Default::default()
        };
        let views = update_views(&store(), &spec);

        assert_eq!(views.record_count, 0);
        assert!(views.map_points.is_empty());
        assert!(views.table.is_empty());
        assert_eq!(views.statistics, StatisticsSummary::default());
    }
}
