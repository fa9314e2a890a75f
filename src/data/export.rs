use super::filter::{apply, FilterSpec};
use super::model::{ObservationRecord, RecordStore};

/// A ready-to-save CSV download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// `filtered_<dataset>_data.csv`
pub fn export_file_name(dataset: &str) -> String {
    format!("filtered_{dataset}_data.csv")
}

/// Serialize records as UTF-8 CSV: a header row of `columns`, then one row
/// per record in source column order. No index column. Fields containing
/// the delimiter, quotes or line breaks are quoted.
pub fn export_csv(columns: &[String], records: &[&ObservationRecord]) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(columns)?;
    for record in records {
        writer.write_record(
            (0..columns.len()).map(|i| record.fields.get(i).map(|v| v.to_string()).unwrap_or_default()),
        )?;
    }
    writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))
}

/// Handle the download button. With no recorded clicks nothing is produced;
/// otherwise the currently filtered records are exported, even when empty.
pub fn download(
    store: &RecordStore,
    spec: &FilterSpec,
    clicks: u32,
    dataset: &str,
) -> Result<Option<ExportFile>, csv::Error> {
    if clicks == 0 {
        return Ok(None);
    }

    let filtered = apply(&store.records, spec);
    let bytes = export_csv(&store.columns, &filtered)?;
    Ok(Some(ExportFile {
        file_name: export_file_name(dataset),
        bytes,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::columns::ColumnMapping;
    use crate::data::loader::build_store;
    use crate::data::model::FieldValue;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeSet;

    fn text(s: &str) -> FieldValue {
        FieldValue::String(s.into())
    }

    fn store() -> RecordStore {
        let columns: Vec<String> = [
            "SRP_Num",
            "Scientific_Name",
            "Common_Name",
            "County",
            "Observation_Date",
            "Latitude_or_transect_start_latitude",
            "Longitude_or_transect_start_longitude",
            "Notes",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        let rows = vec![
            vec![
                FieldValue::Integer(100),
                text("Ursus americanus"),
                text("Black Bear"),
                text("Brewster"),
                text("2023-01-10"),
                FieldValue::Float(29.5),
                FieldValue::Float(-103.2),
                text("den, north slope\nsecond \"visit\""),
            ],
            vec![
                FieldValue::Integer(200),
                text("Lynx rufus"),
                text("Bobcat"),
                text("Travis"),
                text("2023-06-01"),
                FieldValue::Null,
                FieldValue::Float(-97.7),
                FieldValue::Null,
            ],
        ];
        build_store(columns, rows, &ColumnMapping::default()).unwrap()
    }

    fn parse(bytes: &[u8]) -> (Vec<String>, Vec<Vec<String>>) {
        let mut reader = csv::Reader::from_reader(bytes);
        let headers = reader.headers().unwrap().iter().map(String::from).collect();
        let rows = reader
            .records()
            .map(|r| r.unwrap().iter().map(String::from).collect())
            .collect();
        (headers, rows)
    }

    #[test]
    fn no_click_produces_nothing() {
        let out = download(&store(), &FilterSpec::default(), 0, "srp").unwrap();
        assert_eq!(out, None);
    }

    #[test]
    fn unfiltered_export_has_header_plus_every_record() {
        let store = store();
        let file = download(&store, &FilterSpec::default(), 1, "srp")
            .unwrap()
            .unwrap();

        assert_eq!(file.file_name, "filtered_srp_data.csv");
        let (headers, rows) = parse(&file.bytes);
        assert_eq!(headers, store.columns);
        assert_eq!(rows.len(), store.len());
    }

    #[test]
    fn empty_result_still_exports_header() {
        let spec = FilterSpec {
            srp_numbers: BTreeSet::from(["999".to_string()]),
            ..Default::default()
        };
        let file = download(&store(), &spec, 3, "srp").unwrap().unwrap();

        let (headers, rows) = parse(&file.bytes);
        assert_eq!(headers.len(), 8);
        assert!(rows.is_empty());
    }

    #[test]
    fn export_round_trips_special_characters() {
        let store = store();
        let all: Vec<&ObservationRecord> = store.records.iter().collect();
        let bytes = export_csv(&store.columns, &all).unwrap();

        let (_, rows) = parse(&bytes);
        let expected: Vec<Vec<String>> = store
            .records
            .iter()
            .map(|r| r.fields.iter().map(|v| v.to_string()).collect())
            .collect();
        assert_eq!(rows, expected);
        assert_eq!(rows[0][7], "den, north slope\nsecond \"visit\"");
    }

    #[test]
    fn exported_file_reloads_to_same_records() {
        let store = store();
        let all: Vec<&ObservationRecord> = store.records.iter().collect();
        let bytes = export_csv(&store.columns, &all).unwrap();

        let file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        std::fs::write(file.path(), &bytes).unwrap();
        let reloaded =
            crate::data::loader::load_file(file.path(), &ColumnMapping::default()).unwrap();

        assert_eq!(reloaded.columns, store.columns);
        assert_eq!(reloaded.records, store.records);
    }
}
