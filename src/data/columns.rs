use std::path::Path;

use serde::Deserialize;

use super::error::{LoadError, Result};

// ---------------------------------------------------------------------------
// ColumnMapping – semantic field → source column header
// ---------------------------------------------------------------------------

/// Names of the source columns that carry the modelled survey fields.
///
/// Defaults match the headers of the SRP master dictionary spreadsheet. A JSON
/// file may override any subset of them:
///
/// ```json
/// { "srp_number": "Permit", "latitude": "Lat", "longitude": "Lon" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    pub srp_number: String,
    pub scientific_name: String,
    pub common_name: String,
    pub county: String,
    pub observation_date: String,
    pub latitude: String,
    pub longitude: String,
    /// Shown in map tooltips only; the column may be absent from the file.
    pub srp_id: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            srp_number: "SRP_Num".into(),
            scientific_name: "Scientific_Name".into(),
            common_name: "Common_Name".into(),
            county: "County".into(),
            observation_date: "Observation_Date".into(),
            latitude: "Latitude_or_transect_start_latitude".into(),
            longitude: "Longitude_or_transect_start_longitude".into(),
            srp_id: "SRP_ID".into(),
        }
    }
}

impl ColumnMapping {
    /// Read a (possibly partial) mapping from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let mapping: ColumnMapping = serde_json::from_str(&text)?;
        mapping.validate()?;
        Ok(mapping)
    }

    /// Columns that must be present for the store to load.
    pub fn required(&self) -> [&str; 7] {
        [
            self.srp_number.as_str(),
            self.scientific_name.as_str(),
            self.common_name.as_str(),
            self.county.as_str(),
            self.observation_date.as_str(),
            self.latitude.as_str(),
            self.longitude.as_str(),
        ]
    }

    /// Report every required column missing from `headers`, in mapping order.
    pub fn check_headers(&self, headers: &[String]) -> Result<()> {
        let missing: Vec<String> = self
            .required()
            .iter()
            .filter(|name| !headers.iter().any(|h| h == *name))
            .map(|name| name.to_string())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(LoadError::MissingColumns(missing))
        }
    }

    fn validate(&self) -> Result<()> {
        if let Some(blank) = self.required().iter().find(|name| name.trim().is_empty()) {
            return Err(LoadError::Config(format!(
                "column mapping contains a blank name ({blank:?})"
            )));
        }
        Ok(())
    }
}
