use std::collections::BTreeSet;

use chrono::NaiveDate;

use super::model::ObservationRecord;

// ---------------------------------------------------------------------------
// Filter specification: a snapshot of the filter controls
// ---------------------------------------------------------------------------

/// Inclusive date interval. Only applied when both bounds are set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateInterval {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateInterval {
    /// Both bounds, or `None` when the interval imposes no constraint.
    pub fn bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.start?, self.end?))
    }
}

/// The user's selected constraints. An empty set means "no constraint" for
/// that column, never "nothing selected".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSpec {
    pub srp_numbers: BTreeSet<String>,
    pub scientific_names: BTreeSet<String>,
    pub date_range: DateInterval,
}

impl FilterSpec {
    /// Whether no predicate is active.
    pub fn is_unconstrained(&self) -> bool {
        self.srp_numbers.is_empty()
            && self.scientific_names.is_empty()
            && self.date_range.bounds().is_none()
    }

    /// A record passes when it satisfies every active predicate.
    ///
    /// * SRP number is in the selected set (if any are selected)
    /// * scientific name is in the selected set (if any are selected)
    /// * observation date lies in `[start, end]` (if both bounds are set);
    ///   a record without a date fails once this predicate is active, and an
    ///   inverted interval (`start > end`) matches nothing
    pub fn matches(&self, record: &ObservationRecord) -> bool {
        if !self.srp_numbers.is_empty() && !self.srp_numbers.contains(&record.srp_number) {
            return false;
        }
        if !self.scientific_names.is_empty()
            && !self.scientific_names.contains(&record.scientific_name)
        {
            return false;
        }
        if let Some((start, end)) = self.date_range.bounds() {
            match record.observation_date {
                Some(date) if start <= date && date <= end => {}
                _ => return false,
            }
        }
        true
    }
}

// ---------------------------------------------------------------------------
// Filter pipeline
// ---------------------------------------------------------------------------

/// Keep the records that pass `spec`, preserving input order.
pub fn apply<'a, I>(records: I, spec: &FilterSpec) -> Vec<&'a ObservationRecord>
where
    I: IntoIterator<Item = &'a ObservationRecord>,
{
    records.into_iter().filter(|r| spec.matches(r)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(srp: &str, sci: &str, observed: Option<NaiveDate>) -> ObservationRecord {
        ObservationRecord {
            srp_number: srp.into(),
            scientific_name: sci.into(),
            common_name: String::new(),
            county: String::new(),
            srp_id: String::new(),
            observation_date: observed,
            latitude: None,
            longitude: None,
            fields: Vec::new(),
        }
    }

    fn bear_and_bobcat() -> Vec<ObservationRecord> {
        vec![
            record("100", "Ursus americanus", Some(date(2023, 1, 10))),
            record("200", "Lynx rufus", Some(date(2023, 6, 1))),
        ]
    }

    fn between(start: NaiveDate, end: NaiveDate) -> DateInterval {
        DateInterval {
            start: Some(start),
            end: Some(end),
        }
    }

    fn set(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn empty_spec_is_identity() {
        let records = bear_and_bobcat();
        let spec = FilterSpec::default();
        assert!(spec.is_unconstrained());

        let out = apply(&records, &spec);
        assert_eq!(out, records.iter().collect::<Vec<_>>());
    }

    #[test]
    fn srp_selection_keeps_matching_records() {
        let records = bear_and_bobcat();
        let spec = FilterSpec {
            srp_numbers: set(&["100"]),
            ..Default::default()
        };
        assert_eq!(apply(&records, &spec), vec![&records[0]]);
    }

    #[test]
    fn scientific_name_selection_keeps_matching_records() {
        let records = bear_and_bobcat();
        let spec = FilterSpec {
            scientific_names: set(&["Lynx rufus"]),
            ..Default::default()
        };
        assert_eq!(apply(&records, &spec), vec![&records[1]]);
    }

    #[test]
    fn date_range_is_inclusive() {
        let records = bear_and_bobcat();
        let january = FilterSpec {
            date_range: between(date(2023, 1, 1), date(2023, 1, 31)),
            ..Default::default()
        };
        assert_eq!(apply(&records, &january), vec![&records[0]]);

        let exact = FilterSpec {
            date_range: between(date(2023, 1, 10), date(2023, 6, 1)),
            ..Default::default()
        };
        assert_eq!(apply(&records, &exact).len(), 2);
    }

    #[test]
    fn single_date_bound_is_ignored() {
        let records = bear_and_bobcat();
        let spec = FilterSpec {
            date_range: DateInterval {
                start: Some(date(2023, 3, 1)),
                end: None,
            },
            ..Default::default()
        };
        assert!(spec.is_unconstrained());
        assert_eq!(apply(&records, &spec).len(), 2);
    }

    #[test]
    fn inverted_range_matches_nothing() {
        let records = bear_and_bobcat();
        let spec = FilterSpec {
            date_range: between(date(2023, 12, 31), date(2023, 1, 1)),
            ..Default::default()
        };
        assert!(apply(&records, &spec).is_empty());
    }

    #[test]
    fn undated_records_only_survive_without_date_predicate() {
        let mut records = bear_and_bobcat();
        records.push(record("300", "Lynx rufus", None));

        assert_eq!(apply(&records, &FilterSpec::default()).len(), 3);

        let spec = FilterSpec {
            date_range: between(date(2000, 1, 1), date(2030, 1, 1)),
            ..Default::default()
        };
        assert_eq!(apply(&records, &spec).len(), 2);
    }

    #[test]
    fn predicates_are_combined_with_and() {
        let records = bear_and_bobcat();
        let spec = FilterSpec {
            srp_numbers: set(&["100", "200"]),
            scientific_names: set(&["Lynx rufus"]),
            date_range: between(date(2023, 1, 1), date(2023, 1, 31)),
        };
        assert!(apply(&records, &spec).is_empty());
    }

    #[test]
    fn filtering_never_adds_and_is_idempotent() {
        let mut records = bear_and_bobcat();
        records.push(record("100", "Lynx rufus", Some(date(2023, 1, 20))));
        records.push(record("", "", None));

        let specs = [
            FilterSpec::default(),
            FilterSpec {
                srp_numbers: set(&["100"]),
                ..Default::default()
            },
            FilterSpec {
                scientific_names: set(&["Lynx rufus", "Canis latrans"]),
                date_range: between(date(2023, 1, 1), date(2023, 2, 1)),
                ..Default::default()
            },
        ];

        for spec in &specs {
            let once = apply(&records, spec);
            assert!(once.len() <= records.len());

            let twice = apply(once.iter().copied(), spec);
            assert_eq!(twice, once);
        }
    }
}
