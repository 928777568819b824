//! Immutable lookup tables built from one fetch of the remote rate database.
//!
//! A snapshot is replaced wholesale on every reload; nothing mutates it in place.

use std::collections::{BTreeSet, HashMap};

use time::OffsetDateTime;

use super::entities::{Category, Rate, RateRecord, RecordKind, Weight};

/// Key into the per-category tables.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RateKey {
    pub country: String,
    pub weight: Weight,
}

impl RateKey {
    pub fn new(country: impl Into<String>, weight: Weight) -> Self {
        Self {
            country: country.into(),
            weight,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RateSnapshot {
    pub docs: HashMap<RateKey, Rate>,
    pub pkg: HashMap<RateKey, Rate>,
    pub add_kg: HashMap<RateKey, Rate>,
    /// Keyed by [`surcharge_key`].
    pub surcharges: HashMap<String, f64>,
    pub countries: Vec<String>,
    pub weights: Vec<Weight>,
    pub loaded_at: Option<OffsetDateTime>,
}

/// Surcharge rows are matched on a lower-cased, trimmed country name.
pub fn surcharge_key(country: &str) -> String {
    country.trim().to_lowercase()
}

impl RateSnapshot {
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a RateRecord>,
    {
        let mut snapshot = RateSnapshot::default();
        let mut countries = BTreeSet::new();
        let mut weights = BTreeSet::new();

        for record in records {
            // Rows without a country cannot be looked up by anything.
            if record.country.trim().is_empty() {
                continue;
            }
            let weight = Weight::from_kg(record.weight);

            if let Some(weight) = weight {
                let key = RateKey::new(record.country.clone(), weight);
                match record.kind {
                    RecordKind::Docs => {
                        snapshot.docs.insert(key, Rate::from(record));
                    }
                    RecordKind::NonDocs => {
                        snapshot.pkg.insert(key, Rate::from(record));
                    }
                    RecordKind::AddKg => {
                        snapshot.add_kg.insert(key, Rate::from(record));
                    }
                    RecordKind::Surcharges | RecordKind::Other(_) => {}
                }
            }

            if record.kind == RecordKind::Surcharges {
                let normalized = surcharge_key(&record.country);
                match record.surcharges {
                    Some(amount) if !normalized.is_empty() && amount > 0.0 => {
                        snapshot.surcharges.insert(normalized, amount);
                    }
                    _ => {}
                }
            }

            countries.insert(record.country.clone());
            if let Some(weight) = weight {
                weights.insert(weight);
            }
        }

        snapshot.countries = countries.into_iter().collect();
        snapshot.weights = weights.into_iter().collect();
        snapshot
    }

    pub fn with_loaded_at(mut self, at: OffsetDateTime) -> Self {
        self.loaded_at = Some(at);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
            && self.pkg.is_empty()
            && self.add_kg.is_empty()
            && self.surcharges.is_empty()
    }

    pub fn table(&self, category: Category) -> &HashMap<RateKey, Rate> {
        match category {
            Category::Docs => &self.docs,
            Category::Pkg => &self.pkg,
        }
    }

    pub fn rate(&self, category: Category, country: &str, weight: Weight) -> Option<&Rate> {
        self.table(category)
            .get(&RateKey::new(country.to_string(), weight))
    }

    pub fn surcharge(&self, country: &str) -> Option<f64> {
        self.surcharges.get(&surcharge_key(country)).copied()
    }

    /// Per-kg increment for weights past the package ceiling.
    ///
    /// Uses the lightest add-kg row for the country; its `Addkg` column wins over
    /// its retail rate.
    pub fn add_kg_rate(&self, country: &str) -> Option<f64> {
        self.add_kg
            .iter()
            .filter(|(key, _)| key.country == country)
            .min_by_key(|(key, _)| key.weight)
            .map(|(_, rate)| rate.add_kg.unwrap_or(rate.original))
    }
}

/// Countries containing `query` (case-insensitive), prefix matches first.
pub fn filter_countries(countries: &[String], query: &str) -> Vec<String> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return countries.to_vec();
    }

    let (mut prefix, mut contains): (Vec<&String>, Vec<&String>) = countries
        .iter()
        .filter(|country| country.to_lowercase().contains(&needle))
        .partition(|country| country.to_lowercase().starts_with(&needle));

    prefix.sort();
    contains.sort();
    prefix.into_iter().chain(contains).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::DiscountCell;
    use pretty_assertions::assert_eq;

    fn record(country: &str, weight: f64, kind: &str, retail: f64) -> RateRecord {
        RateRecord {
            country: country.to_string(),
            weight,
            kind: RecordKind::from(kind),
            retail_rate: retail,
            discount_rate: DiscountCell::NotAvailable,
            zone: None,
            add_kg: None,
            student: None,
            surcharges: None,
        }
    }

    fn kg(value: f64) -> Weight {
        Weight::from_kg(value).unwrap()
    }

    #[test]
    fn partitions_rows_by_type() {
        let mut surcharge = record("UK ", 0.5, "sur-charges", 0.0);
        surcharge.surcharges = Some(10.0);
        let records = vec![
            record("UK", 0.5, "docs", 20.0),
            record("UK", 0.5, "non-docs", 30.0),
            record("UK", 26.0, "add-kg", 3.0),
            surcharge,
            record("UK", 0.5, "zones", 99.0),
        ];

        let snapshot = RateSnapshot::from_records(&records);

        assert_eq!(snapshot.docs.len(), 1);
        assert_eq!(snapshot.pkg.len(), 1);
        assert_eq!(snapshot.add_kg.len(), 1);
        assert_eq!(snapshot.surcharge("uk"), Some(10.0));
        assert_eq!(snapshot.surcharge(" UK"), Some(10.0));
        assert_eq!(
            snapshot.rate(Category::Pkg, "UK", kg(0.5)).map(|r| r.original),
            Some(30.0)
        );
    }

    #[test]
    fn non_positive_surcharges_are_dropped() {
        let mut zero = record("Oman", 1.0, "sur-charges", 0.0);
        zero.surcharges = Some(0.0);
        let mut missing = record("Qatar", 1.0, "sur-charges", 0.0);
        missing.surcharges = None;

        let snapshot = RateSnapshot::from_records(&[zero, missing]);
        assert!(snapshot.surcharges.is_empty());
    }

    #[test]
    fn last_write_wins_for_duplicate_keys() {
        let records = vec![
            record("UAE", 1.0, "docs", 10.0),
            record("UAE", 1.0, "docs", 12.5),
        ];
        let snapshot = RateSnapshot::from_records(&records);
        assert_eq!(
            snapshot.rate(Category::Docs, "UAE", kg(1.0)).map(|r| r.original),
            Some(12.5)
        );
    }

    #[test]
    fn countries_and_weights_are_sorted_and_distinct() {
        let records = vec![
            record("UK", 2.0, "docs", 1.0),
            record("Canada", 0.5, "docs", 1.0),
            record("UK", 0.5, "non-docs", 1.0),
            record("Australia", 10.0, "non-docs", 1.0),
        ];
        let snapshot = RateSnapshot::from_records(&records);
        assert_eq!(snapshot.countries, vec!["Australia", "Canada", "UK"]);
        assert_eq!(snapshot.weights, vec![kg(0.5), kg(2.0), kg(10.0)]);
    }

    #[test]
    fn rows_without_a_country_are_skipped() {
        let records = vec![
            record("UAE", 0.5, "docs", 12.0),
            record("", 0.5, "docs", 99.0),
            record("  ", 1.0, "non-docs", 99.0),
        ];
        let snapshot = RateSnapshot::from_records(&records);
        assert_eq!(snapshot.countries, vec!["UAE"]);
        assert_eq!(snapshot.docs.len(), 1);
        assert!(snapshot.pkg.is_empty());
        assert_eq!(snapshot.weights, vec![kg(0.5)]);
    }

    #[test]
    fn surcharge_only_payload_is_not_empty() {
        let mut surcharge = record("Oman", 0.5, "sur-charges", 0.0);
        surcharge.surcharges = Some(4.0);
        let snapshot = RateSnapshot::from_records(&[surcharge]);
        assert!(!snapshot.is_empty());
        assert!(RateSnapshot::default().is_empty());
    }

    #[test]
    fn add_kg_prefers_column_then_retail() {
        let mut with_column = record("UAE", 26.0, "add-kg", 9.0);
        with_column.add_kg = Some(2.0);
        let heavier = record("UAE", 30.0, "add-kg", 4.0);
        let retail_only = record("UK", 26.0, "add-kg", 3.5);

        let snapshot = RateSnapshot::from_records(&[with_column, heavier, retail_only]);
        assert_eq!(snapshot.add_kg_rate("UAE"), Some(2.0));
        assert_eq!(snapshot.add_kg_rate("UK"), Some(3.5));
        assert_eq!(snapshot.add_kg_rate("Oman"), None);
    }

    #[test]
    fn filter_puts_prefix_matches_first() {
        let countries: Vec<String> = ["Australia", "Austria", "Mauritius", "UK"]
            .iter()
            .map(|c| c.to_string())
            .collect();
        assert_eq!(
            filter_countries(&countries, "au"),
            vec!["Australia", "Austria", "Mauritius"]
        );
        assert_eq!(filter_countries(&countries, "  "), countries);
        assert!(filter_countries(&countries, "xyz").is_empty());
    }
}
