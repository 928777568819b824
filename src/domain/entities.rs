use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Sentinel the rate backend writes when a row carries no discount.
pub const NO_DISCOUNT: &str = "No discount available";

/// Remote rate table partition. Each province has its own database.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Province {
    #[default]
    Sindh,
    Punjab,
    Balochistan,
}

impl Province {
    pub const ALL: [Province; 3] = [Province::Sindh, Province::Punjab, Province::Balochistan];

    pub fn slug(&self) -> &'static str {
        match self {
            Province::Sindh => "sindh",
            Province::Punjab => "punjab",
            Province::Balochistan => "balochistan",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Province::Sindh => "Sindh",
            Province::Punjab => "Punjab",
            Province::Balochistan => "Balochistan",
        }
    }

    pub fn from_slug(raw: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|province| province.slug().eq_ignore_ascii_case(raw.trim()))
    }
}

impl fmt::Display for Province {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Shipment category chosen by the customer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    Docs,
    Pkg,
}

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Category::Docs => "DOCs",
            Category::Pkg => "PKG",
        }
    }
}

/// Row type as written by the rate backend.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Docs,
    NonDocs,
    AddKg,
    Surcharges,
    Other(String),
}

impl Default for RecordKind {
    fn default() -> Self {
        RecordKind::Other(String::new())
    }
}

impl From<&str> for RecordKind {
    fn from(raw: &str) -> Self {
        match raw.trim() {
            "docs" => RecordKind::Docs,
            "non-docs" => RecordKind::NonDocs,
            "add-kg" => RecordKind::AddKg,
            "sur-charges" => RecordKind::Surcharges,
            other => RecordKind::Other(other.to_string()),
        }
    }
}

impl<'de> Deserialize<'de> for RecordKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw
            .map(|raw| RecordKind::from(raw.as_str()))
            .unwrap_or_default())
    }
}

/// Shipment weight in whole grams, so it can key a map.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Weight(u32);

impl Weight {
    pub const DOCS_CEILING: Weight = Weight(2_000);
    pub const PKG_CEILING: Weight = Weight(25_000);

    pub fn from_grams(grams: u32) -> Self {
        Self(grams)
    }

    /// Returns `None` for non-finite or non-positive input.
    pub fn from_kg(kg: f64) -> Option<Self> {
        if !kg.is_finite() || kg <= 0.0 {
            return None;
        }
        Some(Self((kg * 1000.0).round() as u32))
    }

    pub fn grams(&self) -> u32 {
        self.0
    }

    pub fn kg(&self) -> f64 {
        f64::from(self.0) / 1000.0
    }
}

impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kg = self.kg();
        if kg.fract() == 0.0 {
            write!(f, "{kg:.0}")
        } else {
            write!(f, "{kg}")
        }
    }
}

/// A discount cell: a number, a numeric string, the sentinel, or nothing.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum DiscountCell {
    Amount(f64),
    #[default]
    NotAvailable,
}

impl DiscountCell {
    pub fn resolve(&self, retail: f64) -> f64 {
        match self {
            DiscountCell::Amount(value) => *value,
            DiscountCell::NotAvailable => retail,
        }
    }
}

impl<'de> Deserialize<'de> for DiscountCell {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<serde_json::Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(serde_json::Value::Number(number)) => number
                .as_f64()
                .map(DiscountCell::Amount)
                .unwrap_or(DiscountCell::NotAvailable),
            Some(serde_json::Value::String(text)) if text.trim() != NO_DISCOUNT => text
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(DiscountCell::Amount)
                .unwrap_or(DiscountCell::NotAvailable),
            _ => DiscountCell::NotAvailable,
        })
    }
}

/// One row of the remote rate database.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct RateRecord {
    #[serde(rename = "Country", default, deserialize_with = "lenient_string")]
    pub country: String,
    #[serde(rename = "Weight", default, deserialize_with = "lenient_f64")]
    pub weight: f64,
    #[serde(rename = "Type", default)]
    pub kind: RecordKind,
    #[serde(rename = "Retail Rate", default, deserialize_with = "lenient_f64")]
    pub retail_rate: f64,
    #[serde(rename = "Discount Rate", default)]
    pub discount_rate: DiscountCell,
    #[serde(rename = "Zone", default)]
    pub zone: Option<String>,
    #[serde(rename = "Addkg", default, deserialize_with = "lenient_opt_f64")]
    pub add_kg: Option<f64>,
    #[serde(rename = "Student", default)]
    pub student: Option<bool>,
    #[serde(rename = "Surcharges", default, deserialize_with = "lenient_opt_f64")]
    pub surcharges: Option<f64>,
}

/// Null reads as an empty string.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Accepts numbers, numeric strings and null; anything unreadable is `None`.
fn lenient_opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(number)) => number.as_f64(),
        Some(serde_json::Value::String(text)) => text.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite()))
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_opt_f64(deserializer).map(Option::unwrap_or_default)
}

/// Original and discounted price for one `(country, weight)` cell.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rate {
    pub original: f64,
    pub discounted: f64,
    #[serde(default)]
    pub student: bool,
    #[serde(default)]
    pub zone: Option<String>,
    #[serde(default)]
    pub add_kg: Option<f64>,
}

impl From<&RateRecord> for Rate {
    fn from(record: &RateRecord) -> Self {
        Self {
            original: record.retail_rate,
            discounted: record.discount_rate.resolve(record.retail_rate),
            student: record.student.unwrap_or(false),
            zone: record.zone.clone(),
            add_kg: record.add_kg,
        }
    }
}

/// Spreadsheet kinds accepted by `upload-rates`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadFileType {
    #[default]
    Retail,
    PkgDiscount,
    DocsDiscount,
    Student,
    Zones,
    Docs,
    ZonesDocs,
    ZonesPkg,
    Addkg,
    Zoneaddkg,
    Surcharges,
}

impl UploadFileType {
    pub const ALL: [UploadFileType; 11] = [
        UploadFileType::Retail,
        UploadFileType::PkgDiscount,
        UploadFileType::DocsDiscount,
        UploadFileType::Student,
        UploadFileType::Zones,
        UploadFileType::Docs,
        UploadFileType::ZonesDocs,
        UploadFileType::ZonesPkg,
        UploadFileType::Addkg,
        UploadFileType::Zoneaddkg,
        UploadFileType::Surcharges,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UploadFileType::Retail => "retail",
            UploadFileType::PkgDiscount => "pkg_discount",
            UploadFileType::DocsDiscount => "docs_discount",
            UploadFileType::Student => "student",
            UploadFileType::Zones => "zones",
            UploadFileType::Docs => "docs",
            UploadFileType::ZonesDocs => "zones_docs",
            UploadFileType::ZonesPkg => "zones_pkg",
            UploadFileType::Addkg => "addkg",
            UploadFileType::Zoneaddkg => "zoneaddkg",
            UploadFileType::Surcharges => "surcharges",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            UploadFileType::Retail => "Retail rates",
            UploadFileType::PkgDiscount => "Package discounts",
            UploadFileType::DocsDiscount => "Document discounts",
            UploadFileType::Student => "Student rates",
            UploadFileType::Zones => "Zones",
            UploadFileType::Docs => "Document rates",
            UploadFileType::ZonesDocs => "Zone document rates",
            UploadFileType::ZonesPkg => "Zone package rates",
            UploadFileType::Addkg => "Add per kg",
            UploadFileType::Zoneaddkg => "Zone add per kg",
            UploadFileType::Surcharges => "Surcharges",
        }
    }

    pub fn from_str_opt(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == raw)
    }
}
