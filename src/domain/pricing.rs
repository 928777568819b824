use serde::{Deserialize, Serialize};

use super::{
    entities::{Category, Weight},
    rate_table::RateSnapshot,
};

/// What the customer has picked on the rates page.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub country: Option<String>,
    pub weight: Option<Weight>,
    pub category: Category,
}

impl Selection {
    pub fn new(country: impl Into<String>, weight: Weight, category: Category) -> Self {
        Self {
            country: Some(country.into()),
            weight: Some(weight),
            category,
        }
    }
}

/// A lookup that found nothing and was treated as zero.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LookupGap {
    BaseRate { country: String, weight: Weight },
    DiscountRate { country: String, weight: Weight },
    CeilingRate { country: String },
    AddKgRate { country: String },
}

impl LookupGap {
    pub fn describe(&self) -> String {
        match self {
            LookupGap::BaseRate { country, weight } => {
                format!("No rate on file for {country} at {weight} kg")
            }
            LookupGap::DiscountRate { country, weight } => {
                format!("No discounted rate on file for {country} at {weight} kg")
            }
            LookupGap::CeilingRate { country } => {
                format!("No 25 kg base rate on file for {country}")
            }
            LookupGap::AddKgRate { country } => {
                format!("No add-per-kg rate on file for {country}")
            }
        }
    }
}

/// Derived prices in the rate table's currency (USD).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Quote {
    pub original: f64,
    pub discounted: f64,
    pub discount_dollar: f64,
    pub surcharge: f64,
    pub gaps: Vec<LookupGap>,
}

/// The same quote multiplied into the display currency.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConvertedQuote {
    pub original: f64,
    pub discounted: f64,
    pub discount: f64,
}

impl Quote {
    pub fn convert(&self, exchange_rate: Option<f64>) -> Option<ConvertedQuote> {
        let rate = exchange_rate.filter(|rate| rate.is_finite() && *rate > 0.0)?;
        Some(ConvertedQuote {
            original: self.original * rate,
            discounted: self.discounted * rate,
            discount: self.discount_dollar * rate,
        })
    }

    pub fn is_complete(&self) -> bool {
        self.gaps.is_empty()
    }
}

/// Prices a shipment against the loaded tables.
///
/// Documents heavier than 2 kg only report the surcharge. Packages heavier than
/// 25 kg are priced from the 25 kg row plus the excess, rounded up to the next
/// half kilo, times the country's add-per-kg rate. Missing rows count as zero
/// and are listed in [`Quote::gaps`].
pub fn derive_quote(selection: &Selection, snapshot: &RateSnapshot) -> Quote {
    let (Some(country), Some(weight)) = (
        selection.country.as_deref().filter(|c| !c.trim().is_empty()),
        selection.weight.filter(|w| w.grams() > 0),
    ) else {
        return Quote::default();
    };

    let mut gaps = Vec::new();
    let surcharge = snapshot.surcharge(country).unwrap_or(0.0);

    if selection.category == Category::Docs && weight > Weight::DOCS_CEILING {
        return Quote {
            original: 0.0,
            discounted: 0.0,
            discount_dollar: 0.0,
            surcharge,
            gaps,
        };
    }

    let heavy_package = selection.category == Category::Pkg && weight > Weight::PKG_CEILING;

    let (mut original, discounted) = match snapshot.rate(selection.category, country, weight) {
        Some(rate) => (rate.original, rate.discounted),
        None => {
            // A heavy package still prices its original from the 25 kg row,
            // so only the discounted side is missing.
            let country = country.to_string();
            gaps.push(if heavy_package {
                LookupGap::DiscountRate { country, weight }
            } else {
                LookupGap::BaseRate { country, weight }
            });
            (0.0, 0.0)
        }
    };

    if heavy_package {
        original = match snapshot.rate(Category::Pkg, country, Weight::PKG_CEILING) {
            Some(rate) => rate.original,
            None => {
                gaps.push(LookupGap::CeilingRate {
                    country: country.to_string(),
                });
                0.0
            }
        };

        let per_kg = match snapshot.add_kg_rate(country) {
            Some(rate) => rate,
            None => {
                gaps.push(LookupGap::AddKgRate {
                    country: country.to_string(),
                });
                0.0
            }
        };

        original += excess_kg(weight) * per_kg;
    }

    original += surcharge;

    Quote {
        original,
        discounted,
        discount_dollar: original - discounted,
        surcharge,
        gaps,
    }
}

/// Weight past the package ceiling, rounded up to the next 0.5 kg.
pub fn excess_kg(weight: Weight) -> f64 {
    let excess = weight.grams().saturating_sub(Weight::PKG_CEILING.grams());
    let half_kilos = excess.div_ceil(500);
    f64::from(half_kilos) * 0.5
}
