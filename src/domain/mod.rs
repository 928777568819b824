//! Rate tables and the pricing rule live here.

pub mod app_state;
pub mod entities;
pub mod pricing;
pub mod rate_table;

pub use app_state::{AppState, LoadStatus, PersistedState, DEFAULT_COUNTRY};
pub use entities::{
    Category, DiscountCell, Province, Rate, RateRecord, RecordKind, UploadFileType, Weight,
    NO_DISCOUNT,
};
pub use pricing::{derive_quote, excess_kg, ConvertedQuote, LookupGap, Quote, Selection};
pub use rate_table::{filter_countries, surcharge_key, RateKey, RateSnapshot};
