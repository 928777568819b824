pub mod rates;
pub mod upload;

pub use rates::ShippingRatesPage;
pub use upload::UploadPage;
