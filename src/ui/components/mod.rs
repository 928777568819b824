pub mod page_loader;
pub mod rate_card;
pub mod toast;
pub mod triangles;

pub use page_loader::PageLoader;
pub use rate_card::RateCard;
pub use toast::{push_toast, Toast, ToastKind, ToastMessage};
pub use triangles::Triangles;
