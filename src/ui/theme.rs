//! Class helpers shared across pages so the stylesheet stays the single
//! source of truth for colours.

use crate::domain::{Category, LoadStatus};

use super::components::toast::ToastKind;

/// Docs and PKG get different accent colours when selected.
pub fn category_toggle_class(category: Category, active: bool) -> &'static str {
    match (category, active) {
        (Category::Docs, true) => "toggle toggle--docs",
        (Category::Pkg, true) => "toggle toggle--pkg",
        (_, false) => "toggle",
    }
}

pub fn nav_link_class(active: bool) -> &'static str {
    if active {
        "nav-link nav-link--active"
    } else {
        "nav-link"
    }
}

pub fn toast_class(kind: ToastKind) -> &'static str {
    match kind {
        ToastKind::Info => "toast toast--info",
        ToastKind::Success => "toast toast--success",
        ToastKind::Warning => "toast toast--warning",
        ToastKind::Error => "toast toast--error",
    }
}

pub fn toast_icon(kind: ToastKind) -> &'static str {
    match kind {
        ToastKind::Info => "ℹ️",
        ToastKind::Success => "✅",
        ToastKind::Warning => "⚠️",
        ToastKind::Error => "⛔",
    }
}

pub fn status_pill(status: LoadStatus) -> (&'static str, &'static str) {
    match status {
        LoadStatus::Idle => ("pill", "Waiting"),
        LoadStatus::Loading => ("pill pill--busy", "Loading rates"),
        LoadStatus::Loaded => ("pill pill--ok", "Rates loaded"),
        LoadStatus::Failed => ("pill pill--error", "No rates"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn inactive_categories_share_the_plain_toggle() {
        assert_eq!(category_toggle_class(Category::Docs, false), "toggle");
        assert_eq!(category_toggle_class(Category::Pkg, false), "toggle");
        assert_ne!(
            category_toggle_class(Category::Docs, true),
            category_toggle_class(Category::Pkg, true)
        );
    }

    #[test]
    fn failed_load_uses_error_pill() {
        assert_eq!(status_pill(LoadStatus::Failed).0, "pill pill--error");
    }
}
