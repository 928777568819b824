use dioxus::prelude::*;
use tracing::{error, info};

use crate::{
    app::ReloadTrigger,
    config::AppConfig,
    domain::{AppState, UploadFileType},
    infra::{
        gateway::GatewayClient,
        rates::{RatesClient, UploadRequest},
    },
    ui::components::toast::{push_toast, ToastKind, ToastMessage},
};

#[derive(Clone, Debug, PartialEq)]
pub struct UploadForm {
    pub path: String,
    pub file_type: UploadFileType,
    pub student: bool,
    pub sheet: String,
}

impl Default for UploadForm {
    fn default() -> Self {
        Self {
            path: String::new(),
            file_type: UploadFileType::default(),
            student: false,
            sheet: "0".to_string(),
        }
    }
}

impl UploadForm {
    /// The only checks made before sending: a file is chosen and the sheet is a number.
    pub fn validate(&self) -> Result<(String, u32), &'static str> {
        let path = self.path.trim();
        if path.is_empty() {
            return Err("Choose a spreadsheet first.");
        }
        let sheet = self
            .sheet
            .trim()
            .parse::<u32>()
            .map_err(|_| "Sheet must be a whole number.")?;
        Ok((path.to_string(), sheet))
    }
}

pub fn upload_summary(message: &str, skipped: usize) -> String {
    let message = if message.trim().is_empty() {
        "Upload complete."
    } else {
        message.trim()
    };
    match skipped {
        0 => message.to_string(),
        1 => format!("{message} (1 row skipped)"),
        n => format!("{message} ({n} rows skipped)"),
    }
}

#[component]
pub fn UploadPage() -> Element {
    let state = use_context::<Signal<AppState>>();
    let config = use_context::<AppConfig>();

    if !config.admin_enabled() {
        return rsx! {
            section { class: "panel panel--narrow",
                h1 { "Admin" }
                p { class: "muted",
                    "Uploads are disabled. Set RATES_ADMIN_KEY to enable the admin page."
                }
            }
        };
    }

    if !state.with(|st| st.admin_unlocked) {
        return rsx! { UnlockPanel {} };
    }

    rsx! { AdminPanel {} }
}

#[component]
fn UnlockPanel() -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let config = use_context::<AppConfig>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let mut passphrase = use_signal(String::new);

    let on_submit = move |evt: FormEvent| {
        evt.prevent_default();
        if config.check_admin_key(&passphrase()) {
            state.with_mut(|st| st.admin_unlocked = true);
            passphrase.set(String::new());
            info!("Admin page unlocked");
        } else {
            push_toast(toasts, ToastKind::Error, "Wrong admin passphrase.");
        }
    };

    rsx! {
        section { class: "panel panel--narrow",
            h1 { "Admin" }
            form { class: "form", onsubmit: on_submit,
                label { class: "form__label", "Passphrase" }
                input {
                    class: "control__input",
                    r#type: "password",
                    value: passphrase(),
                    oninput: move |evt| passphrase.set(evt.value()),
                }
                button { class: "button button--primary", r#type: "submit", "Unlock" }
            }
        }
    }
}

#[component]
fn AdminPanel() -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let config = use_context::<AppConfig>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let reload = use_context::<ReloadTrigger>();

    let mut form = use_signal(UploadForm::default);
    let mut busy = use_signal(|| false);
    let mut confirm_clear = use_signal(|| false);

    let province = state.with(|st| st.province);
    let current = form();

    let rates_url = config.rates_api_url.clone();
    let on_upload = move |evt: FormEvent| {
        evt.prevent_default();
        if busy() {
            return;
        }
        let request = form();
        let (path, sheet) = match request.validate() {
            Ok(valid) => valid,
            Err(message) => {
                push_toast(toasts, ToastKind::Warning, message);
                return;
            }
        };

        busy.set(true);
        let rates_url = rates_url.clone();
        spawn(async move {
            let result = async {
                let client = RatesClient::new(rates_url)?;
                let upload =
                    UploadRequest::from_path(&path, request.file_type, request.student, sheet)
                        .await?;
                client.upload_rates(upload).await
            }
            .await;

            match result {
                Ok(outcome) => {
                    push_toast(
                        toasts,
                        ToastKind::Success,
                        upload_summary(&outcome.message, outcome.skipped_count()),
                    );
                    form.with_mut(|f| f.path.clear());
                    reload.bump();
                }
                Err(err) => {
                    error!("Upload failed: {err}");
                    push_toast(toasts, ToastKind::Error, format!("Upload failed: {err}"));
                }
            }
            busy.set(false);
        });
    };

    let gateway_url = config.gateway_url.clone();
    let on_clear = move |_: MouseEvent| {
        if busy() {
            return;
        }
        if !confirm_clear() {
            confirm_clear.set(true);
            return;
        }
        confirm_clear.set(false);
        busy.set(true);
        let gateway_url = gateway_url.clone();
        spawn(async move {
            let result = match GatewayClient::new(gateway_url) {
                Ok(client) => client.clear_database(province).await,
                Err(err) => Err(err),
            };
            match result {
                Ok(message) => {
                    push_toast(toasts, ToastKind::Success, message);
                    reload.bump();
                }
                Err(err) => {
                    error!("Clearing {province} rates failed: {err}");
                    push_toast(toasts, ToastKind::Error, format!("Clear failed: {err}"));
                }
            }
            busy.set(false);
        });
    };

    let clear_label = if confirm_clear() {
        format!("Really clear all {} rates?", province.label())
    } else {
        format!("Clear {} rates", province.label())
    };

    rsx! {
        section { class: "panel",
            div { class: "panel__header",
                h1 { "Upload rates" }
                button {
                    class: "button",
                    onclick: move |_| state.with_mut(|st| st.admin_unlocked = false),
                    "Lock"
                }
            }
            p { class: "muted", "Target table: {province.label()}" }

            form { class: "form", onsubmit: on_upload,
                label { class: "form__label", "Spreadsheet path" }
                input {
                    class: "control__input",
                    value: current.path.clone(),
                    placeholder: "/home/me/rates/retail.xlsx",
                    oninput: move |evt| form.with_mut(|f| f.path = evt.value()),
                }

                label { class: "form__label", "File type" }
                select {
                    class: "control__input",
                    value: current.file_type.as_str(),
                    onchange: move |evt| {
                        if let Some(kind) = UploadFileType::from_str_opt(&evt.value()) {
                            form.with_mut(|f| f.file_type = kind);
                        }
                    },
                    for kind in UploadFileType::ALL {
                        option {
                            value: kind.as_str(),
                            selected: kind == current.file_type,
                            "{kind.label()}"
                        }
                    }
                }

                div { class: "form__row",
                    label { class: "form__check",
                        input {
                            r#type: "checkbox",
                            checked: current.student,
                            onchange: move |evt| form.with_mut(|f| f.student = evt.checked()),
                        }
                        "Student rates"
                    }
                    label { class: "form__label", "Sheet" }
                    input {
                        class: "control__input control__input--narrow",
                        inputmode: "numeric",
                        value: current.sheet.clone(),
                        oninput: move |evt| form.with_mut(|f| f.sheet = evt.value()),
                    }
                }

                button {
                    class: "button button--primary",
                    r#type: "submit",
                    disabled: busy(),
                    if busy() { "Working..." } else { "Upload" }
                }
            }

            div { class: "danger-zone",
                button {
                    class: "button button--danger",
                    disabled: busy(),
                    onclick: on_clear,
                    "{clear_label}"
                }
                if confirm_clear() {
                    button {
                        class: "button",
                        onclick: move |_| confirm_clear.set(false),
                        "Cancel"
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_path_is_rejected() {
        let form = UploadForm::default();
        assert_eq!(form.validate(), Err("Choose a spreadsheet first."));
    }

    #[test]
    fn sheet_must_be_numeric() {
        let form = UploadForm {
            path: "rates.xlsx".into(),
            sheet: "first".into(),
            ..UploadForm::default()
        };
        assert_eq!(form.validate(), Err("Sheet must be a whole number."));
    }

    #[test]
    fn valid_form_yields_path_and_sheet() {
        let form = UploadForm {
            path: "  /tmp/rates.xlsx ".into(),
            sheet: " 2 ".into(),
            student: true,
            ..UploadForm::default()
        };
        assert_eq!(form.validate(), Ok(("/tmp/rates.xlsx".to_string(), 2)));
    }

    #[test]
    fn summary_mentions_skipped_rows() {
        assert_eq!(upload_summary("Uploaded", 0), "Uploaded");
        assert_eq!(upload_summary("Uploaded", 1), "Uploaded (1 row skipped)");
        assert_eq!(upload_summary("", 3), "Upload complete. (3 rows skipped)");
    }
}
