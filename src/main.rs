#![cfg_attr(target_os = "windows", windows_subsystem = "windows")]

use std::env;

use dioxus::prelude::*;
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

#[cfg(feature = "desktop")]
use dioxus_desktop::{
    tao::{dpi::LogicalSize, window::WindowBuilder},
    Config as DesktopConfig,
};

use intl_rates::{app, util::version::APP_NAME};

fn main() {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    apply_wayland_workarounds();

    let builder = LaunchBuilder::new();

    #[cfg(feature = "desktop")]
    let builder = {
        let config = desktop! {
            DesktopConfig::new().with_window(
                WindowBuilder::new()
                    .with_title(APP_NAME)
                    .with_inner_size(LogicalSize::new(960.0, 900.0))
                    .with_min_inner_size(LogicalSize::new(520.0, 640.0))
            )
        };
        builder.with_cfg(config)
    };

    #[cfg(not(feature = "desktop"))]
    let builder = builder;

    debug!("Launching {APP_NAME}");
    builder.launch(app::App);
}

/// Only touches variables the caller has not set.
fn apply_wayland_workarounds() {
    if env::var("WAYLAND_DISPLAY").is_err() {
        return;
    }
    // Explicit sync crashes on some drivers.
    if env::var("WGPU_BACKEND").is_err() {
        env::set_var("WGPU_BACKEND", "gl");
    }
    if env::var("WEBKIT_DISABLE_DMABUF_RENDERER").is_err() {
        env::set_var("WEBKIT_DISABLE_DMABUF_RENDERER", "1");
    }
}
