mod backend_bridge;
mod controller;
mod ui;

use clap::Parser;
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::ui::{PersistedLoginSettings, SchedulerApp, StartupConfig, LOGIN_SETTINGS_STORAGE_KEY};

#[derive(Parser, Debug)]
#[command(about = "Desktop client for browsing and claiming shifts")]
struct Args {
    /// Scheduling API base URL; overrides settings and the last-used server.
    #[arg(long)]
    api_url: Option<String>,
    /// Prefill the sign-in email.
    #[arg(long)]
    email: Option<String>,
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let args = Args::parse();

    let mut settings = client_core::load_settings();
    let api_url_pinned = args.api_url.is_some();
    if let Some(api_url) = args.api_url {
        settings.api_url = api_url;
    }
    let startup = StartupConfig {
        api_url: settings.api_url.clone(),
        api_url_pinned,
        email: args.email,
    };

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(2048);
    backend_bridge::runtime::launch(settings, cmd_rx, ui_tx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Shift Scheduler")
            .with_inner_size([1100.0, 760.0])
            .with_min_inner_size([820.0, 560.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Shift Scheduler",
        options,
        Box::new(|cc| {
            let persisted = cc.storage.and_then(|storage| {
                storage
                    .get_string(LOGIN_SETTINGS_STORAGE_KEY)
                    .and_then(|text| serde_json::from_str::<PersistedLoginSettings>(&text).ok())
            });
            Ok(Box::new(SchedulerApp::new(cmd_tx, ui_rx, startup, persisted)))
        }),
    )
}
