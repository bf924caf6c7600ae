mod backend_bridge;
mod controller;
mod ui;

use clap::Parser;
use client_core::{config::resolve_api_url, RemoteCommand};
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;

use crate::backend_bridge::runtime::{launch, BackendTarget};
use crate::controller::events::UiEvent;
use crate::ui::UserAdminApp;

#[derive(Parser, Debug)]
#[command(about = "Desktop administration for registered users")]
struct Args {
    /// Users API base url; falls back to USER_ADMIN_API_URL, then the local default.
    #[arg(long)]
    api_url: Option<String>,
    /// Keep everything in memory instead of talking to a users service.
    #[arg(long)]
    offline: bool,
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let args = Args::parse();

    let target = if args.offline {
        BackendTarget::Offline
    } else {
        BackendTarget::Remote {
            api_url: resolve_api_url(args.api_url),
        }
    };

    let (cmd_tx, cmd_rx) = bounded::<RemoteCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(1024);
    launch(target, cmd_rx, ui_tx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("User Admin")
            .with_inner_size([900.0, 640.0])
            .with_min_inner_size([640.0, 480.0]),
        ..Default::default()
    };
    eframe::run_native(
        "User Admin",
        options,
        Box::new(|_cc| Ok(Box::new(UserAdminApp::new(cmd_tx, ui_rx)))),
    )
}
