//! Runtime bridge between the UI command queue and backend event intake.

use std::{sync::Arc, thread};

use client_core::{execute, HttpUsersApi, LocalUsersApi, RemoteCommand, UsersApi};
use crossbeam_channel::{Receiver, Sender};

use crate::controller::events::UiEvent;

#[derive(Debug, Clone)]
pub enum BackendTarget {
    Remote { api_url: String },
    Offline,
}

fn build_api(target: &BackendTarget) -> Result<(Arc<dyn UsersApi>, String), String> {
    match target {
        BackendTarget::Remote { api_url } => {
            let api = HttpUsersApi::new(api_url).map_err(|err| format!("{err:#}"))?;
            let label = format!("Using users API at {}", api.base_url());
            let api: Arc<dyn UsersApi> = Arc::new(api);
            Ok((api, label))
        }
        BackendTarget::Offline => {
            let api: Arc<dyn UsersApi> = Arc::new(LocalUsersApi::with_sample_users());
            Ok((api, "Offline mode: changes stay in memory".to_string()))
        }
    }
}

/// Starts the worker thread. Every command runs as its own task, so
/// overlapping requests complete in whatever order the service answers.
pub fn launch(target: BackendTarget, cmd_rx: Receiver<RemoteCommand>, ui_tx: Sender<UiEvent>) {
    thread::spawn(move || {
        let _ = ui_tx.try_send(UiEvent::Status("Backend worker starting...".to_string()));
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::BackendStartupFailed(format!(
                    "failed to build runtime: {err}"
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        let (api, label) = match build_api(&target) {
            Ok(built) => built,
            Err(reason) => {
                tracing::error!(%reason, "invalid users api configuration");
                let _ = ui_tx.try_send(UiEvent::BackendStartupFailed(reason));
                return;
            }
        };
        tracing::info!(?target, "backend worker ready");
        let _ = ui_tx.try_send(UiEvent::Status(label));

        while let Ok(cmd) = cmd_rx.recv() {
            let api = Arc::clone(&api);
            let ui_tx = ui_tx.clone();
            runtime.spawn(async move {
                let outcome = execute(api.as_ref(), cmd).await;
                if ui_tx.send(UiEvent::Completed(outcome)).is_err() {
                    tracing::debug!("ui event receiver dropped; discarding outcome");
                }
            });
        }
        tracing::info!("ui command queue closed; backend worker exiting");
    });
}
