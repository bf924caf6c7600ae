//! Queues controller commands onto the backend worker.

use client_core::RemoteCommand;
use crossbeam_channel::{Sender, TrySendError};

pub fn dispatch_backend_commands(
    cmd_tx: &Sender<RemoteCommand>,
    commands: Vec<RemoteCommand>,
    status: &mut String,
) {
    for cmd in commands {
        let cmd_name = cmd.name();
        match cmd_tx.try_send(cmd) {
            Ok(()) => tracing::debug!(command = cmd_name, "queued ui->backend command"),
            Err(TrySendError::Full(_)) => {
                *status = "UI command queue is full; please retry".to_string();
            }
            Err(TrySendError::Disconnected(_)) => {
                *status =
                    "Backend command processor disconnected (possible startup failure); restart the app"
                        .to_string();
            }
        }
    }
}
