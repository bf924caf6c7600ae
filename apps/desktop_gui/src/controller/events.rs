//! Backend-to-UI events for the desktop GUI.

use client_core::RemoteOutcome;

pub enum UiEvent {
    Status(String),
    Completed(RemoteOutcome),
    BackendStartupFailed(String),
}

/// Short status line describing a finished remote call.
pub fn outcome_status(outcome: &RemoteOutcome) -> String {
    match outcome {
        RemoteOutcome::Loaded(Ok(users)) => format!("Loaded {} users", users.len()),
        RemoteOutcome::Loaded(Err(err)) => format!("Could not load users: {err}"),
        RemoteOutcome::Created(Ok(user)) => format!("Created user #{}", user.id.0),
        RemoteOutcome::Updated(Ok(user)) => format!("Updated user #{}", user.id.0),
        RemoteOutcome::Deleted {
            user_id,
            result: Ok(()),
        } => format!("Deleted user #{}", user_id.0),
        RemoteOutcome::Created(Err(_))
        | RemoteOutcome::Updated(Err(_))
        | RemoteOutcome::Deleted { result: Err(_), .. } => "Last request failed".to_string(),
    }
}
