//! Application state for the user administration front ends.
//!
//! The controller owns the mirrored collection, the edit target and the
//! active view. Front ends feed it [`Intent`]s and get back the
//! [`RemoteCommand`]s to run; finished calls come back as [`RemoteOutcome`]s.
//! Nothing in here performs I/O on its own, so a GUI can run the commands on
//! a worker while a CLI or test settles them inline.

use shared::domain::{NewUser, UserId, UserRecord};
use tracing::{error, info, warn};

use crate::{
    api::UsersApi,
    error::RemoteError,
    form::{FormField, UserForm},
    list_view::ListView,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Form,
    List,
}

impl View {
    pub fn label(self) -> &'static str {
        match self {
            View::Form => "Register",
            View::List => "Users",
        }
    }
}

/// Operator action emitted by a view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    FieldChanged { field: FormField, value: String },
    SubmitRequested,
    EditRequested(UserId),
    DeleteRequested(UserId),
    SearchChanged(String),
    ViewSelected(View),
    NotificationDismissed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteCommand {
    LoadUsers,
    CreateUser(NewUser),
    UpdateUser(UserRecord),
    DeleteUser(UserId),
}

impl RemoteCommand {
    pub fn name(&self) -> &'static str {
        match self {
            RemoteCommand::LoadUsers => "load_users",
            RemoteCommand::CreateUser(_) => "create_user",
            RemoteCommand::UpdateUser(_) => "update_user",
            RemoteCommand::DeleteUser(_) => "delete_user",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteOutcome {
    Loaded(Result<Vec<UserRecord>, RemoteError>),
    Created(Result<UserRecord, RemoteError>),
    Updated(Result<UserRecord, RemoteError>),
    Deleted {
        user_id: UserId,
        result: Result<(), RemoteError>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationContext {
    Create,
    Update,
    Delete,
}

impl NotificationContext {
    fn verb(self) -> &'static str {
        match self {
            NotificationContext::Create => "create",
            NotificationContext::Update => "update",
            NotificationContext::Delete => "delete",
        }
    }
}

/// Failure the operator has to acknowledge before it goes away.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub context: NotificationContext,
    pub message: String,
}

impl Notification {
    fn from_failure(context: NotificationContext, err: &RemoteError) -> Self {
        Self {
            context,
            message: format!("Failed to {} user: {}", context.verb(), err.operator_reason()),
        }
    }
}

/// Runs one command against `api` and wraps the result for
/// [`AppController::complete`].
pub async fn execute(api: &dyn UsersApi, command: RemoteCommand) -> RemoteOutcome {
    match command {
        RemoteCommand::LoadUsers => RemoteOutcome::Loaded(api.list_users().await),
        RemoteCommand::CreateUser(user) => RemoteOutcome::Created(api.create_user(&user).await),
        RemoteCommand::UpdateUser(user) => RemoteOutcome::Updated(api.update_user(&user).await),
        RemoteCommand::DeleteUser(user_id) => RemoteOutcome::Deleted {
            user_id,
            result: api.delete_user(user_id).await,
        },
    }
}

#[derive(Debug, Default)]
pub struct AppController {
    users: Vec<UserRecord>,
    revision: u64,
    active_view: View,
    edit_target: Option<UserRecord>,
    form: UserForm,
    list: ListView,
    notification: Option<Notification>,
    initial_load_requested: bool,
}

impl AppController {
    pub fn new() -> Self {
        Self::default()
    }

    /// The startup fetch. Returns the command only on the first call.
    pub fn start(&mut self) -> Option<RemoteCommand> {
        if self.initial_load_requested {
            return None;
        }
        self.initial_load_requested = true;
        Some(RemoteCommand::LoadUsers)
    }

    pub fn users(&self) -> &[UserRecord] {
        &self.users
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn active_view(&self) -> View {
        self.active_view
    }

    pub fn edit_target(&self) -> Option<&UserRecord> {
        self.edit_target.as_ref()
    }

    pub fn form(&self) -> &UserForm {
        &self.form
    }

    pub fn list(&self) -> &ListView {
        &self.list
    }

    pub fn list_mut(&mut self) -> &mut ListView {
        &mut self.list
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    pub fn filtered_users(&mut self) -> Vec<&UserRecord> {
        self.list.filtered(&self.users, self.revision)
    }

    pub fn dispatch(&mut self, intent: Intent) -> Vec<RemoteCommand> {
        match intent {
            Intent::FieldChanged { field, value } => {
                self.form.set_field(field, value);
                Vec::new()
            }
            Intent::SubmitRequested => self.submit(),
            Intent::EditRequested(user_id) => {
                self.begin_edit(user_id);
                Vec::new()
            }
            Intent::DeleteRequested(user_id) => vec![RemoteCommand::DeleteUser(user_id)],
            Intent::SearchChanged(term) => {
                self.list.set_search_term(term);
                Vec::new()
            }
            Intent::ViewSelected(view) => {
                self.active_view = view;
                self.clear_edit_target();
                Vec::new()
            }
            Intent::NotificationDismissed => {
                self.notification = None;
                Vec::new()
            }
        }
    }

    pub fn complete(&mut self, outcome: RemoteOutcome) {
        match outcome {
            RemoteOutcome::Loaded(Ok(users)) => {
                info!(count = users.len(), "users: loaded");
                self.users = users;
                self.bump_revision();
            }
            RemoteOutcome::Loaded(Err(err)) => {
                error!(error = %err, "users: initial load failed");
            }
            RemoteOutcome::Created(Ok(user)) => {
                info!(user_id = user.id.0, "users: created");
                match self.users.iter_mut().find(|u| u.id == user.id) {
                    Some(slot) => {
                        warn!(user_id = user.id.0, "users: created id already present, replacing");
                        *slot = user;
                    }
                    None => self.users.push(user),
                }
                self.bump_revision();
            }
            RemoteOutcome::Created(Err(err)) => self.fail(NotificationContext::Create, &err),
            RemoteOutcome::Updated(Ok(user)) => {
                info!(user_id = user.id.0, "users: updated");
                if let Some(slot) = self.users.iter_mut().find(|u| u.id == user.id) {
                    *slot = user;
                    self.bump_revision();
                }
                self.clear_edit_target();
                self.active_view = View::List;
            }
            RemoteOutcome::Updated(Err(err)) => self.fail(NotificationContext::Update, &err),
            RemoteOutcome::Deleted {
                user_id,
                result: Ok(()),
            } => {
                info!(user_id = user_id.0, "users: deleted");
                self.users.retain(|u| u.id != user_id);
                self.bump_revision();
            }
            RemoteOutcome::Deleted {
                user_id,
                result: Err(err),
            } => {
                warn!(user_id = user_id.0, "users: delete rejected");
                self.fail(NotificationContext::Delete, &err);
            }
        }
    }

    /// Executes `commands` one after another and applies each outcome.
    pub async fn settle(&mut self, api: &dyn UsersApi, commands: Vec<RemoteCommand>) {
        for command in commands {
            let outcome = execute(api, command).await;
            self.complete(outcome);
        }
    }

    pub async fn dispatch_and_settle(&mut self, api: &dyn UsersApi, intent: Intent) {
        let commands = self.dispatch(intent);
        self.settle(api, commands).await;
    }

    fn submit(&mut self) -> Vec<RemoteCommand> {
        let user = match self.form.submit() {
            Ok(user) => user,
            Err(err) => {
                warn!(error = %err, "users: form submission blocked");
                return Vec::new();
            }
        };
        let command = match &self.edit_target {
            Some(target) => RemoteCommand::UpdateUser(user.with_id(target.id)),
            None => RemoteCommand::CreateUser(user),
        };
        self.clear_edit_target();
        vec![command]
    }

    fn begin_edit(&mut self, user_id: UserId) {
        let Some(user) = self.users.iter().find(|u| u.id == user_id).cloned() else {
            warn!(user_id = user_id.0, "users: edit requested for unknown id");
            return;
        };
        self.form.set_edit_target(Some(&user));
        self.edit_target = Some(user);
        self.active_view = View::Form;
    }

    fn clear_edit_target(&mut self) {
        self.edit_target = None;
        self.form.set_edit_target(None);
    }

    fn fail(&mut self, context: NotificationContext, err: &RemoteError) {
        error!(context = context.verb(), error = %err, "users: remote call failed");
        self.notification = Some(Notification::from_failure(context, err));
    }

    fn bump_revision(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
