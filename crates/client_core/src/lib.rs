//! Client-side core for user administration: the remote users API, the
//! application controller and the form/list view models driven by it.

pub mod api;
pub mod config;
pub mod controller;
pub mod error;
pub mod form;
pub mod list_view;
pub mod local;

pub use api::{HttpUsersApi, UsersApi};
pub use controller::{
    execute, AppController, Intent, Notification, NotificationContext, RemoteCommand,
    RemoteOutcome, View,
};
pub use error::RemoteError;
pub use form::{FormError, FormField, FormMode, UserForm};
pub use list_view::{EmptyState, ListView};
pub use local::LocalUsersApi;
