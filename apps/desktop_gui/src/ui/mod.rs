//! UI layer for the desktop GUI: app shell, form and list panels.

pub mod app;

pub use app::UserAdminApp;
