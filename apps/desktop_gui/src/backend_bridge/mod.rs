//! Worker thread that runs remote commands off the UI thread.

pub mod runtime;
