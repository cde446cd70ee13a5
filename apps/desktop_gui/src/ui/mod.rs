//! UI layer for desktop GUI: app shell, login form, and landing screen.

pub mod app;
pub mod landing;
pub mod login;

pub use app::{SchedulerApp, StartupConfig, LOGIN_SETTINGS_STORAGE_KEY};
pub use login::PersistedLoginSettings;
