//! Google Calendar store for meetup-sidebar.
//!
//! The provider manages its own credentials and tokens:
//!   ~/.config/meetup-sidebar/google/app_config.toml
//!   ~/.config/meetup-sidebar/google/session.toml

pub mod app_config;
pub mod authenticate;
pub mod calendar;
pub mod session;

pub use authenticate::authenticate;
pub use calendar::GoogleCalendar;
pub use session::Session;
