//! STREAMIA client application
//!
//! Session handling, form and page view models, the route guard, the
//! playback overlay, and a line-oriented shell that drives them against
//! the STREAMIA backend.

pub mod config;
pub mod error;
pub mod events;
pub mod forms;
pub mod pages;
pub mod player;
pub mod routes;
pub mod session;
pub mod shell;

#[cfg(test)]
mod testing;

pub use config::{data_dir, AppConfig};
pub use error::{Error, Result};
pub use events::{EventHub, Subscription};
pub use routes::{guard, Route, RouteDecision};
pub use session::{SessionState, SessionStore};
pub use shell::{Command, Shell};
