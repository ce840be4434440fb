//! STREAMIA Core Library
//!
//! Domain models, form validation, the built-in movie catalog, and the
//! key-value persistence used for the session token.

pub mod catalog;
pub mod error;
pub mod models;
pub mod security;
pub mod storage;

pub use catalog::{filter_by_title, Catalog};
pub use error::{Error, Result};
pub use models::*;
pub use security::{
    looks_like_email, parse_age, password_strength_color, password_strength_label, sanitize_input,
    validate_age, validate_age_input, validate_email, validate_name, validate_password,
    PasswordReport, PasswordRequirements, ValidationReport,
};
pub use storage::{
    DisplayNameStore, KeyValueStore, MemoryStore, SqliteStore, TokenStore, DISPLAY_NAME_KEY,
    TOKEN_KEY,
};
