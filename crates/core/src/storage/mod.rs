//! Client-side persistence for STREAMIA
//!
//! Only two values are ever persisted: the session token and the
//! signed-in user's display name. Both live behind [`KeyValueStore`].

mod memory;
mod schema;
mod sqlite;
mod tokens;
mod traits;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use tokens::{DisplayNameStore, TokenStore, DISPLAY_NAME_KEY, TOKEN_KEY};
pub use traits::KeyValueStore;
