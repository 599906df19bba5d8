mod auth;
mod configs;
mod intent;

pub use auth::*;
pub use configs::*;
pub use intent::*;
