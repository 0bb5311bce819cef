pub mod config;
pub mod error;
pub mod identity;
pub mod module;
pub mod types;

pub use config::ServiceConfig;
pub use error::ServiceError;
pub use identity::CurrentUser;
pub use module::Module;
pub use types::{new_id, now_rfc3339};
