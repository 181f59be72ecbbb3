pub mod error;
pub mod handlers;
pub mod messages;
pub mod router;
pub mod types;

pub use error::ApiError;
pub use messages::Messages;
pub use router::create_router;
pub use types::*;
