pub mod body;
pub mod identity;
pub mod request_log;

pub use body::JsonBody;
pub use identity::USER_HEADER;
pub use request_log::request_log_middleware;
