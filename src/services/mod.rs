pub mod resource_service;

pub use resource_service::{ResourcePage, ResourceService, ServiceError};
