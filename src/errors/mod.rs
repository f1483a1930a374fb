pub mod core_error;
pub mod service_error;

pub use core_error::CoreError;
pub use service_error::ServiceError;
