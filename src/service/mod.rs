pub mod batch;
pub mod implementations;
pub mod trait_service;

pub use implementations::etox_service::EToxService;
pub use trait_service::ToxicityService;
