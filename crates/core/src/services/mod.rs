pub mod auth_service;
pub mod enrichment_service;
pub mod metrics_service;
