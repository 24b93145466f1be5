pub mod auth;
pub mod form;
pub mod holding;
pub mod metrics;
pub mod notification;
pub mod snapshot;
pub mod symbol;
