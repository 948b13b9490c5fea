pub mod metrics;
pub mod order;
pub mod role;
