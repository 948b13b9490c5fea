pub mod aggregator;
pub mod notification;
pub mod order_service;
