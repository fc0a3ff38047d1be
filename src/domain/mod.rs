// Domain layer - CRM records and the pure dashboard aggregation
pub mod aggregation;
pub mod customer;
pub mod dashboard;
pub mod deal;
pub mod interaction;
mod labels;
mod lenient;
pub mod money;
pub mod page;
pub mod resource;
pub mod timestamp;
