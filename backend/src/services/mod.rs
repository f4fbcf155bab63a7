//! Business logic services for the Microgreen Grower Portal

pub mod forecast;
pub mod inventory;
pub mod notification;
pub mod order;
pub mod production;
pub mod reporting;

pub use forecast::ForecastService;
pub use inventory::InventoryService;
pub use notification::NotificationService;
pub use order::OrderService;
pub use production::ProductionService;
pub use reporting::ReportingService;
