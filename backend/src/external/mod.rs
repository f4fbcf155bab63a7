//! External integrations

pub mod demand_oracle;
pub mod email;

pub use demand_oracle::{DemandOracle, HttpDemandOracle, UnconfiguredOracle};
pub use email::{EmailSink, NotificationSink};
