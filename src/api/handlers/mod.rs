pub mod health;
pub mod metrics;
pub mod ml;
pub mod workers;
