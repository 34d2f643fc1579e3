pub mod configuration;
pub mod domain;
pub mod fedex;
pub mod routes;
pub mod startup;
pub mod telemetry;
pub mod tracking;
