pub mod config;
pub mod constants;
pub mod gateway;
pub mod logging;
pub mod model;
