pub mod supervisor;

pub use supervisor::SupervisorGateway;
