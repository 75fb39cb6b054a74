pub mod auth;
pub mod clock;
pub mod config;
pub mod error;
pub mod manager;
pub mod model;
pub mod queue;
pub mod recent;
pub mod undo;

pub use manager::{HistoryStep, TaskManager};
