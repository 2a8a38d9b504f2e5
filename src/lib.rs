pub mod api;
pub mod model;
pub mod settings;

pub use api::{Error, TalentMonitor};
