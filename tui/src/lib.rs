pub mod app;
pub mod config;
pub mod event;
pub mod ui;

pub use crate::app::App;
pub use crate::config::{load_config, Config};
pub use crate::event::{Event, EventHandler};
