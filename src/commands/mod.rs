pub mod diagnostic_logging;
pub mod emoji;
pub mod menu;
pub mod settings;
