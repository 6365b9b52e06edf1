pub mod emoji;
pub mod picker;
pub mod render;
pub mod settings;
