pub mod debounce;
pub mod static_tables;
