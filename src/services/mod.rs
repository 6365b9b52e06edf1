pub mod autocomplete_service;
pub mod diagnostic_logger;
pub mod emoji_index;
pub mod icon_cache_service;
pub mod image_interceptor;
pub mod native_render_service;
pub mod settings_service;
pub mod style_menu_service;
pub mod style_resolver;
