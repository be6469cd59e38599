pub mod app_settings;
pub mod app_state;
pub mod frame_clock;
pub mod loader;
pub mod messages;
