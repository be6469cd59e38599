pub mod glow;
pub mod hero;
pub mod palette;
pub mod spotlight;
