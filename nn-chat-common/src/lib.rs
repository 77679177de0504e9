pub mod model;
pub mod theme;
pub mod time_display;
pub mod token;
