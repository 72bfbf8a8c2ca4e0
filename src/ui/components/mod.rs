pub mod gauge;
pub mod input;
pub mod nav;

pub use gauge::{humidity_gauge, rain_gauge, temperature_gauge, uv_gauge};
pub use input::InputWidget;
pub use nav::nav_bar;
