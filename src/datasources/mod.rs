pub mod catalog;
pub mod openweathermap;
pub mod simulated;

pub use catalog::{PlantDataSource, PresetCatalog};
pub use openweathermap::OpenWeatherMapClient;
pub use simulated::SimulatedWeather;
