pub mod agenda;
pub mod dashboard;
pub mod plants;

pub use agenda::AgendaScreen;
pub use dashboard::DashboardScreen;
pub use plants::PlantsScreen;
