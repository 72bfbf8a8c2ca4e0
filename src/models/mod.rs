pub mod achievement;
pub mod alert;
pub mod plant;
pub mod profile;
pub mod schedule;
pub mod weather;

pub use achievement::*;
pub use alert::*;
pub use plant::*;
pub use profile::*;
pub use schedule::*;
pub use weather::*;
