pub mod catalog;
pub mod player;
pub mod profile;

pub use catalog::*;
pub use player::*;
pub use profile::*;
