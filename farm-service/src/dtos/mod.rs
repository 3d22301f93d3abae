pub mod flows;
pub mod reports;

pub use flows::*;
pub use reports::*;
