//! Business objects for farm-service.

mod customer;
mod flavor;
mod land;
mod plant;
mod tac;

pub use customer::{Customer, CreateCustomer};
pub use flavor::Flavor;
pub use land::Land;
pub use plant::{CreatePlant, Plant};
pub use tac::Tac;
