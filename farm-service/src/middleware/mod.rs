pub mod principal;

pub use principal::Principal;
