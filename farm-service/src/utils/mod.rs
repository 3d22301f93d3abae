pub mod password;

pub use password::{hash_password_blocking, verify_password_blocking, Password};
