pub mod error;
pub mod temp;
