pub mod domain;
pub mod error;
pub mod invoice;
mod lenient;
pub mod protocol;

pub use lenient::parse_amount;
