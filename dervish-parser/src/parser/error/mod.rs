pub mod kind;

pub use dervish_error::Error;
