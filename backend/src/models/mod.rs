pub mod student;

pub use student::{Group, Student};
