pub mod cli;
pub mod component;
pub mod signal;
pub mod tools;
