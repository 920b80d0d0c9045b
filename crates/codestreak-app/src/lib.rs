// Application and presentation layers for the reminder service.
// `main.rs` wires these together; tests drive them through this library.

pub mod application;
pub mod presentation;
