// Submodules for separation of concerns
mod core;
mod ops;

pub use core::{Collection, Store};
