//! Daily exchange rates, as published by the central bank.

pub mod boi;
mod memory;
mod model;

pub use self::memory::*;
pub use self::model::*;
