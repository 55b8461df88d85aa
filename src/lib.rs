pub mod fx;
pub mod outfmt;
pub mod peripheral;
pub mod render;
pub mod sheet;
pub mod spc;
pub mod tracing;
pub mod util;

extern crate lazy_static;

#[cfg(any(test, feature = "testlib"))]
pub mod testlib;
