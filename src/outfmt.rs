pub mod csv;
pub mod model;
pub mod text;
