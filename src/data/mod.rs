pub mod history;
pub mod loader;
pub mod normalize;
pub mod table;

pub use table::{Cell, Table};
