pub mod coords;
pub mod marker;
pub mod text;
pub mod world;

pub use coords::Projected;
pub use marker::*;
pub use text::{MISSING_TEXT, TextCatalog};
pub use world::*;
