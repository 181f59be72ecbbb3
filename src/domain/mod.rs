pub mod book;
pub mod lifecycle;
pub mod value_objects;

pub use book::*;
pub use lifecycle::*;
pub use value_objects::*;
