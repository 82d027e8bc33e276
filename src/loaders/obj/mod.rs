//! Wavefront OBJ geometry and MTL material libraries.

mod index;
mod parse_mtl;
mod parse_obj;
mod types;

pub use parse_mtl::{load_mtl, parse_mtl};
pub use parse_obj::{load_obj, load_obj_from_reader, load_obj_from_str};
pub use types::LoadOptions;
