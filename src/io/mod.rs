pub mod binary_reader;
pub mod file_type;
pub mod path;

pub use binary_reader::{BinaryReader, Endian};
pub use file_type::FileTypeResolver;
pub use path::resolve_relative;
