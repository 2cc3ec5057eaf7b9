mod file;
mod mem;

pub use file::FileKv;
pub use mem::MemKv;
