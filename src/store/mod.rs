pub mod index;
pub mod line_io;

pub use index::IndexReader;
