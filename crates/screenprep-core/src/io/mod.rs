pub mod image_io;
pub mod paths;
pub mod store;

pub use store::{FsImageStore, ImageStore};
