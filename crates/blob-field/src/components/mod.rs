pub mod blob;
pub mod palette;
