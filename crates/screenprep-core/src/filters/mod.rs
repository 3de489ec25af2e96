pub mod stretch;
