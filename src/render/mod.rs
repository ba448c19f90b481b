pub mod frame;
pub mod painter;
pub mod words;
