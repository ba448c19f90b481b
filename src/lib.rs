pub mod config;
pub mod geometry;
pub mod input;
pub mod interaction;
pub mod presentation;
pub mod render;
pub mod scene;
