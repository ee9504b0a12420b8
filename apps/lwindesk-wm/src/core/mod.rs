pub mod backend;
pub mod event;
pub mod geometry;
pub mod headless;
pub mod output;
