pub mod app;
pub mod render;
pub mod screens;
pub mod stack;
pub mod surface;
pub mod wizard;

pub use app::run;
