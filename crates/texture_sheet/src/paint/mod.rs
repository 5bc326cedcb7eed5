pub mod color;
pub mod font;
pub mod state;
