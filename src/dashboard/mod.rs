pub mod chart;
pub use chart::*;

pub mod interaction;
pub use interaction::*;

pub mod render;
pub use render::*;
