pub mod color;
pub mod model;
pub mod scene;
pub mod style;
pub mod viewport;

pub use color::{Color, Fill};
pub use model::*;
pub use scene::{Layer, Scene};
pub use style::Style;
pub use viewport::Viewport;
