mod clock;
mod constants;
mod game;
mod projector;

pub mod util;

pub use clock::*;
pub use constants::*;
pub use game::*;
pub use projector::*;
