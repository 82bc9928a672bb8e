pub use board::*;
pub use cell::*;
pub use difficulty::*;
pub use engine::*;
pub use error::*;
pub use feedback::*;
pub use generator::*;
pub use ranking::*;
pub use session::*;
pub use types::*;

mod board;
mod cell;
mod difficulty;
mod engine;
mod error;
mod feedback;
mod generator;
mod ranking;
mod session;
mod types;
