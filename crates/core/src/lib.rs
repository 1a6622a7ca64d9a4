#![forbid(unsafe_code)]

pub mod model;
pub mod session;
pub mod time;

pub use session::{QuizSession, SessionError, SessionState};
pub use time::Clock;
