pub mod console;

pub use console::{INVALID_ROOM_MESSAGE, SessionSummary, run_session};
