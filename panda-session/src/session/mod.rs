mod clock;
mod negotiation;
mod session;
mod session_command;
mod session_event;

pub use clock::*;
pub use negotiation::*;
pub use session::*;
pub use session_command::*;
pub use session_event::*;
