mod backend;
mod config;
mod error;
mod glare;
pub mod native;
mod session;
mod signaling;

pub use backend::*;
pub use config::*;
pub use error::*;
pub use glare::*;
pub use session::*;
pub use signaling::*;
