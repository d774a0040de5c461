mod rtc_backend;
mod rtc_connection;
mod synthetic_media;

pub use rtc_backend::*;
pub use rtc_connection::*;
pub use synthetic_media::*;
