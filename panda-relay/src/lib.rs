mod relay;
mod router;

pub use relay::*;
pub use router::*;
