pub mod peer;
pub mod peer_action;
pub mod relay;
