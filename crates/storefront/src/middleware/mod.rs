//! Tower middleware; today that is just the session layer.

pub mod session;

pub use session::create_session_layer;
