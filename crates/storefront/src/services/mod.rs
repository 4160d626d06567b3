//! Side-effecting delivery services, kept out of the domain crate.
//!
//! Today that is just [`email`]: transactional SMTP for order
//! confirmations, operator notifications, and the contact relay.

pub mod email;

pub use email::{ContactMessage, EmailError, EmailService};
