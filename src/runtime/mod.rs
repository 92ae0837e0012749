//! # Runtime Module
//!
//! Process-level plumbing: initialization, the metrics and probe server,
//! the controller watch loop and its error policy.

pub mod error_policy;
pub mod initialization;
pub mod server;
pub mod watch_loop;

pub use error_policy::*;
pub use initialization::*;
pub use server::{start_server, ServerState};
pub use watch_loop::*;
