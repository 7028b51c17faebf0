//! Concierge: the orchestrating agent.
//!
//! `QUOTE` requests are interpreted when needed, fanned out to every pricing
//! agent and aggregated under a deadline. `SHIP` requests are delegated to a
//! single agent.

mod config;
mod discovery;
mod fanout;
mod interpret;
mod service;

pub use config::ConciergeConfig;
pub use discovery::discover_agents;
pub use fanout::{BranchFailure, QuoteReport, gather_quotes};
pub use interpret::{needs_interpretation, utterance_for};
pub use service::ConciergeService;
