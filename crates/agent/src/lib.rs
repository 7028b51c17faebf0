//! Shared runtime for A2A agents.
//!
//! Every role (concierge, interpreter, carrier) serves the same HTTP surface:
//!
//! | Route | |
//! |---|---|
//! | `GET /healthz` | liveness |
//! | `GET /.well-known/agent.json` | [`AgentMeta`](a2a_contract::AgentMeta) |
//! | `POST /tasks` | submit a `CreateTask` |
//! | `GET /tasks/{id}` | poll a `Task` |
//! | `POST /tasks/{id}/events` | deliver an `Event` |
//!
//! A role only implements [`AgentService`]; [`router`] does the rest.
//! [`AgentClient`] is the calling side of the same contract.

mod args;
mod client;
mod context;
mod error;
pub mod logging;
mod server;
mod service;

pub use args::AgentArgs;
pub use client::{AgentClient, ClientConfig, ClientError};
pub use context::RequestContext;
pub use error::ApiError;
pub use server::{AgentState, ServerConfig, router, serve, shutdown_on_ctrl_c};
pub use service::AgentService;
