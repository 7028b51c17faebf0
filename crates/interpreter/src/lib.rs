//! `INTERPRET` agent: turns a free-text shipping request into the structured
//! input pricing agents expect.
//!
//! Two strategies sit behind [`Interpreter`]: an OpenAI-compatible model
//! ([`LlmInterpreter`]) and deterministic keyword rules ([`RuleInterpreter`]).
//! [`FallbackInterpreter`] tries the first and falls back to the second.

mod error;
mod fallback;
mod input;
mod llm;
mod rules;
mod service;

pub use error::InterpretError;
pub use fallback::{FallbackInterpreter, Interpreter};
pub use input::{Location, Parcel, QuoteInput, QuoteOptions};
pub use llm::{LlmConfig, LlmInterpreter};
pub use rules::RuleInterpreter;
pub use service::InterpretService;
