pub mod codes;
pub mod error;
pub mod headers;
pub mod ids;
pub mod meta;
pub mod outcome;
pub mod status;
pub mod task;
pub mod task_types;
pub mod validate;

pub use codes::{ErrorCode, ErrorPayload};
pub use error::ContractError;
pub use ids::TaskId;
pub use meta::{AgentCapability, AgentMeta, AuthScheme, AuthSpec, CONTRACT_VERSION};
pub use outcome::TaskOutcome;
pub use status::{TaskStatus, can_transition};
pub use task::{CreateTask, Event, EventKind, Task, TaskAck, TaskUpdate};
pub use validate::{is_empty_input, validate_create_task};
