//! Task types understood by the agents in this workspace.

pub const QUOTE: &str = "QUOTE";
pub const SHIP: &str = "SHIP";
pub const INTERPRET: &str = "INTERPRET";
