//! Agent plugin boundary.
//!
//! ## Key Types
//!
//! - `Agent`: one strategy instance in one seat
//! - `AgentModule`: version probe plus instance constructor
//! - `ModuleResolver`: maps a seat's module path to a module
//! - `ModuleRegistry`: in-process resolver (falls back to `ProcessModule`)
//! - `ProcessModule`: strategy behind a child process speaking JSON lines

pub mod builtin;
pub mod process;
pub mod registry;
pub mod traits;

pub use builtin::{PassiveAgent, PassiveModule, RandomAgent, RandomConfig, RandomModule};
pub use process::{ProcessModule, PROCESS_PREFIX};
pub use registry::ModuleRegistry;
pub use traits::{instantiate, Agent, AgentModule, ModuleResolver, AGENT_ABI_VERSION};
