//! Deployment task engine for ember.
//!
//! [`DeploymentEngine`] is the capability boundary the CLI programs
//! against: one method per deployment workflow, taking the resolved
//! [`TaskContext`] and a progress stream. Tests substitute a recording
//! implementation; [`RegistryEngine`] is the shipped one, driving a
//! project registry contract over JSON-RPC.

mod error;
mod registry;
mod task;

pub use error::{EngineError, EngineResult};
pub use registry::{RegistryEngine, DEFAULT_REGISTRY};
pub use task::{
    ApproveOptions, DeployOptions, DeployedContract, DeploymentEngine, DeploymentStatus,
    MonitorOptions, ProposeOptions, TaskContext,
};
