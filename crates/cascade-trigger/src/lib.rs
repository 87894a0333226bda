//! Trigger and join decision engine for Cascade.
//!
//! Invoked once per finished build, [`TriggerOrchestrator`] fans out over the
//! workflow successors of the completed job, starts the unconditional ones,
//! and gates join nodes on the success of all their upstream jobs within the
//! same event. [`RemoteTrigger`] realizes trigger edges that cross pipeline
//! boundaries by creating a new event in the target pipeline.

pub mod join;
pub mod orchestrator;
pub mod remote;
pub mod starter;

pub use orchestrator::{BranchOutcome, TriggerOrchestrator};
pub use remote::RemoteTrigger;
pub use starter::BuildStarter;
