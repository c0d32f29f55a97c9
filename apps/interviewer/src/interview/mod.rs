// Interview session: planning, question sequencing, the pure state machine,
// feedback, and the orchestrator that ties them to real collaborators.

pub mod feedback;
pub mod orchestrator;
pub mod planner;
pub mod prompts;
pub mod sequencer;
pub mod state;

pub use orchestrator::{Interviewer, SessionSummary};
