//! Session control: the negotiation state machine, the worker thread that
//! runs it, and the errors and notifications it reports.
pub mod events;
pub mod negotiation_state;
mod negotiation_worker;
pub mod orchestrator;
pub mod session_error;
pub mod session_observer;
mod session_shared;

pub use events::EngineEvent;
pub use negotiation_state::NegotiationState;
pub use orchestrator::{NegotiationOrchestrator, SessionDeps};
pub use session_error::SessionError;
pub use session_observer::{NoopSessionObserver, SessionObserver};
pub use session_shared::StopHandle;
