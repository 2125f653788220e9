//! Presentation-facing surface: the session facade plus helpers for a UI loop
//! that polls frames on a fixed cadence.

pub mod fps_meter;
pub mod frame_poller;
pub mod session_facade;
mod signaling_settings;

pub use fps_meter::{FPS_WINDOW, FpsMeter};
pub use frame_poller::{FramePoller, FrameRates, POLL_INTERVAL, PolledFrames};
pub use session_facade::SessionFacade;
