//! Session API and interfaces
//!
//! [`SkySession`] ties the sensors, the astronomy engine and the drawing
//! surface together and drives the frame loop. Hosts observe it through
//! frame and event callbacks and stop it through a [`StopHandle`].

pub mod types;
pub mod scheduler;
pub mod session;
pub mod formatting;

pub use types::{OutputFormat, SessionError, SessionEvent, SessionResult, SessionState, SessionStatus, StopReason};
pub use scheduler::{FrameScheduler, Immediate, IntervalScheduler, LimitedScheduler};
pub use session::{CallbackHandle, EventCallback, FrameCallback, SkySession, StopHandle};
pub use formatting::{CsvFormatter, FrameFormatter, JsonFormatter, TextFormatter};
