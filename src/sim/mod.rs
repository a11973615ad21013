//! Character simulation
//!
//! Frame-driven and single-threaded. The controller owns the body; the
//! resolver borrows it mutably for one operation at a time and the probe
//! only reads it. Nothing here touches rendering or the platform.

pub mod controller;
pub mod probe;
pub mod resolver;
pub mod session;
pub mod state;

pub use controller::{FrameReport, MovementController};
pub use probe::CameraObstructionProbe;
pub use resolver::{CollisionResolver, MoveOutcome};
pub use session::{AnimationSink, Control, Session};
pub use state::{Body, InputState, MovementDirection, MovementState, RotationDirection, Transform};
