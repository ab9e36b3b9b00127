//! Pointer input
//!
//! Mouse and touch are merged into one pointer; the secondary button and
//! wheel drive the camera.

mod state;

pub use state::{CameraInput, InputState, PointerSample};
