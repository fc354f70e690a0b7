//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Timers and frame callbacks (`Scheduler`)
//! - The UI tree: focus, classes, attributes, text (`Dom`)
//! - Viewport measurement
//!
//! The browser implementations live in `web` (wasm32 only). `MemoryDom` and
//! `ManualScheduler` drive the native build and the tests.

pub mod dom;
pub mod memory;
pub mod scheduler;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use dom::{Dom, KeyInput, Viewport};
pub use memory::{MemoryDom, NodeId};
pub use scheduler::{FrameTask, ManualScheduler, Scheduler, Task, TimerId};
