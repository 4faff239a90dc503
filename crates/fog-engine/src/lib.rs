//! The paint engine front-end: state stack, command/calc zone, ST/MT
//! worker pool, and the `Context` facade user code actually calls.
//!
//! `spec.md` §1 module 4: "the stateful facade (save/restore stack,
//! transform stack, clip stack, source, operator, stroke params, font)
//! that translates user calls into work items", plus the worker pool that
//! drains them (§4.7).

mod command;
mod config;
mod context;
mod error;
mod render;
mod serializer;
mod state;
mod worker;
mod zone;

pub use command::{Calc, Command};
pub use config::{EngineConfig, StdThreadPool, ThreadPool};
pub use context::{Context, FlushMode};
pub use error::{EngineError, ErrorCode};
pub use serializer::{MtSerializer, Serializer, StSerializer};
pub use state::{AntialiasingMode, GeometricPrecision, PaintHints, PaintState, RenderQuality, StateStack};
pub use worker::{Band, WorkerContext};
