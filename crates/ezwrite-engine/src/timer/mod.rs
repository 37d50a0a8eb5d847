//! Inline timers: directive parsing, wall-clock anchored runtimes and the
//! per-page board that keeps runtimes attached to their lines.

pub mod board;
pub mod clock;
pub mod runtime;
pub mod spec;

pub use board::{TimerBoard, TimerId, TimerView};
pub use clock::{Clock, ManualClock, SystemClock};
pub use runtime::{Phase, TimerControl, TimerEvent, TimerRuntime, format_time};
pub use spec::{TimerMode, TimerSpec};
