mod display;
mod engine;
mod erp;
mod session;

pub use display::{format_clock, progress_fraction, rotating_index, segment_index};
pub use engine::TimerEngine;
pub use erp::{ErpEvent, ErpRunner, ErpSession, Foreground};
pub use session::{Phase, SessionConfig};
