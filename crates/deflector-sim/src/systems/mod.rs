//! Per-tick simulation systems.
//!
//! Each system makes one pass over the world; the engine fixes their order.

pub mod body_motion;
pub mod collision;
pub mod interceptor;
pub mod snapshot;
