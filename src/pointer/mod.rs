// Pointer module - synthetic mouse input.
// `PointerDevice` is the raw move/click capability; `PointerActuator` adds
// timed movement, repeated clicks and best-effort error handling on top.

pub mod actuator;
pub mod device;

pub use actuator::PointerActuator;
pub use device::{DryRunPointer, EnigoPointer, PointerDevice};
