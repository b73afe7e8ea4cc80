//! Stack growth for the checker and coercer.
//!
//! Both walk the descriptor tree and the data tree in lockstep, one native
//! frame per nesting level. A document nested a few hundred thousand levels
//! deep (easy to produce with generated JSON) would exhaust a default thread
//! stack long before the walk finished. Every recursive frame goes through
//! [`with_stack`], which grows the stack on demand.
//!
//! On `wasm32` the closure is called directly.

/// Remaining stack below which a new segment is allocated.
const RED_ZONE: usize = 64 * 1024;

/// Size of each newly allocated stack segment.
const SEGMENT_SIZE: usize = 2 * 1024 * 1024;

/// Run `f`, first growing the stack if fewer than [`RED_ZONE`] bytes remain.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn with_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub fn with_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

/// Bytes of stack left on the current segment, if the platform reports it.
#[cfg(not(target_arch = "wasm32"))]
pub fn remaining() -> Option<usize> {
    stacker::remaining_stack()
}

#[cfg(target_arch = "wasm32")]
pub fn remaining() -> Option<usize> {
    None
}
