//! Stack growth for the recursive parts of the compiler.
//!
//! Expression operands recurse through parentheses and prefix operators, and
//! statements recurse through nested `{ ... }` scopes, `while` bodies and
//! `if` arms. Source like `((((...))))` can nest arbitrarily deep, so those
//! entry points run under [`ensure_sufficient_stack`], which grows the stack
//! on demand instead of overflowing.
//!
//! On wasm the function is a plain call.

/// Grow when less than this much stack remains.
const RED_ZONE: usize = 128 * 1024;

/// Size of each new stack segment.
const SEGMENT_SIZE: usize = 1024 * 1024;

/// Run `f`, first growing the stack if the red zone has been reached.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
