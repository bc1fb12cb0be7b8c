//! Logging macros that forward to `tracing` when the `tracing` feature is on
//! and compile to nothing otherwise.

#[cfg(feature = "tracing")]
macro_rules! debug {
    ($($tt:tt)*) => { ::tracing::debug!($($tt)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! debug {
    ($($tt:tt)*) => {};
}

#[cfg(feature = "tracing")]
macro_rules! trace {
    ($($tt:tt)*) => { ::tracing::trace!($($tt)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace {
    ($($tt:tt)*) => {};
}

pub(crate) use {debug, trace};
