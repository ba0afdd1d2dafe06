//! Logging shims. With the `tracing` feature these forward to `tracing`;
//! without it they expand to nothing and their arguments are not evaluated.

macro_rules! trace_event {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        {
            ::tracing::trace!(target: "runecursor", $($arg)*);
        }
    };
}

macro_rules! debug_event {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        {
            ::tracing::debug!(target: "runecursor", $($arg)*);
        }
    };
}

pub(crate) use debug_event;
pub(crate) use trace_event;
