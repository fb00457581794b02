macro_rules! trace {
    ($($tt:tt)*) => {
        #[cfg(feature = "tracing")]
        {
            tracing::trace!($($tt)*)
        }
    };
}

macro_rules! debug {
    ($($tt:tt)*) => {
        #[cfg(feature = "tracing")]
        {
            tracing::debug!($($tt)*)
        }
    };
}

pub(crate) use debug;
pub(crate) use trace;
