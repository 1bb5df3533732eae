//! Log macros used across the framework.
//!
//! Records carry the bus name as their target; installing a logger is left
//! to the embedding system.

/// Debug record, only compiled in debug mode.
macro_rules! jesd_debug {
    ($($arg:tt)+) => {
        #[cfg(debug_assertions)]
        {
            log::debug!(target: config::JESD204_BUS_NAME, $($arg)+)
        }
    };
}

/// Error record prefixed with the device name.
macro_rules! jesd_err {
    ($dev:expr, $fmt:literal $(, $($arg:tt)+)?) => {
        log::error!(
            target: config::JESD204_BUS_NAME,
            concat!("{}: ", $fmt),
            $dev
            $(, $($arg)+)?
        )
    };
}

/// Warning record prefixed with the device name.
macro_rules! jesd_warn {
    ($dev:expr, $fmt:literal $(, $($arg:tt)+)?) => {
        log::warn!(
            target: config::JESD204_BUS_NAME,
            concat!("{}: ", $fmt),
            $dev
            $(, $($arg)+)?
        )
    };
}
