//! Configurations for the JESD204 framework.
//! The values live in `flags.json` at the workspace root and are turned into
//! constants at build time, so every crate in the workspace agrees on them.

#![no_std]
#![deny(missing_docs)]

mod build_flags {
    #![allow(missing_docs)]
    include!(concat!(env!("OUT_DIR"), "/build_flags.rs"));
}

/// Maximum number of devices a registry accepts by default.
pub use build_flags::JESD204_DEV_MAX;

/// Name of the bus the framework's devices sit on.
pub use build_flags::JESD204_BUS_NAME;

/// Child node name that opts a device into the framework.
pub use build_flags::OF_JESD204_NODE;

/// Property listing the input clocks of a device node.
pub use build_flags::OF_CLOCKS_PROP;

/// Property on a clock provider giving the number of argument cells per specifier.
pub use build_flags::OF_CLOCK_CELLS_PROP;

/// Property carrying the phandle of a node.
pub use build_flags::OF_PHANDLE_PROP;
