//! Error type shared by every operation of the framework.

use alloc::collections::TryReserveError;
use core::fmt::{Display, Formatter};
use dt::prop::PropertyError;

/// Errors returned by registration and link resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Jesd204Error {
    /// A caller-supplied value is unusable: a dead parent, an empty name,
    /// a null output clock, a malformed clock list or an unknown device.
    InvalidArgument,
    /// Allocating a node, a name or an edge record failed.
    OutOfMemory,
    /// The clock service could not turn a described input into a clock.
    NotAvailable,
    /// The registry already holds its maximum number of devices.
    NoSpace,
}

impl Display for Jesd204Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        let msg = match self {
            Jesd204Error::InvalidArgument => "invalid argument",
            Jesd204Error::OutOfMemory => "out of memory",
            Jesd204Error::NotAvailable => "resource not available",
            Jesd204Error::NoSpace => "no space left in device registry",
        };
        f.write_str(msg)
    }
}

impl core::error::Error for Jesd204Error {}

impl From<TryReserveError> for Jesd204Error {
    fn from(_: TryReserveError) -> Self {
        Jesd204Error::OutOfMemory
    }
}

impl From<PropertyError> for Jesd204Error {
    fn from(err: PropertyError) -> Self {
        match err {
            PropertyError::InvalidPropFormat => Jesd204Error::InvalidArgument,
            PropertyError::PropNotFound | PropertyError::DanglingHandle => {
                Jesd204Error::NotAvailable
            }
        }
    }
}
