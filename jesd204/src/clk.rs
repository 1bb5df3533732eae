//! Clock tokens and the seams to the clock and hardware-description services.
//!
//! The framework never looks inside a clock. It only asks whether two
//! tokens stand for the same signal, see [Clk::is_match].

use crate::{error::Jesd204Error, handle::Handle};
use alloc::{boxed::Box, vec::Vec};
use core::fmt::Debug;

/// The clock signal itself, shared by every token handed out for it.
#[derive(Debug)]
pub struct ClkCore {
    name: Box<str>,
}

/// Opaque consumer token for a clock signal.
///
/// Tokens are cheap to clone and compare by the signal they refer to, never by name.
#[derive(Clone)]
pub struct Clk {
    core: Handle<ClkCore>,
}

impl Clk {
    /// Create a new, distinct clock signal.
    pub fn new(name: &str) -> Clk {
        Clk {
            core: Handle::new(ClkCore {
                name: Box::from(name),
            }),
        }
    }

    /// Hand out another token for the same signal.
    pub fn get(&self) -> Clk {
        Clk {
            core: self.core.clone(),
        }
    }

    pub fn name(&self) -> &str {
        &self.core.name
    }

    /// Whether `self` and `other` stand for the same clock signal.
    pub fn is_match(&self, other: &Clk) -> bool {
        Handle::ptr_eq(&self.core, &other.core)
    }
}

impl Debug for Clk {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("Clk").field(&self.core.name).finish()
    }
}

/// Nullable form of [Clk::is_match]: two absent clocks match, an absent and a
/// present one do not.
pub fn clk_is_match(p: Option<&Clk>, q: Option<&Clk>) -> bool {
    match (p, q) {
        (None, None) => true,
        (Some(p), Some(q)) => p.is_match(q),
        _ => false,
    }
}

/// One described clock input: the provider it names and the argument cells
/// that select a clock from that provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClockSpec {
    pub phandle: u32,
    pub args: Vec<u32>,
}

/// Hardware description of one device's clock inputs.
pub trait HwDescription {
    /// Number of input clocks described; `0` when the device has no clock list at all.
    fn clock_count(&self) -> Result<usize, Jesd204Error>;
    /// The `index`-th described input.
    fn clock_spec(&self, index: usize) -> Result<ClockSpec, Jesd204Error>;
}

/// The clock service: turns a described input into a clock token.
pub trait ClockProvider {
    /// Return [Jesd204Error::NotAvailable] when the input cannot be resolved at all.
    fn resolve(&self, desc: &dyn HwDescription, index: usize) -> Result<Clk, Jesd204Error>;
}

/// Description of a device without clock inputs.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoClocks;

impl HwDescription for NoClocks {
    fn clock_count(&self) -> Result<usize, Jesd204Error> {
        Ok(0)
    }
    fn clock_spec(&self, _index: usize) -> Result<ClockSpec, Jesd204Error> {
        Err(Jesd204Error::NotAvailable)
    }
}
