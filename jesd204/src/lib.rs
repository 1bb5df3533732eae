//! JESD204 device topology.
//!
//! Chips on a JESD204 link share a clock tree: a clock generator feeds device
//! clocks and SYSREF to converters and FPGAs. Each chip registers itself with a
//! [Jesd204Registry], declaring the clocks it produces; the clocks it consumes
//! come from its hardware description. The registry links every consumed clock
//! to the registered device producing it, whatever order the chips register in,
//! and the resulting graph is what coordinated link bring-up walks.
//!
//! ```
//! use std::sync::Arc;
//! use jesd204::{Clk, Handle, Jesd204DevData, Jesd204Registry, NoClocks, ParentDevice};
//! # use jesd204::{ClockProvider, HwDescription, ClockSpec, Jesd204Error};
//! # struct Spi(&'static str);
//! # impl ParentDevice for Spi { fn name(&self) -> &str { self.0 } }
//! # struct Inputs(Vec<Clk>);
//! # impl HwDescription for Inputs {
//! #     fn clock_count(&self) -> Result<usize, Jesd204Error> { Ok(self.0.len()) }
//! #     fn clock_spec(&self, index: usize) -> Result<ClockSpec, Jesd204Error> {
//! #         Ok(ClockSpec { phandle: index as u32 + 1, args: vec![] })
//! #     }
//! # }
//! # impl ClockProvider for Inputs {
//! #     fn resolve(&self, _: &dyn HwDescription, index: usize) -> Result<Clk, Jesd204Error> {
//! #         self.0.get(index).map(Clk::get).ok_or(Jesd204Error::NotAvailable)
//! #     }
//! # }
//!
//! let registry = Jesd204Registry::new();
//! let spi: Arc<dyn ParentDevice> = Arc::new(Spi("spi0"));
//! let spi = Handle::from(spi);
//! let dev_clk = Clk::new("dev_clk");
//!
//! // the converter registers first; its input stays pending
//! let adc_inputs = Inputs(vec![dev_clk.get()]);
//! let adc = registry
//!     .probe(&spi.create_ref(), &Jesd204DevData::new("adc"), &adc_inputs, &adc_inputs)
//!     .unwrap();
//!
//! let clkgen_data = Jesd204DevData::new("clkgen").with_output(dev_clk.clone());
//! let clkgen = registry
//!     .probe(&spi.create_ref(), &clkgen_data, &NoClocks, &adc_inputs)
//!     .unwrap();
//!
//! assert_eq!(registry.inputs(adc).unwrap()[0].jdev(), Some(clkgen));
//! assert_eq!(registry.outputs(clkgen).unwrap()[0].consumers(), [adc]);
//! ```

#![cfg_attr(not(test), no_std)]
extern crate alloc;

#[macro_use]
mod logging;

pub mod clk;
pub mod dev;
pub mod error;
pub mod handle;
mod link;
pub mod managed;
pub mod of;
pub mod registry;

pub use clk::{Clk, ClockProvider, ClockSpec, HwDescription, NoClocks, clk_is_match};
pub use dev::{
    Jesd204Dev, Jesd204DevData, Jesd204DevId, Jesd204DevOps, Jesd204LinkIn, Jesd204LinkOut,
    ParentDevice,
};
pub use error::Jesd204Error;
pub use handle::{Handle, HandleRef};
pub use managed::Jesd204DevGuard;
pub use of::{OfClkProvider, OfClkProviders, OfDescription};
pub use registry::Jesd204Registry;
