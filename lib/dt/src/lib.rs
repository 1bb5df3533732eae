//! In-memory device tree used as the hardware description of JESD204 devices.
//!
//! Nodes live in one container and refer to each other by index; phandles are
//! resolved through a map built once the tree is complete.

#![cfg_attr(not(test), no_std)]
extern crate alloc;

pub mod builder;
pub mod node;
pub mod prop;
