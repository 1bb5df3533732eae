//! The graph node: one registered JESD204 device and its clock edges.

use crate::{clk::Clk, handle::Handle};
use alloc::{boxed::Box, vec::Vec};
use core::fmt::{Debug, Display};

/// Driver-model device that registers itself as a JESD204 device.
pub trait ParentDevice: Send + Sync {
    fn name(&self) -> &str;
    /// Device-tree node describing this device, if any.
    fn of_node(&self) -> Option<usize> {
        None
    }
}

/// Operations a JESD204 device offers to the link layer.
///
/// No operation is required yet; link bring-up hooks are added here.
pub trait Jesd204DevOps: Send + Sync {}

/// Stable identifier of a registered device.
///
/// Ids are never reused, and ordering them gives registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Jesd204DevId(pub(crate) usize);

impl Jesd204DevId {
    pub fn as_usize(self) -> usize {
        self.0
    }
}

impl Display for Jesd204DevId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "jesd204:{}", self.0)
    }
}

/// What a driver hands over when registering a device.
#[derive(Clone, Default)]
pub struct Jesd204DevData<'a> {
    pub name: &'a str,
    pub ops: Option<Handle<dyn Jesd204DevOps>>,
    /// Clocks this device produces; `None` is a slot without a clock and is rejected.
    pub output_clocks: Vec<Option<Clk>>,
}

impl<'a> Jesd204DevData<'a> {
    pub fn new(name: &'a str) -> Jesd204DevData<'a> {
        Jesd204DevData {
            name,
            ops: None,
            output_clocks: Vec::new(),
        }
    }

    pub fn with_ops(mut self, ops: Handle<dyn Jesd204DevOps>) -> Self {
        self.ops = Some(ops);
        self
    }

    pub fn with_output(mut self, clk: Clk) -> Self {
        self.output_clocks.push(Some(clk));
        self
    }
}

/// A clock input of a device.
#[derive(Debug, Clone)]
pub struct Jesd204LinkIn {
    pub(crate) clk: Clk,
    pub(crate) jdev: Option<Jesd204DevId>,
}

impl Jesd204LinkIn {
    pub(crate) fn new(clk: Clk) -> Jesd204LinkIn {
        Jesd204LinkIn { clk, jdev: None }
    }
    pub fn clk(&self) -> &Clk {
        &self.clk
    }
    /// The device feeding this input, `None` while unresolved.
    ///
    /// The id may outlive the device it names; look it up in the registry before use.
    pub fn jdev(&self) -> Option<Jesd204DevId> {
        self.jdev
    }
}

/// A clock output of a device and the devices consuming it.
#[derive(Debug, Clone)]
pub struct Jesd204LinkOut {
    pub(crate) clk: Clk,
    pub(crate) jdev: Jesd204DevId,
    pub(crate) jdev_list: Vec<Jesd204DevId>,
}

impl Jesd204LinkOut {
    pub(crate) fn new(clk: Clk, jdev: Jesd204DevId) -> Jesd204LinkOut {
        Jesd204LinkOut {
            clk,
            jdev,
            jdev_list: Vec::new(),
        }
    }
    pub fn clk(&self) -> &Clk {
        &self.clk
    }
    /// The device producing this output.
    pub fn jdev(&self) -> Jesd204DevId {
        self.jdev
    }
    /// Devices with an input resolved to this output, in link order.
    pub fn consumers(&self) -> &[Jesd204DevId] {
        &self.jdev_list
    }
}

pub struct Jesd204Dev {
    pub(crate) id: Jesd204DevId,
    pub(crate) name: Box<str>,
    pub(crate) parent: Handle<dyn ParentDevice>,
    pub(crate) ops: Option<Handle<dyn Jesd204DevOps>>,
    pub(crate) refcount: usize,
    pub(crate) links_initialized: bool,
    pub(crate) inputs: Vec<Jesd204LinkIn>,
    pub(crate) outputs: Vec<Jesd204LinkOut>,
}

impl Jesd204Dev {
    pub(crate) fn new(
        id: Jesd204DevId,
        name: Box<str>,
        parent: Handle<dyn ParentDevice>,
        ops: Option<Handle<dyn Jesd204DevOps>>,
    ) -> Jesd204Dev {
        Jesd204Dev {
            id,
            name,
            parent,
            ops,
            refcount: 1,
            links_initialized: false,
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }
    pub fn id(&self) -> Jesd204DevId {
        self.id
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn parent(&self) -> &Handle<dyn ParentDevice> {
        &self.parent
    }
    pub fn ops(&self) -> Option<&Handle<dyn Jesd204DevOps>> {
        self.ops.as_ref()
    }
    pub fn inputs(&self) -> &[Jesd204LinkIn] {
        &self.inputs
    }
    pub fn outputs(&self) -> &[Jesd204LinkOut] {
        &self.outputs
    }
}

impl Debug for Jesd204Dev {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Jesd204Dev")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("parent", &self.parent.name())
            .field("refcount", &self.refcount)
            .field("inputs", &self.inputs)
            .field("outputs", &self.outputs)
            .finish()
    }
}
