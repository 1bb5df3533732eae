//! Device-tree glue: clock inputs from `clocks` lists, clock providers by phandle,
//! and probing of devices that opt in with a `jesd204` child node.

use crate::{
    clk::{Clk, ClockProvider, ClockSpec, HwDescription},
    dev::{Jesd204DevData, ParentDevice},
    error::Jesd204Error,
    handle::HandleRef,
    managed::Jesd204DevGuard,
    registry::Jesd204Registry,
};
use alloc::{collections::btree_map::BTreeMap, vec::Vec};
use config::{OF_CLOCK_CELLS_PROP, OF_CLOCKS_PROP, OF_JESD204_NODE};
use dt::{
    node::{DeviceTree, Node},
    prop::PropertyError,
};
use spin::RwLock;

/// Clock inputs of one device-tree node.
pub struct OfDescription<'a> {
    tree: &'a DeviceTree,
    node: &'a Node,
}

impl<'a> OfDescription<'a> {
    pub fn new(tree: &'a DeviceTree, node: &'a Node) -> OfDescription<'a> {
        OfDescription { tree, node }
    }

    pub fn node(&self) -> &'a Node {
        self.node
    }
}

impl HwDescription for OfDescription<'_> {
    fn clock_count(&self) -> Result<usize, Jesd204Error> {
        match self
            .tree
            .count_phandle_with_args(self.node, OF_CLOCKS_PROP, OF_CLOCK_CELLS_PROP)
        {
            Ok(count) => Ok(count),
            Err(PropertyError::PropNotFound) => Ok(0),
            Err(err) => Err(err.into()),
        }
    }

    fn clock_spec(&self, index: usize) -> Result<ClockSpec, Jesd204Error> {
        let spec = self.tree.parse_phandle_with_args(
            self.node,
            OF_CLOCKS_PROP,
            OF_CLOCK_CELLS_PROP,
            index,
        )?;
        Ok(ClockSpec {
            phandle: spec.phandle,
            args: spec.args,
        })
    }
}

/// Clocks a provider node hands out.
#[derive(Debug, Clone)]
pub enum OfClkProvider {
    /// One clock, `#clock-cells = <0>`.
    Fixed(Clk),
    /// A table indexed by the first argument cell, `#clock-cells = <1>`.
    Onecell(Vec<Clk>),
}

impl OfClkProvider {
    fn get(&self, args: &[u32]) -> Option<Clk> {
        match self {
            OfClkProvider::Fixed(clk) => Some(clk.get()),
            OfClkProvider::Onecell(clks) => {
                let idx = *args.first()? as usize;
                clks.get(idx).map(Clk::get)
            }
        }
    }
}

/// Clock service backed by providers registered per phandle.
pub struct OfClkProviders {
    providers: RwLock<BTreeMap<u32, OfClkProvider>>,
}

impl OfClkProviders {
    pub const fn new() -> OfClkProviders {
        OfClkProviders {
            providers: RwLock::new(BTreeMap::new()),
        }
    }

    /// Register `provider` for `phandle`, returning the one it replaces.
    pub fn add_provider(&self, phandle: u32, provider: OfClkProvider) -> Option<OfClkProvider> {
        self.providers.write().insert(phandle, provider)
    }

    pub fn del_provider(&self, phandle: u32) -> Option<OfClkProvider> {
        self.providers.write().remove(&phandle)
    }
}

impl Default for OfClkProviders {
    fn default() -> Self {
        Self::new()
    }
}

impl ClockProvider for OfClkProviders {
    fn resolve(&self, desc: &dyn HwDescription, index: usize) -> Result<Clk, Jesd204Error> {
        let spec = desc.clock_spec(index)?;
        let guard = self.providers.read();
        let provider = guard.get(&spec.phandle).ok_or(Jesd204Error::NotAvailable)?;
        provider.get(&spec.args).ok_or(Jesd204Error::NotAvailable)
    }
}

impl Jesd204Registry {
    /// Probe a device described in `tree`.
    ///
    /// Return `Ok(None)` without touching the registry when the parent has no
    /// device-tree node or its node has no `jesd204` child. Input clocks are read
    /// from the parent's own node.
    pub fn of_probe(
        &self,
        parent: &HandleRef<dyn ParentDevice>,
        tree: &DeviceTree,
        data: &Jesd204DevData<'_>,
        clocks: &dyn ClockProvider,
    ) -> Result<Option<Jesd204DevGuard<'_>>, Jesd204Error> {
        let node = {
            let handle = parent.get_handle().ok_or(Jesd204Error::InvalidArgument)?;
            match handle.of_node().and_then(|id| tree.get_by_id(id)) {
                Some(node) => node,
                None => return Ok(None),
            }
        };
        if tree.get_child_by_name(node, OF_JESD204_NODE).is_none() {
            jesd_debug!(
                "{}: no '{}' node, skipped",
                tree.get_full_path(node),
                OF_JESD204_NODE
            );
            return Ok(None);
        }
        let desc = OfDescription::new(tree, node);
        self.probe_managed(parent, data, &desc, clocks).map(Some)
    }
}
