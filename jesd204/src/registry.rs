//! Device registry: membership, identity and lifetime of JESD204 devices.
//!
//! Responsibilities:
//! - Own every registered [Jesd204Dev] in a table ordered by [Jesd204DevId], which is
//!   registration order.
//! - Count references explicitly through [Jesd204Registry::retain] and
//!   [Jesd204Registry::unregister]; a node leaves the table when its count reaches zero.
//! - Run the link builder for a device while holding the same lock, so edge lists are
//!   only ever written by one registration at a time.
//!
//! Ownership notes:
//! - The registry is the only owner of nodes. Edges name other nodes by id, so a node
//!   that has left the table simply stops resolving; nothing is pruned from the edges
//!   that named it.
//! - A node keeps a strong handle on its parent device until it leaves the table.
use crate::{
    clk::{ClockProvider, HwDescription},
    dev::{
        Jesd204Dev, Jesd204DevData, Jesd204DevId, Jesd204LinkIn, Jesd204LinkOut, ParentDevice,
    },
    error::Jesd204Error,
    handle::HandleRef,
    link,
};
use alloc::{boxed::Box, string::String, vec::Vec};
use config::{JESD204_BUS_NAME, JESD204_DEV_MAX};
use spin::Mutex;

/// The registered devices, in registration order.
pub(crate) struct Jesd204Topology {
    devices: Vec<Jesd204Dev>,
    next_id: usize,
}

impl Jesd204Topology {
    const fn new() -> Jesd204Topology {
        Jesd204Topology {
            devices: Vec::new(),
            next_id: 0,
        }
    }

    fn position(&self, id: Jesd204DevId) -> Option<usize> {
        self.devices.binary_search_by_key(&id, |dev| dev.id).ok()
    }

    pub(crate) fn get(&self, id: Jesd204DevId) -> Option<&Jesd204Dev> {
        self.position(id).map(|pos| &self.devices[pos])
    }

    pub(crate) fn get_mut(&mut self, id: Jesd204DevId) -> Option<&mut Jesd204Dev> {
        self.position(id).map(move |pos| &mut self.devices[pos])
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Jesd204Dev> {
        self.devices.iter_mut()
    }

    fn len(&self) -> usize {
        self.devices.len()
    }

    /// Insert a node under the next id. Storage is reserved before the id is
    /// taken, so a failure leaves the table untouched.
    fn insert(
        &mut self,
        build: impl FnOnce(Jesd204DevId) -> Jesd204Dev,
    ) -> Result<Jesd204DevId, Jesd204Error> {
        self.devices.try_reserve(1)?;
        let id = Jesd204DevId(self.next_id);
        self.next_id += 1;
        self.devices.push(build(id));
        Ok(id)
    }

    fn remove(&mut self, id: Jesd204DevId) -> Option<Jesd204Dev> {
        self.position(id).map(|pos| self.devices.remove(pos))
    }
}

pub struct Jesd204Registry {
    topology: Mutex<Jesd204Topology>,
    max_devices: usize,
}

impl Jesd204Registry {
    pub const fn new() -> Jesd204Registry {
        Jesd204Registry::with_max_devices(JESD204_DEV_MAX)
    }

    pub const fn with_max_devices(max_devices: usize) -> Jesd204Registry {
        Jesd204Registry {
            topology: Mutex::new(Jesd204Topology::new()),
            max_devices,
        }
    }

    pub fn bus_name(&self) -> &'static str {
        JESD204_BUS_NAME
    }

    pub fn max_devices(&self) -> usize {
        self.max_devices
    }

    // region: lifecycle

    /// Register a device owned by `parent`.
    ///
    /// Fails with [Jesd204Error::InvalidArgument] if `parent` is gone or the name is empty,
    /// [Jesd204Error::NoSpace] if the registry is full and [Jesd204Error::OutOfMemory] if
    /// the node cannot be allocated. Nothing becomes visible unless the call succeeds.
    ///
    /// The new node has a reference count of one and no edges; call [Self::init_links]
    /// to connect it, or use [Self::probe] to do both.
    pub fn register(
        &self,
        parent: &HandleRef<dyn ParentDevice>,
        data: &Jesd204DevData<'_>,
    ) -> Result<Jesd204DevId, Jesd204Error> {
        let mut topology = self.topology.lock();
        self.register_locked(&mut topology, parent, data)
    }

    fn register_locked(
        &self,
        topology: &mut Jesd204Topology,
        parent: &HandleRef<dyn ParentDevice>,
        data: &Jesd204DevData<'_>,
    ) -> Result<Jesd204DevId, Jesd204Error> {
        let parent = parent.get_handle().ok_or(Jesd204Error::InvalidArgument)?;
        if data.name.is_empty() {
            return Err(Jesd204Error::InvalidArgument);
        }
        if topology.len() >= self.max_devices {
            jesd_warn!(
                parent.name(),
                "registry full ({} devices), '{}' not registered",
                self.max_devices,
                data.name
            );
            return Err(Jesd204Error::NoSpace);
        }
        let mut name = String::new();
        name.try_reserve_exact(data.name.len())?;
        name.push_str(data.name);
        let name: Box<str> = name.into_boxed_str();
        let ops = data.ops.clone();
        let id = topology.insert(|id| Jesd204Dev::new(id, name, parent, ops))?;
        jesd_debug!("registered device '{}' as {}", data.name, id);
        Ok(id)
    }

    /// Take another reference on `id`. Unknown ids are ignored.
    pub fn retain(&self, id: Jesd204DevId) {
        if let Some(dev) = self.topology.lock().get_mut(id) {
            dev.refcount += 1;
        }
    }

    /// Drop a reference on `id`. Unknown ids are ignored.
    ///
    /// When the last reference goes, the node leaves the registry and releases its
    /// parent device. Edges held by other nodes keep naming `id`.
    pub fn unregister(&self, id: Jesd204DevId) {
        let released = Self::release_locked(&mut self.topology.lock(), id);
        // the parent handle is dropped outside the lock
        if let Some(dev) = released {
            jesd_debug!("released device '{}' ({})", dev.name, id);
            drop(dev);
        }
    }

    /// Drop one reference and hand back the node if it was the last one.
    fn release_locked(topology: &mut Jesd204Topology, id: Jesd204DevId) -> Option<Jesd204Dev> {
        let dev = topology.get_mut(id)?;
        dev.refcount -= 1;
        if dev.refcount > 0 {
            return None;
        }
        topology.remove(id)
    }

    // endregion

    // region: links

    /// Connect a registered device to the rest of the topology.
    ///
    /// Publishes the device's output clocks to every unresolved input of the other
    /// devices, then resolves the inputs `desc` describes against the outputs already
    /// registered. Links made before a failure are kept. A device can only be linked
    /// once; a second call fails with [Jesd204Error::InvalidArgument].
    ///
    /// `desc` and `clocks` are called with the registry locked and must not call back
    /// into this registry.
    pub fn init_links(
        &self,
        id: Jesd204DevId,
        data: &Jesd204DevData<'_>,
        desc: &dyn HwDescription,
        clocks: &dyn ClockProvider,
    ) -> Result<(), Jesd204Error> {
        let mut topology = self.topology.lock();
        link::init_links(&mut topology, id, data, desc, clocks)
    }

    /// Register a device and link it in one step.
    ///
    /// If linking fails the node's own reference is dropped under the same lock, so no
    /// other caller can observe or retain the half-linked node. Links other devices
    /// already hold to it stay in place. As with [Self::init_links], `desc` and `clocks`
    /// must not call back into this registry.
    pub fn probe(
        &self,
        parent: &HandleRef<dyn ParentDevice>,
        data: &Jesd204DevData<'_>,
        desc: &dyn HwDescription,
        clocks: &dyn ClockProvider,
    ) -> Result<Jesd204DevId, Jesd204Error> {
        let (err, released) = {
            let mut topology = self.topology.lock();
            let id = self.register_locked(&mut topology, parent, data)?;
            match link::init_links(&mut topology, id, data, desc, clocks) {
                Ok(()) => return Ok(id),
                Err(err) => (err, Self::release_locked(&mut topology, id)),
            }
        };
        jesd_warn!(data.name, "linking failed: {}", err);
        drop(released);
        Err(err)
    }

    // endregion

    // region: queries

    /// Registered ids in registration order.
    pub fn devices(&self) -> Vec<Jesd204DevId> {
        self.topology.lock().devices.iter().map(|dev| dev.id).collect()
    }

    pub fn len(&self) -> usize {
        self.topology.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, id: Jesd204DevId) -> bool {
        self.topology.lock().get(id).is_some()
    }

    pub fn refcount(&self, id: Jesd204DevId) -> Option<usize> {
        self.topology.lock().get(id).map(|dev| dev.refcount)
    }

    /// Run `f` on the node while the registry is locked.
    ///
    /// `f` must not call back into this registry.
    pub fn with_dev<R>(&self, id: Jesd204DevId, f: impl FnOnce(&Jesd204Dev) -> R) -> Option<R> {
        self.topology.lock().get(id).map(f)
    }

    pub fn name(&self, id: Jesd204DevId) -> Option<String> {
        self.with_dev(id, |dev| String::from(dev.name()))
    }

    pub fn inputs(&self, id: Jesd204DevId) -> Option<Vec<Jesd204LinkIn>> {
        self.with_dev(id, |dev| dev.inputs().to_vec())
    }

    pub fn outputs(&self, id: Jesd204DevId) -> Option<Vec<Jesd204LinkOut>> {
        self.with_dev(id, |dev| dev.outputs().to_vec())
    }

    // endregion
}

impl Default for Jesd204Registry {
    fn default() -> Self {
        Self::new()
    }
}
