//! Registration tied to a scope.
//!
//! A [Jesd204DevGuard] owns one reference on a registered device and gives it back
//! when dropped, the way a driver's managed resources are released on unbind.
use crate::{
    clk::{ClockProvider, HwDescription},
    dev::{Jesd204DevData, Jesd204DevId, ParentDevice},
    error::Jesd204Error,
    handle::HandleRef,
    registry::Jesd204Registry,
};
use core::fmt::Debug;

pub struct Jesd204DevGuard<'r> {
    registry: &'r Jesd204Registry,
    id: Jesd204DevId,
}

impl<'r> Jesd204DevGuard<'r> {
    /// Take over one reference on `id`.
    pub fn new(registry: &'r Jesd204Registry, id: Jesd204DevId) -> Jesd204DevGuard<'r> {
        Jesd204DevGuard { registry, id }
    }

    pub fn id(&self) -> Jesd204DevId {
        self.id
    }

    pub fn registry(&self) -> &'r Jesd204Registry {
        self.registry
    }

    /// Unregister now instead of at the end of the scope.
    pub fn release(self) {
        drop(self)
    }
}

impl Drop for Jesd204DevGuard<'_> {
    fn drop(&mut self) {
        self.registry.unregister(self.id);
    }
}

impl Debug for Jesd204DevGuard<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("Jesd204DevGuard").field(&self.id).finish()
    }
}

impl Jesd204Registry {
    /// [Self::register], with the reference held by the returned guard.
    pub fn register_managed(
        &self,
        parent: &HandleRef<dyn ParentDevice>,
        data: &Jesd204DevData<'_>,
    ) -> Result<Jesd204DevGuard<'_>, Jesd204Error> {
        self.register(parent, data)
            .map(|id| Jesd204DevGuard::new(self, id))
    }

    /// [Self::probe], with the reference held by the returned guard.
    pub fn probe_managed(
        &self,
        parent: &HandleRef<dyn ParentDevice>,
        data: &Jesd204DevData<'_>,
        desc: &dyn HwDescription,
        clocks: &dyn ClockProvider,
    ) -> Result<Jesd204DevGuard<'_>, Jesd204Error> {
        self.probe(parent, data, desc, clocks)
            .map(|id| Jesd204DevGuard::new(self, id))
    }
}
