#![allow(dead_code)]

use jesd204::{
    Clk, ClockProvider, ClockSpec, Handle, HwDescription, Jesd204DevData, Jesd204DevId,
    Jesd204Error, Jesd204Registry, ParentDevice,
};
use std::sync::Arc;

pub struct Board {
    name: String,
    of_node: Option<usize>,
}

impl ParentDevice for Board {
    fn name(&self) -> &str {
        &self.name
    }
    fn of_node(&self) -> Option<usize> {
        self.of_node
    }
}

pub fn board(name: &str) -> Handle<dyn ParentDevice> {
    board_with_node(name, None)
}

pub fn board_with_node(name: &str, of_node: Option<usize>) -> Handle<dyn ParentDevice> {
    let arc: Arc<dyn ParentDevice> = Arc::new(Board {
        name: String::from(name),
        of_node,
    });
    Handle::from(arc)
}

/// A device's input clocks given directly as a list.
#[derive(Default, Clone)]
pub struct Inputs(pub Vec<Clk>);

impl Inputs {
    pub fn of(clks: &[&Clk]) -> Inputs {
        Inputs(clks.iter().map(|clk| clk.get()).collect())
    }
}

impl HwDescription for Inputs {
    fn clock_count(&self) -> Result<usize, Jesd204Error> {
        Ok(self.0.len())
    }
    fn clock_spec(&self, index: usize) -> Result<ClockSpec, Jesd204Error> {
        Ok(ClockSpec {
            phandle: index as u32 + 1,
            args: vec![],
        })
    }
}

impl ClockProvider for Inputs {
    fn resolve(&self, _desc: &dyn HwDescription, index: usize) -> Result<Clk, Jesd204Error> {
        self.0
            .get(index)
            .map(Clk::get)
            .ok_or(Jesd204Error::NotAvailable)
    }
}

/// A device to register: name, produced clocks, consumed clocks.
#[derive(Clone)]
pub struct Spec {
    pub name: &'static str,
    pub outputs: Vec<Clk>,
    pub inputs: Inputs,
}

impl Spec {
    pub fn new(name: &'static str, outputs: &[&Clk], inputs: &[&Clk]) -> Spec {
        Spec {
            name,
            outputs: outputs.iter().map(|clk| clk.get()).collect(),
            inputs: Inputs::of(inputs),
        }
    }

    pub fn probe(
        &self,
        registry: &Jesd204Registry,
        parent: &Handle<dyn ParentDevice>,
    ) -> Jesd204DevId {
        let mut data = Jesd204DevData::new(self.name);
        for clk in &self.outputs {
            data = data.with_output(clk.get());
        }
        registry
            .probe(&parent.create_ref(), &data, &self.inputs, &self.inputs)
            .unwrap()
    }
}

/// Look up a registered device by name.
pub fn by_name(registry: &Jesd204Registry, name: &str) -> Jesd204DevId {
    registry
        .devices()
        .into_iter()
        .find(|id| registry.name(*id).as_deref() == Some(name))
        .unwrap()
}

/// Name of the producer each input of `name` resolved to.
pub fn input_sources(registry: &Jesd204Registry, name: &str) -> Vec<Option<String>> {
    registry
        .inputs(by_name(registry, name))
        .unwrap()
        .iter()
        .map(|input| input.jdev().and_then(|id| registry.name(id)))
        .collect()
}

/// Sorted consumer names of each output of `name`.
pub fn output_sinks(registry: &Jesd204Registry, name: &str) -> Vec<Vec<String>> {
    registry
        .outputs(by_name(registry, name))
        .unwrap()
        .iter()
        .map(|out| {
            let mut names: Vec<String> = out
                .consumers()
                .iter()
                .filter_map(|id| registry.name(*id))
                .collect();
            names.sort();
            names
        })
        .collect()
}
