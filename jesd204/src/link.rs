//! Link builder: turns clock outputs and inputs into edges between devices.
//!
//! A device is linked once, right after it joins the registry:
//! 1. Every output clock it declares is offered to the *unresolved* inputs of all other
//!    devices. One output may feed any number of inputs.
//! 2. Every input clock its description names is matched against the outputs of the
//!    other devices, scanned in registration order. The first match wins.
//!
//! Inputs without a producer stay unresolved until a later device publishes a matching
//! output. A resolved input is never re-pointed.
//!
//! Construction is not transactional. When a step fails, the edges made by earlier
//! steps stay in place and the error is returned.
use crate::{
    clk::{Clk, ClockProvider, HwDescription},
    dev::{Jesd204DevData, Jesd204DevId, Jesd204LinkIn, Jesd204LinkOut},
    error::Jesd204Error,
    registry::Jesd204Topology,
};

pub(crate) fn init_links(
    topology: &mut Jesd204Topology,
    id: Jesd204DevId,
    data: &Jesd204DevData<'_>,
    desc: &dyn HwDescription,
    clocks: &dyn ClockProvider,
) -> Result<(), Jesd204Error> {
    let jdev = topology.get_mut(id).ok_or(Jesd204Error::InvalidArgument)?;
    if jdev.links_initialized {
        jesd_err!(jdev.name(), "links already initialized");
        return Err(Jesd204Error::InvalidArgument);
    }
    jdev.links_initialized = true;

    init_output_links(topology, id, &data.output_clocks)?;
    init_input_links(topology, id, desc, clocks)
}

fn dev_name(topology: &Jesd204Topology, id: Jesd204DevId) -> &str {
    topology.get(id).map_or("?", |jdev| jdev.name())
}

/// Point `input` at the producer of `out` and record `consumer` downstream of it.
fn create_link(
    input: &mut Jesd204LinkIn,
    consumer: Jesd204DevId,
    out: &mut Jesd204LinkOut,
) -> Result<(), Jesd204Error> {
    out.jdev_list.try_reserve(1)?;
    input.jdev = Some(out.jdev);
    out.jdev_list.push(consumer);
    jesd_debug!("{} -> {} via '{}'", out.jdev, consumer, out.clk.name());
    Ok(())
}

fn find_output_link<'a>(
    topology: &'a mut Jesd204Topology,
    id: Jesd204DevId,
    clk: &Clk,
) -> Option<&'a mut Jesd204LinkOut> {
    topology
        .iter_mut()
        .filter(|jdev| jdev.id != id)
        .flat_map(|jdev| jdev.outputs.iter_mut())
        .find(|out| out.clk.is_match(clk))
}

fn update_input_links(
    topology: &mut Jesd204Topology,
    out: &mut Jesd204LinkOut,
) -> Result<(), Jesd204Error> {
    for jdev in topology.iter_mut() {
        if jdev.id == out.jdev {
            continue;
        }
        let consumer = jdev.id;
        for input in jdev.inputs.iter_mut() {
            if input.jdev.is_none() && input.clk.is_match(&out.clk) {
                create_link(input, consumer, out)?;
            }
        }
    }
    Ok(())
}

fn init_output_links(
    topology: &mut Jesd204Topology,
    id: Jesd204DevId,
    output_clocks: &[Option<Clk>],
) -> Result<(), Jesd204Error> {
    for (i, clk) in output_clocks.iter().enumerate() {
        let Some(clk) = clk else {
            jesd_err!(dev_name(topology, id), "null clock reference ({})", i);
            return Err(Jesd204Error::InvalidArgument);
        };
        topology
            .get_mut(id)
            .ok_or(Jesd204Error::InvalidArgument)?
            .outputs
            .try_reserve(1)?;

        let mut out = Jesd204LinkOut::new(clk.get(), id);
        let res = update_input_links(topology, &mut out);
        if let Some(jdev) = topology.get_mut(id) {
            // reserved above
            jdev.outputs.push(out);
        }
        res?;
    }
    Ok(())
}

fn init_input_links(
    topology: &mut Jesd204Topology,
    id: Jesd204DevId,
    desc: &dyn HwDescription,
    clocks: &dyn ClockProvider,
) -> Result<(), Jesd204Error> {
    let count = desc.clock_count().map_err(|err| {
        jesd_err!(dev_name(topology, id), "unable to count input clocks: {}", err);
        err
    })?;

    for i in 0..count {
        let clk = clocks.resolve(desc, i).map_err(|err| {
            jesd_warn!(dev_name(topology, id), "unable to get input clock {}: {}", i, err);
            err
        })?;
        topology
            .get_mut(id)
            .ok_or(Jesd204Error::InvalidArgument)?
            .inputs
            .try_reserve(1)?;

        let mut input = Jesd204LinkIn::new(clk);
        let res = match find_output_link(topology, id, &input.clk) {
            Some(out) => create_link(&mut input, id, out),
            None => Ok(()),
        };
        if input.jdev.is_none() {
            jesd_debug!(
                "{}: no producer yet for input clock '{}'",
                dev_name(topology, id),
                input.clk.name()
            );
        }
        if let Some(jdev) = topology.get_mut(id) {
            jdev.inputs.push(input);
        }
        res?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::{
        clk::{Clk, NoClocks},
        dev::Jesd204DevData,
        error::Jesd204Error,
        registry::Jesd204Registry,
        testing::{ClockList, board},
    };
    use alloc::vec;

    #[test]
    fn device_does_not_feed_itself() {
        let registry = Jesd204Registry::new();
        let parent = board("spi0");
        let loopback = Clk::new("loopback");
        let data = Jesd204DevData::new("pll").with_output(loopback.clone());
        let inputs = ClockList::new(&[&loopback]);
        let id = registry
            .probe(&parent.create_ref(), &data, &inputs, &inputs)
            .unwrap();
        assert_eq!(registry.inputs(id).unwrap()[0].jdev(), None);
        assert!(registry.outputs(id).unwrap()[0].consumers().is_empty());
    }

    #[test]
    fn one_output_feeds_every_matching_input_of_a_device() {
        let registry = Jesd204Registry::new();
        let parent = board("spi0");
        let dev_clk = Clk::new("dev_clk");
        let inputs = ClockList::new(&[&dev_clk, &dev_clk]);
        let adc = registry
            .probe(&parent.create_ref(), &Jesd204DevData::new("adc"), &inputs, &inputs)
            .unwrap();
        let clkgen = registry
            .probe(
                &parent.create_ref(),
                &Jesd204DevData::new("clkgen").with_output(dev_clk.clone()),
                &NoClocks,
                &inputs,
            )
            .unwrap();
        let ins = registry.inputs(adc).unwrap();
        assert!(ins.iter().all(|input| input.jdev() == Some(clkgen)));
        assert_eq!(registry.outputs(clkgen).unwrap()[0].consumers(), [adc, adc]);
    }

    #[test]
    fn null_output_keeps_earlier_outputs() {
        let registry = Jesd204Registry::new();
        let parent = board("spi0");
        let dev_clk = Clk::new("dev_clk");
        let inputs = ClockList::new(&[&dev_clk]);
        let adc = registry
            .probe(&parent.create_ref(), &Jesd204DevData::new("adc"), &inputs, &inputs)
            .unwrap();

        let data = Jesd204DevData {
            name: "clkgen",
            ops: None,
            output_clocks: vec![Some(dev_clk.clone()), None, Some(Clk::new("sysref"))],
        };
        let clkgen = registry.register(&parent.create_ref(), &data).unwrap();
        assert_eq!(
            registry.init_links(clkgen, &data, &NoClocks, &inputs),
            Err(Jesd204Error::InvalidArgument)
        );
        assert_eq!(registry.outputs(clkgen).unwrap().len(), 1);
        assert_eq!(registry.inputs(adc).unwrap()[0].jdev(), Some(clkgen));
    }

    #[test]
    fn unresolvable_input_keeps_earlier_inputs() {
        let registry = Jesd204Registry::new();
        let parent = board("spi0");
        let dev_clk = Clk::new("dev_clk");
        let clkgen = registry
            .probe(
                &parent.create_ref(),
                &Jesd204DevData::new("clkgen").with_output(dev_clk.clone()),
                &NoClocks,
                &ClockList::default(),
            )
            .unwrap();

        let inputs = ClockList::with_missing(&[Some(&dev_clk), None, Some(&dev_clk)]);
        let data = Jesd204DevData::new("adc");
        let adc = registry.register(&parent.create_ref(), &data).unwrap();
        assert_eq!(
            registry.init_links(adc, &data, &inputs, &inputs),
            Err(Jesd204Error::NotAvailable)
        );
        let ins = registry.inputs(adc).unwrap();
        assert_eq!(ins.len(), 1);
        assert_eq!(ins[0].jdev(), Some(clkgen));
        assert_eq!(registry.outputs(clkgen).unwrap()[0].consumers(), [adc]);
    }
}
