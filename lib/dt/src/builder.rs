//! Incremental construction of a [DeviceTree].
//!
//! Nodes are appended in creation order; the root is always node `0` and is
//! its own parent, matching what a flattened-tree reader produces.

use crate::{
    node::{DeviceTree, Node},
    prop::Property,
};
use alloc::{boxed::Box, collections::btree_map::BTreeMap, vec, vec::Vec};
use config::OF_PHANDLE_PROP;

pub struct DeviceTreeBuilder {
    nodes: Vec<Node>,
}

impl DeviceTreeBuilder {
    pub fn new() -> DeviceTreeBuilder {
        DeviceTreeBuilder {
            nodes: vec![Node {
                node_id: 0,
                parent_id: 0,
                full_name: Box::from(""),
                node_name: Box::from(""),
                unit_addr: Box::from(""),
                children: vec![],
                props: vec![],
            }],
        }
    }

    pub fn root(&self) -> usize {
        0
    }

    /// Append a child named `full_name` (`name` or `name@unit-address`) under `parent_id`.
    ///
    /// Panics if `parent_id` was not returned by this builder.
    pub fn add_node(&mut self, parent_id: usize, full_name: &str) -> usize {
        let (node_name, unit_addr) = match full_name.find('@') {
            Some(idx) => (&full_name[0..idx], &full_name[idx + 1..]),
            None => (full_name, ""),
        };
        let id = self.nodes.len();
        self.nodes.push(Node {
            node_id: id,
            parent_id,
            full_name: Box::from(full_name),
            node_name: Box::from(node_name),
            unit_addr: Box::from(unit_addr),
            children: vec![],
            props: vec![],
        });
        self.nodes[parent_id].children.push(id);
        id
    }

    pub fn add_property(&mut self, node_id: usize, prop: Property) -> &mut Self {
        self.nodes[node_id].props.push(prop);
        self
    }

    /// Finish the tree and index every node carrying a `phandle` property.
    ///
    /// A later node with the same phandle shadows an earlier one.
    pub fn build(self) -> DeviceTree {
        let mut phandle_map = BTreeMap::new();
        for node in &self.nodes {
            let phandle = node
                .props
                .iter()
                .find(|prop| prop.name.as_ref() == OF_PHANDLE_PROP)
                .and_then(|prop| prop.value_as_u32().ok());
            if let Some(phandle) = phandle {
                if phandle_map.insert(phandle, node.node_id).is_some() {
                    log::warn!("Duplicated phandle {} in device tree.", phandle);
                }
            }
        }
        DeviceTree {
            root_id: 0,
            container: self.nodes,
            phandle_map,
        }
    }
}

impl Default for DeviceTreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
