use crate::prop::{Property, PropertyError};
use alloc::{boxed::Box, collections::btree_map::BTreeMap, string::String, vec::Vec};

pub struct DeviceTree {
    pub root_id: usize,
    pub container: Vec<Node>,
    pub phandle_map: BTreeMap<u32, usize>,
}

pub struct Node {
    pub node_id: usize,
    pub parent_id: usize,
    pub full_name: Box<str>,
    pub node_name: Box<str>,
    pub unit_addr: Box<str>,
    pub children: Vec<usize>,
    pub props: Vec<Property>,
}

/// One entry of a phandle list such as `clocks = <&clkgen 0>, <&clkgen 1>;`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhandleArgs {
    pub phandle: u32,
    /// Node the phandle points at, `None` for an empty (zero) entry.
    pub node_id: Option<usize>,
    pub args: Vec<u32>,
}

impl DeviceTree {
    pub fn is_root(&self, node: &Node) -> bool {
        self.get_parent(node).node_id == node.node_id
    }
    fn full_path(&self, node: &Node) -> String {
        if self.is_root(node) {
            String::from("")
        } else {
            self.full_path(self.get_parent(node)) + "/" + node.full_name.as_ref()
        }
    }
    pub fn get_full_path(&self, node: &Node) -> Box<str> {
        let path = self.full_path(node);
        if path.is_empty() {
            Box::from("/")
        } else {
            path.into_boxed_str()
        }
    }
    pub fn get_parent(&self, node: &Node) -> &Node {
        &self.container[node.parent_id]
    }
    pub fn get_by_id(&self, node_id: usize) -> Option<&Node> {
        self.container.get(node_id)
    }
    pub fn get_children<'b>(&'b self, node: &Node) -> impl Iterator<Item = &'b Node> {
        node.children.iter().map(|x| &self.container[*x])
    }
    /// Find a direct child by its full name (`name@addr`) or bare node name.
    pub fn get_child_by_name<'b>(&'b self, node: &Node, name: &str) -> Option<&'b Node> {
        self.get_children(node)
            .find(|child| child.full_name.as_ref() == name || child.node_name.as_ref() == name)
    }
    pub fn get_property<'b>(&self, node: &'b Node, name: impl AsRef<str>) -> Option<&'b Property> {
        let name = name.as_ref();
        node.props.iter().find(|prop| prop.name.as_ref() == name)
    }
    pub fn get_node(&self, path: impl AsRef<str>) -> Option<&Node> {
        let mut node = &self.container[self.root_id];
        for section in path.as_ref().split('/') {
            if section.trim().is_empty() {
                continue;
            }
            node = self
                .get_children(node)
                .find(|subnode| subnode.full_name.as_ref() == section)?;
        }
        Some(node)
    }
    pub fn find_by_phandle(&self, phandle: u32) -> Option<&Node> {
        self.phandle_map
            .get(&phandle)
            .and_then(|id| self.container.get(*id))
    }

    /// Walk a phandle list property where each target node states its own
    /// argument count in `cells_name`.
    ///
    /// A zero phandle is an empty entry without arguments. Return
    /// [PropertyError::PropNotFound] if `list_name` is absent.
    pub fn parse_phandle_list(
        &self,
        node: &Node,
        list_name: &str,
        cells_name: &str,
    ) -> Result<Vec<PhandleArgs>, PropertyError> {
        let cells = self
            .get_property(node, list_name)
            .ok_or(PropertyError::PropNotFound)?
            .value_as_cells()?;
        let mut res = Vec::new();
        let mut index = 0;
        while index < cells.len() {
            let phandle = cells[index];
            index += 1;
            if phandle == 0 {
                res.push(PhandleArgs {
                    phandle,
                    node_id: None,
                    args: Vec::new(),
                });
                continue;
            }
            let target = self.find_by_phandle(phandle).ok_or_else(|| {
                log::warn!(
                    "{}: could not find phandle {} in '{}'",
                    self.get_full_path(node),
                    phandle,
                    list_name
                );
                PropertyError::DanglingHandle
            })?;
            let count = self
                .get_property(target, cells_name)
                .ok_or(PropertyError::InvalidPropFormat)?
                .value_as_u32()? as usize;
            let end = index
                .checked_add(count)
                .ok_or(PropertyError::InvalidPropFormat)?;
            let args = cells
                .get(index..end)
                .ok_or(PropertyError::InvalidPropFormat)?;
            index = end;
            res.push(PhandleArgs {
                phandle,
                node_id: Some(target.node_id),
                args: Vec::from(args),
            });
        }
        Ok(res)
    }

    pub fn count_phandle_with_args(
        &self,
        node: &Node,
        list_name: &str,
        cells_name: &str,
    ) -> Result<usize, PropertyError> {
        Ok(self.parse_phandle_list(node, list_name, cells_name)?.len())
    }

    pub fn parse_phandle_with_args(
        &self,
        node: &Node,
        list_name: &str,
        cells_name: &str,
        index: usize,
    ) -> Result<PhandleArgs, PropertyError> {
        self.parse_phandle_list(node, list_name, cells_name)?
            .into_iter()
            .nth(index)
            .ok_or(PropertyError::PropNotFound)
    }
}

#[cfg(test)]
mod tests {
    use crate::{builder::DeviceTreeBuilder, prop::Property};

    use super::*;

    fn clock_tree() -> DeviceTree {
        let mut builder = DeviceTreeBuilder::new();
        let root = builder.root();
        let clkgen = builder.add_node(root, "clkgen@0");
        builder.add_property(clkgen, Property::from_u32("#clock-cells", 1));
        builder.add_property(clkgen, Property::from_u32("phandle", 5));
        let osc = builder.add_node(root, "osc");
        builder.add_property(osc, Property::from_u32("#clock-cells", 0));
        builder.add_property(osc, Property::from_u32("phandle", 7));
        let adc = builder.add_node(root, "adc@1");
        builder.add_property(adc, Property::from_cells("clocks", &[5, 2, 7, 0, 5, 3]));
        builder.add_node(adc, "jesd204");
        builder.build()
    }

    #[test]
    fn paths_and_children() {
        let tree = clock_tree();
        let adc = tree.get_node("/adc@1").unwrap();
        assert_eq!(&*tree.get_full_path(adc), "/adc@1");
        assert_eq!(&*adc.node_name, "adc");
        assert_eq!(&*adc.unit_addr, "1");
        assert!(tree.get_child_by_name(adc, "jesd204").is_some());
        assert!(tree.get_child_by_name(adc, "missing").is_none());
        assert_eq!(&*tree.get_full_path(tree.get_node("/").unwrap()), "/");
    }

    #[test]
    fn phandle_list_uses_target_cell_count() {
        let tree = clock_tree();
        let adc = tree.get_node("/adc@1").unwrap();
        let list = tree
            .parse_phandle_list(adc, "clocks", "#clock-cells")
            .unwrap();
        assert_eq!(list.len(), 4);
        assert_eq!(list[0].args, [2]);
        assert_eq!(list[1].phandle, 7);
        assert!(list[1].args.is_empty());
        assert_eq!(list[2].node_id, None);
        assert_eq!(list[3].args, [3]);
        assert_eq!(
            tree.count_phandle_with_args(adc, "clocks", "#clock-cells"),
            Ok(4)
        );
    }

    #[test]
    fn missing_list_and_dangling_phandle() {
        let tree = clock_tree();
        let osc = tree.get_node("/osc").unwrap();
        assert_eq!(
            tree.count_phandle_with_args(osc, "clocks", "#clock-cells"),
            Err(PropertyError::PropNotFound)
        );

        let mut builder = DeviceTreeBuilder::new();
        let root = builder.root();
        let dev = builder.add_node(root, "dac");
        builder.add_property(dev, Property::from_cells("clocks", &[9]));
        let tree = builder.build();
        let dev = tree.get_node("/dac").unwrap();
        assert_eq!(
            tree.parse_phandle_with_args(dev, "clocks", "#clock-cells", 0),
            Err(PropertyError::DanglingHandle)
        );
    }

    #[test]
    fn overrunning_arguments_are_malformed() {
        let mut builder = DeviceTreeBuilder::new();
        let root = builder.root();
        let clk = builder.add_node(root, "clk");
        builder.add_property(clk, Property::from_u32("#clock-cells", 2));
        builder.add_property(clk, Property::from_u32("phandle", 1));
        let dev = builder.add_node(root, "dac");
        builder.add_property(dev, Property::from_cells("clocks", &[1, 0]));
        let tree = builder.build();
        let dev = tree.get_node("/dac").unwrap();
        assert_eq!(
            tree.count_phandle_with_args(dev, "clocks", "#clock-cells"),
            Err(PropertyError::InvalidPropFormat)
        );
    }

    #[test]
    fn huge_cell_count_is_malformed() {
        let mut builder = DeviceTreeBuilder::new();
        let root = builder.root();
        let clk = builder.add_node(root, "clk");
        builder.add_property(clk, Property::from_u32("#clock-cells", u32::MAX));
        builder.add_property(clk, Property::from_u32("phandle", 1));
        let dev = builder.add_node(root, "dac");
        builder.add_property(dev, Property::from_cells("clocks", &[1, 0, 0]));
        let tree = builder.build();
        let dev = tree.get_node("/dac").unwrap();
        assert_eq!(
            tree.parse_phandle_list(dev, "clocks", "#clock-cells"),
            Err(PropertyError::InvalidPropFormat)
        );
    }
}
