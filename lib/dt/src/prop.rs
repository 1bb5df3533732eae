use alloc::{boxed::Box, vec::Vec};

pub struct Property {
    pub name: Box<str>,
    pub data: Box<[u8]>,
}

impl Property {
    pub fn new(name: impl AsRef<str>, data: impl Into<Box<[u8]>>) -> Property {
        Property {
            name: Box::from(name.as_ref()),
            data: data.into(),
        }
    }
    pub fn from_u32(name: impl AsRef<str>, value: u32) -> Property {
        Property::from_cells(name, &[value])
    }
    /// Encode `cells` as a list of big-endian 32-bit cells.
    pub fn from_cells(name: impl AsRef<str>, cells: &[u32]) -> Property {
        let data: Vec<u8> = cells.iter().flat_map(|x| x.to_be_bytes()).collect();
        Property::new(name, data)
    }
}

impl Property {
    pub fn value_as_u32(&self) -> Result<u32, PropertyError> {
        let bytes = self.data.get(0..4).ok_or(PropertyError::InvalidPropFormat)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }
    /// Decode the whole value as big-endian 32-bit cells.
    ///
    /// Fails if the length is not a multiple of 4.
    pub fn value_as_cells(&self) -> Result<Vec<u32>, PropertyError> {
        if self.data.len() % 4 != 0 {
            return Err(PropertyError::InvalidPropFormat);
        }
        Ok(self
            .data
            .chunks_exact(4)
            .map(|c| u32::from_be_bytes([c[0], c[1], c[2], c[3]]))
            .collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyError {
    InvalidPropFormat,
    PropNotFound,
    DanglingHandle,
}
