use serde::Deserialize;

use super::PlyError;

/// Supported vertex layouts of a PLY file.
#[derive(Debug, PartialEq, Clone)]
pub enum PlyType {
    /// The common `x y z red green blue nx ny nz` layout.
    XYZRgbNormals,
    /// Any other property list, decoded field by field.
    Dynamic(Vec<PlyPropertyDefinition>),
}

/// A single property declaration from the PLY header.
#[derive(Debug, PartialEq, Clone)]
pub struct PlyPropertyDefinition {
    /// The property name.
    pub name: String,
    /// The property scalar type.
    pub data_type: PlyDataType,
}

/// Scalar types a PLY property can carry.
#[derive(Debug, PartialEq, Clone, Copy)]
#[allow(missing_docs)]
pub enum PlyDataType {
    Float32,
    Float64,
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
}

impl PlyDataType {
    /// Size of the scalar in bytes.
    pub fn size(&self) -> usize {
        match self {
            PlyDataType::Float32 | PlyDataType::Int32 | PlyDataType::UInt32 => 4,
            PlyDataType::Float64 => 8,
            PlyDataType::Int16 | PlyDataType::UInt16 => 2,
            PlyDataType::Int8 | PlyDataType::UInt8 => 1,
        }
    }
}

/// Conversion of a decoded vertex entry into point cloud fields.
pub trait PlyPropertyTrait {
    /// The vertex position.
    fn to_point(&self) -> [f64; 3];
    /// The vertex color in [0, 1].
    fn to_color(&self) -> [f64; 3];
    /// The vertex normal.
    fn to_normal(&self) -> [f64; 3];
}

/// Raw `x y z red green blue nx ny nz` vertex entry.
#[repr(C, packed)]
#[derive(Debug, Deserialize, bincode::Decode)]
#[allow(missing_docs)]
pub struct XYZRgbNormalsProperty {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub nx: f32,
    pub ny: f32,
    pub nz: f32,
}

impl PlyPropertyTrait for XYZRgbNormalsProperty {
    fn to_point(&self) -> [f64; 3] {
        [self.x as f64, self.y as f64, self.z as f64]
    }

    fn to_color(&self) -> [f64; 3] {
        [
            self.red as f64 / 255.0,
            self.green as f64 / 255.0,
            self.blue as f64 / 255.0,
        ]
    }

    fn to_normal(&self) -> [f64; 3] {
        [self.nx as f64, self.ny as f64, self.nz as f64]
    }
}

/// Vertex entry decoded against an arbitrary header schema.
#[derive(Debug)]
pub struct DynamicProperty {
    properties: Vec<(String, DynamicPropertyValue)>,
}

#[derive(Debug, Clone, Copy)]
enum DynamicPropertyValue {
    Float32(f32),
    Float64(f64),
    Int8(i8),
    UInt8(u8),
    Int16(i16),
    UInt16(u16),
    Int32(i32),
    UInt32(u32),
}

impl DynamicProperty {
    fn parse_from_buffer(buffer: &[u8], schema: &[PlyPropertyDefinition]) -> Result<Self, PlyError> {
        let mut properties = Vec::new();
        let mut offset = 0;

        for prop_def in schema {
            let size = prop_def.data_type.size();
            if offset + size > buffer.len() {
                return Err(PlyError::UnsupportedProperty);
            }

            let bytes = &buffer[offset..offset + size];
            let value = match prop_def.data_type {
                PlyDataType::Float32 => {
                    DynamicPropertyValue::Float32(f32::from_le_bytes(bytes.try_into().unwrap()))
                }
                PlyDataType::Float64 => {
                    DynamicPropertyValue::Float64(f64::from_le_bytes(bytes.try_into().unwrap()))
                }
                PlyDataType::Int8 => DynamicPropertyValue::Int8(bytes[0] as i8),
                PlyDataType::UInt8 => DynamicPropertyValue::UInt8(bytes[0]),
                PlyDataType::Int16 => {
                    DynamicPropertyValue::Int16(i16::from_le_bytes(bytes.try_into().unwrap()))
                }
                PlyDataType::UInt16 => {
                    DynamicPropertyValue::UInt16(u16::from_le_bytes(bytes.try_into().unwrap()))
                }
                PlyDataType::Int32 => {
                    DynamicPropertyValue::Int32(i32::from_le_bytes(bytes.try_into().unwrap()))
                }
                PlyDataType::UInt32 => {
                    DynamicPropertyValue::UInt32(u32::from_le_bytes(bytes.try_into().unwrap()))
                }
            };

            properties.push((prop_def.name.clone(), value));
            offset += size;
        }

        Ok(DynamicProperty { properties })
    }

    fn get_float(&self, name: &str) -> f64 {
        self.properties
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| match v {
                DynamicPropertyValue::Float32(v) => *v as f64,
                DynamicPropertyValue::Float64(v) => *v,
                DynamicPropertyValue::Int8(v) => *v as f64,
                DynamicPropertyValue::UInt8(v) => *v as f64,
                DynamicPropertyValue::Int16(v) => *v as f64,
                DynamicPropertyValue::UInt16(v) => *v as f64,
                DynamicPropertyValue::Int32(v) => *v as f64,
                DynamicPropertyValue::UInt32(v) => *v as f64,
            })
            .unwrap_or(0.0)
    }

    fn get_unit_float(&self, name: &str) -> f64 {
        self.properties
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| match v {
                // u8 colors normalize to [0, 1], float colors are already unit range
                DynamicPropertyValue::UInt8(v) => *v as f64 / 255.0,
                DynamicPropertyValue::Int8(v) => *v as f64 / 255.0,
                DynamicPropertyValue::Float32(v) => *v as f64,
                DynamicPropertyValue::Float64(v) => *v,
                _ => 0.0,
            })
            .unwrap_or(0.0)
    }
}

impl PlyPropertyTrait for DynamicProperty {
    fn to_point(&self) -> [f64; 3] {
        [self.get_float("x"), self.get_float("y"), self.get_float("z")]
    }

    fn to_color(&self) -> [f64; 3] {
        [
            self.get_unit_float("red"),
            self.get_unit_float("green"),
            self.get_unit_float("blue"),
        ]
    }

    fn to_normal(&self) -> [f64; 3] {
        [
            self.get_float("nx"),
            self.get_float("ny"),
            self.get_float("nz"),
        ]
    }
}

/// A decoded vertex entry of any supported layout.
pub enum PlyProperty {
    /// Fast-path layout.
    XYZRgbNormals(XYZRgbNormalsProperty),
    /// Schema-driven layout.
    Dynamic(DynamicProperty),
}

impl PlyType {
    /// Decode one vertex entry from a raw buffer.
    pub fn deserialize(&self, buffer: &[u8]) -> Result<PlyProperty, PlyError> {
        match self {
            PlyType::XYZRgbNormals => {
                let (property, _): (XYZRgbNormalsProperty, usize) =
                    bincode::decode_from_slice(buffer, bincode::config::standard())?;
                Ok(PlyProperty::XYZRgbNormals(property))
            }
            PlyType::Dynamic(ref schema) => {
                let dynamic_property = DynamicProperty::parse_from_buffer(buffer, schema)?;
                Ok(PlyProperty::Dynamic(dynamic_property))
            }
        }
    }

    /// Size in bytes of one vertex entry.
    pub fn size_of(&self) -> usize {
        match self {
            PlyType::XYZRgbNormals => std::mem::size_of::<XYZRgbNormalsProperty>(),
            PlyType::Dynamic(ref props) => props.iter().map(|p| p.data_type.size()).sum(),
        }
    }

    /// Whether the layout carries color properties.
    pub fn has_colors(&self) -> bool {
        match self {
            PlyType::XYZRgbNormals => true,
            PlyType::Dynamic(ref props) => props.iter().any(|p| p.name == "red"),
        }
    }

    /// Whether the layout carries normal properties.
    pub fn has_normals(&self) -> bool {
        match self {
            PlyType::XYZRgbNormals => true,
            PlyType::Dynamic(ref props) => props.iter().any(|p| p.name == "nx"),
        }
    }

    /// Match a header property list against the known layouts.
    pub fn detect_format(properties: &[PlyPropertyDefinition]) -> Result<Self, PlyError> {
        if properties.len() == 9 {
            let expected_names = ["x", "y", "z", "red", "green", "blue", "nx", "ny", "nz"];
            let expected_types = [
                PlyDataType::Float32,
                PlyDataType::Float32,
                PlyDataType::Float32,
                PlyDataType::UInt8,
                PlyDataType::UInt8,
                PlyDataType::UInt8,
                PlyDataType::Float32,
                PlyDataType::Float32,
                PlyDataType::Float32,
            ];
            if properties
                .iter()
                .zip(expected_names.iter().zip(expected_types.iter()))
                .all(|(p, (name, ty))| &p.name == name && &p.data_type == ty)
            {
                return Ok(PlyType::XYZRgbNormals);
            }
        }

        Ok(PlyType::Dynamic(properties.to_vec()))
    }
}

impl PlyPropertyTrait for PlyProperty {
    fn to_point(&self) -> [f64; 3] {
        match self {
            PlyProperty::XYZRgbNormals(property) => property.to_point(),
            PlyProperty::Dynamic(property) => property.to_point(),
        }
    }

    fn to_color(&self) -> [f64; 3] {
        match self {
            PlyProperty::XYZRgbNormals(property) => property.to_color(),
            PlyProperty::Dynamic(property) => property.to_color(),
        }
    }

    fn to_normal(&self) -> [f64; 3] {
        match self {
            PlyProperty::XYZRgbNormals(property) => property.to_normal(),
            PlyProperty::Dynamic(property) => property.to_normal(),
        }
    }
}
