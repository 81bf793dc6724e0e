//! Shape uniforms: declarations, binding targets and GPU byte layout

use std::collections::HashMap;

use crate::error::ShaderError;

/// WGSL type of a shape parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniformKind {
    F32,
    Vec2,
    Vec4,
}

impl UniformKind {
    pub fn wgsl_type(self) -> &'static str {
        match self {
            UniformKind::F32 => "f32",
            UniformKind::Vec2 => "vec2<f32>",
            UniformKind::Vec4 => "vec4<f32>",
        }
    }

    /// Alignment in the uniform address space
    pub fn align(self) -> usize {
        match self {
            UniformKind::F32 => 4,
            UniformKind::Vec2 => 8,
            UniformKind::Vec4 => 16,
        }
    }

    pub fn size(self) -> usize {
        match self {
            UniformKind::F32 => 4,
            UniformKind::Vec2 => 8,
            UniformKind::Vec4 => 16,
        }
    }
}

/// One named shape parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniformDecl {
    pub name: String,
    pub kind: UniformKind,
}

impl UniformDecl {
    pub fn new(name: impl Into<String>, kind: UniformKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Render as a WGSL struct member
    pub fn to_wgsl(&self) -> String {
        format!("    {}: {},\n", self.name, self.kind.wgsl_type())
    }
}

/// Destination for shape parameter values
pub trait UniformSink {
    fn set_f32(&mut self, name: &str, value: f32);
    fn set_vec2(&mut self, name: &str, value: [f32; 2]);
    fn set_vec4(&mut self, name: &str, value: [f32; 4]);
}

/// A bound uniform value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    F32(f32),
    Vec2([f32; 2]),
    Vec4([f32; 4]),
}

impl UniformValue {
    fn kind_name(&self) -> &'static str {
        match self {
            UniformValue::F32(_) => "f32",
            UniformValue::Vec2(_) => "vec2<f32>",
            UniformValue::Vec4(_) => "vec4<f32>",
        }
    }
}

/// Uniform values by name, as a shader would see them
#[derive(Debug, Clone, Default)]
pub struct UniformValues {
    values: HashMap<String, UniformValue>,
}

impl UniformValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<UniformValue> {
        self.values.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn f32(&self, name: &str) -> Result<f32, ShaderError> {
        match self.get(name) {
            Some(UniformValue::F32(v)) => Ok(v),
            Some(other) => Err(ShaderError::KindMismatch {
                name: name.to_string(),
                expected: "f32",
                found: other.kind_name(),
            }),
            None => Err(ShaderError::MissingUniform(name.to_string())),
        }
    }

    pub fn vec2(&self, name: &str) -> Result<[f32; 2], ShaderError> {
        match self.get(name) {
            Some(UniformValue::Vec2(v)) => Ok(v),
            Some(other) => Err(ShaderError::KindMismatch {
                name: name.to_string(),
                expected: "vec2<f32>",
                found: other.kind_name(),
            }),
            None => Err(ShaderError::MissingUniform(name.to_string())),
        }
    }
}

impl UniformSink for UniformValues {
    fn set_f32(&mut self, name: &str, value: f32) {
        self.values.insert(name.to_string(), UniformValue::F32(value));
    }

    fn set_vec2(&mut self, name: &str, value: [f32; 2]) {
        self.values.insert(name.to_string(), UniformValue::Vec2(value));
    }

    fn set_vec4(&mut self, name: &str, value: [f32; 4]) {
        self.values.insert(name.to_string(), UniformValue::Vec4(value));
    }
}

/// Name of the fill colour uniform every shape module carries
pub const COLOR_UNIFORM: &str = "color";
/// Name of the viewport size uniform (pixels) every shape module carries
pub const VIEWPORT_UNIFORM: &str = "viewport";

/// Members that precede the shape's own uniforms in every module
pub fn header_uniforms() -> Vec<UniformDecl> {
    vec![
        UniformDecl::new(COLOR_UNIFORM, UniformKind::Vec4),
        UniformDecl::new(VIEWPORT_UNIFORM, UniformKind::Vec2),
    ]
}

/// Placement of one member inside the uniform struct
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniformSlot {
    pub decl: UniformDecl,
    pub offset: usize,
}

/// WGSL uniform address-space layout of a struct
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniformLayout {
    slots: Vec<UniformSlot>,
    size: usize,
}

impl UniformLayout {
    pub fn new(decls: impl IntoIterator<Item = UniformDecl>) -> Self {
        let mut offset = 0;
        let mut max_align = 16;
        let mut slots = Vec::new();
        for decl in decls {
            let align = decl.kind.align();
            max_align = max_align.max(align);
            offset = round_up(offset, align);
            let size = decl.kind.size();
            slots.push(UniformSlot { decl, offset });
            offset += size;
        }
        Self {
            slots,
            size: round_up(offset, max_align),
        }
    }

    /// Header members followed by `shape_uniforms`
    pub fn for_shape(shape_uniforms: Vec<UniformDecl>) -> Self {
        Self::new(header_uniforms().into_iter().chain(shape_uniforms))
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn slots(&self) -> &[UniformSlot] {
        &self.slots
    }

    pub fn slot(&self, name: &str) -> Option<&UniformSlot> {
        self.slots.iter().find(|s| s.decl.name == name)
    }
}

fn round_up(value: usize, align: usize) -> usize {
    value.div_ceil(align) * align
}

/// Uniform values packed into a GPU-ready byte buffer
#[derive(Debug, Clone)]
pub struct UniformBlock {
    layout: UniformLayout,
    bytes: Vec<u8>,
}

impl UniformBlock {
    pub fn new(layout: UniformLayout) -> Self {
        let bytes = vec![0; layout.size()];
        Self { layout, bytes }
    }

    pub fn layout(&self) -> &UniformLayout {
        &self.layout
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    fn write(&mut self, name: &str, kind: UniformKind, data: &[u8]) {
        let Some(slot) = self.layout.slot(name) else {
            log::warn!("Ignoring unknown uniform `{}`", name);
            return;
        };
        if slot.decl.kind != kind {
            log::warn!(
                "Ignoring uniform `{}`: declared {}, bound {}",
                name,
                slot.decl.kind.wgsl_type(),
                kind.wgsl_type()
            );
            return;
        }
        let start = slot.offset;
        self.bytes[start..start + data.len()].copy_from_slice(data);
    }
}

impl UniformSink for UniformBlock {
    fn set_f32(&mut self, name: &str, value: f32) {
        self.write(name, UniformKind::F32, bytemuck::bytes_of(&value));
    }

    fn set_vec2(&mut self, name: &str, value: [f32; 2]) {
        self.write(name, UniformKind::Vec2, bytemuck::cast_slice(&value));
    }

    fn set_vec4(&mut self, name: &str, value: [f32; 4]) {
        self.write(name, UniformKind::Vec4, bytemuck::cast_slice(&value));
    }
}
