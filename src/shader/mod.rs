//! WGSL generation for shapes
//!
//! Pure text and data: nothing here touches the GPU.

pub mod program;
pub mod source;
pub mod uniforms;

pub use program::{DistanceProgram, Step};
pub use source::{FRAGMENT_ENTRY, VERTEX_ENTRY, shape_module};
pub use uniforms::{
    UniformBlock, UniformDecl, UniformKind, UniformLayout, UniformSink, UniformValue,
    UniformValues,
};
