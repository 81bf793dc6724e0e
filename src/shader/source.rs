//! Complete WGSL modules for drawing one shape
//!
//! The vertex stage emits a full-screen triangle; the fragment stage maps the
//! pixel to world space (y up), runs the shape's distance program and discards
//! everything outside.

use super::uniforms::{UniformDecl, header_uniforms};
use crate::sim::sdf::Shape;

/// Entry point names
pub const VERTEX_ENTRY: &str = "vs_main";
pub const FRAGMENT_ENTRY: &str = "fs_main";

const VERTEX_STAGE: &str = "\
@vertex
fn vs_main(@builtin(vertex_index) index: u32) -> @builtin(position) vec4<f32> {
    let x = f32(i32(index & 1u) * 4 - 1);
    let y = f32(i32(index & 2u) * 2 - 1);
    return vec4<f32>(x, y, 0.0, 1.0);
}
";

/// Build the full shader module for `shape`
pub fn shape_module(shape: &Shape) -> String {
    let members: String = header_uniforms()
        .into_iter()
        .chain(shape.uniforms())
        .map(|decl: UniformDecl| decl.to_wgsl())
        .collect();

    format!(
        "struct ShapeUniforms {{\n{members}}}\n\n\
         @group(0) @binding(0) var<uniform> u: ShapeUniforms;\n\n\
         {vertex}\n\
         @fragment\n\
         fn fs_main(@builtin(position) frag_coord: vec4<f32>) -> @location(0) vec4<f32> {{\n    \
         var point = vec2<f32>(frag_coord.x, u.viewport.y - frag_coord.y);\n    \
         var dist = 0.0;\n\
         {fragment}\
         if (dist > 0.0) {{\n        \
         discard;\n    \
         }}\n    \
         return u.color;\n\
         }}\n",
        vertex = VERTEX_STAGE,
        fragment = shape.shader_fragment(),
    )
}
