//! Distance programs
//!
//! A shape lowers to a flat list of [`Step`]s. The same list is printed as a
//! WGSL statement block and interpreted on the CPU, so the text the GPU runs
//! and the offline evaluation can only differ inside a single step template.
//!
//! Registers: `point` (vec2<f32>) is the query point, `dist` (f32) receives
//! the distance. Uniforms are read through the struct instance `u`.

use super::uniforms::{UniformDecl, UniformKind, UniformSink, UniformValues};
use crate::error::ShaderError;
use crate::sim::sdf::{Bloated, Rect, Shape, Transform};
use crate::{Rotate, Vec2D};

/// One statement block of a distance program
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// point = ((point - translate) rotated by -rotation) / scale
    InverseTransform {
        scale: String,
        rotation: String,
        translate: String,
    },
    /// dist = length(point) - 1
    CircleDistance,
    /// Unrounded box distance with full extents `size`
    RectDistance { size: String },
    /// dist *= scale
    ScaleDistance { scale: String },
    /// dist -= radius
    Bloat { radius: String },
}

impl Step {
    /// WGSL text of this step
    pub fn to_wgsl(&self) -> String {
        match self {
            Step::InverseTransform {
                scale,
                rotation,
                translate,
            } => format!(
                "{{\n    \
                 point = point - u.{translate};\n    \
                 let c = cos(-u.{rotation});\n    \
                 let s = sin(-u.{rotation});\n    \
                 point = vec2<f32>(c * point.x - s * point.y, s * point.x + c * point.y);\n    \
                 point = point / u.{scale};\n\
                 }}\n"
            ),
            Step::CircleDistance => "{\n    dist = length(point) - 1.0;\n}\n".to_string(),
            Step::RectDistance { size } => format!(
                "{{\n    \
                 let p_abs = abs(point);\n    \
                 let diff = p_abs - 0.5 * u.{size};\n    \
                 let positive = length(max(diff, vec2<f32>(0.0, 0.0)));\n    \
                 let negative = min(max(diff.x, diff.y), 0.0);\n    \
                 dist = positive + negative;\n\
                 }}\n"
            ),
            Step::ScaleDistance { scale } => {
                format!("{{\n    dist = dist * u.{scale};\n}}\n")
            }
            Step::Bloat { radius } => format!("{{\n    dist = dist - u.{radius};\n}}\n"),
        }
    }

    /// Execute this step on the CPU
    fn apply(
        &self,
        point: &mut Vec2D,
        dist: &mut f64,
        uniforms: &UniformValues,
    ) -> Result<(), ShaderError> {
        match self {
            Step::InverseTransform {
                scale,
                rotation,
                translate,
            } => {
                let [tx, ty] = uniforms.vec2(translate)?;
                let rotation = f64::from(uniforms.f32(rotation)?);
                let scale = f64::from(uniforms.f32(scale)?);
                let moved = *point - Vec2D::new(f64::from(tx), f64::from(ty));
                *point = moved.rotated(-rotation) / scale;
            }
            Step::CircleDistance => {
                *dist = point.length() - 1.0;
            }
            Step::RectDistance { size } => {
                let [w, h] = uniforms.vec2(size)?;
                let diff = point.abs() - 0.5 * Vec2D::new(f64::from(w), f64::from(h));
                let positive = diff.max(Vec2D::ZERO).length();
                let negative = diff.x.max(diff.y).min(0.0);
                *dist = positive + negative;
            }
            Step::ScaleDistance { scale } => {
                *dist *= f64::from(uniforms.f32(scale)?);
            }
            Step::Bloat { radius } => {
                *dist -= f64::from(uniforms.f32(radius)?);
            }
        }
        Ok(())
    }
}

/// Ordered steps computing a shape's distance
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DistanceProgram {
    steps: Vec<Step>,
}

impl DistanceProgram {
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// WGSL statement blocks, in execution order
    pub fn to_wgsl(&self) -> String {
        self.steps.iter().map(Step::to_wgsl).collect()
    }

    /// Run the program the way the fragment shader would
    pub fn evaluate(&self, point: Vec2D, uniforms: &UniformValues) -> Result<f64, ShaderError> {
        let mut point = point;
        let mut dist = 0.0;
        for step in &self.steps {
            step.apply(&mut point, &mut dist, uniforms)?;
        }
        Ok(dist)
    }
}

/// Counts of enclosing wrappers, used to keep nested uniform names unique
#[derive(Debug, Clone, Copy, Default)]
struct Scope {
    transforms: usize,
    bloats: usize,
}

fn uniform_name(base: &str, depth: usize) -> String {
    if depth == 0 {
        base.to_string()
    } else {
        format!("{base}_{depth}")
    }
}

struct TransformNames {
    scale: String,
    rotation: String,
    translate: String,
}

impl TransformNames {
    fn at(scope: Scope) -> Self {
        Self {
            scale: uniform_name("transform_scale", scope.transforms),
            rotation: uniform_name("transform_rotation", scope.transforms),
            translate: uniform_name("transform_translate", scope.transforms),
        }
    }
}

const RECT_SIZE: &str = "rect_size";

impl Shape {
    /// Lower this shape to a distance program
    pub fn shader_program(&self) -> DistanceProgram {
        let mut steps = Vec::new();
        self.lower(Scope::default(), &mut steps);
        DistanceProgram { steps }
    }

    fn lower(&self, scope: Scope, steps: &mut Vec<Step>) {
        match self {
            Shape::Circle(_) => steps.push(Step::CircleDistance),
            Shape::Rect(_) => steps.push(Step::RectDistance {
                size: RECT_SIZE.to_string(),
            }),
            Shape::Transform(t) => {
                let names = TransformNames::at(scope);
                steps.push(Step::InverseTransform {
                    scale: names.scale.clone(),
                    rotation: names.rotation,
                    translate: names.translate,
                });
                let inner = Scope {
                    transforms: scope.transforms + 1,
                    ..scope
                };
                t.inner.lower(inner, steps);
                steps.push(Step::ScaleDistance { scale: names.scale });
            }
            Shape::Bloated(b) => {
                let inner = Scope {
                    bloats: scope.bloats + 1,
                    ..scope
                };
                b.inner.lower(inner, steps);
                steps.push(Step::Bloat {
                    radius: uniform_name("bloat_radius", scope.bloats),
                });
            }
        }
    }

    /// WGSL statements computing `dist` from `point`
    pub fn shader_fragment(&self) -> String {
        self.shader_program().to_wgsl()
    }

    /// Uniforms this shape reads, inner shapes first
    pub fn uniforms(&self) -> Vec<UniformDecl> {
        let mut decls = Vec::new();
        self.collect_uniforms(Scope::default(), &mut decls);
        decls
    }

    fn collect_uniforms(&self, scope: Scope, decls: &mut Vec<UniformDecl>) {
        match self {
            Shape::Circle(_) => {}
            Shape::Rect(_) => decls.push(UniformDecl::new(RECT_SIZE, UniformKind::Vec2)),
            Shape::Transform(t) => {
                t.inner.collect_uniforms(
                    Scope {
                        transforms: scope.transforms + 1,
                        ..scope
                    },
                    decls,
                );
                let names = TransformNames::at(scope);
                decls.push(UniformDecl::new(names.scale, UniformKind::F32));
                decls.push(UniformDecl::new(names.rotation, UniformKind::F32));
                decls.push(UniformDecl::new(names.translate, UniformKind::Vec2));
            }
            Shape::Bloated(b) => {
                b.inner.collect_uniforms(
                    Scope {
                        bloats: scope.bloats + 1,
                        ..scope
                    },
                    decls,
                );
                decls.push(UniformDecl::new(
                    uniform_name("bloat_radius", scope.bloats),
                    UniformKind::F32,
                ));
            }
        }
    }

    /// Uniform declarations as WGSL struct members
    pub fn uniform_decls(&self) -> String {
        self.uniforms().iter().map(UniformDecl::to_wgsl).collect()
    }

    /// Write current parameter values, inner shapes first
    pub fn bind_uniforms(&self, sink: &mut impl UniformSink) {
        self.bind_scoped(Scope::default(), sink);
    }

    fn bind_scoped(&self, scope: Scope, sink: &mut impl UniformSink) {
        match self {
            Shape::Circle(_) => {}
            Shape::Rect(Rect { size }) => {
                sink.set_vec2(RECT_SIZE, size.as_vec2().to_array());
            }
            Shape::Transform(t) => {
                t.inner.bind_scoped(
                    Scope {
                        transforms: scope.transforms + 1,
                        ..scope
                    },
                    sink,
                );
                bind_transform(t, TransformNames::at(scope), sink);
            }
            Shape::Bloated(Bloated { inner, radius }) => {
                inner.bind_scoped(
                    Scope {
                        bloats: scope.bloats + 1,
                        ..scope
                    },
                    sink,
                );
                sink.set_f32(&uniform_name("bloat_radius", scope.bloats), *radius as f32);
            }
        }
    }
}

fn bind_transform(t: &Transform, names: TransformNames, sink: &mut impl UniformSink) {
    sink.set_f32(&names.scale, t.scale() as f32);
    sink.set_f32(&names.rotation, t.rotation as f32);
    sink.set_vec2(&names.translate, t.translate.as_vec2().to_array());
}

impl Transform {
    /// Shader operations of this transform as a composition root
    pub fn shader_program(&self) -> DistanceProgram {
        Shape::Transform(self.clone()).shader_program()
    }

    pub fn uniforms(&self) -> Vec<UniformDecl> {
        Shape::Transform(self.clone()).uniforms()
    }

    pub fn bind_uniforms(&self, sink: &mut impl UniformSink) {
        self.inner.bind_scoped(
            Scope {
                transforms: 1,
                bloats: 0,
            },
            sink,
        );
        bind_transform(self, TransformNames::at(Scope::default()), sink);
    }
}
