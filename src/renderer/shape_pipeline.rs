//! Per-shape render pipelines
//!
//! Each entity gets a pipeline compiled from its generated WGSL module and a
//! uniform buffer laid out for that module. A frame is one render pass with
//! one full-screen draw per entity, in entity order.

use std::collections::HashMap;

use wgpu::util::DeviceExt;

use super::{colors, entity_color};
use crate::shader::uniforms::{COLOR_UNIFORM, VIEWPORT_UNIFORM};
use crate::shader::{
    FRAGMENT_ENTRY, UniformBlock, UniformLayout, UniformSink, VERTEX_ENTRY, shape_module,
};
use crate::sim::sdf::{Shape, Transform};
use crate::sim::{EntityId, GameState};

/// Bind the header and every shape parameter into `block`
pub fn write_uniforms(
    block: &mut UniformBlock,
    shape: &Transform,
    color: [f32; 4],
    viewport: [f32; 2],
) {
    block.set_vec4(COLOR_UNIFORM, color);
    block.set_vec2(VIEWPORT_UNIFORM, viewport);
    shape.bind_uniforms(block);
}

/// Render pipeline and uniform buffer for one shape
pub struct ShapePipeline {
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    block: UniformBlock,
}

impl ShapePipeline {
    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        shape: &Transform,
        label: &str,
    ) -> Self {
        let root = Shape::Transform(shape.clone());
        let source = shape_module(&root);
        log::debug!("Compiling shader `{}`:\n{}", label, source);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        });

        let block = UniformBlock::new(UniformLayout::for_shape(root.uniforms()));
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: block.as_bytes(),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some(label),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(label),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(label),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some(VERTEX_ENTRY),
                buffers: &[],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some(FRAGMENT_ENTRY),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        Self {
            pipeline,
            uniform_buffer,
            bind_group,
            block,
        }
    }

    /// Upload the shape's current parameters
    pub fn update(
        &mut self,
        queue: &wgpu::Queue,
        shape: &Transform,
        color: [f32; 4],
        viewport: [f32; 2],
    ) {
        write_uniforms(&mut self.block, shape, color, viewport);
        queue.write_buffer(&self.uniform_buffer, 0, self.block.as_bytes());
    }

    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.bind_group, &[]);
        render_pass.draw(0..3, 0..1); // Fullscreen triangle
    }
}

/// Draws a whole game state, one pipeline per entity
pub struct SceneRenderer {
    format: wgpu::TextureFormat,
    pipelines: HashMap<EntityId, ShapePipeline>,
}

impl SceneRenderer {
    pub fn new(format: wgpu::TextureFormat) -> Self {
        Self {
            format,
            pipelines: HashMap::new(),
        }
    }

    /// Number of live pipelines
    pub fn len(&self) -> usize {
        self.pipelines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pipelines.is_empty()
    }

    /// Create pipelines for new entities and drop those of removed ones
    pub fn sync(&mut self, device: &wgpu::Device, state: &GameState) {
        self.pipelines
            .retain(|id, _| state.entities.iter().any(|e| e.id == *id));
        for entity in &state.entities {
            if !self.pipelines.contains_key(&entity.id) {
                let label = format!("{:?} {}", entity.kind, entity.id);
                let pipeline = ShapePipeline::new(device, self.format, &entity.shape, &label);
                self.pipelines.insert(entity.id, pipeline);
            }
        }
    }

    /// Draw `state` into `view`
    ///
    /// `view` must match the format the renderer was created with.
    pub fn render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view: &wgpu::TextureView,
        viewport: [f32; 2],
        state: &GameState,
    ) {
        self.sync(device, state);
        for entity in &state.entities {
            if let Some(pipeline) = self.pipelines.get_mut(&entity.id) {
                pipeline.update(queue, &entity.shape, entity_color(entity.kind), viewport);
            }
        }

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("scene_encoder"),
        });

        {
            let [r, g, b, a] = colors::BACKGROUND.map(f64::from);
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            for entity in &state.entities {
                if let Some(pipeline) = self.pipelines.get(&entity.id) {
                    pipeline.draw(&mut render_pass);
                }
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Vec2D;
    use crate::sim::sdf::{Bloated, Rect};

    fn floats(bytes: &[u8]) -> Vec<f32> {
        bytes
            .chunks_exact(4)
            .map(|c| f32::from_ne_bytes([c[0], c[1], c[2], c[3]]))
            .collect()
    }

    #[test]
    fn test_write_uniforms_fills_header_and_shape() {
        let bar = Transform::new(
            Bloated::new(Rect::new(Vec2D::new(48.0, 0.0)), 5.0),
            1.0,
            0.0,
            Vec2D::new(320.0, 60.0),
        )
        .unwrap();
        let layout = UniformLayout::for_shape(bar.uniforms());
        let mut block = UniformBlock::new(layout);
        write_uniforms(&mut block, &bar, colors::BAR, [640.0, 480.0]);

        let values = floats(block.as_bytes());
        let at = |name: &str| block.layout().slot(name).unwrap().offset / 4;
        assert_eq!(values[at(COLOR_UNIFORM)..at(COLOR_UNIFORM) + 4], colors::BAR);
        assert_eq!(
            values[at(VIEWPORT_UNIFORM)..at(VIEWPORT_UNIFORM) + 2],
            [640.0, 480.0]
        );
        assert_eq!(values[at("rect_size")..at("rect_size") + 2], [48.0, 0.0]);
        assert_eq!(values[at("bloat_radius")], 5.0);
        assert_eq!(values[at("transform_scale")], 1.0);
        assert_eq!(
            values[at("transform_translate")..at("transform_translate") + 2],
            [320.0, 60.0]
        );
    }

    #[test]
    fn test_module_matches_layout_order() {
        let target = Transform::new(Rect::new(Vec2D::splat(30.0)), 1.0, 0.0, Vec2D::ZERO).unwrap();
        let module = shape_module(&Shape::Transform(target.clone()));
        let layout = UniformLayout::for_shape(target.uniforms());
        let mut last = 0;
        for slot in layout.slots() {
            let member = format!("    {}: ", slot.decl.name);
            let found = module.find(&member).unwrap();
            assert!(found >= last);
            last = found;
        }
    }
}
