//! The render pipeline drawing the fractal, bound to a single uniform buffer.

use crate::{
    uniforms::{Uniforms, SHADER},
    var::Var,
};

/// `@group(0) @binding(0)` in the shader.
const UNIFORMS_BINDING: u32 = 0;

pub struct MandelPipeline {
    render_pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    uniforms: Var<Uniforms>,
}

impl MandelPipeline {
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat, uniforms: Uniforms) -> Self {
        let shader_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("mandel-shader"),
            source: wgpu::ShaderSource::Wgsl(SHADER.into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("mandel-bind-group-layout"),
            entries: &[Var::<Uniforms>::layout_entry(
                UNIFORMS_BINDING,
                wgpu::ShaderStages::FRAGMENT,
            )],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("mandel-pipeline-layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("mandel-pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader_module,
                entry_point: "vertex_main",
                buffers: &[],
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleStrip,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader_module,
                entry_point: "fragment_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            multiview: None,
        });

        let uniforms = Var::uniform(device, "mandel-uniforms", uniforms);

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("mandel-bind-group"),
            layout: &bind_group_layout,
            entries: &[uniforms.bind_group_entry(UNIFORMS_BINDING)],
        });

        Self {
            render_pipeline,
            bind_group,
            uniforms,
        }
    }

    pub fn write_uniforms(&self, queue: &wgpu::Queue, uniforms: Uniforms) {
        self.uniforms.write(queue, uniforms);
    }

    pub fn draw<'pass>(&'pass self, render_pass: &mut wgpu::RenderPass<'pass>) {
        render_pass.set_pipeline(&self.render_pipeline);
        render_pass.set_bind_group(0, &self.bind_group, &[]);
        render_pass.draw(0..4, 0..1);
    }
}
