//! Pipeline for the coloured cube: three vertex streams, no culling.

use crate::pipelines::basic::{mk_pipeline_layout, mk_render_pipeline, PipelineSpec};

static XYZW_ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x4];
static UV_ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![1 => Float32x2];
static RGBA_ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![2 => Float32x4];

pub fn vertex_layouts() -> [wgpu::VertexBufferLayout<'static>; 3] {
    let stream = |stride: usize, attributes: &'static [wgpu::VertexAttribute]| wgpu::VertexBufferLayout {
        array_stride: stride as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes,
    };
    [
        stream(size_of::<[f32; 4]>(), &XYZW_ATTRIBUTES),
        stream(size_of::<[f32; 2]>(), &UV_ATTRIBUTES),
        stream(size_of::<[f32; 4]>(), &RGBA_ATTRIBUTES),
    ]
}

pub fn mk_cube_pipeline(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    mvp_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let layout = mk_pipeline_layout(device, "Cube Pipeline Layout", mvp_layout);
    let vertex_layouts = vertex_layouts();
    let shader = wgpu::ShaderModuleDescriptor {
        label: Some("Cube Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("cube.wgsl").into()),
    };
    mk_render_pipeline(
        device,
        &layout,
        config.format,
        &PipelineSpec {
            label: "Cube Pipeline",
            vertex_entry: "vs_main",
            vertex_layouts: &vertex_layouts,
            cull_mode: None,
        },
        shader,
    )
}
