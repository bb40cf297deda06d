//! Pipelines for the cockpit.
//!
//! Both cockpit formats draw positions from slot 0 and normals from slot 1. Parts
//! from a glTF file carry three floats per element, facet models four.

use crate::pipelines::basic::{mk_pipeline_layout, mk_render_pipeline, PipelineSpec};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CockpitLayout {
    /// `vec3` positions and normals, drawn indexed.
    Parts,
    /// `vec4` positions and normals, drawn as a flat list.
    Facets,
}

static VEC3_POSITION: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];
static VEC3_NORMAL: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![1 => Float32x3];
static VEC4_POSITION: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x4];
static VEC4_NORMAL: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![1 => Float32x4];

impl CockpitLayout {
    fn entry_point(self) -> &'static str {
        match self {
            CockpitLayout::Parts => "vs_main",
            CockpitLayout::Facets => "vs_facet",
        }
    }

    pub fn vertex_layouts(self) -> [wgpu::VertexBufferLayout<'static>; 2] {
        let (stride, position, normal) = match self {
            CockpitLayout::Parts => (size_of::<[f32; 3]>(), &VEC3_POSITION, &VEC3_NORMAL),
            CockpitLayout::Facets => (size_of::<[f32; 4]>(), &VEC4_POSITION, &VEC4_NORMAL),
        };
        let stream = |attributes: &'static [wgpu::VertexAttribute]| wgpu::VertexBufferLayout {
            array_stride: stride as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes,
        };
        [stream(&position[..]), stream(&normal[..])]
    }
}

pub fn mk_cockpit_pipeline(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    mvp_layout: &wgpu::BindGroupLayout,
    cockpit: CockpitLayout,
) -> wgpu::RenderPipeline {
    let layout = mk_pipeline_layout(device, "Cockpit Pipeline Layout", mvp_layout);
    let vertex_layouts = cockpit.vertex_layouts();
    let shader = wgpu::ShaderModuleDescriptor {
        label: Some("Cockpit Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("cockpit.wgsl").into()),
    };
    mk_render_pipeline(
        device,
        &layout,
        config.format,
        &PipelineSpec {
            label: "Cockpit Pipeline",
            vertex_entry: cockpit.entry_point(),
            vertex_layouts: &vertex_layouts,
            cull_mode: None,
        },
        shader,
    )
}
