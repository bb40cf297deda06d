//! Render pipelines and the uniform they share.
//!
//! Every pipeline binds a single [`MvpUniform`] at group 0.

pub mod basic;
pub mod cockpit;
pub mod cube;

use crate::{
    context::{BufferSpec, BufferUsage, GraphicsDevice, UpdateMode},
    data_structures::uniform::MvpUniform,
    errors::Result,
};

pub fn mvp_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("mvp_bind_group_layout"),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
    })
}

/// A per-frame MVP buffer and the bind group exposing it.
pub struct MvpBinding {
    uniform: MvpUniform,
    pub buffer: wgpu::Buffer,
    pub group: wgpu::BindGroup,
}

impl MvpBinding {
    pub fn new(device: &wgpu::Device, layout: &wgpu::BindGroupLayout, label: &str) -> Result<Self> {
        let uniform = MvpUniform::new();
        let buffer = device.new_buffer(&BufferSpec::with_contents(
            label,
            BufferUsage::Uniform,
            UpdateMode::Dynamic,
            bytemuck::cast_slice(&[uniform]),
        ))?;
        let group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });
        Ok(Self {
            uniform,
            buffer,
            group,
        })
    }

    pub fn write(&mut self, queue: &wgpu::Queue, mvp: cgmath::Matrix4<f32>) {
        self.uniform.update(mvp);
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[self.uniform]));
    }
}
