//! GPU context and the buffer allocation seam.
//!
//! [`GraphicsDevice`] is the only thing the ingestion code needs from a GPU: a
//! way to turn bytes into a device buffer, or fail. Releasing a buffer is
//! dropping it. `wgpu::Device` implements the trait; tests use a recording
//! device instead.
//!
//! [`Context`] owns the window surface, device and queue the renderer draws with.

use std::sync::Arc;

use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::{
    data_structures::texture::Texture,
    errors::IngestError,
    settings::Settings,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BufferUsage {
    Index,
    Vertex,
    Uniform,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateMode {
    /// Written once at creation, never touched again.
    Static,
    /// Rewritten every frame.
    Dynamic,
}

/// Everything needed to allocate one buffer.
#[derive(Clone, Copy, Debug)]
pub struct BufferSpec<'a> {
    pub label: &'a str,
    pub usage: BufferUsage,
    pub update: UpdateMode,
    pub size: u64,
    pub contents: &'a [u8],
}

impl<'a> BufferSpec<'a> {
    pub fn with_contents(
        label: &'a str,
        usage: BufferUsage,
        update: UpdateMode,
        contents: &'a [u8],
    ) -> Self {
        Self {
            label,
            usage,
            update,
            size: contents.len() as u64,
            contents,
        }
    }
}

pub trait GraphicsDevice {
    type Buffer;

    fn new_buffer(&self, spec: &BufferSpec<'_>) -> Result<Self::Buffer, IngestError>;
}

impl GraphicsDevice for wgpu::Device {
    type Buffer = wgpu::Buffer;

    fn new_buffer(&self, spec: &BufferSpec<'_>) -> Result<Self::Buffer, IngestError> {
        let max = self.limits().max_buffer_size;
        if spec.size == 0 || spec.size > max {
            return Err(IngestError::DeviceAllocation {
                label: spec.label.to_string(),
                reason: format!("size {} is outside 1..={}", spec.size, max),
            });
        }
        let mut usage = match spec.usage {
            BufferUsage::Index => wgpu::BufferUsages::INDEX,
            BufferUsage::Vertex => wgpu::BufferUsages::VERTEX,
            BufferUsage::Uniform => wgpu::BufferUsages::UNIFORM,
        };
        if spec.update == UpdateMode::Dynamic {
            usage |= wgpu::BufferUsages::COPY_DST;
        }
        let buffer = self.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(spec.label),
            contents: spec.contents,
            usage,
        });
        Ok(buffer)
    }
}

#[derive(Debug)]
pub struct Context {
    pub(crate) window: Arc<Window>,
    pub(crate) depth_texture: Texture,
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub clear_colour: wgpu::Color,
}

impl Context {
    pub async fn new(window: Arc<Window>, settings: &Settings) -> anyhow::Result<Self> {
        let size = window.inner_size();

        log::info!("wgpu setup");
        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: None,
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
                ..Default::default()
            })
            .await?;

        let mut config = surface
            .get_default_config(&adapter, size.width.max(1), size.height.max(1))
            .ok_or_else(|| anyhow::anyhow!("surface is not supported by the adapter"))?;
        // The shaders write linear colour and expect an sRGB surface.
        let surface_caps = surface.get_capabilities(&adapter);
        if let Some(format) = surface_caps.formats.iter().copied().find(|f| f.is_srgb()) {
            config.format = format;
        }
        config.present_mode = if settings.vsync {
            wgpu::PresentMode::AutoVsync
        } else {
            wgpu::PresentMode::AutoNoVsync
        };
        surface.configure(&device, &config);

        let depth_texture =
            Texture::create_depth_texture(&device, [config.width, config.height], "depth_texture");

        Ok(Self {
            window,
            depth_texture,
            surface,
            device,
            queue,
            config,
            clear_colour: settings.clear_colour,
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
            self.depth_texture =
                Texture::create_depth_texture(&self.device, [width, height], "depth_texture");
        }
    }
}
