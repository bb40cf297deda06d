//! Per-frame composition.
//!
//! The [`Renderer`] owns everything that is drawn and the state that moves it.
//! Each frame it advances the flight integrator, writes the two MVP uniforms and
//! records two passes: the cube against the world view, then the cockpit against
//! the head view over a freshly cleared depth buffer.
//!
//! # Key types
//!
//! - [`Renderer`] builds the scene once and draws it every frame
//! - [`FrameStatus`] tells the host whether a frame was presented
//!

use instant::Instant;

use crate::{
    context::Context,
    data_structures::cube::CubeMesh,
    flight::{projection, FlightFrame, FlightIntegrator},
    input::{InputEvent, InputState, Signal},
    pipelines::{
        cockpit::{mk_cockpit_pipeline, CockpitLayout},
        cube::mk_cube_pipeline,
        mvp_bind_group_layout, MvpBinding,
    },
    resources::{load_optional_cockpit, Cockpit},
    settings::Settings,
    storage::Archive,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameStatus {
    Drawn,
    /// The surface was not ready. Nothing was drawn and nothing is wrong.
    Skipped,
}

/// The cockpit together with the pipeline matching its vertex layout.
struct CockpitDraw {
    pipeline: wgpu::RenderPipeline,
    model: Cockpit<wgpu::Buffer>,
}

pub struct Renderer {
    cube_pipeline: wgpu::RenderPipeline,
    cube_mvp: MvpBinding,
    cockpit_mvp: MvpBinding,
    cube: CubeMesh<wgpu::Buffer>,
    cockpit: Option<CockpitDraw>,
    flight: FlightIntegrator,
    input: InputState,
    started: Instant,
}

impl Renderer {
    /// Build pipelines, uniforms, the cube and the cockpit.
    ///
    /// A cockpit that fails to load is left out unless
    /// [`Settings::require_cockpit`] is set.
    pub fn new<A: Archive + ?Sized>(
        ctx: &Context,
        settings: &Settings,
        archive: &mut A,
    ) -> anyhow::Result<Self> {
        let device = &ctx.device;
        let mvp_layout = mvp_bind_group_layout(device);
        let cube_pipeline = mk_cube_pipeline(device, &ctx.config, &mvp_layout);
        let cube_mvp = MvpBinding::new(device, &mvp_layout, "cube mvp")?;
        let cockpit_mvp = MvpBinding::new(device, &mvp_layout, "cockpit mvp")?;
        let cube = CubeMesh::new(device)?;

        let cockpit = load_optional_cockpit(device, archive, settings)?.map(|model| {
            let layout = match model {
                Cockpit::Parts(_) => CockpitLayout::Parts,
                Cockpit::Facets(_) => CockpitLayout::Facets,
            };
            let pipeline = mk_cockpit_pipeline(device, &ctx.config, &mvp_layout, layout);
            CockpitDraw { pipeline, model }
        });

        Ok(Self {
            cube_pipeline,
            cube_mvp,
            cockpit_mvp,
            cube,
            cockpit,
            flight: FlightIntegrator::new(settings.flight),
            input: InputState::new(),
            started: Instant::now(),
        })
    }

    pub fn event(&mut self, event: &InputEvent) -> Signal {
        let now = self.started.elapsed().as_secs_f64();
        self.input.handle(event, now)
    }

    /// Advance the simulation one frame and upload both MVP matrices.
    fn update(&mut self, ctx: &Context) -> FlightFrame {
        let sample = self.input.take_sample();
        let frame = self.flight.step(&sample);
        let projection = projection(ctx.config.width, ctx.config.height);
        self.cube_mvp.write(&ctx.queue, projection * frame.view);
        self.cockpit_mvp.write(&ctx.queue, projection * frame.cockpit_view);
        frame
    }

    pub fn draw(&mut self, ctx: &mut Context) -> FrameStatus {
        let output = match ctx.surface.get_current_texture() {
            Ok(output) => output,
            // Reconfigure the surface if it's lost or outdated
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let size = ctx.window.inner_size();
                ctx.resize(size.width, size.height);
                return FrameStatus::Skipped;
            }
            Err(e) => {
                log::warn!("skipping frame: {}", e);
                return FrameStatus::Skipped;
            }
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.update(ctx);

        let mut encoder = ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Cube Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(ctx.clear_colour),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &ctx.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });
            pass.set_pipeline(&self.cube_pipeline);
            pass.set_bind_group(0, &self.cube_mvp.group, &[]);
            for (slot, buffer) in self.cube.vertex_buffers().into_iter().enumerate() {
                pass.set_vertex_buffer(slot as u32, buffer.slice(..));
            }
            pass.draw(0..self.cube.vertex_count(), 0..1);
        }

        if let Some(cockpit) = &self.cockpit {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Cockpit Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                // The cockpit is never hidden behind the world.
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &ctx.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Discard,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });
            pass.set_pipeline(&cockpit.pipeline);
            pass.set_bind_group(0, &self.cockpit_mvp.group, &[]);
            match &cockpit.model {
                Cockpit::Parts(parts) => {
                    for part in parts.iter() {
                        for (slot, buffer) in part.vertex_buffers().into_iter().enumerate() {
                            pass.set_vertex_buffer(slot as u32, buffer.slice(..));
                        }
                        pass.set_index_buffer(part.index_buffer().slice(..), wgpu::IndexFormat::Uint16);
                        pass.draw_indexed(0..part.index_count(), 0, 0..1);
                    }
                }
                Cockpit::Facets(model) => {
                    for (slot, buffer) in model.vertex_buffers().into_iter().enumerate() {
                        pass.set_vertex_buffer(slot as u32, buffer.slice(..));
                    }
                    pass.draw(0..model.vertex_count(), 0..1);
                }
            }
        }

        ctx.queue.submit(std::iter::once(encoder.finish()));
        ctx.window.pre_present_notify();
        output.present();
        FrameStatus::Drawn
    }
}
