//! wgpu-based renderer for the captured screen

mod pipeline;

pub use pipeline::*;

use crate::capture::Screenshot;
use crate::tick::RenderSink;
use crate::viewport::Transform;
use anyhow::{Context, Result};
use std::sync::Arc;
use wgpu::*;
use winit::{dpi::PhysicalSize, window::Window};

/// Main renderer
pub struct Renderer {
    surface: Surface<'static>,
    device: Device,
    queue: Queue,
    config: SurfaceConfiguration,
    screenshot_pipeline: ScreenshotPipeline,
}

impl Renderer {
    pub async fn new(window: Arc<Window>, shot: &Screenshot) -> Result<Self> {
        let size = window.inner_size();

        let instance = Instance::new(InstanceDescriptor {
            backends: Backends::all(),
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&RequestAdapterOptions {
                power_preference: PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("Failed to find suitable GPU adapter"))?;

        tracing::info!("GPU: {}", adapter.get_info().name);

        // Screenshots of large virtual screens can exceed the default 8k limit
        let required_limits = Limits::default().using_resolution(adapter.limits());
        let max_side = required_limits.max_texture_dimension_2d;
        if shot.width > max_side || shot.height > max_side {
            anyhow::bail!(
                "Screenshot {}x{} exceeds the GPU texture limit of {}",
                shot.width,
                shot.height,
                max_side
            );
        }

        let (device, queue) = adapter
            .request_device(
                &DeviceDescriptor {
                    label: Some("jotner Device"),
                    required_features: Features::empty(),
                    required_limits,
                },
                None,
            )
            .await
            .context("Failed to open GPU device")?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let present_mode = if surface_caps.present_modes.contains(&PresentMode::Mailbox) {
            PresentMode::Mailbox
        } else {
            PresentMode::Fifo
        };

        let config = SurfaceConfiguration {
            usage: TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 1,
        };
        surface.configure(&device, &config);

        let screenshot_pipeline = ScreenshotPipeline::new(&device, &queue, surface_format, shot);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            screenshot_pipeline,
        })
    }

    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    pub fn render(&mut self, transform: &Transform) -> Result<()> {
        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(SurfaceError::Outdated | SurfaceError::Lost) => {
                tracing::warn!("Surface outdated, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                self.surface.get_current_texture()?
            }
            Err(e) => return Err(e.into()),
        };

        let view = output.texture.create_view(&TextureViewDescriptor::default());

        let mut encoder = self.device.create_command_encoder(&CommandEncoderDescriptor {
            label: Some("Render Encoder"),
        });

        self.screenshot_pipeline.update_uniforms(&self.queue, transform);

        {
            let mut render_pass = encoder.begin_render_pass(&RenderPassDescriptor {
                label: Some("Screenshot Render Pass"),
                color_attachments: &[Some(RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: Operations {
                        load: LoadOp::Clear(Color::BLACK),
                        store: StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.screenshot_pipeline.render(&mut render_pass);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

impl RenderSink for Renderer {
    fn present(&mut self, transform: &Transform) -> Result<()> {
        self.render(transform)
    }
}
