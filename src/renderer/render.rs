use crate::engine::Frame;
use crate::error::ViewerError;
use crate::renderer::line_vertex::LineVertex;
use crate::renderer::renderer::WgpuRenderer;
use egui_wgpu::ScreenDescriptor;
use wgpu::util::DeviceExt;

impl WgpuRenderer {
    pub(crate) fn draw(
        &mut self,
        frame: &Frame,
        ui: Option<egui::FullOutput>,
    ) -> Result<(), ViewerError> {
        // Minimized or not yet sized
        if self.config.width == 0 || self.config.height == 0 {
            return Ok(());
        }

        self.queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(frame.view_proj.as_slice()),
        );
        self.upload_lines(&frame.lines);

        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("Surface lost, reconfiguring");
                self.reconfigure();
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("Surface timeout, skipping frame");
                return Ok(());
            }
            Err(e) => return Err(ViewerError::new("surface-frame").push_std(e)),
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let [r, g, b] = frame.clear_color;
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: r as f64,
                            g: g as f64,
                            b: b as f64,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            if !frame.lines.is_empty() {
                render_pass.set_pipeline(&self.line_pipeline);
                render_pass.set_bind_group(0, &self.camera_bind_group, &[]);
                render_pass.set_vertex_buffer(0, self.line_buffer.slice(..));
                render_pass.draw(0..frame.lines.len() as u32, 0..1);
            }
        }

        if let Some(full_output) = ui {
            self.egui_state
                .borrow_mut()
                .handle_platform_output(&self.window, full_output.platform_output);

            let egui_ctx = self.egui_state.borrow().egui_ctx().clone();
            let paint_jobs = egui_ctx.tessellate(full_output.shapes, full_output.pixels_per_point);
            let screen_desc = ScreenDescriptor {
                size_in_pixels: [self.config.width, self.config.height],
                pixels_per_point: full_output.pixels_per_point,
            };

            for (id, image_delta) in &full_output.textures_delta.set {
                self.egui_renderer
                    .update_texture(&self.device, &self.queue, *id, image_delta);
            }

            self.egui_renderer.update_buffers(
                &self.device,
                &self.queue,
                &mut encoder,
                &paint_jobs,
                &screen_desc,
            );

            {
                let mut egui_rpass = encoder
                    .begin_render_pass(&wgpu::RenderPassDescriptor {
                        label: Some("egui render pass"),
                        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                            view: &view,
                            resolve_target: None,
                            ops: wgpu::Operations {
                                load: wgpu::LoadOp::Load,
                                store: wgpu::StoreOp::Store,
                            },
                            depth_slice: None,
                        })],
                        depth_stencil_attachment: None,
                        occlusion_query_set: None,
                        timestamp_writes: None,
                    })
                    .forget_lifetime();

                self.egui_renderer
                    .render(&mut egui_rpass, &paint_jobs, &screen_desc);
            }

            for id in &full_output.textures_delta.free {
                self.egui_renderer.free_texture(id);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }

    /// Writes the frame's lines, growing the vertex buffer when they no longer fit.
    fn upload_lines(&mut self, lines: &[LineVertex]) {
        if lines.is_empty() {
            return;
        }
        let bytes: &[u8] = bytemuck::cast_slice(lines);
        if bytes.len() as u64 > self.line_buffer.size() {
            self.line_buffer = self
                .device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("Line Vertex Buffer"),
                    contents: bytes,
                    usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                });
        } else {
            self.queue.write_buffer(&self.line_buffer, 0, bytes);
        }
    }
}
