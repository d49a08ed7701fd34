use std::io::Write;

use serde::Serialize;
use tracing::info;

use festive_core::ParticleDescriptor;
use festive_platform::{ParticleRenderer, Result, SurfaceRect};

/// Logs a one-line summary every `every` frames instead of drawing.
pub struct LogRenderer {
    every: u64,
    frame: u64,
}

impl LogRenderer {
    pub fn new(every: u64) -> Self {
        Self {
            every: every.max(1),
            frame: 0,
        }
    }
}

impl ParticleRenderer for LogRenderer {
    fn init(&mut self, surface: SurfaceRect) -> Result<()> {
        info!(width = surface.width, height = surface.height, "log renderer ready");
        Ok(())
    }

    fn draw(&mut self, particles: &[ParticleDescriptor]) -> Result<()> {
        if self.frame % self.every == 0 {
            let mean_opacity = if particles.is_empty() {
                0.0
            } else {
                particles.iter().map(|p| p.opacity).sum::<f32>() / particles.len() as f32
            };
            info!(frame = self.frame, live = particles.len(), mean_opacity, "frame");
        }
        self.frame += 1;
        Ok(())
    }
}

#[derive(Serialize)]
struct FrameRecord<'a> {
    frame: u64,
    particles: &'a [ParticleDescriptor],
}

/// Writes every frame as one JSON object per line for an external drawing process.
pub struct JsonLinesRenderer<W: Write> {
    out: W,
    frame: u64,
}

impl<W: Write> JsonLinesRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out, frame: 0 }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ParticleRenderer for JsonLinesRenderer<W> {
    fn draw(&mut self, particles: &[ParticleDescriptor]) -> Result<()> {
        let record = FrameRecord {
            frame: self.frame,
            particles,
        };
        serde_json::to_writer(&mut self.out, &record)?;
        self.out.write_all(b"\n")?;
        self.frame += 1;
        Ok(())
    }
}
