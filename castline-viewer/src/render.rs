//! Headless renderer: frame statistics and optional PPM snapshots.
//!
//! Real deployments plug a windowed surface in behind [`Renderer`];
//! this binary ships a stats renderer that performs the same
//! format/size conversion a surface would, tracks a smoothed FPS over
//! a sliding window, and can dump the converted frames as binary PPM
//! files for offline inspection.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::time::Instant;

use tracing::{debug, info};

use castline_core::{CastError, PixelFormat, Picture, Renderer};

/// Presented frames contributing to the smoothed FPS figure.
const FPS_WINDOW: usize = 60;

/// Log a stats line every this many presented frames.
const STATS_INTERVAL: u64 = 120;

/// Running playback statistics.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameStats {
    /// Total pictures presented.
    pub frames: u64,
    /// Total decoded pixel bytes presented.
    pub bytes: u64,
    /// Smoothed frames per second over the recent window.
    pub fps: f64,
}

/// A [`Renderer`] with no window: converts, counts, and optionally
/// snapshots each presented picture.
pub struct StatsRenderer {
    surface: (u32, u32),
    snapshot_dir: Option<PathBuf>,
    snapshot_every: u64,
    stats: FrameStats,
    present_times: VecDeque<Instant>,
}

impl StatsRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            surface: (width, height),
            snapshot_dir: None,
            snapshot_every: 0,
            stats: FrameStats::default(),
            present_times: VecDeque::with_capacity(FPS_WINDOW),
        }
    }

    /// Write every `every`-th converted frame as a PPM file under `dir`.
    pub fn with_snapshots(mut self, dir: PathBuf, every: u64) -> Self {
        self.snapshot_dir = Some(dir);
        self.snapshot_every = every;
        self
    }

    /// Current playback statistics.
    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    fn record_present(&mut self, pixel_bytes: usize) {
        let now = Instant::now();
        self.stats.frames += 1;
        self.stats.bytes += pixel_bytes as u64;

        if self.present_times.len() == FPS_WINDOW {
            self.present_times.pop_front();
        }
        self.present_times.push_back(now);
        if self.present_times.len() >= 2 {
            let span = now - *self.present_times.front().unwrap();
            if !span.is_zero() {
                self.stats.fps = (self.present_times.len() - 1) as f64 / span.as_secs_f64();
            }
        }

        if self.stats.frames % STATS_INTERVAL == 0 {
            info!(
                frames = self.stats.frames,
                bytes = self.stats.bytes,
                fps = format_args!("{:.1}", self.stats.fps),
                "playback stats"
            );
        }
    }

    fn maybe_snapshot(&self, rgb: &[u8], size: (u32, u32)) -> Result<(), CastError> {
        let Some(dir) = &self.snapshot_dir else {
            return Ok(());
        };
        if self.snapshot_every == 0 || self.stats.frames % self.snapshot_every != 0 {
            return Ok(());
        }
        let path = dir.join(format!("frame-{:08}.ppm", self.stats.frames));
        let mut out = Vec::with_capacity(rgb.len() + 32);
        out.extend_from_slice(format!("P6\n{} {}\n255\n", size.0, size.1).as_bytes());
        out.extend_from_slice(rgb);
        std::fs::write(&path, out)?;
        debug!(path = %path.display(), "wrote frame snapshot");
        Ok(())
    }
}

impl Renderer for StatsRenderer {
    fn surface_size(&self) -> (u32, u32) {
        self.surface
    }

    fn present(&mut self, picture: &Picture, target_size: (u32, u32)) -> Result<(), CastError> {
        let rgb = convert_to_rgb(picture, target_size)?;
        self.record_present(picture.data.len());
        self.maybe_snapshot(&rgb, target_size)?;
        Ok(())
    }
}

// ── Pixel conversion ─────────────────────────────────────────────

/// Convert a decoded picture to tightly packed RGB at `target_size`
/// using nearest-neighbour sampling.
fn convert_to_rgb(picture: &Picture, target_size: (u32, u32)) -> Result<Vec<u8>, CastError> {
    let (tw, th) = target_size;
    if picture.width == 0 || picture.height == 0 || tw == 0 || th == 0 {
        return Err(CastError::Codec("zero-sized picture or surface".into()));
    }
    let bpp = picture.format.bytes_per_pixel();
    let expected = picture.width as usize * picture.height as usize * bpp;
    if picture.data.len() != expected {
        return Err(CastError::Codec(format!(
            "picture buffer is {} bytes, expected {expected}",
            picture.data.len()
        )));
    }

    let mut rgb = vec![0u8; tw as usize * th as usize * 3];
    for ty in 0..th {
        let sy = (ty as u64 * picture.height as u64 / th as u64) as usize;
        let src_row = sy * picture.width as usize * bpp;
        let dst_row = ty as usize * tw as usize * 3;
        for tx in 0..tw {
            let sx = (tx as u64 * picture.width as u64 / tw as u64) as usize;
            let src = src_row + sx * bpp;
            let dst = dst_row + tx as usize * 3;
            let (r, g, b) = match picture.format {
                PixelFormat::Bgra8 => {
                    (picture.data[src + 2], picture.data[src + 1], picture.data[src])
                }
                PixelFormat::Rgba8 | PixelFormat::Rgb8 => {
                    (picture.data[src], picture.data[src + 1], picture.data[src + 2])
                }
            };
            rgb[dst] = r;
            rgb[dst + 1] = g;
            rgb[dst + 2] = b;
        }
    }
    Ok(rgb)
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn solid_picture(width: u32, height: u32, bgra: [u8; 4]) -> Picture {
        let mut data = Vec::with_capacity(width as usize * height as usize * 4);
        for _ in 0..width * height {
            data.extend_from_slice(&bgra);
        }
        Picture {
            width,
            height,
            format: PixelFormat::Bgra8,
            data,
        }
    }

    #[test]
    fn present_counts_frames_and_bytes() {
        let mut r = StatsRenderer::new(64, 48);
        let pic = solid_picture(32, 24, [1, 2, 3, 255]);
        r.present(&pic, r.surface_size()).unwrap();
        r.present(&pic, r.surface_size()).unwrap();
        let stats = r.stats();
        assert_eq!(stats.frames, 2);
        assert_eq!(stats.bytes, 2 * 32 * 24 * 4);
    }

    #[test]
    fn conversion_scales_and_swizzles_bgra() {
        // Solid blue in BGRA must come out solid blue in RGB at the
        // surface size, not the picture size.
        let pic = solid_picture(16, 16, [255, 0, 0, 255]);
        let rgb = convert_to_rgb(&pic, (8, 4)).unwrap();
        assert_eq!(rgb.len(), 8 * 4 * 3);
        assert_eq!(&rgb[..3], &[0, 0, 255]);
        assert_eq!(&rgb[rgb.len() - 3..], &[0, 0, 255]);
    }

    #[test]
    fn conversion_rejects_short_buffer() {
        let mut pic = solid_picture(16, 16, [0, 0, 0, 255]);
        pic.data.truncate(10);
        assert!(convert_to_rgb(&pic, (16, 16)).is_err());
    }

    #[test]
    fn snapshot_written_at_interval() {
        let dir = std::env::temp_dir().join(format!("castline-snap-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let mut r = StatsRenderer::new(8, 8).with_snapshots(dir.clone(), 2);
        let pic = solid_picture(8, 8, [10, 20, 30, 255]);
        r.present(&pic, r.surface_size()).unwrap();
        r.present(&pic, r.surface_size()).unwrap();
        assert!(dir.join("frame-00000002.ppm").exists());
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
