//! Synthetic capture source.
//!
//! Stands in for a hardware capture driver (NvFBC, DXGI, …) behind
//! the same [`CaptureSource`] seam, producing a scrolling BGRA test
//! pattern. Lets the whole transport run on machines with no capture
//! capability, and gives the viewer something visibly moving to
//! verify frame delivery and ordering with.

use castline_core::{CaptureSource, CastError, PixelFormat, RawFrame};

/// Scrolling-gradient frame generator.
pub struct PatternSource {
    width: u32,
    height: u32,
    /// Advances each frame to scroll the pattern.
    phase: u32,
}

impl PatternSource {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            phase: 0,
        }
    }
}

impl CaptureSource for PatternSource {
    fn next_raw_frame(&mut self) -> Result<RawFrame, CastError> {
        let stride = self.width * 4;
        let mut data = vec![0u8; (stride * self.height) as usize];

        for y in 0..self.height {
            let row_start = (y * stride) as usize;
            for x in 0..self.width {
                let px = row_start + (x * 4) as usize;
                data[px] = ((x + self.phase) & 0xFF) as u8; // B
                data[px + 1] = ((y + self.phase) & 0xFF) as u8; // G
                data[px + 2] = ((x ^ y) & 0xFF) as u8; // R
                data[px + 3] = 0xFF; // A
            }
        }

        self.phase = self.phase.wrapping_add(2);
        Ok(RawFrame {
            width: self.width,
            height: self.height,
            stride,
            format: PixelFormat::Bgra8,
            data,
        })
    }
}
