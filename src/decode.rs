//! Frame color decoding.
//!
//! The pipeline only consumes per-frame channel averages; how they are
//! extracted from raw pixels is pluggable behind [`ColorDecoder`].
//! [`Yuv420spDecoder`] covers the common Android camera preview format.

/// Per-frame red/blue channel averages, each in 0..=255.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelAverages {
    pub red: u8,
    pub blue: u8,
}

/// Pixel-format-specific average extraction.
///
/// Implementations must be cheap enough to run once per camera frame; the
/// pipeline calls `decode` inside its frame critical section.
pub trait ColorDecoder: Send {
    /// Decode a raw frame buffer into channel averages.
    ///
    /// Returns `None` when the buffer cannot hold a `width` x `height` frame.
    fn decode(&self, data: &[u8], width: u32, height: u32) -> Option<ChannelAverages>;
}

/// Decoder for YUV420SP (NV21) frames.
///
/// Uses the fixed-point BT.601 conversion (1192/1634/2066 coefficients) and
/// averages the resulting 8-bit red and blue channels over the whole frame.
pub struct Yuv420spDecoder;

impl ColorDecoder for Yuv420spDecoder {
    fn decode(&self, data: &[u8], width: u32, height: u32) -> Option<ChannelAverages> {
        let width = width as usize;
        let height = height as usize;
        let frame_size = width.checked_mul(height)?;
        if frame_size == 0 || data.len() < frame_size {
            return None;
        }

        let mut sum_red: u64 = 0;
        let mut sum_blue: u64 = 0;
        let mut yp = 0usize;

        for j in 0..height {
            // Chroma plane: one interleaved V/U pair per 2x2 luma block.
            let mut uvp = frame_size + (j >> 1) * width;
            let mut u: i32 = 0;
            let mut v: i32 = 0;

            for i in 0..width {
                let y = ((data[yp] as i32) - 16).max(0);
                if i & 1 == 0 && uvp + 1 < data.len() {
                    v = data[uvp] as i32 - 128;
                    u = data[uvp + 1] as i32 - 128;
                    uvp += 2;
                }

                let y1192 = 1192 * y;
                let r = (y1192 + 1634 * v).clamp(0, 262_143);
                let b = (y1192 + 2066 * u).clamp(0, 262_143);

                sum_red += (r >> 10) as u64;
                sum_blue += (b >> 10) as u64;
                yp += 1;
            }
        }

        Some(ChannelAverages {
            red: (sum_red / frame_size as u64) as u8,
            blue: (sum_blue / frame_size as u64) as u8,
        })
    }
}
