use ndarray::Array4;

use crate::shared::frame::{Frame, CHANNELS};

/// Square input resolution of the SSD face detector.
pub const INPUT_SIZE: u32 = 300;

/// Per-channel means subtracted from the resized image, in B, G, R order.
/// Fixed by how the network was trained.
pub const CHANNEL_MEANS_BGR: [f32; 3] = [104.0, 177.0, 123.0];

/// Builds the `[1, 3, 300, 300]` detector input from an RGB frame.
///
/// The frame is resized bilinearly to the input size, channels are reordered
/// to BGR and the channel means are subtracted. No further scaling.
///
/// Each output pixel blends its 2×2 nearest source pixels, with pixel
/// centres at half-integer coordinates and edges clamped, then rounds to
/// 8 bits. The network was calibrated on images resized this way.
pub fn build_input_blob(frame: &Frame) -> Array4<f32> {
    let size = INPUT_SIZE as usize;
    let mut blob = Array4::<f32>::zeros((1, 3, size, size));
    if frame.width() == 0 || frame.height() == 0 {
        return blob;
    }

    let src = frame.as_ndarray();
    let cols = taps(frame.width() as usize, size);
    let rows = taps(frame.height() as usize, size);

    for (y, row) in rows.iter().enumerate() {
        for (x, col) in cols.iter().enumerate() {
            for c in 0..CHANNELS {
                let top = lerp(src[[row.lo, col.lo, c]], src[[row.lo, col.hi, c]], col.frac);
                let bottom = lerp(src[[row.hi, col.lo, c]], src[[row.hi, col.hi, c]], col.frac);
                let value = (top + (bottom - top) * row.frac).round();
                // RGB in, BGR out.
                let plane = CHANNELS - 1 - c;
                blob[[0, plane, y, x]] = value - CHANNEL_MEANS_BGR[plane];
            }
        }
    }

    blob
}

/// Source neighbours and blend weight for one output coordinate.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Tap {
    lo: usize,
    hi: usize,
    frac: f32,
}

fn taps(src_len: usize, dst_len: usize) -> Vec<Tap> {
    let scale = src_len as f32 / dst_len as f32;
    let last = src_len - 1;
    (0..dst_len)
        .map(|d| {
            let pos = ((d as f32 + 0.5) * scale - 0.5).max(0.0);
            let lo = (pos.floor() as usize).min(last);
            if lo == last {
                return Tap { lo, hi: lo, frac: 0.0 };
            }
            Tap {
                lo,
                hi: lo + 1,
                frac: pos - lo as f32,
            }
        })
        .collect()
}

fn lerp(a: u8, b: u8, t: f32) -> f32 {
    a as f32 + (b as f32 - a as f32) * t
}
