use crate::detection::domain::detection::{BoundingBox, Detection};
use crate::shared::frame::Frame;

/// Outline colour (RGB).
pub const BOX_COLOR: [u8; 3] = [0, 255, 0];

/// Outline width in pixels.
pub const BOX_THICKNESS: i32 = 2;

/// Returns a copy of `frame` with a rectangle outline at every detection.
///
/// The outline covers each box's corner pixels and grows inward by
/// [`BOX_THICKNESS`]. Pixels outside the frame are skipped. `frame` itself is
/// left untouched, so callers can keep the clean image next to the
/// annotated one.
pub fn annotate(frame: &Frame, detections: &[Detection]) -> Frame {
    let mut annotated = frame.clone();
    for det in detections {
        draw_outline(&mut annotated, &det.bbox);
    }
    annotated
}

fn draw_outline(frame: &mut Frame, bbox: &BoundingBox) {
    let (x0, x1) = ordered(bbox.start_x, bbox.end_x);
    let (y0, y1) = ordered(bbox.start_y, bbox.end_y);
    let t = BOX_THICKNESS - 1;

    fill_rect(frame, x0, y0, x1, y0.saturating_add(t)); // top
    fill_rect(frame, x0, y1.saturating_sub(t), x1, y1); // bottom
    fill_rect(frame, x0, y0, x0.saturating_add(t), y1); // left
    fill_rect(frame, x1.saturating_sub(t), y0, x1, y1); // right
}

/// Fills the inclusive rectangle `[x0, x1] × [y0, y1]`, clipped to the frame.
fn fill_rect(frame: &mut Frame, x0: i32, y0: i32, x1: i32, y1: i32) {
    let max_x = frame.width() as i32 - 1;
    let max_y = frame.height() as i32 - 1;
    let (x0, x1) = (x0.max(0), x1.min(max_x));
    let (y0, y1) = (y0.max(0), y1.min(max_y));
    if x0 > x1 || y0 > y1 {
        return;
    }

    let mut pixels = frame.as_ndarray_mut();
    for y in y0 as usize..=y1 as usize {
        for x in x0 as usize..=x1 as usize {
            for (c, &value) in BOX_COLOR.iter().enumerate() {
                pixels[[y, x, c]] = value;
            }
        }
    }
}

fn ordered(a: i32, b: i32) -> (i32, i32) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}
