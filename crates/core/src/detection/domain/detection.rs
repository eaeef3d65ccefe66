/// Pixel-space box corners, as reported by the detector.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoundingBox {
    pub start_x: i32,
    pub start_y: i32,
    pub end_x: i32,
    pub end_y: i32,
}

/// A face candidate that passed the confidence threshold.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Detection {
    pub confidence: f32,
    pub bbox: BoundingBox,
}

/// One raw row of model output: a score and a box in normalised [0,1]
/// coordinates relative to the input image.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Candidate {
    pub confidence: f32,
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

/// Keeps candidates scoring strictly above `threshold` and maps them onto a
/// `width × height` frame.
///
/// Output order is the model's order. Overlapping boxes are kept as-is.
pub fn select_detections(
    candidates: &[Candidate],
    width: u32,
    height: u32,
    threshold: f32,
) -> Vec<Detection> {
    candidates
        .iter()
        .filter(|c| c.confidence > threshold)
        .map(|c| Detection {
            confidence: c.confidence,
            bbox: BoundingBox {
                start_x: scale(c.x1, width),
                start_y: scale(c.y1, height),
                end_x: scale(c.x2, width),
                end_y: scale(c.y2, height),
            },
        })
        .collect()
}

/// Scales a normalised coordinate to pixels, truncating toward zero.
/// Values the model reports slightly outside [0,1] are clamped first.
fn scale(normalised: f32, extent: u32) -> i32 {
    let clamped = if normalised.is_nan() {
        0.0
    } else {
        normalised.clamp(0.0, 1.0)
    };
    (clamped as f64 * extent as f64) as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn candidate(confidence: f32, x1: f32, y1: f32, x2: f32, y2: f32) -> Candidate {
        Candidate {
            confidence,
            x1,
            y1,
            x2,
            y2,
        }
    }

    #[test]
    fn test_scales_normalised_box_to_pixels() {
        let dets = select_detections(&[candidate(0.92, 0.1, 0.1, 0.3, 0.4)], 640, 480, 0.5);
        assert_eq!(dets.len(), 1);
        assert_eq!(
            dets[0].bbox,
            BoundingBox {
                start_x: 64,
                start_y: 48,
                end_x: 192,
                end_y: 192,
            }
        );
        assert_eq!(dets[0].confidence, 0.92);
    }

    #[rstest]
    #[case::below(0.49, 0)]
    #[case::equal_is_rejected(0.5, 0)]
    #[case::above(0.51, 1)]
    fn test_threshold_is_strict(#[case] confidence: f32, #[case] expected: usize) {
        let dets = select_detections(&[candidate(confidence, 0.0, 0.0, 0.5, 0.5)], 100, 100, 0.5);
        assert_eq!(dets.len(), expected);
    }

    #[rstest]
    #[case(0.0)]
    #[case(0.25)]
    #[case(0.5)]
    #[case(0.9)]
    fn test_only_confidences_above_threshold_survive(#[case] threshold: f32) {
        let candidates: Vec<_> = (0..=20)
            .map(|i| candidate(i as f32 / 20.0, 0.2, 0.2, 0.6, 0.6))
            .collect();
        let dets = select_detections(&candidates, 320, 240, threshold);
        assert!(dets.iter().all(|d| d.confidence > threshold));
        let expected = candidates.iter().filter(|c| c.confidence > threshold).count();
        assert_eq!(dets.len(), expected);
    }

    #[test]
    fn test_preserves_model_order_and_overlaps() {
        let candidates = [
            candidate(0.6, 0.1, 0.1, 0.5, 0.5),
            candidate(0.9, 0.11, 0.11, 0.51, 0.51),
            candidate(0.7, 0.6, 0.6, 0.9, 0.9),
        ];
        let dets = select_detections(&candidates, 100, 100, 0.5);
        let scores: Vec<f32> = dets.iter().map(|d| d.confidence).collect();
        assert_eq!(scores, vec![0.6, 0.9, 0.7]);
    }

    #[test]
    fn test_out_of_range_coordinates_stay_inside_frame() {
        let dets = select_detections(&[candidate(0.8, -0.05, -0.2, 1.1, 1.3)], 640, 480, 0.5);
        let b = dets[0].bbox;
        assert_eq!((b.start_x, b.start_y, b.end_x, b.end_y), (0, 0, 640, 480));
    }

    #[test]
    fn test_nan_confidence_is_dropped() {
        let dets = select_detections(&[candidate(f32::NAN, 0.1, 0.1, 0.2, 0.2)], 10, 10, 0.0);
        assert!(dets.is_empty());
    }

    #[test]
    fn test_truncates_fractional_pixels() {
        // 0.999 * 100 = 99.9 -> 99
        let dets = select_detections(&[candidate(0.8, 0.999, 0.0, 0.999, 0.0)], 100, 100, 0.5);
        assert_eq!(dets[0].bbox.start_x, 99);
    }
}
