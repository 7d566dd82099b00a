//! BlazeFace face detector using ONNX Runtime via `ort`.
//!
//! MediaPipe's short-range model: 128x128 NCHW input, 896 anchors, one
//! regressor row (box + 6 keypoints) and one logit per anchor. Keypoints
//! are ignored; only boxes are returned.

use std::path::Path;

use crate::detection::domain::face_detector::FaceDetector;
use crate::detection::infrastructure::onnx_session::load_session;
use crate::shared::frame::Frame;
use crate::shared::region::Region;

/// Fallback input resolution when the model input shape is dynamic.
const DEFAULT_INPUT_SIZE: u32 = 128;

pub const DEFAULT_CONFIDENCE: f64 = 0.5;

const NMS_IOU_THRESH: f64 = 0.3;

/// Values per anchor in the regressor output: 4 box + 6 keypoints * 2.
const REGRESSOR_WIDTH: usize = 16;

pub struct OnnxBlazefaceDetector {
    session: ort::session::Session,
    confidence: f64,
    input_size: u32,
    anchors: Vec<[f32; 2]>,
}

impl OnnxBlazefaceDetector {
    /// Loads a BlazeFace ONNX model.
    ///
    /// The input resolution comes from the model's NCHW input shape.
    pub fn new(model_path: &Path, confidence: f64) -> Result<Self, Box<dyn std::error::Error>> {
        let session = load_session(model_path)?;

        let input_size = session
            .inputs()
            .first()
            .and_then(|input| {
                if let ort::value::ValueType::Tensor { ref shape, .. } = input.dtype() {
                    if shape.len() >= 4 && shape[2] > 0 {
                        Some(shape[2] as u32)
                    } else {
                        None
                    }
                } else {
                    None
                }
            })
            .unwrap_or(DEFAULT_INPUT_SIZE);

        Ok(Self {
            session,
            confidence,
            input_size,
            anchors: generate_anchors(input_size),
        })
    }
}

impl FaceDetector for OnnxBlazefaceDetector {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<Region>, Box<dyn std::error::Error>> {
        let input_tensor = preprocess(frame, self.input_size);

        let input_value = ort::value::Tensor::from_array(input_tensor)?;
        let outputs = self.session.run(ort::inputs![input_value])?;
        if outputs.len() < 2 {
            return Err(
                format!("BlazeFace model expected 2 outputs, got {}", outputs.len()).into(),
            );
        }

        let first = outputs[0].try_extract_array::<f32>()?;
        let second = outputs[1].try_extract_array::<f32>()?;

        // Exports disagree on output order; the regressor is the wide one.
        let (regressors, scores) = if first.shape().last() == Some(&REGRESSOR_WIDTH) {
            (first, second)
        } else {
            (second, first)
        };
        let reg_data = regressors.as_slice().ok_or("Cannot get regressor slice")?;
        let score_data = scores.as_slice().ok_or("Cannot get score slice")?;

        let candidates = decode(
            reg_data,
            score_data,
            &self.anchors,
            self.input_size,
            self.confidence,
            frame.width(),
            frame.height(),
        );
        Ok(nms(candidates, NMS_IOU_THRESH))
    }
}

/// Resize frame to `size x size` (nearest neighbour) and normalize to
/// [0,1] NCHW float32.
fn preprocess(frame: &Frame, size: u32) -> ndarray::Array4<f32> {
    let src = frame.as_ndarray();
    let src_h = frame.height() as usize;
    let src_w = frame.width() as usize;
    let s = size as usize;

    let mut tensor = ndarray::Array4::<f32>::zeros((1, 3, s, s));
    for y in 0..s {
        let src_y = (((y as f64 + 0.5) * src_h as f64 / s as f64) as usize).min(src_h - 1);
        for x in 0..s {
            let src_x = (((x as f64 + 0.5) * src_w as f64 / s as f64) as usize).min(src_w - 1);
            for c in 0..3 {
                tensor[[0, c, y, x]] = src[[src_y, src_x, c]] as f32 / 255.0;
            }
        }
    }
    tensor
}

/// Anchor centres for the short-range model: a stride-8 grid with two
/// anchors per cell followed by a stride-16 grid with six.
fn generate_anchors(input_size: u32) -> Vec<[f32; 2]> {
    let mut anchors = Vec::new();
    for &(stride, per_cell) in &[(8usize, 2usize), (16, 6)] {
        let grid = input_size as usize / stride;
        for y in 0..grid {
            for x in 0..grid {
                let cx = (x as f32 + 0.5) / grid as f32;
                let cy = (y as f32 + 0.5) / grid as f32;
                anchors.extend(std::iter::repeat([cx, cy]).take(per_cell));
            }
        }
    }
    anchors
}

/// Turns raw model output into frame-space regions above `confidence`.
fn decode(
    reg_data: &[f32],
    score_data: &[f32],
    anchors: &[[f32; 2]],
    input_size: u32,
    confidence: f64,
    frame_width: u32,
    frame_height: u32,
) -> Vec<Region> {
    let scale = input_size as f32;
    let fw = frame_width as f32;
    let fh = frame_height as f32;

    score_data
        .iter()
        .zip(anchors)
        .enumerate()
        .filter_map(|(i, (&logit, anchor))| {
            let score = sigmoid(logit) as f64;
            if score < confidence {
                return None;
            }
            let row = reg_data.get(i * REGRESSOR_WIDTH..i * REGRESSOR_WIDTH + 4)?;
            let cx = anchor[0] + row[0] / scale;
            let cy = anchor[1] + row[1] / scale;
            let w = row[2] / scale;
            let h = row[3] / scale;

            // Clamp in float space so wild regressor values cannot overflow i32.
            let x1 = ((cx - w / 2.0) * fw).round().clamp(0.0, fw) as i32;
            let y1 = ((cy - h / 2.0) * fh).round().clamp(0.0, fh) as i32;
            let x2 = ((cx + w / 2.0) * fw).round().clamp(0.0, fw) as i32;
            let y2 = ((cy + h / 2.0) * fh).round().clamp(0.0, fh) as i32;
            Region::new(x1, y1, x2 - x1, y2 - y1, score).clamp_to(frame_width, frame_height)
        })
        .collect()
}

/// Greedy non-maximum suppression, highest score first.
fn nms(mut regions: Vec<Region>, iou_thresh: f64) -> Vec<Region> {
    regions.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut keep: Vec<Region> = Vec::with_capacity(regions.len());
    for r in regions {
        if keep.iter().all(|k| k.iou(&r) <= iou_thresh) {
            keep.push(r);
        }
    }
    keep
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}
