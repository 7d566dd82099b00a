use crate::enhancement::domain::frame_enhancer::FrameEnhancer;
use crate::enhancement::domain::histogram::equalization_lut;
use crate::shared::frame::Frame;

pub const DEFAULT_ALPHA: f64 = 1.6;
pub const DEFAULT_BETA: i32 = 35;

/// Low-light preprocessing for face detection.
///
/// Applies a linear gain (`alpha`) and offset (`beta`) with saturation,
/// then, if enabled, equalizes the luma histogram. Equalization shifts
/// every channel of a pixel by the same amount its luma moved, which keeps
/// hue roughly stable while stretching contrast.
pub struct LowLightEnhancer {
    equalize: bool,
    gain_lut: [u8; 256],
}

impl LowLightEnhancer {
    pub fn new(alpha: f64, beta: i32, equalize: bool) -> Self {
        let mut gain_lut = [0u8; 256];
        for (i, slot) in gain_lut.iter_mut().enumerate() {
            let v = (alpha * i as f64 + beta as f64).abs().round();
            *slot = v.min(255.0) as u8;
        }
        Self { equalize, gain_lut }
    }

    fn equalize_luma(frame: &mut Frame) {
        let channels = frame.channels() as usize;
        if channels < 3 {
            let lut = equalization_lut(frame.data());
            for v in frame.data_mut() {
                *v = lut[*v as usize];
            }
            return;
        }

        let luma = frame.luma();
        let lut = equalization_lut(&luma);
        for (px, &y) in frame.data_mut().chunks_exact_mut(channels).zip(&luma) {
            let shift = lut[y as usize] as i16 - y as i16;
            if shift == 0 {
                continue;
            }
            for c in px.iter_mut().take(3) {
                *c = (*c as i16 + shift).clamp(0, 255) as u8;
            }
        }
    }
}

impl Default for LowLightEnhancer {
    fn default() -> Self {
        Self::new(DEFAULT_ALPHA, DEFAULT_BETA, true)
    }
}

impl FrameEnhancer for LowLightEnhancer {
    fn enhance(&self, frame: &mut Frame) -> Result<(), Box<dyn std::error::Error>> {
        for v in frame.data_mut() {
            *v = self.gain_lut[*v as usize];
        }
        if self.equalize {
            Self::equalize_luma(frame);
        }
        Ok(())
    }
}
