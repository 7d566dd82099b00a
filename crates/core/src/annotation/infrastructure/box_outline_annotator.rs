use crate::annotation::domain::frame_annotator::FrameAnnotator;
use crate::shared::constants::{BOX_COLOR, BOX_THICKNESS};
use crate::shared::frame::Frame;
use crate::shared::region::Region;

/// Draws a hollow rectangle around each region.
///
/// The outline is drawn inside the region's bounds, so a box touching the
/// frame edge stays fully visible.
pub struct BoxOutlineAnnotator {
    color: [u8; 3],
    thickness: u32,
}

impl BoxOutlineAnnotator {
    pub fn new(color: [u8; 3], thickness: u32) -> Self {
        Self {
            color,
            thickness: thickness.max(1),
        }
    }

    fn fill_rect(&self, frame: &mut Frame, x0: usize, y0: usize, x1: usize, y1: usize) {
        let fw = frame.width() as usize;
        let channels = frame.channels() as usize;
        let data = frame.data_mut();
        for y in y0..y1 {
            for x in x0..x1 {
                let offset = (y * fw + x) * channels;
                for (c, &value) in self.color.iter().enumerate().take(channels) {
                    data[offset + c] = value;
                }
            }
        }
    }
}

impl Default for BoxOutlineAnnotator {
    fn default() -> Self {
        Self::new(BOX_COLOR, BOX_THICKNESS)
    }
}

impl FrameAnnotator for BoxOutlineAnnotator {
    fn annotate(
        &self,
        frame: &mut Frame,
        regions: &[Region],
    ) -> Result<(), Box<dyn std::error::Error>> {
        for region in regions {
            let Some(r) = region.clamp_to(frame.width(), frame.height()) else {
                continue;
            };
            let (x0, y0) = (r.x as usize, r.y as usize);
            let (x1, y1) = (r.right() as usize, r.bottom() as usize);
            let t = self.thickness as usize;

            self.fill_rect(frame, x0, y0, x1, (y0 + t).min(y1));
            self.fill_rect(frame, x0, y1.saturating_sub(t).max(y0), x1, y1);
            self.fill_rect(frame, x0, y0, (x0 + t).min(x1), y1);
            self.fill_rect(frame, x1.saturating_sub(t).max(x0), y0, x1, y1);
        }
        Ok(())
    }
}
