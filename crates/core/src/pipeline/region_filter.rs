use crate::shared::region::Region;

/// Keeps regions whose sides are both at least `min_size` pixels.
///
/// Tiny boxes are mostly texture false positives; this is the knob that
/// trades recall for precision on distant faces. `0` keeps everything.
pub fn filter_regions(regions: &[Region], min_size: u32) -> Vec<Region> {
    regions
        .iter()
        .filter(|r| r.is_at_least(min_size))
        .cloned()
        .collect()
}
