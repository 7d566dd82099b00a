/// Intensity histogram of an 8-bit single-channel image.
pub fn histogram(values: &[u8]) -> [u64; 256] {
    let mut hist = [0u64; 256];
    for &v in values {
        hist[v as usize] += 1;
    }
    hist
}

/// Lookup table that spreads `values` over the full 0..=255 range.
///
/// The darkest populated level maps to 0 and the brightest to 255. An
/// image with a single intensity has nothing to spread and gets the
/// identity table.
pub fn equalization_lut(values: &[u8]) -> [u8; 256] {
    let mut lut = [0u8; 256];
    for (i, slot) in lut.iter_mut().enumerate() {
        *slot = i as u8;
    }

    let hist = histogram(values);
    let total = values.len() as u64;
    let Some(first) = hist.iter().position(|&count| count > 0) else {
        return lut;
    };
    let cdf_min = hist[first];
    if total == cdf_min {
        return lut;
    }

    let scale = 255.0 / (total - cdf_min) as f64;
    let mut cdf = 0u64;
    for (i, &count) in hist.iter().enumerate() {
        cdf += count;
        lut[i] = if i < first {
            0
        } else {
            ((cdf - cdf_min) as f64 * scale).round().clamp(0.0, 255.0) as u8
        };
    }
    lut
}
