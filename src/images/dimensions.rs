/// Scale `(width, height)` down so the longer side is at most `max_dimension`.
///
/// Never enlarges. Aspect ratio is kept, rounding to the nearest pixel with a
/// minimum of 1px per side.
pub fn fit_within(width: u32, height: u32, max_dimension: u32) -> (u32, u32) {
    let longest = width.max(height);
    if longest <= max_dimension || longest == 0 {
        return (width, height);
    }

    let scale = max_dimension as f64 / longest as f64;
    let new_w = (width as f64 * scale).round() as u32;
    let new_h = (height as f64 * scale).round() as u32;

    (new_w.clamp(1, max_dimension), new_h.clamp(1, max_dimension))
}
