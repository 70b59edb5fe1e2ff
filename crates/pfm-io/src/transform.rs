//! Row-order transforms shared by the PFM reader and writer.

/// Flips an image vertically (top-bottom mirror).
///
/// `src` must hold exactly `width * height * channels` samples. Only the row
/// axis is reversed; samples inside a row keep their order.
///
/// ```rust,ignore
/// let src = vec![
///     1.0, 0.0, 0.0, // top pixel
///     0.0, 1.0, 0.0, // bottom pixel
/// ];
/// let flipped = flip_v(&src, 1, 2, 3);
/// assert_eq!(flipped[0], 0.0);
/// assert_eq!(flipped[3], 1.0);
/// ```
pub(crate) fn flip_v<T: Copy + Default>(
    src: &[T],
    width: usize,
    height: usize,
    channels: usize,
) -> Vec<T> {
    let row_size = width * channels;
    debug_assert_eq!(src.len(), row_size * height);

    let mut dst = vec![T::default(); src.len()];
    for y in 0..height {
        let src_start = y * row_size;
        let dst_start = (height - 1 - y) * row_size;
        dst[dst_start..dst_start + row_size].copy_from_slice(&src[src_start..src_start + row_size]);
    }

    dst
}
