use nube_image::{Image, ImageError};
use rayon::prelude::*;

/// Replace the color of every non-empty pixel with a target color.
///
/// Empty pixels (all channels zero) are left as-is, so the operation preserves
/// the empty-pixel mask of the raster. Useful to turn a projected cloud into a
/// binary-like coverage mask.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, 3).
/// * `dst` - The destination image with shape (H, W, 3).
/// * `color` - The target color applied to non-empty pixels.
///
/// PRECONDITION: `src` and `dst` must have the same size.
///
/// # Examples
///
/// ```
/// use nube_image::{Image, ImageSize};
/// use nube_imgproc::recolor::recolor_nonempty;
///
/// let size = ImageSize { width: 2, height: 1 };
/// let image = Image::<u8, 3>::new(size, vec![0, 0, 0, 10, 20, 30]).unwrap();
///
/// let mut mask = Image::<u8, 3>::from_size_val(size, 0).unwrap();
/// recolor_nonempty(&image, &mut mask, [255, 255, 255]).unwrap();
///
/// assert_eq!(mask.pixel(0, 0).unwrap(), [0, 0, 0]);
/// assert_eq!(mask.pixel(1, 0).unwrap(), [255, 255, 255]);
/// ```
pub fn recolor_nonempty(
    src: &Image<u8, 3>,
    dst: &mut Image<u8, 3>,
    color: [u8; 3],
) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    src.as_slice()
        .par_chunks_exact(3)
        .zip(dst.as_slice_mut().par_chunks_exact_mut(3))
        .for_each(|(src_pixel, dst_pixel)| {
            if src_pixel[0] == 0 && src_pixel[1] == 0 && src_pixel[2] == 0 {
                dst_pixel.copy_from_slice(&[0, 0, 0]);
            } else {
                dst_pixel.copy_from_slice(&color);
            }
        });

    Ok(())
}
