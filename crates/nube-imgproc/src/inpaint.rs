use log::debug;
use nube_image::{Image, ImageError};
use rayon::prelude::*;

/// Offsets of the 3x3 neighbor ring, center excluded.
const NEIGHBOR_OFFSETS: [(i64, i64); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Compute the empty-pixel mask of an image.
///
/// A pixel is considered empty when all three channels are zero. The mask is
/// set to 255 for empty pixels and 0 otherwise.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, 3).
/// * `mask` - The destination mask with shape (H, W, 1).
///
/// PRECONDITION: `src` and `mask` must have the same size.
pub fn empty_mask(src: &Image<u8, 3>, mask: &mut Image<u8, 1>) -> Result<(), ImageError> {
    if src.size() != mask.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            mask.cols(),
            mask.rows(),
        ));
    }

    src.as_slice()
        .par_chunks_exact(3)
        .zip(mask.as_slice_mut().par_iter_mut())
        .for_each(|(pixel, mask_pixel)| {
            *mask_pixel = if pixel[0] == 0 && pixel[1] == 0 && pixel[2] == 0 {
                255
            } else {
                0
            };
        });

    Ok(())
}

/// Fill empty pixels with the average color of their non-empty neighbors.
///
/// Empty pixels (all channels zero) are progressively replaced by the rounded
/// average of their non-empty 8-neighbors, propagating one ring per iteration.
/// Non-empty pixels are never modified. Out-of-bounds neighbors contribute
/// zero to both the sum and the count.
///
/// With `min_neighbors == 0` every empty pixel with at least one non-empty
/// neighbor is filled. With `min_neighbors > 0` a pixel is only filled when it
/// has at least that many non-empty neighbors, which preserves sharp object
/// borders by refusing to fill boundary pixels with too few informative
/// neighbors.
///
/// The routine stops before exhausting `iterations` when no empty pixels
/// remain or when a pass fills nothing.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, 3).
/// * `dst` - The destination image with shape (H, W, 3).
/// * `iterations` - Maximum number of propagation passes.
/// * `min_neighbors` - Minimum non-empty neighbors required to fill a pixel.
///
/// # Returns
///
/// The total number of pixels filled.
///
/// # Examples
///
/// ```
/// use nube_image::{Image, ImageSize};
/// use nube_imgproc::inpaint::fill_holes;
///
/// let size = ImageSize { width: 3, height: 3 };
/// let mut data = vec![60u8; 3 * 3 * 3];
/// // punch a hole in the center
/// data[4 * 3..5 * 3].copy_from_slice(&[0, 0, 0]);
/// let image = Image::<u8, 3>::new(size, data).unwrap();
///
/// let mut filled = Image::<u8, 3>::from_size_val(size, 0).unwrap();
/// let num_filled = fill_holes(&image, &mut filled, 1, 0).unwrap();
///
/// assert_eq!(num_filled, 1);
/// assert_eq!(filled.pixel(1, 1).unwrap(), [60, 60, 60]);
/// ```
pub fn fill_holes(
    src: &Image<u8, 3>,
    dst: &mut Image<u8, 3>,
    iterations: usize,
    min_neighbors: usize,
) -> Result<usize, ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    dst.as_slice_mut().copy_from_slice(src.as_slice());

    let width = src.width();
    let height = src.height();

    let mut mask = Image::<u8, 1>::from_size_val(src.size(), 0)?;
    let mut sums = vec![0f32; width * height * 3];
    let mut counts = vec![0f32; width * height];

    let mut total_filled = 0;

    for iteration in 0..iterations {
        empty_mask(dst, &mut mask)?;
        if !mask.as_slice().iter().any(|&m| m != 0) {
            debug!("no empty pixels left after {} iterations", iteration);
            break;
        }

        sums.iter_mut().for_each(|s| *s = 0.0);
        counts.iter_mut().for_each(|c| *c = 0.0);

        // 8-neighbor sums and non-empty counts with zero padding, from a
        // snapshot of the raster at the start of the pass
        {
            let data = dst.as_slice();
            let mask_data = mask.as_slice();

            sums.par_chunks_mut(width * 3)
                .zip(counts.par_chunks_mut(width))
                .enumerate()
                .for_each(|(y, (sum_row, count_row))| {
                    for x in 0..width {
                        for (dy, dx) in NEIGHBOR_OFFSETS {
                            let ny = y as i64 + dy;
                            let nx = x as i64 + dx;
                            if ny < 0 || ny >= height as i64 || nx < 0 || nx >= width as i64 {
                                continue;
                            }
                            let neighbor = (ny as usize) * width + nx as usize;
                            if mask_data[neighbor] == 0 {
                                count_row[x] += 1.0;
                            }
                            for c in 0..3 {
                                sum_row[x * 3 + c] += data[neighbor * 3 + c] as f32;
                            }
                        }
                    }
                });
        }

        // overwrite only the pixels that were empty at the start of the pass
        let mut filled_this_pass = 0;
        let out = dst.as_slice_mut();
        for idx in 0..width * height {
            if mask.as_slice()[idx] == 0 {
                continue;
            }
            let count = counts[idx];
            if min_neighbors > 0 && count < min_neighbors as f32 {
                continue;
            }
            // a zero count divides by one, leaving the pixel empty this pass
            let divisor = if count == 0.0 { 1.0 } else { count };
            let mut filled_pixel = false;
            for c in 0..3 {
                let value = (sums[idx * 3 + c] / divisor).round() as u8;
                out[idx * 3 + c] = value;
                filled_pixel |= value != 0;
            }
            if filled_pixel {
                filled_this_pass += 1;
            }
        }

        debug!(
            "iteration {}: filled {} pixels",
            iteration + 1,
            filled_this_pass
        );

        if filled_this_pass == 0 {
            break;
        }
        total_filled += filled_this_pass;
    }

    Ok(total_filled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nube_image::ImageSize;

    fn image_with_hole() -> Image<u8, 3> {
        let size = ImageSize {
            width: 3,
            height: 3,
        };
        #[rustfmt::skip]
        let data = vec![
            10, 1, 2,   20, 2, 4,   30, 3, 6,
            40, 4, 8,    0, 0, 0,   50, 5, 10,
            60, 6, 12,  70, 7, 14,  80, 8, 16,
        ];
        Image::new(size, data).unwrap()
    }

    #[test]
    fn empty_mask_flags_zero_pixels() -> Result<(), ImageError> {
        let image = image_with_hole();
        let mut mask = Image::<u8, 1>::from_size_val(image.size(), 0)?;
        empty_mask(&image, &mut mask)?;

        assert_eq!(mask.as_slice(), [0, 0, 0, 0, 255, 0, 0, 0, 0]);
        Ok(())
    }

    #[test]
    fn fill_single_hole_averages_neighbors() -> Result<(), ImageError> {
        let image = image_with_hole();
        let mut filled = Image::from_size_val(image.size(), 0)?;
        let num_filled = fill_holes(&image, &mut filled, 1, 0)?;

        assert_eq!(num_filled, 1);
        // averages of the 8 neighbors: 360/8, 36/8, 72/8
        assert_eq!(filled.pixel(1, 1)?, [45, 5, 9]);
        // all other pixels untouched
        assert_eq!(filled.pixel(0, 0)?, [10, 1, 2]);
        assert_eq!(filled.pixel(2, 2)?, [80, 8, 16]);
        Ok(())
    }

    #[test]
    fn fully_empty_raster_stays_empty() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 4,
            height: 3,
        };
        let image = Image::<u8, 3>::from_size_val(size, 0)?;
        let mut filled = Image::from_size_val(size, 0)?;
        let num_filled = fill_holes(&image, &mut filled, 10, 0)?;

        assert_eq!(num_filled, 0);
        assert!(filled.as_slice().iter().all(|&v| v == 0));
        Ok(())
    }

    #[test]
    fn fully_non_empty_raster_is_untouched() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 4,
            height: 4,
        };
        let image = Image::<u8, 3>::from_size_val(size, 37)?;
        let mut filled = Image::from_size_val(size, 0)?;
        let num_filled = fill_holes(&image, &mut filled, 5, 0)?;

        assert_eq!(num_filled, 0);
        assert_eq!(filled.as_slice(), image.as_slice());
        Ok(())
    }

    #[test]
    fn zero_iterations_is_a_noop() -> Result<(), ImageError> {
        let image = image_with_hole();
        let mut filled = Image::from_size_val(image.size(), 0)?;
        let num_filled = fill_holes(&image, &mut filled, 0, 0)?;

        assert_eq!(num_filled, 0);
        assert_eq!(filled.as_slice(), image.as_slice());
        Ok(())
    }

    #[test]
    fn fill_propagates_one_ring_per_iteration() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 5,
            height: 1,
        };
        let mut data = vec![0u8; 5 * 3];
        data[0..3].copy_from_slice(&[100, 100, 100]);
        let image = Image::<u8, 3>::new(size, data)?;

        let mut filled = Image::from_size_val(size, 0)?;
        fill_holes(&image, &mut filled, 1, 0)?;
        assert_eq!(filled.pixel(1, 0)?, [100, 100, 100]);
        assert_eq!(filled.pixel(2, 0)?, [0, 0, 0]);

        // enough iterations to cover the whole empty run
        let mut filled = Image::from_size_val(size, 0)?;
        let num_filled = fill_holes(&image, &mut filled, 4, 0)?;
        assert_eq!(num_filled, 4);
        assert!(filled.as_slice().iter().all(|&v| v == 100));
        Ok(())
    }

    #[test]
    fn min_neighbors_preserves_borders() -> Result<(), ImageError> {
        // the corner hole has only 3 neighbors, all non-empty
        let size = ImageSize {
            width: 3,
            height: 3,
        };
        let mut data = vec![80u8; 3 * 3 * 3];
        data[0..3].copy_from_slice(&[0, 0, 0]);
        let image = Image::<u8, 3>::new(size, data)?;

        let mut filled = Image::from_size_val(size, 0)?;
        let num_filled = fill_holes(&image, &mut filled, 3, 4)?;
        assert_eq!(num_filled, 0);
        assert_eq!(filled.pixel(0, 0)?, [0, 0, 0]);

        let mut filled = Image::from_size_val(size, 0)?;
        let num_filled = fill_holes(&image, &mut filled, 3, 3)?;
        assert_eq!(num_filled, 1);
        assert_eq!(filled.pixel(0, 0)?, [80, 80, 80]);
        Ok(())
    }

    #[test]
    fn size_mismatch_is_an_error() -> Result<(), ImageError> {
        let image = image_with_hole();
        let mut filled = Image::from_size_val(
            ImageSize {
                width: 2,
                height: 3,
            },
            0,
        )?;
        assert!(fill_holes(&image, &mut filled, 1, 0).is_err());
        Ok(())
    }
}
