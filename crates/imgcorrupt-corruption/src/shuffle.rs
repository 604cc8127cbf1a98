use imgcorrupt_image::Image;
use rand::Rng;

/// Locally shuffle the pixels of an image, in place.
///
/// Each pass visits the interior pixels bottom-up and right-to-left: rows from
/// `H - max_delta - 1` down to `max_delta + 1` and, within a row, columns from
/// `W - max_delta - 1` down to `max_delta + 1`. For every visited pixel two
/// offsets `dx` and `dy` are drawn, in that order, uniformly from
/// `[-max_delta, max_delta)`, and all channels of the pixel are swapped with
/// those of the pixel at `(h + dy, w + dx)`.
///
/// The first visited row and column are one inside those of the glass blur
/// in the `imagecorruptions` package, which starts at `H - max_delta` and
/// `W - max_delta`, so outputs are not comparable pixel for pixel.
///
/// Swaps act on the working buffer directly, so a pixel moved earlier in a pass
/// can be moved again later in the same pass. The result depends on the visiting
/// order and is not a uniformly drawn permutation. Partners may lie in the border
/// band, which the traversal itself never visits.
///
/// Nothing happens when `max_delta` is zero or when the image has no interior
/// pixels for the given radius.
///
/// # Arguments
///
/// * `image` - The image to shuffle.
/// * `max_delta` - The shuffle radius in pixels.
/// * `iterations` - The number of passes.
/// * `rng` - Random stream the offsets are drawn from.
pub fn shuffle_pixels<T, const C: usize, R: Rng>(
    image: &mut Image<T, C>,
    max_delta: usize,
    iterations: usize,
    rng: &mut R,
) {
    if max_delta == 0 {
        return;
    }

    let rows = image.rows();
    let cols = image.cols();
    let delta = max_delta as i64;
    let data = image.as_slice_mut();

    for _ in 0..iterations {
        for h in (max_delta + 1..rows.saturating_sub(max_delta)).rev() {
            for w in (max_delta + 1..cols.saturating_sub(max_delta)).rev() {
                let dx = rng.random_range(-delta..delta);
                let dy = rng.random_range(-delta..delta);

                // the interior bounds keep the partner inside the image
                let h_prime = (h as i64 + dy) as usize;
                let w_prime = (w as i64 + dx) as usize;

                let a = (h * cols + w) * C;
                let b = (h_prime * cols + w_prime) * C;
                for ch in 0..C {
                    data.swap(a + ch, b + ch);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use imgcorrupt_image::{ImageError, ImageSize};
    use rand::{rngs::StdRng, SeedableRng};

    fn ramp(width: usize, height: usize) -> Result<Image<u8, 3>, ImageError> {
        let data = (0..width * height)
            .flat_map(|i| {
                let v = (i % 256) as u8;
                [v, v.wrapping_add(1), v.wrapping_add(2)]
            })
            .collect();
        Image::new(ImageSize { width, height }, data)
    }

    fn sorted_channel(image: &Image<u8, 3>, ch: usize) -> Vec<u8> {
        let mut values = image
            .as_slice()
            .iter()
            .skip(ch)
            .step_by(3)
            .copied()
            .collect::<Vec<_>>();
        values.sort_unstable();
        values
    }

    #[test]
    fn shuffle_conserves_values() -> Result<(), ImageError> {
        let original = ramp(20, 16)?;
        let mut shuffled = original.clone();
        let mut rng = StdRng::seed_from_u64(7);
        shuffle_pixels(&mut shuffled, 2, 3, &mut rng);

        assert_ne!(shuffled, original);
        for ch in 0..3 {
            assert_eq!(sorted_channel(&shuffled, ch), sorted_channel(&original, ch));
        }
        Ok(())
    }

    #[test]
    fn shuffle_moves_whole_pixels() -> Result<(), ImageError> {
        let original = ramp(12, 12)?;
        let mut shuffled = original.clone();
        let mut rng = StdRng::seed_from_u64(3);
        shuffle_pixels(&mut shuffled, 1, 2, &mut rng);

        for pixel in shuffled.as_slice().chunks_exact(3) {
            assert_eq!(pixel[1], pixel[0].wrapping_add(1));
            assert_eq!(pixel[2], pixel[0].wrapping_add(2));
        }
        Ok(())
    }

    #[test]
    fn shuffle_keeps_far_border() -> Result<(), ImageError> {
        // partners never reach the outermost rows and columns
        let (width, height, max_delta) = (16, 14, 3);
        let original = ramp(width, height)?;
        let mut shuffled = original.clone();
        let mut rng = StdRng::seed_from_u64(11);
        shuffle_pixels(&mut shuffled, max_delta, 2, &mut rng);

        for y in 0..height {
            for x in 0..width {
                let reachable = y >= 1 && x >= 1 && y <= height - 2 && x <= width - 2;
                if !reachable {
                    assert_eq!(
                        shuffled.get_pixel(x, y, 0)?,
                        original.get_pixel(x, y, 0)?,
                        "pixel ({x}, {y}) moved"
                    );
                }
            }
        }
        Ok(())
    }

    #[test]
    fn shuffle_is_deterministic_per_seed() -> Result<(), ImageError> {
        let original = ramp(32, 24)?;

        let mut first = original.clone();
        shuffle_pixels(&mut first, 4, 2, &mut StdRng::seed_from_u64(42));

        let mut second = original.clone();
        shuffle_pixels(&mut second, 4, 2, &mut StdRng::seed_from_u64(42));

        assert_eq!(first, second);
        Ok(())
    }

    #[test]
    fn shuffle_draws_dx_then_dy() -> Result<(), ImageError> {
        // 4x4 with radius 1 visits only pixel (2, 2)
        let original = ramp(4, 4)?;
        let mut shuffled = original.clone();
        let seed = 13;
        shuffle_pixels(&mut shuffled, 1, 1, &mut StdRng::seed_from_u64(seed));

        let mut rng = StdRng::seed_from_u64(seed);
        let dx: i64 = rng.random_range(-1..1);
        let dy: i64 = rng.random_range(-1..1);
        let (x, y) = ((2 + dx) as usize, (2 + dy) as usize);

        let mut expected = original.clone();
        for ch in 0..3 {
            expected.set_pixel(2, 2, ch, *original.get_pixel(x, y, ch)?)?;
            expected.set_pixel(x, y, ch, *original.get_pixel(2, 2, ch)?)?;
        }
        assert_eq!(shuffled, expected);
        Ok(())
    }

    #[test]
    fn shuffle_small_image_is_noop() -> Result<(), ImageError> {
        let original = ramp(5, 5)?;
        let mut shuffled = original.clone();
        let mut rng = StdRng::seed_from_u64(0);
        shuffle_pixels(&mut shuffled, 2, 5, &mut rng);
        assert_eq!(shuffled, original);

        shuffle_pixels(&mut shuffled, 0, 5, &mut rng);
        assert_eq!(shuffled, original);
        Ok(())
    }
}
