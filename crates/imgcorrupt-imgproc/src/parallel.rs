use rayon::prelude::*;

use imgcorrupt_image::Image;

/// Number of pixels from which [`ExecutionStrategy::Auto`] goes parallel.
pub const AUTO_PARALLEL_MIN_PIXELS: usize = 100_000;

/// Controls how row-wise operations are executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionStrategy {
    /// Run sequentially on the current thread.
    ///
    /// Useful for small images, debugging, or when the caller already
    /// parallelizes across images.
    Serial,

    /// Use the global Rayon thread pool to process rows in parallel.
    Parallel,

    /// Parallel for images of at least [`AUTO_PARALLEL_MIN_PIXELS`] pixels, serial otherwise.
    #[default]
    Auto,
}

impl ExecutionStrategy {
    /// Whether an image with `num_pixels` pixels is processed in parallel.
    pub fn is_parallel(&self, num_pixels: usize) -> bool {
        match self {
            ExecutionStrategy::Serial => false,
            ExecutionStrategy::Parallel => true,
            ExecutionStrategy::Auto => num_pixels >= AUTO_PARALLEL_MIN_PIXELS,
        }
    }
}

/// Apply a function to each pixel in the image in parallel.
pub fn par_iter_rows<T1, const C1: usize, T2, const C2: usize>(
    src: &Image<T1, C1>,
    dst: &mut Image<T2, C2>,
    f: impl Fn(&[T1], &mut [T2]) + Send + Sync,
) where
    T1: Send + Sync,
    T2: Send + Sync,
{
    let cols = src.cols().max(1);
    src.as_slice()
        .par_chunks_exact(C1 * cols)
        .zip(dst.as_slice_mut().par_chunks_exact_mut(C2 * cols))
        .for_each(|(src_chunk, dst_chunk)| {
            src_chunk
                .chunks_exact(C1)
                .zip(dst_chunk.chunks_exact_mut(C2))
                .for_each(|(src_pixel, dst_pixel)| {
                    f(src_pixel, dst_pixel);
                });
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use imgcorrupt_image::{ImageError, ImageSize};

    #[test]
    fn test_is_parallel() {
        assert!(!ExecutionStrategy::Serial.is_parallel(usize::MAX));
        assert!(ExecutionStrategy::Parallel.is_parallel(1));
        assert!(!ExecutionStrategy::Auto.is_parallel(AUTO_PARALLEL_MIN_PIXELS - 1));
        assert!(ExecutionStrategy::Auto.is_parallel(AUTO_PARALLEL_MIN_PIXELS));
    }

    #[test]
    fn test_par_iter_rows() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 2,
            height: 2,
        };
        let src = Image::<u8, 3>::new(size, (0..12).collect())?;
        let mut dst = Image::<u8, 1>::from_size_val(size, 0)?;
        par_iter_rows(&src, &mut dst, |s, d| d[0] = s[2]);
        assert_eq!(dst.as_slice(), &[2, 5, 8, 11]);

        Ok(())
    }
}
