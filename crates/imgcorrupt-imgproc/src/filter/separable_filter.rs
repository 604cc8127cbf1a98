use imgcorrupt_image::Image;
use rayon::prelude::*;

use super::FilterError;
use crate::parallel::ExecutionStrategy;

/// Trait for floating point samples filtered in double precision.
pub trait FloatConversion: Copy {
    /// Convert the sample to f64
    fn to_f64(self) -> f64;
    /// Convert the sample from f64
    fn from_f64(val: f64) -> Self;
}

impl FloatConversion for f32 {
    fn to_f64(self) -> f64 {
        self as f64
    }

    fn from_f64(val: f64) -> Self {
        val as f32
    }
}

impl FloatConversion for f64 {
    fn to_f64(self) -> f64 {
        self
    }

    fn from_f64(val: f64) -> Self {
        val
    }
}

/// A separable 2D filter that applies horizontal and vertical 1D convolutions sequentially.
///
/// Samples outside the image take the value of the nearest edge sample.
struct SeparableFilter<'a> {
    kernel_x: &'a [f64],
    kernel_y: &'a [f64],
    offsets_x: Vec<isize>,
    offsets_y: Vec<isize>,
}

impl<'a> SeparableFilter<'a> {
    fn new(kernel_x: &'a [f64], kernel_y: &'a [f64]) -> Self {
        let offsets = |len: usize| {
            let half = (len / 2) as isize;
            (0..len as isize).map(|i| i - half).collect()
        };

        Self {
            kernel_x,
            kernel_y,
            offsets_x: offsets(kernel_x.len()),
            offsets_y: offsets(kernel_y.len()),
        }
    }

    fn apply<T, const C: usize>(
        &self,
        src: &Image<T, C>,
        dst: &mut Image<T, C>,
        strategy: ExecutionStrategy,
    ) where
        T: FloatConversion + Send + Sync,
    {
        let rows = src.rows();
        let cols = src.cols();
        if rows == 0 || cols == 0 {
            return;
        }

        let src_data = src.as_slice();
        let dst_data = dst.as_slice_mut();
        let mut temp = vec![0.0f64; src_data.len()];

        if strategy.is_parallel(rows * cols) {
            temp.par_chunks_mut(cols * C)
                .enumerate()
                .for_each(|(r, row_temp)| self.horizontal_row::<T, C>(src_data, row_temp, r, cols));
            dst_data
                .par_chunks_mut(cols * C)
                .enumerate()
                .for_each(|(r, row_dst)| self.vertical_row::<T, C>(&temp, row_dst, r, rows, cols));
        } else {
            temp.chunks_mut(cols * C)
                .enumerate()
                .for_each(|(r, row_temp)| self.horizontal_row::<T, C>(src_data, row_temp, r, cols));
            dst_data
                .chunks_mut(cols * C)
                .enumerate()
                .for_each(|(r, row_dst)| self.vertical_row::<T, C>(&temp, row_dst, r, rows, cols));
        }
    }

    fn horizontal_row<T: FloatConversion, const C: usize>(
        &self,
        src_data: &[T],
        row_temp: &mut [f64],
        r: usize,
        cols: usize,
    ) {
        let row_offset = r * cols * C;
        let last = cols as isize - 1;
        for c in 0..cols {
            let center = row_offset + c * C;
            let mut acc = [0.0f64; C];
            for (&k, &off) in self.kernel_x.iter().zip(self.offsets_x.iter()) {
                let x = (c as isize + off).clamp(0, last) as usize;
                let idx = row_offset + x * C;
                for (ch, acc_val) in acc.iter_mut().enumerate() {
                    *acc_val += (src_data[idx + ch].to_f64() - src_data[center + ch].to_f64()) * k;
                }
            }
            for (ch, acc_val) in acc.iter().enumerate() {
                row_temp[c * C + ch] = src_data[center + ch].to_f64() + acc_val;
            }
        }
    }

    fn vertical_row<T: FloatConversion, const C: usize>(
        &self,
        temp: &[f64],
        row_dst: &mut [T],
        r: usize,
        rows: usize,
        cols: usize,
    ) {
        let last = rows as isize - 1;
        for c in 0..cols {
            let center = r * cols * C + c * C;
            let mut acc = [0.0f64; C];
            for (&k, &off) in self.kernel_y.iter().zip(self.offsets_y.iter()) {
                let y = (r as isize + off).clamp(0, last) as usize;
                let idx = y * cols * C + c * C;
                for (ch, acc_val) in acc.iter_mut().enumerate() {
                    *acc_val += (temp[idx + ch] - temp[center + ch]) * k;
                }
            }
            for (ch, &acc_val) in acc.iter().enumerate() {
                row_dst[c * C + ch] = T::from_f64(temp[center + ch] + acc_val);
            }
        }
    }
}

/// Apply a separable filter with normalized kernels, with execution strategy control.
///
/// Border samples are replicated, matching the `nearest` extension mode. Both
/// kernels must sum to one: every output is its own input sample plus the
/// weighted differences to its neighbours, accumulated in f64, so constant
/// regions come out unchanged to the last bit.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `dst` - The destination image with shape (H, W, C).
/// * `kernel_x` - The horizontal kernel.
/// * `kernel_y` - The vertical kernel.
/// * `strategy` - Execution strategy: `Serial`, `Parallel`, or `Auto`.
pub fn separable_filter<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    kernel_x: &[f64],
    kernel_y: &[f64],
    strategy: ExecutionStrategy,
) -> Result<(), FilterError>
where
    T: FloatConversion + Send + Sync,
{
    if kernel_x.is_empty() || kernel_y.is_empty() {
        return Err(FilterError::InvalidKernelLength(
            kernel_x.len(),
            kernel_y.len(),
        ));
    }

    if src.size() != dst.size() {
        return Err(imgcorrupt_image::ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        )
        .into());
    }

    SeparableFilter::new(kernel_x, kernel_y).apply(src, dst, strategy);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use imgcorrupt_image::ImageSize;

    const BINOMIAL: [f64; 3] = [0.25, 0.5, 0.25];

    #[test]
    fn test_separable_filter_impulse() -> Result<(), FilterError> {
        let size = ImageSize {
            width: 5,
            height: 5,
        };

        #[rustfmt::skip]
        let img = Image::new(
            size,
            vec![
                0.0, 0.0, 0.0, 0.0, 0.0,
                0.0, 0.0, 0.0, 0.0, 0.0,
                0.0, 0.0, 1.0, 0.0, 0.0,
                0.0, 0.0, 0.0, 0.0, 0.0,
                0.0, 0.0, 0.0, 0.0, 0.0,
            ],
        )?;

        let mut dst = Image::<_, 1>::from_size_val(img.size(), 0f32)?;
        separable_filter(&img, &mut dst, &BINOMIAL, &BINOMIAL, ExecutionStrategy::Serial)?;

        #[rustfmt::skip]
        assert_eq!(
            dst.as_slice(),
            &[
                0.0, 0.0,    0.0,   0.0,    0.0,
                0.0, 0.0625, 0.125, 0.0625, 0.0,
                0.0, 0.125,  0.25,  0.125,  0.0,
                0.0, 0.0625, 0.125, 0.0625, 0.0,
                0.0, 0.0,    0.0,   0.0,    0.0,
            ]
        );

        Ok(())
    }

    #[test]
    fn test_separable_filter_replicates_border() -> Result<(), FilterError> {
        let size = ImageSize {
            width: 3,
            height: 1,
        };
        let img = Image::<f64, 1>::new(size, vec![4.0, 0.0, 0.0])?;
        let mut dst = Image::<f64, 1>::from_size_val(size, 0.0)?;
        separable_filter(&img, &mut dst, &BINOMIAL, &[1.0], ExecutionStrategy::Serial)?;

        // the left edge sees itself twice, the right edge its own zero twice
        assert_eq!(dst.as_slice(), &[3.0, 1.0, 0.0]);

        Ok(())
    }

    #[test]
    fn test_separable_filter_constant_field_is_exact() -> Result<(), FilterError> {
        let size = ImageSize {
            width: 7,
            height: 6,
        };
        let kernel = super::super::kernels::gaussian_kernel_1d(9, 2.0);
        for value in [1.0, 128.0 / 255.0, 0.1] {
            let img = Image::<f64, 2>::from_size_val(size, value)?;
            let mut dst = Image::<f64, 2>::from_size_val(size, 0.0)?;
            separable_filter(&img, &mut dst, &kernel, &kernel, ExecutionStrategy::Serial)?;
            assert!(dst.as_slice().iter().all(|&v| v == value), "{value}");
        }

        Ok(())
    }

    #[test]
    fn test_separable_filter_with_strategy() -> Result<(), FilterError> {
        let size = ImageSize {
            width: 7,
            height: 6,
        };
        let data = (0..size.width * size.height * 3)
            .map(|i| (i % 11) as f32 / 10.0)
            .collect::<Vec<_>>();
        let img = Image::<f32, 3>::new(size, data)?;
        let kernel = super::super::kernels::gaussian_kernel_1d(5, 1.0);

        let mut dst_serial = Image::<f32, 3>::from_size_val(size, 0.0)?;
        separable_filter(
            &img,
            &mut dst_serial,
            &kernel,
            &kernel,
            ExecutionStrategy::Serial,
        )?;

        let mut dst_parallel = Image::<f32, 3>::from_size_val(size, 0.0)?;
        separable_filter(
            &img,
            &mut dst_parallel,
            &kernel,
            &kernel,
            ExecutionStrategy::Parallel,
        )?;

        assert_eq!(dst_serial.as_slice(), dst_parallel.as_slice());

        Ok(())
    }

    #[test]
    fn test_separable_filter_empty_kernel() -> Result<(), FilterError> {
        let img = Image::<f32, 1>::from_size_val([2, 2].into(), 0.0)?;
        let mut dst = img.clone();
        assert_eq!(
            separable_filter(&img, &mut dst, &[], &[1.0], ExecutionStrategy::Auto),
            Err(FilterError::InvalidKernelLength(0, 1))
        );
        Ok(())
    }
}
