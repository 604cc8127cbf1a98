/// Number of standard deviations covered by a truncated gaussian kernel.
pub const DEFAULT_TRUNCATE: f64 = 4.0;

/// Create a gaussian blur kernel.
///
/// # Arguments
///
/// * `kernel_size` - The size of the kernel.
/// * `sigma` - The sigma of the gaussian kernel.
///
/// # Returns
///
/// A vector of the kernel, normalized to sum to one.
pub fn gaussian_kernel_1d(kernel_size: usize, sigma: f64) -> Vec<f64> {
    let mut kernel = Vec::with_capacity(kernel_size);

    let mean = (kernel_size - 1) as f64 / 2.0;
    let sigma_sq = sigma * sigma;

    // compute the kernel
    for i in 0..kernel_size {
        let x = i as f64 - mean;
        kernel.push((-(x * x) / (2.0 * sigma_sq)).exp());
    }

    // normalize the kernel
    let norm = kernel.iter().sum::<f64>();
    kernel.iter_mut().for_each(|k| *k /= norm);
    kernel
}

/// Radius of a gaussian kernel truncated at `truncate` standard deviations.
///
/// The radius is `floor(truncate * sigma + 0.5)`, so the kernel has `2 * radius + 1` taps.
pub fn gaussian_kernel_radius(sigma: f64, truncate: f64) -> usize {
    (truncate * sigma + 0.5).floor().max(0.0) as usize
}

/// Create a gaussian kernel whose size follows from `sigma`.
///
/// # Arguments
///
/// * `sigma` - The sigma of the gaussian kernel.
/// * `truncate` - Number of standard deviations kept on each side.
pub fn gaussian_kernel_1d_truncated(sigma: f64, truncate: f64) -> Vec<f64> {
    let radius = gaussian_kernel_radius(sigma, truncate);
    gaussian_kernel_1d(2 * radius + 1, sigma)
}
