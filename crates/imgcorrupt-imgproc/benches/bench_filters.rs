use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use imgcorrupt_image::Image;
use imgcorrupt_imgproc::filter::{gaussian_with_strategy, ChannelArg};
use imgcorrupt_imgproc::parallel::ExecutionStrategy;

fn bench_filters(c: &mut Criterion) {
    let mut group = c.benchmark_group("Gaussian");

    for (width, height) in [(256, 224), (512, 448), (1024, 896)].iter() {
        for sigma in [0.7f64, 1.5, 3.0, 6.0].iter() {
            group.throughput(criterion::Throughput::Elements((*width * *height) as u64));

            let parameter_string = format!("{}x{}x{}", width, height, sigma);

            let image_size = [*width, *height].into();
            let image = Image::<f64, 3>::from_size_val(image_size, 0.5).unwrap();
            let output = Image::<f64, 3>::from_size_val(image_size, 0.0).unwrap();

            for (name, strategy) in [
                ("gaussian_serial", ExecutionStrategy::Serial),
                ("gaussian_parallel", ExecutionStrategy::Parallel),
            ] {
                group.bench_with_input(
                    BenchmarkId::new(name, &parameter_string),
                    &(&image, &output),
                    |b, i| {
                        let (src, mut dst) = (i.0, i.1.clone());
                        b.iter(|| {
                            black_box(gaussian_with_strategy(
                                src,
                                &mut dst,
                                *sigma,
                                ChannelArg::ChannelAxis(Some(-1)),
                                strategy,
                            ))
                        })
                    },
                );
            }
        }
    }

    group.finish();
}

criterion_group!(benches, bench_filters);
criterion_main!(benches);
