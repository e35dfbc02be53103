use crate::common::{
    test_helpers, BenchOptions, Criterion, Mode, RenderOptions, DEFAULT_CAMERA_POSITIONS,
    RESOLUTION,
};

pub fn render_isovalue(c: &mut Criterion) {
    let render_options = RenderOptions::builder()
        .resolution(RESOLUTION)
        .early_ray_termination(false)
        .step_size(0.001)
        .build_unchecked();

    let bench_options = BenchOptions::new(
        render_options,
        Mode::Isovalue,
        &DEFAULT_CAMERA_POSITIONS,
        test_helpers::uniform_volume([32, 32, 32], 0.5),
    );

    let benchmark = bench_options.get_benchmark();

    benchmark(c);
}

pub fn render_isovalue_ert(c: &mut Criterion) {
    let render_options = RenderOptions::builder()
        .resolution(RESOLUTION)
        .early_ray_termination(true)
        .step_size(0.001)
        .build_unchecked();

    let bench_options = BenchOptions::new(
        render_options,
        Mode::Isovalue,
        &DEFAULT_CAMERA_POSITIONS,
        test_helpers::uniform_volume([32, 32, 32], 0.5),
    );

    let benchmark = bench_options.get_benchmark();

    benchmark(c);
}

pub fn render_tf_sphere(c: &mut Criterion) {
    let render_options = RenderOptions::builder()
        .resolution(RESOLUTION)
        .early_ray_termination(true)
        .step_size(0.001)
        .build_unchecked();

    let bench_options = BenchOptions::new(
        render_options,
        Mode::TransferFunction,
        &DEFAULT_CAMERA_POSITIONS,
        test_helpers::sphere_volume(64),
    );

    let benchmark = bench_options.get_benchmark();

    benchmark(c);
}
