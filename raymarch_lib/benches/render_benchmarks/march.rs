use nalgebra::{point, vector};
use raymarch_lib::{
    common::{Ray, RaySegment},
    render::{march, MarchSettings},
};

use crate::common::{test_helpers, Criterion, TransferLut};

/// Single ray through the whole cube at the default step size
pub fn march_single_ray(c: &mut Criterion) {
    let volume = test_helpers::ramp_volume([64, 64, 64]);
    let view = test_helpers::red_isovalue_view();
    let lut = TransferLut::default();
    let segment = RaySegment {
        ray: Ray::new(point![0.5, 0.5, -2.0], vector![0.0, 0.0, 1.0]),
        t_enter: 2.0,
        t_exit: 3.0,
    };

    let mut group = c.benchmark_group("march");
    for early_termination in [false, true] {
        let settings = MarchSettings {
            early_termination,
            ..Default::default()
        };
        group.bench_function(format!("single ray ert={}", early_termination), |b| {
            b.iter(|| march(&segment, volume.get_field(), &lut, &view, &settings))
        });
    }
    group.finish();
}
