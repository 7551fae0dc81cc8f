use criterion::{criterion_group, criterion_main, Criterion};
use nmg_math::{Point3, Tolerance};
use nmg_ops::{BooleanEvaluator, BooleanOp};
use nmg_topo::{Model, VertexId};

fn cube(model: &mut Model, shell: nmg_topo::ShellId, origin: Point3, size: f64) {
    let (x, y, z) = (origin.x(), origin.y(), origin.z());
    let v = |dx: f64, dy: f64, dz: f64| Point3::new(x + dx * size, y + dy * size, z + dz * size);
    let corners = [
        v(0.0, 0.0, 0.0),
        v(1.0, 0.0, 0.0),
        v(1.0, 1.0, 0.0),
        v(0.0, 1.0, 0.0),
        v(0.0, 0.0, 1.0),
        v(1.0, 0.0, 1.0),
        v(1.0, 1.0, 1.0),
        v(0.0, 1.0, 1.0),
    ];
    let ids: Vec<VertexId> = corners.into_iter().map(|p| model.make_vertex(p)).collect();
    let faces = [
        [0, 3, 2, 1],
        [4, 5, 6, 7],
        [0, 1, 5, 4],
        [1, 2, 6, 5],
        [2, 3, 7, 6],
        [3, 0, 4, 7],
    ];
    for f in faces {
        let verts: Vec<VertexId> = f.iter().map(|&i| ids[i]).collect();
        model.make_face_from_loop(shell, &verts).unwrap();
    }
}

fn bench_union_two_cubes(c: &mut Criterion) {
    c.bench_function("union_overlapping_cubes", |b| {
        b.iter(|| {
            let mut model = Model::default();
            let region = model.nmg_mr();
            let shell_a = model.nmg_ms(region).unwrap();
            let shell_b = model.nmg_ms(region).unwrap();
            cube(&mut model, shell_a, Point3::new(0.0, 0.0, 0.0), 2.0);
            cube(&mut model, shell_b, Point3::new(1.0, 1.0, 1.0), 2.0);
            let evaluator = BooleanEvaluator::new(Tolerance::DEFAULT);
            evaluator
                .evaluate(&mut model, shell_a, shell_b, BooleanOp::Union)
                .unwrap();
        });
    });
}

criterion_group!(benches, bench_union_two_cubes);
criterion_main!(benches);
