//! コアロジックのベンチマーク
//!
//! 検出サイクルのHot Path（ジオメトリ変換・視線分類）の所要時間を計測。
//! 実行方法: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use eyepointer::domain::types::{
    CameraFacing, DetectedFace, Landmark, LandmarkKind, PointF, RectF,
};
use eyepointer::domain::{gaze, geometry};

fn bench_face() -> DetectedFace {
    DetectedFace {
        bounding_box: RectF::new(120.0, 200.0, 520.0, 760.0),
        landmarks: vec![
            Landmark::new(LandmarkKind::LeftEye, 220.0, 380.0),
            Landmark::new(LandmarkKind::RightEye, 420.0, 380.0),
            Landmark::new(LandmarkKind::NoseBase, 320.0, 480.0),
            Landmark::new(LandmarkKind::MouthLeft, 260.0, 600.0),
            Landmark::new(LandmarkKind::MouthRight, 380.0, 600.0),
        ],
        contours: vec![],
    }
}

fn bench_place_container(c: &mut Criterion) {
    let face_box = RectF::new(120.0, 200.0, 520.0, 760.0);

    c.bench_function("place_container", |b| {
        b.iter(|| {
            geometry::place_container(
                black_box(&face_box),
                black_box(1080.0),
                black_box(1920.0),
                black_box(1.0 / 3.0),
                black_box(20.0),
            )
        })
    });
}

fn bench_map_point(c: &mut Criterion) {
    let face_box = RectF::new(120.0, 200.0, 520.0, 760.0);
    let container = geometry::place_container(&face_box, 1080.0, 1920.0, 1.0 / 3.0, 20.0)
        .expect("valid container");
    let point = PointF::new(320.0, 480.0);

    c.bench_function("map_point", |b| {
        b.iter(|| geometry::map_point(black_box(&point), black_box(&face_box), black_box(&container)))
    });
}

fn bench_mirror(c: &mut Criterion) {
    let rect = RectF::new(120.0, 200.0, 520.0, 760.0);

    c.bench_function("mirror_if_front_facing", |b| {
        b.iter(|| {
            geometry::mirror_if_front_facing(
                black_box(&rect),
                black_box(1080.0),
                black_box(CameraFacing::Front),
            )
        })
    });
}

fn bench_classify(c: &mut Criterion) {
    let face = bench_face();

    c.bench_function("gaze_classify", |b| {
        b.iter(|| gaze::classify(black_box(&face), black_box(gaze::DEFAULT_THRESHOLD)))
    });
}

criterion_group!(
    benches,
    bench_place_container,
    bench_map_point,
    bench_mirror,
    bench_classify
);
criterion_main!(benches);
