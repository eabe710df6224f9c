use criterion::{criterion_group, criterion_main, Criterion, black_box};

use skyroad::collaborators::RecordingRenderer;
use skyroad::core::CameraSnapshot;
use skyroad::math::TravelAxis;
use skyroad::streaming::{
    ConveyorPools, InstanceTransform, PoolId, SegmentConveyor, StreamConfig, StreamingGroup,
    TransformPool,
};
use skyroad::world::layout::{door_asset, road_asset};
use skyroad::world::WorldConfig;

const AXIS: TravelAxis = TravelAxis::NEG_Z;
const SPAN: f32 = 20_600.0;
const SPEED_PER_FRAME: f32 = 88.0 / 60.0;

fn pool(id: u32, count: usize, start: f32) -> TransformPool {
    let step = SPAN / count as f32;
    let instances = (0..count)
        .map(|i| InstanceTransform::from_position(AXIS.offset(start + i as f32 * step)))
        .collect();
    TransformPool::new(PoolId(id), AXIS, instances)
}

fn bench_whole_pool_update(c: &mut Criterion) {
    let mut group = StreamingGroup::new(
        "clouds",
        StreamConfig::whole_pool(SPAN),
        (0..4).map(|i| pool(i, 250, 0.0)).collect(),
    );

    c.bench_function("whole_pool_update_1000", |b| {
        let mut travel = 0.0f32;
        b.iter(|| {
            travel += SPEED_PER_FRAME;
            group.update(black_box(&CameraSnapshot::at_travel(travel, &AXIS)))
        });
    });
}

fn bench_per_instance_update(c: &mut Criterion) {
    let mut group = StreamingGroup::new(
        "columns",
        StreamConfig::per_instance(SPAN, -2000.0),
        (0..4).map(|i| pool(i, 250, -2000.0)).collect(),
    );

    c.bench_function("per_instance_update_1000", |b| {
        let mut travel = 0.0f32;
        b.iter(|| {
            travel += SPEED_PER_FRAME;
            group.update(black_box(&CameraSnapshot::at_travel(travel, &AXIS)))
        });
    });
}

fn bench_group_flush(c: &mut Criterion) {
    let mut group = StreamingGroup::new(
        "clouds",
        StreamConfig::whole_pool(SPAN),
        vec![pool(0, 1000, 0.0)],
    );
    let mut renderer = RecordingRenderer::default();

    // Worst case: every frame dirties the pool
    c.bench_function("group_update_and_flush_1000", |b| {
        let mut travel = 0.0f32;
        b.iter(|| {
            travel += SPAN / 1000.0;
            group.update(&CameraSnapshot::at_travel(travel, &AXIS));
            group.flush(black_box(&mut renderer));
        });
    });
}

fn bench_conveyor_update(c: &mut Criterion) {
    let config = WorldConfig::default();
    let road = road_asset("SM_Road", 24, &config);
    let mut conveyor = SegmentConveyor::new(
        &road,
        &door_asset("DOOR"),
        config.road.clone(),
        AXIS,
        ConveyorPools {
            road: PoolId(0),
            door: PoolId(1),
            light_plane: PoolId(2),
        },
    );
    let mut renderer = RecordingRenderer::default();

    c.bench_function("conveyor_update_48_segments", |b| {
        let mut travel = 0.0f32;
        b.iter(|| {
            travel += SPEED_PER_FRAME;
            conveyor.update(&CameraSnapshot::at_travel(travel, &AXIS), 1.0 / 60.0);
            conveyor.flush(black_box(&mut renderer));
        });
    });
}

criterion_group!(
    benches,
    bench_whole_pool_update,
    bench_per_instance_update,
    bench_group_flush,
    bench_conveyor_update,
);
criterion_main!(benches);
