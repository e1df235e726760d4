//! Benchmarks for CellStore marshalling and write paths

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tempfile::TempDir;

use cellstore::buffer::BufferSet;
use cellstore::cell::CellBuilder;
use cellstore::{
    ArraySchema, Attribute, Compression, Config, Dimension, FieldType, RecordBuilder,
    StorageManager, ValueCount,
};

fn bench_schema() -> ArraySchema {
    ArraySchema::new(
        "bench",
        vec![
            Attribute::new("count", FieldType::Int32, ValueCount::Fixed(1), Compression::None),
            Attribute::new("tags", FieldType::Char, ValueCount::Variable, Compression::None),
        ],
        vec![
            Dimension::new("row", (0, i64::MAX - 1)),
            Dimension::new("col", (0, i64::MAX - 1)),
        ],
    )
}

fn marshal_benchmarks(c: &mut Criterion) {
    let schema = bench_schema();
    let record = RecordBuilder::new()
        .fixed_i32(42)
        .variable(&[0xABu8; 64])
        .finish(&[17, 23]);

    let mut buffers = BufferSet::build_full(&schema, 4096).unwrap();
    c.bench_function("stage_one_cell", |b| {
        b.iter(|| CellBuilder::stage(&schema, black_box(&record), &mut buffers).unwrap())
    });

    c.bench_function("stage_and_resolve", |b| {
        b.iter(|| {
            CellBuilder::stage(&schema, black_box(&record), &mut buffers).unwrap();
            black_box(buffers.resolved_slots(&record).unwrap())
        })
    });

    let temp = TempDir::new().unwrap();
    let config = Config::builder()
        .workspace(temp.path().join("workspace"))
        .buffer_size(4096)
        .build();
    let mut manager = StorageManager::with_file_engine(config).unwrap();
    manager.define_array(&schema).unwrap();
    let wd = manager.open("bench", "w").unwrap().unwrap();
    c.bench_function("write_one_cell", |b| {
        b.iter(|| manager.write_cell_sorted(wd, black_box(&record)).unwrap())
    });
}

criterion_group!(benches, marshal_benchmarks);
criterion_main!(benches);
