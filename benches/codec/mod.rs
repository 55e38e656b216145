use criterion::{Criterion, Throughput};
use heapless::Vec;
use mqttlite::codec::{decode, encode};
use std::hint::black_box;

const TOPIC: &str = "sensors/room1/temperature";

pub fn bench_encode_publish(c: &mut Criterion) {
    let payload = [0x5Au8; 256];
    let mut group = c.benchmark_group("encode_publish");
    group.throughput(Throughput::Bytes(payload.len() as u64));
    group.bench_function("encode_publish", |b| {
        b.iter(|| {
            let mut buf: Vec<u8, 512> = Vec::new();
            encode::publish(&mut buf, black_box(TOPIC), black_box(&payload)).unwrap();
            buf
        })
    });
    group.finish();
}

pub fn bench_decode_publish(c: &mut Criterion) {
    let payload = [0x5Au8; 256];
    let mut frame: Vec<u8, 512> = Vec::new();
    encode::publish(&mut frame, TOPIC, &payload).unwrap();

    let mut group = c.benchmark_group("decode_publish");
    group.throughput(Throughput::Bytes(frame.len() as u64));
    group.bench_function("decode_publish", |b| {
        b.iter(|| decode::publish(black_box(&frame)).unwrap())
    });
    group.finish();
}

pub fn bench_encode_connect(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_connect");
    group.bench_function("encode_connect", |b| {
        b.iter(|| {
            let mut buf: Vec<u8, 64> = Vec::new();
            encode::connect(&mut buf, black_box("mqttlite-bench"), 60, true).unwrap();
            buf
        })
    });
    group.finish();
}

pub fn bench_fixed_header(c: &mut Criterion) {
    // Four-byte remaining length exercises the whole varint loop.
    let header = [0x30u8, 0xFF, 0xFF, 0xFF, 0x7F];
    let mut group = c.benchmark_group("fixed_header");
    group.bench_function("fixed_header", |b| {
        b.iter(|| decode::fixed_header(black_box(&header)).unwrap())
    });
    group.finish();
}
