use criterion::{criterion_group, criterion_main};

mod codec;

criterion_group!(
    benches,
    codec::bench_encode_publish,
    codec::bench_decode_publish,
    codec::bench_encode_connect,
    codec::bench_fixed_header
);
criterion_main!(benches);
