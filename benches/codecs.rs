use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use rand::Rng;

use linecode::{Crc16, ErrorCorrectingCode, Hamming};

const PAYLOAD_LEN: usize = 1024;

fn payload() -> Vec<u8> {
    let mut rng = rand::thread_rng();
    (0..PAYLOAD_LEN).map(|_| rng.gen()).collect()
}

fn bench_codec(c: &mut Criterion, name: &str, code: &dyn ErrorCorrectingCode) {
    let data = payload();
    let mut encoded = data.clone();
    code.encode(&mut encoded).unwrap();

    let mut group = c.benchmark_group(name);
    group.throughput(Throughput::Bytes(PAYLOAD_LEN as u64));
    group.bench_function("encode", |b| {
        b.iter(|| {
            let mut buffer = data.clone();
            code.encode(&mut buffer).unwrap();
            black_box(buffer)
        });
    });
    group.bench_function("verify", |b| {
        b.iter(|| {
            let mut buffer = encoded.clone();
            black_box(code.verify(&mut buffer).unwrap())
        });
    });
    // introduce an error to exercise the correcting path
    encoded[PAYLOAD_LEN / 2] ^= 0x01;
    group.bench_function("verify_1err", |b| {
        b.iter(|| {
            let mut buffer = encoded.clone();
            black_box(code.verify(&mut buffer).unwrap())
        });
    });
    group.finish();
}

fn bench_crc16(c: &mut Criterion) {
    bench_codec(c, "crc16", &Crc16);
}

fn bench_hamming(c: &mut Criterion) {
    bench_codec(c, "hamming_7_4", &Hamming::h7_4());
    bench_codec(c, "hamming_15_11", &Hamming::h15_11());
    bench_codec(c, "hamming_255_247", &Hamming::new(255).unwrap());
}

criterion_group!(benches, bench_crc16, bench_hamming);
criterion_main!(benches);
