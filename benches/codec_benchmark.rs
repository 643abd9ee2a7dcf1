//! Benchmarks for bit-packing and PFor coding of 128-element blocks
#![allow(missing_docs)]
use bitpacking::{BitPacker, BitPacker4x};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pfor32::bitpack::{pack, unpack};
use pfor32::bitwidth::select_width;
use pfor32::pfor::{decode, encode, ExceptionBudget};
use pfor32::stream;
use rand::distributions::Distribution;
use rand_distr::Geometric;

const BLOCK: usize = 128;

fn random_block(n: usize) -> Vec<u32> {
    let data_dist = Geometric::new(0.01).unwrap();
    let mut rng = rand::thread_rng();
    (0..n).map(|_| data_dist.sample(&mut rng) as u32).collect()
}

/// select_width + pack / unpack of a ramp 0..128, as well as the `bitpacking` crate for reference
fn bitpack_encode_decode(c: &mut Criterion) {
    let block: Vec<u32> = (0..BLOCK as u32).collect();

    c.bench_function("bitpack: width + pack 128", |b| {
        b.iter(|| {
            let width = select_width(black_box(&block));
            pack(black_box(&block), width).unwrap()
        })
    });

    let width = select_width(&block);
    let packed = pack(&block, width).unwrap();
    c.bench_function("bitpack: unpack 128", |b| {
        b.iter(|| unpack(black_box(&packed), width, BLOCK).unwrap())
    });

    let bitpacker = BitPacker4x::new();
    let mut compressed = vec![0_u8; 4 * BLOCK];
    c.bench_function("bitpacking crate: BitPacker4x compress 128", |b| {
        b.iter(|| {
            let num_bits = bitpacker.num_bits(black_box(&block));
            bitpacker.compress(&block, &mut compressed, num_bits)
        })
    });
}

/// PFor encode / decode of single blocks and of a 1M element stream
fn pfor_encode_decode(c: &mut Criterion) {
    let block = random_block(BLOCK);
    let budget = ExceptionBudget::default();

    c.bench_function("pfor: encode 128", |b| {
        b.iter(|| encode(black_box(&block), budget).unwrap())
    });

    let encoded = encode(&block, budget).unwrap();
    c.bench_function("pfor: decode 128", |b| {
        b.iter(|| decode(black_box(&encoded), BLOCK).unwrap())
    });

    let n = 1_000_000;
    let data = random_block(n);
    c.bench_function(&format!("stream: encoding {} elements", n), |b| {
        b.iter(|| stream::encode(black_box(data.iter().cloned()), 512, budget).unwrap())
    });

    let (enc, _) = stream::encode(data.iter().cloned(), 512, budget).unwrap();
    c.bench_function(&format!("stream: decoding {} elements", n), |b| {
        b.iter(|| stream::decode(black_box(&enc), n, 512).unwrap())
    });
}

criterion_group!(benches, bitpack_encode_decode, pfor_encode_decode);
criterion_main!(benches);
