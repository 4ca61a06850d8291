//! Performance benchmarks for OscCodec.
//!
//! Run benchmarks with:
//! ```sh
//! cargo bench --bench codec_bench
//! ```

use bytes::BytesMut;
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use escaperoom_core::ChallengeId;
use escaperoom_protocol::{Address, OscArg, OscCodec, OscMessage};
use std::hint::black_box;
use tokio_util::codec::{Decoder, Encoder};

/// Notification as sent on every terminal transition.
fn create_notification() -> OscMessage {
    OscMessage::notify(Address::Success(ChallengeId::new(4).unwrap()))
}

/// Message with one argument of each supported type.
fn create_mixed_message() -> OscMessage {
    OscMessage::new(
        "/escaperoom/challenge/1/debug",
        vec![
            OscArg::Int(6),
            OscArg::Float(0.2),
            OscArg::Str("breaker counter".to_string()),
        ],
    )
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");
    group.throughput(Throughput::Elements(1));

    for (name, msg) in [
        ("notification", create_notification()),
        ("mixed", create_mixed_message()),
    ] {
        group.bench_function(name, |b| {
            b.iter(|| {
                let mut codec = OscCodec::new();
                let mut buffer = BytesMut::new();
                codec.encode(black_box(msg.clone()), &mut buffer).unwrap();
                black_box(buffer);
            });
        });
    }

    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");
    group.throughput(Throughput::Elements(1));

    for (name, msg) in [
        ("notification", create_notification()),
        ("mixed", create_mixed_message()),
    ] {
        let encoded = OscCodec::new().encode_to_vec(msg).unwrap();
        group.bench_function(name, |b| {
            b.iter(|| {
                let mut codec = OscCodec::new();
                let mut buffer = BytesMut::from(black_box(&encoded[..]));
                black_box(codec.decode(&mut buffer).unwrap());
            });
        });
    }

    group.finish();
}

fn bench_route(c: &mut Criterion) {
    let addresses = [
        "/escaperoom/challenge/1/reset",
        "/escaperoom/vaultdoor/unlock",
        "/escaperoom/challenge/4/keypad/incorrect",
    ];

    c.bench_function("route_parse", |b| {
        b.iter(|| {
            for raw in addresses {
                black_box(raw.parse::<Address>().unwrap());
            }
        });
    });
}

criterion_group!(benches, bench_encode, bench_decode, bench_route);
criterion_main!(benches);
