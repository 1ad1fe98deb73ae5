use std::hint::black_box;

use bytes::Bytes;
use criterion::{criterion_group, criterion_main, Criterion};
use http_disguise::codec::{Disguise, DisguiseCodec, DisguiseVariant};

static DISGUISED_REQUEST: &[u8] = b"GET /%30%31%32%33%34%35%36%37%38%39%61%62%63%64%65%66 HTTP/1.1\r\n\
    Host: example.com\r\nUser-Agent: curl/7.79.1\r\nAccept: */*\r\n\r\n";

static UPGRADE_REQUEST: &[u8] = b"GET / HTTP/1.1\r\nHost: example.com\r\nConnection: Upgrade, HTTP2-Settings\r\n\
    Upgrade: h2c\r\nHTTP2-Settings: c2V0dGluZ3MgcGF5bG9hZA==\r\n\r\n";

fn bench_server_decode(c: &mut Criterion) {
    c.bench_function("decode_disguised_request", |b| {
        b.iter(|| {
            let mut codec = DisguiseCodec::new(DisguiseVariant::Http);
            black_box(codec.server_decode(Bytes::from_static(DISGUISED_REQUEST)));
        });
    });

    c.bench_function("decode_upgrade_request", |b| {
        b.iter(|| {
            let mut codec = DisguiseCodec::new(DisguiseVariant::Http2Upgrade);
            black_box(codec.server_decode(Bytes::from_static(UPGRADE_REQUEST)));
        });
    });
}

fn bench_server_encode(c: &mut Criterion) {
    c.bench_function("encode_first_chunk", |b| {
        b.iter(|| {
            let mut codec = DisguiseCodec::new(DisguiseVariant::Http);
            black_box(codec.server_encode(Bytes::from_static(b"0123456789abcdef")));
        });
    });
}

criterion_group!(benches, bench_server_decode, bench_server_encode);
criterion_main!(benches);
