//! Benchmarks for the CPU-bound pipeline stages: signing, envelope
//! decryption and source normalization.
//!
//! Run with: `cargo bench --bench pipeline_bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use cinemaos::envelope;
use cinemaos::signer;
use cinemaos::stream::{normalize, quality_from_label};

/// Generate a decrypted payload with `servers` sources, every other one
/// carrying a four-entry `qualities` object.
fn generate_payload(servers: usize) -> String {
    let mut sources = serde_json::Map::new();
    for i in 0..servers {
        let source = if i % 2 == 0 {
            serde_json::json!({
                "server": format!("Server {i}"),
                "speed": "fast",
                "bitrate": "FHD",
                "qualities": {
                    "2160p": { "url": format!("https://cdn.example/{i}/2160.m3u8"), "type": "hls" },
                    "1080p": { "url": format!("https://cdn.example/{i}/1080.m3u8"), "type": "hls" },
                    "720p": { "url": format!("https://cdn.example/{i}/720.mp4"), "type": "mp4" },
                    "480p": { "url": format!("https://cdn.example/{i}/480.mp4"), "type": "mp4" }
                }
            })
        } else {
            serde_json::json!({
                "server": format!("Server {i}"),
                "url": format!("https://cdn.example/{i}/index.mpd"),
                "type": "dash",
                "quality": "HD"
            })
        };
        sources.insert(format!("s{i}"), source);
    }
    serde_json::json!({ "sources": sources }).to_string()
}

fn bench_signer(c: &mut Criterion) {
    let mut group = c.benchmark_group("signer");

    group.bench_function("movie", |b| {
        b.iter(|| signer::sign(black_box(Some("603")), black_box(Some("tt0133093")), None, None));
    });

    group.bench_function("episode", |b| {
        b.iter(|| {
            signer::sign(
                black_box(Some("1396")),
                black_box(Some("tt0903747")),
                black_box(Some("5")),
                black_box(Some("14")),
            )
        });
    });

    group.finish();
}

fn bench_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize");

    for servers in [4, 32, 256] {
        let payload = generate_payload(servers);
        group.throughput(Throughput::Bytes(payload.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(servers), &payload, |b, p| {
            b.iter(|| black_box(normalize(black_box(p))));
        });
    }

    group.bench_function("quality_from_label", |b| {
        b.iter(|| black_box(quality_from_label(black_box("Auto 720p HD"))));
    });

    group.finish();
}

fn bench_decrypt(c: &mut Criterion) {
    let mut group = c.benchmark_group("envelope");
    // Dominated by the 100k PBKDF2 rounds.
    group.sample_size(10);

    let sealed = envelope::seal(&generate_payload(32), &[7u8; 16], &[9u8; 16])
        .expect("seal benchmark payload");

    group.bench_function("decrypt_32_servers", |b| {
        b.iter(|| black_box(envelope::decrypt(black_box(&sealed)).unwrap()));
    });

    group.finish();
}

criterion_group!(benches, bench_signer, bench_normalize, bench_decrypt);

criterion_main!(benches);
