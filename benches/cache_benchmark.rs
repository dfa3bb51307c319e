//! Benchmarks for the response cache.
//!
//! These benchmarks measure cache key derivation for requests of growing
//! size, and lookup/store throughput on a warm cache.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rest_client_pipeline::cache::{cache_key, CacheService};
use rest_client_pipeline::config::{RestClientConfig, SettingsHandle};
use rest_client_pipeline::models::{HttpMethod, RequestBody, RequestConfig, RequestResponse};
use serde_json::json;

/// Builds a request with `fields` params, headers and body fields.
fn request_with_fields(fields: usize) -> RequestConfig {
    let mut body = serde_json::Map::new();
    let mut config = RequestConfig::new(HttpMethod::POST, "https://api.example.com/resource");

    for i in 0..fields {
        config = config
            .with_param(format!("param{}", i), i as i64)
            .with_header(format!("X-Header-{}", i), format!("value-{}", i));
        body.insert(format!("field{}", i), json!({"nested": i, "tags": ["a", "b"]}));
    }

    config.with_body(RequestBody::Json(body.into()))
}

fn bench_cache_key(c: &mut Criterion) {
    let mut group = c.benchmark_group("cache_key");

    for size in [1, 10, 100].iter() {
        let config = request_with_fields(*size);
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}_fields", size)),
            size,
            |b, _| b.iter(|| cache_key(black_box(&config))),
        );
    }

    group.finish();
}

fn bench_get_set(c: &mut Criterion) {
    let settings = SettingsHandle::new(RestClientConfig {
        cache_responses: true,
        max_cache_size: 1000,
        ..Default::default()
    });
    let cache = CacheService::new(settings);
    let response = RequestResponse::new(200, "OK").with_data(json!({"items": [1, 2, 3]}));

    let requests: Vec<RequestConfig> = (0..1000)
        .map(|i| RequestConfig::new(HttpMethod::GET, format!("https://api.example.com/items/{}", i)))
        .collect();
    for request in &requests {
        cache.set(request, &response);
    }

    c.bench_function("cache_get_hit_1000_entries", |b| {
        let mut i = 0;
        b.iter(|| {
            i = (i + 1) % requests.len();
            cache.get(black_box(&requests[i]))
        })
    });

    c.bench_function("cache_set_at_capacity", |b| {
        let mut i = 0usize;
        b.iter(|| {
            i += 1;
            let config =
                RequestConfig::new(HttpMethod::GET, format!("https://api.example.com/new/{}", i));
            cache.set(black_box(&config), black_box(&response));
        })
    });
}

criterion_group!(benches, bench_cache_key, bench_get_set);
criterion_main!(benches);
