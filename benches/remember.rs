use cache_facade::{CacheExt, CacheStore, Context, InMemoryCache};
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use serde::Serialize;
use std::time::Duration;

#[derive(Serialize)]
struct Profile {
    id: u64,
    name: String,
    tags: Vec<String>,
}

fn profile() -> Profile {
    Profile {
        id: 42,
        name: "Alice".to_string(),
        tags: vec!["admin".to_string(), "beta".to_string()],
    }
}

const TTL: Duration = Duration::from_secs(3600);

async fn remember(cache: &InMemoryCache, ctx: &Context, key: &str) -> String {
    let producer = || async { Ok::<_, anyhow::Error>(profile()) };
    cache.remember(ctx, key, TTL, Some(producer)).await.unwrap()
}

fn benchmark_remember(c: &mut Criterion) {
    let mut group = c.benchmark_group("remember");

    let rt = tokio::runtime::Runtime::new().unwrap();
    let ctx = Context::background();

    let hit_cache = InMemoryCache::new();
    rt.block_on(remember(&hit_cache, &ctx, "profile:42"));

    group.bench_function("hit", |b| {
        b.iter(|| {
            rt.block_on(remember(black_box(&hit_cache), &ctx, "profile:42"));
        });
    });

    let miss_cache = InMemoryCache::new();

    group.bench_function("miss", |b| {
        b.iter(|| {
            rt.block_on(async {
                remember(black_box(&miss_cache), &ctx, "profile:42").await;
                miss_cache.forget(&ctx, "profile:42").await.unwrap();
            });
        });
    });

    group.finish();
}

fn benchmark_plain_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("get");

    let rt = tokio::runtime::Runtime::new().unwrap();
    let ctx = Context::background();
    let cache = InMemoryCache::new();
    rt.block_on(cache.put(&ctx, "greeting", "hello", TTL)).unwrap();

    group.bench_function("in_memory", |b| {
        b.iter(|| {
            rt.block_on(cache.get(&ctx, black_box("greeting"))).unwrap();
        });
    });

    group.finish();
}

criterion_group!(benches, benchmark_remember, benchmark_plain_get);
criterion_main!(benches);
