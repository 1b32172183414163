//! Dispatch benchmarks.
//!
//! Run with: `cargo bench -p fastroute-router`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use fastroute_core::RequestContext;
use fastroute_router::{RouteRegistrar, Router};
use http::{Method, StatusCode};

fn ok(ctx: &mut RequestContext) {
    ctx.set_status(StatusCode::OK);
}

fn build_router(num_routes: usize) -> Router {
    let mut builder = Router::builder();

    for i in 0..num_routes / 3 {
        builder.get(&format!("/api/v1/resource{i}"), ok).unwrap();
    }

    for i in 0..num_routes / 3 {
        builder.get(&format!("/api/v1/items{i}/:id"), ok).unwrap();
    }

    for i in 0..num_routes / 3 {
        builder
            .get(&format!("/api/v1/org{i}/:org_id/resource/:id"), ok)
            .unwrap();
    }

    builder.mount("/static/", ok).unwrap();
    builder.build().unwrap()
}

fn dispatch(router: &Router, method: Method, path: &str) -> StatusCode {
    let mut ctx = RequestContext::new(method, path);
    router.dispatch(&mut ctx);
    ctx.response().status()
}

fn bench_static_match(c: &mut Criterion) {
    let router = build_router(100);

    c.bench_function("static_match", |b| {
        b.iter(|| black_box(dispatch(&router, Method::GET, "/api/v1/resource20")));
    });
}

fn bench_param_match(c: &mut Criterion) {
    let router = build_router(100);

    c.bench_function("param_match", |b| {
        b.iter(|| black_box(dispatch(&router, Method::GET, "/api/v1/items25/12345")));
    });
}

fn bench_nested_param_match(c: &mut Criterion) {
    let router = build_router(100);

    c.bench_function("nested_param_match", |b| {
        b.iter(|| {
            black_box(dispatch(
                &router,
                Method::GET,
                "/api/v1/org10/acme-corp/resource/12345",
            ))
        });
    });
}

fn bench_catch_all(c: &mut Criterion) {
    let router = build_router(100);

    c.bench_function("catch_all", |b| {
        b.iter(|| black_box(dispatch(&router, Method::GET, "/static/css/site.css")));
    });
}

fn bench_miss(c: &mut Criterion) {
    let router = build_router(100);

    c.bench_function("miss", |b| {
        b.iter(|| black_box(dispatch(&router, Method::GET, "/nonexistent/path")));
    });
}

fn bench_method_not_allowed(c: &mut Criterion) {
    let router = build_router(100);

    c.bench_function("method_not_allowed", |b| {
        b.iter(|| black_box(dispatch(&router, Method::DELETE, "/api/v1/resource20")));
    });
}

fn bench_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("scaling");

    for num_routes in [10, 50, 100, 500, 1000] {
        let router = build_router(num_routes);

        group.bench_with_input(
            BenchmarkId::new("static_match", num_routes),
            &num_routes,
            |b, &n| {
                let path = format!("/api/v1/resource{}", n / 6);
                b.iter(|| black_box(dispatch(&router, Method::GET, &path)));
            },
        );

        group.bench_with_input(
            BenchmarkId::new("param_match", num_routes),
            &num_routes,
            |b, &n| {
                let path = format!("/api/v1/items{}/12345", n / 6);
                b.iter(|| black_box(dispatch(&router, Method::GET, &path)));
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_static_match,
    bench_param_match,
    bench_nested_param_match,
    bench_catch_all,
    bench_miss,
    bench_method_not_allowed,
    bench_scaling
);
criterion_main!(benches);
