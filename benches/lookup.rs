use criterion::{black_box, criterion_group, criterion_main, Criterion};
use hasten_core::{decode, encode, MatcherKind, RouteSpec, RouteTable};
use http::Method;

fn example_routes() -> Vec<RouteSpec> {
    let mut specs = vec![
        RouteSpec::new(Method::GET, "/", "root"),
        RouteSpec::new(Method::GET, "/health", "health"),
        RouteSpec::new(Method::GET, "/zoo/animals", "get_animals"),
        RouteSpec::new(Method::POST, "/zoo/animals", "create_animal"),
        RouteSpec::new(Method::GET, "/zoo/animals/{id}", "get_animal"),
        RouteSpec::new(Method::PUT, "/zoo/animals/{id}", "update_animal"),
        RouteSpec::new(Method::DELETE, "/zoo/animals/{id}", "delete_animal"),
        RouteSpec::new(Method::GET, "/zoo/animals/{id}/toys/{toy_id}", "animal_toy"),
        RouteSpec::new(
            Method::GET,
            "/zoo/{category}/animals/{id}/habitats/{habitat_id}",
            "habitat",
        ),
        RouteSpec::new(Method::GET, "/static/{rest:path}", "static_files"),
    ];
    // Pad with literal routes so the scan engine has something to skip.
    for i in 0..50 {
        specs.push(RouteSpec::new(
            Method::GET,
            format!("/api/v1/resource{i}"),
            format!("resource{i}"),
        ));
    }
    specs
}

const PROBES: &[(Method, &str)] = &[
    (Method::GET, "/zoo/animals/123"),
    (Method::GET, "/zoo/animals/123/toys/456"),
    (Method::GET, "/zoo/cats/animals/123/habitats/88"),
    (Method::GET, "/api/v1/resource49"),
    (Method::GET, "/static/js/vendor/app.min.js"),
    (Method::GET, "/no/such/route"),
];

fn bench_lookup(c: &mut Criterion) {
    let specs = example_routes();
    for (name, kind) in [("trie", MatcherKind::Trie), ("scan", MatcherKind::Scan)] {
        let table = RouteTable::compile_with(&specs, kind).expect("route compile failed");
        c.bench_function(&format!("lookup_{name}"), |b| {
            b.iter(|| {
                for (method, path) in PROBES {
                    let res = table.lookup(method, path);
                    black_box(&res);
                }
            })
        });
    }
}

fn bench_codec(c: &mut Criterion) {
    let doc = br#"{"id":12345,"name":"capuchin","tags":["primate","small","agile"],
        "weights":[3.9,4.1,3.75],"keeper":{"id":9007199254740993,"name":"~jo"},
        "active":true,"notes":null}"#;
    let value = decode(doc).expect("bench document must parse");

    c.bench_function("decode_document", |b| {
        b.iter(|| black_box(decode(black_box(doc)).expect("decode failed")))
    });
    c.bench_function("encode_document", |b| {
        b.iter(|| black_box(encode(black_box(&value)).expect("encode failed")))
    });
}

criterion_group!(benches, bench_lookup, bench_codec);
criterion_main!(benches);
