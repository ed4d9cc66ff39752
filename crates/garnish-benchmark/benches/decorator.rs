use std::hint::black_box;

use codspeed_criterion_compat::{Criterion, Throughput, criterion_group, criterion_main};
use garnish_decorator::{Decorator, Restorer};
use garnish_inputs::File;
use garnish_syntax::Registry;

fn source() -> String {
    let mut text = String::from("package main\n\nimport \"fmt\"\n");
    for i in 0..64 {
        text.push_str(&format!(
            "
// f{i} prints its argument.
func f{i}(n int) {{
	/* before */ fmt.Println(n) // after

	for i := range n {{
		_ = i
	}}
}}
"
        ));
    }
    text
}

fn benchmark_decorator(c: &mut Criterion) {
    let file = File::new("bench.go", source());
    let tree = garnish_parse::parse(file.text()).tree;
    let registry = Registry::standard();
    let decorated = Decorator::new(&registry, &file).decorate(&tree).unwrap();

    let mut group = c.benchmark_group("Decorator Benchmark");
    group.throughput(Throughput::Bytes(file.text().len() as u64));

    group.bench_function("decorate", |b| {
        b.iter(|| black_box(Decorator::new(&registry, &file).decorate(&tree).unwrap()));
    });
    group.bench_function("restore", |b| {
        b.iter(|| black_box(Restorer::new(&registry).restore(&decorated).unwrap()));
    });
    group.bench_function("roundtrip", |b| {
        b.iter(|| {
            let tree = garnish_parse::parse(file.text()).tree;
            let decorated = Decorator::new(&registry, &file).decorate(&tree).unwrap();
            black_box(Restorer::new(&registry).print(&decorated).unwrap())
        });
    });

    group.finish();
}

criterion_group!(benches, benchmark_decorator);
criterion_main!(benches);
