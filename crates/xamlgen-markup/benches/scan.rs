use criterion::{Criterion, criterion_group, criterion_main};
use xamlgen_markup::{ElementMatch, HandlerTable, scan_markup};

fn generate_xaml(size: usize) -> String {
    let block = "    <Grid x:Name=\"Row\">\n        <!-- details -->\n        <Grid>\n            <TextBlock Text=\"{x:Bind Name}\" />\n            <TextBox Header=\"Notes &lt;optional&gt;\" />\n        </Grid>\n        <StackPanel Orientation=\"Horizontal\" />\n    </Grid>\n";
    format!("<Page>\n{}</Page>\n", block.repeat(size))
}

fn bench_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan");
    group.sample_size(10);

    let text = generate_xaml(1_000);
    let table = HandlerTable::new()
        .with("Grid", |m: &ElementMatch<'_>| m.span.len())
        .with("StackPanel", |m: &ElementMatch<'_>| m.span.len());

    group.bench_function("nested_grids", |b| {
        b.iter(|| {
            let records = scan_markup(std::hint::black_box(&text), &table);
            std::hint::black_box(records);
        });
    });

    let untracked: HandlerTable<usize> = HandlerTable::new();
    group.bench_function("no_handlers", |b| {
        b.iter(|| std::hint::black_box(scan_markup(std::hint::black_box(&text), &untracked)));
    });

    group.finish();
}

criterion_group!(benches, bench_scan);
criterion_main!(benches);
