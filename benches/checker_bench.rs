//! Expression checking and completion benchmarks.
//!
//! Measures parsing, template diagnostics and completions over the heroes
//! host program.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use serde_json::json;
use tmpl::host::{HostModel, TemplateOutline};
use tmpl::parser::{parse_binding, parse_template_bindings};
use tmpl::{Project, ProjectFile};

const HEROES: &str = include_str!("../crates/tmpl-host/tests/fixtures/heroes.json");

const EXPRESSIONS: &[(&str, &str)] = &[
    ("member", "selected?.name"),
    ("arithmetic", "count * 2 + heroes.length - 1"),
    ("pipe", "heroes$ | async | slice:0:count"),
    ("call", "select(heroes[count % 2]); reset()"),
    ("conditional", "selected ? selected.name : title.toUpperCase()"),
];

/// `copies` hero lists, each an `ngFor` over `heroes` with bound text.
fn hero_list_project(copies: usize) -> Project {
    let item = r#"<li *ngFor="let hero of heroes; let i = index">{{i}}: {{hero.name | uppercase}} {{hero.nickname}}</li>"#;
    let source = item.repeat(copies);
    let nodes: Vec<serde_json::Value> = (0..copies)
        .map(|_| {
            json!({
                "kind": "element",
                "name": "li",
                "attrs": [{"name": "*ngFor", "value": "let hero of heroes; let i = index"}],
                "templateDirectives": [{
                    "type": {"name": "NgForOf"},
                    "inputs": [{"field": "ngForOf", "binding": "ngForOf"}]
                }],
                "children": [{"kind": "text", "text": "{{i}}: {{hero.name | uppercase}} {{hero.nickname}}"}]
            })
        })
        .collect();
    let outline: TemplateOutline = serde_json::from_value(json!({
        "fileName": "app.component.html",
        "component": "AppComponent",
        "source": source,
        "nodes": nodes,
    }))
    .expect("outline");
    Project::from_file(ProjectFile {
        host: HostModel::from_json(HEROES).expect("heroes"),
        templates: vec![outline],
        ..ProjectFile::default()
    })
    .expect("project")
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    for (name, text) in EXPRESSIONS {
        group.bench_with_input(BenchmarkId::new("binding", name), text, |b, text| {
            b.iter(|| black_box(parse_binding(text, "[bench]", 0).arena.len()))
        });
    }
    group.bench_function("microsyntax", |b| {
        b.iter(|| {
            let parsed = parse_template_bindings(
                "ngFor",
                "let hero of heroes; let i = index; trackBy: byId",
                "*ngFor",
                0,
            );
            black_box(parsed.bindings.len())
        })
    });
    group.finish();
}

fn bench_diagnostics(c: &mut Criterion) {
    let mut group = c.benchmark_group("diagnostics");
    for copies in [1, 10, 100] {
        let project = hero_list_project(copies);
        group.bench_with_input(BenchmarkId::new("hero_list", copies), &project, |b, project| {
            b.iter(|| {
                let reports = project.check_all();
                black_box(reports.iter().map(|r| r.diagnostics.len()).sum::<usize>())
            })
        });
    }
    group.finish();
}

fn bench_completions(c: &mut Criterion) {
    let project = hero_list_project(10);
    let document = &project.documents()[0];
    let member = document.source.find("name |").expect("member") as u32 + 2;
    let scope = document.source.find("{{i}}").expect("scope") as u32 + 2;

    let mut group = c.benchmark_group("completions");
    group.bench_function("member", |b| {
        b.iter(|| black_box(project.service().completions_at(document, member)))
    });
    group.bench_function("scope", |b| {
        b.iter(|| black_box(project.service().completions_at(document, scope)))
    });
    group.finish();
}

criterion_group!(benches, bench_parse, bench_diagnostics, bench_completions);
criterion_main!(benches);
