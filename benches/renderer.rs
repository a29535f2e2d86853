use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use diagram_rs_renderer::config::LayoutConfig;
use diagram_rs_renderer::ir::{
    BrainwritingRecord, BrainwritingRow, DiagramRecord, FishboneCategory, FishboneRecord,
    ParetoItem, ParetoRecord, RadarAxis, RadarRecord, RadialNode, RadialRecord, SwotRecord,
    TimelineEvent, TimelineRecord,
};
use diagram_rs_renderer::layout::compute_layout;
use diagram_rs_renderer::parser::parse_record;
use diagram_rs_renderer::render::render_svg;
use diagram_rs_renderer::theme::Theme;
use std::hint::black_box;

fn fixture(name: &str) -> &'static str {
    match name {
        "fishbone" => include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/fishbone.json")),
        "pareto" => include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/pareto.json")),
        "action_plan" => include_str!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/tests/fixtures/action_plan.json"
        )),
        "brainwriting" => include_str!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/tests/fixtures/brainwriting.json"
        )),
        "mind_map" => include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/mind_map.json")),
        "swot" => include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/swot.json")),
        "radar" => include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/radar.json")),
        "timeline" => include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/timeline.json")),
        _ => panic!("unknown fixture"),
    }
}

const FIXTURES: [&str; 8] = [
    "fishbone",
    "pareto",
    "action_plan",
    "brainwriting",
    "mind_map",
    "swot",
    "radar",
    "timeline",
];

fn items(n: usize, prefix: &str) -> Vec<String> {
    (0..n).map(|i| format!("{prefix} {i} with a few extra words")).collect()
}

/// Synthetic records with `n` entries in their primary collection.
fn scaled_records(n: usize) -> Vec<(&'static str, DiagramRecord)> {
    vec![
        (
            "fishbone",
            DiagramRecord::Fishbone(FishboneRecord {
                problem: "Scrap rate".into(),
                categories: (0..6)
                    .map(|c| FishboneCategory {
                        name: format!("Category {c}"),
                        items: items(n, "cause"),
                    })
                    .collect(),
            }),
        ),
        (
            "pareto",
            DiagramRecord::Pareto(ParetoRecord {
                title: "Defects".into(),
                items: (0..n)
                    .map(|i| ParetoItem {
                        name: format!("Defect {i}"),
                        value: (n - i) as f64 * 3.0,
                    })
                    .collect(),
            }),
        ),
        (
            "mind_map",
            DiagramRecord::MindMap(RadialRecord {
                central_topic: "Strategy".into(),
                nodes: (0..n.min(12))
                    .map(|i| RadialNode {
                        title: format!("Branch {i}"),
                        items: items(n / 2, "leaf"),
                    })
                    .collect(),
            }),
        ),
        (
            "brainwriting",
            DiagramRecord::Brainwriting(BrainwritingRecord {
                topic: "Ideas".into(),
                columns: vec!["Idea 1".into(), "Idea 2".into(), "Idea 3".into()],
                rows: (0..n)
                    .map(|i| BrainwritingRow {
                        participant: format!("P{i}"),
                        ideas: items(3, "idea"),
                    })
                    .collect(),
            }),
        ),
        (
            "swot",
            DiagramRecord::Swot(SwotRecord {
                topic: "Market".into(),
                strengths: items(n, "strength"),
                weaknesses: items(n, "weakness"),
                opportunities: items(n, "opportunity"),
                threats: items(n, "threat"),
            }),
        ),
        (
            "radar",
            DiagramRecord::Radar(RadarRecord {
                title: "Skills".into(),
                axes: (0..n.max(3))
                    .map(|i| RadarAxis {
                        label: format!("Axis {i}"),
                        value: (i * 7 % 100) as f64,
                    })
                    .collect(),
            }),
        ),
        (
            "timeline",
            DiagramRecord::Timeline(TimelineRecord {
                title: "Roadmap".into(),
                events: (0..n)
                    .map(|i| TimelineEvent {
                        date: format!("W{i}"),
                        title: format!("Milestone {i}"),
                        description: Some("Details".into()),
                    })
                    .collect(),
            }),
        ),
    ]
}

fn fast_config() -> LayoutConfig {
    LayoutConfig {
        fast_text_metrics: true,
        ..LayoutConfig::default()
    }
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    for name in FIXTURES {
        let input = fixture(name);
        group.bench_with_input(BenchmarkId::from_parameter(name), input, |b, data| {
            b.iter(|| {
                let record = parse_record(black_box(data)).expect("parse failed");
                black_box(record.kind());
            });
        });
    }
    group.finish();
}

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout");
    let theme = Theme::light();
    let config = fast_config();
    for name in FIXTURES {
        let record = parse_record(fixture(name)).expect("parse failed");
        group.bench_with_input(BenchmarkId::from_parameter(name), &record, |b, record| {
            b.iter(|| {
                let layout = compute_layout(black_box(record), &theme, &config);
                black_box(layout.scene.elements.len());
            });
        });
    }
    group.finish();
}

fn bench_layout_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout_scaling");
    let theme = Theme::light();
    let config = fast_config();
    for n in [5usize, 20, 80] {
        for (name, record) in scaled_records(n) {
            group.bench_with_input(BenchmarkId::new(name, n), &record, |b, record| {
                b.iter(|| {
                    let layout = compute_layout(black_box(record), &theme, &config);
                    black_box(layout.width);
                });
            });
        }
    }
    group.finish();
}

fn bench_text_metrics(c: &mut Criterion) {
    let mut group = c.benchmark_group("text_metrics");
    let theme = Theme::light();
    let record = parse_record(fixture("fishbone")).expect("parse failed");
    for (label, fast) in [("font", false), ("table", true)] {
        let config = LayoutConfig {
            fast_text_metrics: fast,
            ..LayoutConfig::default()
        };
        group.bench_function(label, |b| {
            b.iter(|| {
                let layout = compute_layout(black_box(&record), &theme, &config);
                black_box(layout.height);
            });
        });
    }
    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_svg");
    let theme = Theme::dark();
    let config = fast_config();
    for name in FIXTURES {
        let record = parse_record(fixture(name)).expect("parse failed");
        let layout = compute_layout(&record, &theme, &config);
        group.bench_with_input(BenchmarkId::from_parameter(name), &layout, |b, layout| {
            b.iter(|| {
                let svg = render_svg(black_box(layout), &theme);
                black_box(svg.len());
            });
        });
    }
    group.finish();
}

fn bench_end_to_end(c: &mut Criterion) {
    let mut group = c.benchmark_group("end_to_end");
    let theme = Theme::light();
    let config = fast_config();
    for name in FIXTURES {
        let input = fixture(name);
        group.bench_with_input(BenchmarkId::from_parameter(name), input, |b, data| {
            b.iter(|| {
                let record = parse_record(black_box(data)).expect("parse failed");
                let layout = compute_layout(&record, &theme, &config);
                let svg = render_svg(&layout, &theme);
                black_box(svg.len());
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_parse,
    bench_layout,
    bench_layout_scaling,
    bench_text_metrics,
    bench_render,
    bench_end_to_end
);
criterion_main!(benches);
