//! Benchmarks for a full frame over a flat tree of labels.

use std::hint::black_box;
use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use trellis_core::time::TimePoint;
use trellis_core::trigger::Trigger;
use trellis_layout::Alignment;
use trellis_widgets::{
    DefaultTheme, DrawBuffers, LabelWidget, MonospaceText, Observable, WidgetTree, WindowWidget,
};

fn tree_with_labels(count: usize) -> (WidgetTree, Vec<Observable<MonospaceText>>) {
    let mut tree = WidgetTree::new(Arc::new(DefaultTheme::default()), Arc::new(Trigger::new()));
    let root = tree.set_root(WindowWidget::new("bench")).unwrap();
    let texts: Vec<_> = (0..count)
        .map(|i| Observable::new(MonospaceText::new(format!("label {i}"))))
        .collect();
    for text in &texts {
        tree.add_widget(root, LabelWidget::observing(text.clone()), Alignment::TOP_LEFT)
            .unwrap();
    }
    let (w, h) = {
        let bm = &tree.core(root).unwrap().box_model;
        (bm.width, bm.height)
    };
    tree.solver_mut().suggest(w, 800.0).unwrap();
    tree.solver_mut().suggest(h, 600.0).unwrap();
    tree.layout_pass(TimePoint::MIN, true);
    tree.snapshot_geometry();
    (tree, texts)
}

fn bench_idle_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame/idle");
    for count in [10, 100] {
        let (mut tree, _texts) = tree_with_labels(count);
        let mut buffers = DrawBuffers::new();
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
            b.iter(|| {
                let needs = tree.layout_pass(TimePoint::MIN, false);
                tree.snapshot_geometry();
                buffers.clear();
                tree.draw(&mut buffers, TimePoint::MIN);
                black_box(needs);
            });
        });
    }
    group.finish();
}

fn bench_text_change(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame/one_label_changed");
    for count in [10, 100] {
        let (mut tree, texts) = tree_with_labels(count);
        let mut flip = false;
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
            b.iter(|| {
                flip = !flip;
                texts[0].set(MonospaceText::new(if flip { "short" } else { "a much longer text" }));
                black_box(tree.layout_pass(TimePoint::MIN, false));
                tree.snapshot_geometry();
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_idle_frame, bench_text_change);
criterion_main!(benches);
