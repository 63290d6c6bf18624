use std::hint::black_box;

use arbor::{
    Manager, NodeId,
    config::Config,
    event::InputState,
    geom::Vec2,
    testing::{StaticTextures, test_host},
    widgets::ContentFit,
};
use criterion::{Criterion, criterion_group, criterion_main};

/// `roots` trees, each `width` children wide and `depth` levels deep.
fn build(roots: usize, width: usize, depth: usize) -> (Manager, Vec<NodeId>) {
    let config = Config::default();
    let host = test_host(StaticTextures::default(), Vec2::new(1920.0, 1080.0));
    let mut man = Manager::new(host, config).expect("manager");
    let mut tops = Vec::new();
    for _ in 0..roots {
        let root = man.add_panel(None);
        if let Ok(mut p) = man.panel_mut(root) {
            p.set_fit(ContentFit::None);
        }
        if let Ok(mut l) = man.layout_mut(root) {
            l.scale(1920.0, 1080.0);
        }
        let mut level = vec![root];
        for d in 0..depth {
            let mut next = Vec::new();
            for parent in &level {
                for i in 0..width {
                    let p = man.add_panel(Some(*parent));
                    man.add_label(Some(p), &format!("{d}:{i}"));
                    next.push(p);
                }
            }
            level = next;
        }
        tops.push(root);
    }
    (man, tops)
}

fn frame_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame");

    group.bench_function("idle_frame", |b| {
        let (mut man, _) = build(4, 4, 3);
        man.update(InputState::default(), 0.016);
        b.iter(|| {
            man.update(black_box(InputState::default()), 0.016);
        });
    });

    group.bench_function("relayout_all_roots", |b| {
        let (mut man, roots) = build(4, 4, 3);
        man.update(InputState::default(), 0.016);
        let mut w = 1000.0;
        b.iter(|| {
            w = if w > 1500.0 { 1000.0 } else { w + 1.0 };
            for r in &roots {
                if let Ok(mut l) = man.layout_mut(*r) {
                    l.scale(w, 1080.0);
                }
            }
            man.update(black_box(InputState::default()), 0.016);
        });
    });

    group.bench_function("pointer_sweep", |b| {
        let (mut man, _) = build(2, 6, 2);
        man.update(InputState::default(), 0.016);
        let mut x = 0.0;
        b.iter(|| {
            x = (x + 7.0) % 1920.0;
            let input = InputState::default().moved_to(Vec2::new(x, 40.0));
            man.update(black_box(input), 0.016);
        });
    });

    group.finish();
}

criterion_group!(benches, frame_benchmarks);
criterion_main!(benches);
