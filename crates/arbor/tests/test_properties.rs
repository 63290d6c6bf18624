//! Property tests for dirty marking, scrolling, clipping and row flow.

#[cfg(test)]
mod tests {
    use arbor::{
        Manager, NodeId,
        config::Config,
        dirty::DirtyType,
        error::Result,
        geom::Vec2,
        testing::{StaticTextures, test_host},
        widgets::{ContentFit, Overflow, ScrollDirection},
    };
    use proptest::prelude::*;

    fn manager() -> Manager {
        let config = Config {
            worker_threads: Some(1),
            ..Config::default()
        };
        Manager::new(
            test_host(StaticTextures::default(), Vec2::new(800.0, 600.0)),
            config,
        )
        .expect("manager")
    }

    fn fixed(man: &mut Manager, parent: Option<NodeId>, w: f32, h: f32) -> Result<NodeId> {
        let id = man.add_panel(parent);
        man.panel_mut(id)?.set_fit(ContentFit::None);
        man.layout_mut(id)?.scale(w, h);
        Ok(id)
    }

    fn direct_level() -> impl Strategy<Value = DirtyType> {
        prop_oneof![
            Just(DirtyType::Layout),
            Just(DirtyType::Resize),
            Just(DirtyType::Generated),
            Just(DirtyType::ColorChange),
            Just(DirtyType::Scissor),
        ]
    }

    /// `id` and everything below it.
    fn subtree(man: &Manager, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(n) = stack.pop() {
            out.push(n);
            if let Some(node) = man.node(n) {
                stack.extend(node.entity().children().iter().copied());
            }
        }
        out
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn only_rebuilds_override_direct_levels(a in direct_level(), b in direct_level()) {
            let mut man = manager();
            let root = fixed(&mut man, None, 10.0, 10.0).expect("root");
            let child = fixed(&mut man, Some(root), 5.0, 5.0).expect("child");
            man.clean(root);
            let dirty = |man: &Manager, id| man.node(id).map(|n| n.dirty());
            prop_assert_eq!(dirty(&man, root), Some(DirtyType::None));

            man.mark_dirty(root, a);
            prop_assert_eq!(dirty(&man, root), Some(a));
            prop_assert_eq!(dirty(&man, child), Some(a.as_parent()));

            man.mark_dirty(root, b);
            let expected = if b.is_generated() { b } else { a };
            prop_assert_eq!(dirty(&man, root), Some(expected));
            prop_assert!(dirty(&man, child).is_some_and(|d| d.is_parent()));
        }

        #[test]
        fn rebuilds_reach_every_descendant_until_cleaned(
            parents in prop::collection::vec(any::<prop::sample::Index>(), 1..30),
            target in any::<prop::sample::Index>(),
        ) {
            let mut man = manager();
            let root = fixed(&mut man, None, 400.0, 400.0).expect("root");
            let mut all = vec![root];
            for p in &parents {
                let parent = all[p.index(all.len())];
                all.push(fixed(&mut man, Some(parent), 10.0, 10.0).expect("child"));
            }
            man.clean(root);
            prop_assert!(all.iter().all(|id| man.node(*id).is_some_and(|n| !n.dirty().is_dirty())));

            let start = all[target.index(all.len())];
            let below = subtree(&man, start);
            man.mark_dirty(start, DirtyType::Generated);
            for id in &all {
                let level = man.node(*id).map(|n| n.dirty()).expect("node");
                if *id == start {
                    prop_assert_eq!(level, DirtyType::Generated);
                } else if below.contains(id) {
                    prop_assert!(level >= DirtyType::ParentGenerated, "{:?}", level);
                } else {
                    prop_assert_eq!(level, DirtyType::None);
                }
            }

            man.clean(root);
            for id in &all {
                prop_assert_eq!(man.node(*id).map(|n| n.dirty()), Some(DirtyType::None));
            }
        }

        #[test]
        fn scroll_stays_in_range(content in 1.0f32..1000.0, request in -2000.0f32..2000.0) {
            let mut man = manager();
            let root = fixed(&mut man, None, 100.0, 100.0).expect("root");
            man.panel_mut(root).expect("panel").set_scroll_direction(ScrollDirection::VERTICAL);
            fixed(&mut man, Some(root), 100.0, content).expect("child");
            man.clean(root);
            man.panel_mut(root).expect("panel").set_scroll_y(request);
            man.clean(root);

            let p = man.panel_mut(root).expect("panel");
            let max = (content - 100.0).max(0.0);
            prop_assert!((p.max_scroll().y - max).abs() < 0.01);
            prop_assert!(p.scroll_y() >= 0.0 && p.scroll_y() <= p.max_scroll().y);
            prop_assert!((p.scroll_y() - request.clamp(0.0, p.max_scroll().y)).abs() < 0.01);
        }

        #[test]
        fn rows_never_overflow(widths in prop::collection::vec(1.0f32..100.0, 1..12)) {
            let mut man = manager();
            let root = fixed(&mut man, None, 100.0, 400.0).expect("root");
            let kids: Vec<NodeId> = widths
                .iter()
                .map(|w| fixed(&mut man, Some(root), *w, 10.0).expect("child"))
                .collect();
            man.clean(root);
            for k in &kids {
                let r = man.node(*k).map(|n| n.entity().rect()).expect("node");
                prop_assert!(r.x == 0.0 || r.right() <= 100.0 + 0.01);
            }
            for pair in kids.windows(2) {
                let a = man.node(pair[0]).map(|n| n.entity().rect()).expect("node");
                let b = man.node(pair[1]).map(|n| n.entity().rect()).expect("node");
                if a.y == b.y {
                    prop_assert!(b.x >= a.right() - 0.01);
                } else {
                    prop_assert!(b.y > a.y && b.x == 0.0);
                }
            }
        }

        #[test]
        fn clips_stay_inside_clipping_ancestors(
            chain in prop::collection::vec((1.0f32..300.0, 1.0f32..300.0, 0u8..3), 1..6),
        ) {
            let mut man = manager();
            let root = fixed(&mut man, None, 200.0, 200.0).expect("root");
            let mut parent = root;
            let mut clipper = root;
            let mut checks = Vec::new();
            for (w, h, mode) in chain {
                let id = fixed(&mut man, Some(parent), w, h).expect("child");
                let overflow = match mode {
                    0 => Overflow::Visible,
                    1 => Overflow::Hidden,
                    _ => Overflow::Scroll,
                };
                man.panel_mut(id).expect("panel").set_overflow(overflow);
                checks.push((id, clipper));
                if overflow != Overflow::Visible {
                    clipper = id;
                }
                parent = id;
            }
            man.clean(root);
            for (id, outer) in checks {
                let inner = man.node(id).map(|n| n.clip()).expect("node");
                let outer = man.node(outer).map(|n| n.clip()).expect("node");
                prop_assert!(outer.contains_clip(&inner), "{inner:?} outside {outer:?}");
            }
        }

        #[test]
        fn fitted_containers_cover_children(w in 1.0f32..300.0, h in 1.0f32..300.0) {
            let mut man = manager();
            let root = man.add_panel(None);
            fixed(&mut man, Some(root), w, h).expect("child");
            man.clean(root);
            let size = man.node(root).map(|n| n.entity().size()).expect("root");
            prop_assert!(size.x + 0.01 >= w && size.y + 0.01 >= h);
        }
    }
}
