//! Frame driver, tree editing and parallel stabilization.

#[cfg(test)]
mod tests {
    use arbor::{
        Manager, NodeId,
        config::Config,
        dirty::DirtyType,
        error::{Error, Result},
        event::Key,
        geom::Vec2,
        stylizer::Stretch,
        style::Color,
        testing::{Harness, StaticTextures, test_host},
        widgets::{ContentFit, ElementData, SelectOption},
    };
    use rand::{Rng, SeedableRng, rngs::StdRng};

    fn fixed(man: &mut Manager, parent: Option<NodeId>, w: f32, h: f32) -> Result<NodeId> {
        let id = man.add_panel(parent);
        man.panel_mut(id)?.set_fit(ContentFit::None);
        man.layout_mut(id)?.scale(w, h);
        Ok(id)
    }

    /// Two roots, each a chain of nested fitting panels ending in labels.
    fn forest(man: &mut Manager) -> Result<Vec<NodeId>> {
        let mut all = Vec::new();
        for r in 0..2 {
            let root = fixed(man, None, 300.0, 300.0)?;
            all.push(root);
            let mut parent = root;
            for i in 0..50 {
                let p = man.add_panel(Some(parent));
                let l = man.add_label(Some(p), &format!("tree {r} node {i}"));
                all.extend([p, l]);
                parent = p;
            }
        }
        Ok(all)
    }

    fn geometry(man: &Manager, ids: &[NodeId]) -> Vec<(Vec2, Vec2)> {
        ids.iter()
            .filter_map(|id| man.node(*id))
            .map(|n| (n.entity().position(), n.entity().size()))
            .collect()
    }

    fn manager(threads: usize) -> Result<Manager> {
        let config = Config {
            worker_threads: Some(threads),
            max_iterations: 500,
            ..Config::default()
        };
        Manager::new(
            test_host(StaticTextures::default(), Vec2::new(800.0, 600.0)),
            config,
        )
    }

    #[test]
    fn parallel_matches_sequential() -> Result<()> {
        let mut par = manager(4)?;
        let ids = forest(&mut par)?;
        par.update(Default::default(), 0.016);

        let mut seq = manager(1)?;
        let same = forest(&mut seq)?;
        assert_eq!(ids, same);
        for r in seq.roots() {
            seq.clean(r);
        }
        assert_eq!(geometry(&par, &ids), geometry(&seq, &ids));
        assert_eq!(par.stats().stabilizations, 2);
        assert_eq!(par.stats().convergence_failures, 0);
        Ok(())
    }

    #[test]
    fn random_trees_reach_a_fixed_point() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for _ in 0..8 {
            let mut man = manager(2)?;
            let root = fixed(&mut man, None, 400.0, 300.0)?;
            let mut panels = vec![root];
            let mut all = vec![root];
            for _ in 0..40 {
                let parent = panels[rng.random_range(0..panels.len())];
                let id = match rng.random_range(0..3) {
                    0 => man.add_label(Some(parent), &"w".repeat(rng.random_range(1..30))),
                    1 => {
                        let w = rng.random_range(5.0..120.0);
                        let h = rng.random_range(5.0..60.0);
                        fixed(&mut man, Some(parent), w, h)?
                    }
                    _ => man.add_panel(Some(parent)),
                };
                if man.node(id).is_some_and(|n| n.try_panel().is_some()) {
                    panels.push(id);
                }
                all.push(id);
            }
            man.clean(root);
            let first = geometry(&man, &all);
            man.mark_dirty(root, DirtyType::Layout);
            man.clean(root);
            assert_eq!(first, geometry(&man, &all));
            assert!(man.clean_if_needed(root).is_none());
        }
        Ok(())
    }

    #[test]
    fn clean_if_needed_skips_clean_trees() -> Result<()> {
        let mut man = manager(1)?;
        let root = fixed(&mut man, None, 10.0, 10.0)?;
        assert!(man.clean_if_needed(root).is_some());
        assert!(man.clean_if_needed(root).is_none());
        man.set_dont_clean(root, true)?;
        man.mark_dirty(root, DirtyType::Layout);
        assert!(man.clean(root).is_none());
        Ok(())
    }

    #[test]
    fn round_cap_is_reported() -> Result<()> {
        let config = Config {
            max_iterations: 1,
            worker_threads: Some(1),
            ..Config::default()
        };
        let mut h = Harness::builder().config(config).build()?;
        let root = h.man.add_panel(None);
        h.man.add_label(Some(root), "hello");
        h.frame();
        let stats = h.man.stats();
        assert_eq!(stats.last_iterations, 1);
        assert_eq!(stats.convergence_failures, 1);
        Ok(())
    }

    #[test]
    fn bad_config_is_rejected() {
        let config = Config {
            max_iterations: 0,
            ..Config::default()
        };
        let host = test_host(StaticTextures::default(), Vec2::new(10.0, 10.0));
        assert!(matches!(Manager::new(host, config), Err(Error::Config(_))));
    }

    #[test]
    fn resize_relayouts_roots() -> Result<()> {
        let mut h = Harness::new()?;
        let root = fixed(&mut h.man, None, 10.0, 10.0)?;
        h.man.set_stylizer(root, Some(Box::new(Stretch::both())))?;
        h.frame();
        assert_eq!(h.man.node(root).map(|n| n.entity().size()), Some(Vec2::new(800.0, 600.0)));

        h.man.disable_update();
        h.man.window_resized(Vec2::new(400.0, 300.0));
        h.frame();
        assert_eq!(h.man.node(root).map(|n| n.entity().size()), Some(Vec2::new(400.0, 300.0)));
        Ok(())
    }

    #[test]
    fn suspended_and_minimized_frames_are_skipped() -> Result<()> {
        let mut h = Harness::new()?;
        h.frame();
        assert_eq!(h.man.stats().frames, 1);
        h.man.disable_update();
        h.man.disable_update();
        h.frame();
        h.man.enable_update();
        assert!(h.man.is_update_disabled());
        h.frame();
        h.man.enable_update();
        h.frame();
        assert_eq!(h.man.stats().frames, 2);
        h.man.window_minimized(true);
        h.frame();
        assert_eq!(h.man.stats().frames, 2);
        h.man.window_minimized(false);
        h.frame();
        assert_eq!(h.man.stats().frames, 3);
        Ok(())
    }

    #[test]
    fn reparenting_moves_the_child() -> Result<()> {
        let mut h = Harness::new()?;
        let a = fixed(&mut h.man, None, 10.0, 10.0)?;
        let b = fixed(&mut h.man, None, 10.0, 10.0)?;
        let c = fixed(&mut h.man, Some(a), 5.0, 5.0)?;
        h.man.add_child(b, c);
        assert_eq!(h.man.child(a, 0), None);
        assert_eq!(h.man.child(b, 0), Some(c));
        assert_eq!(h.man.root_of(c), b);

        h.man.add_child(c, b);
        assert_eq!(h.man.node(b).and_then(|n| n.entity().parent()), None);

        let label = h.man.add_label(None, "x");
        h.man.add_child(label, a);
        assert_eq!(h.man.node(a).and_then(|n| n.entity().parent()), None);
        Ok(())
    }

    #[test]
    fn insert_child_clamps_index() -> Result<()> {
        let mut h = Harness::new()?;
        let root = fixed(&mut h.man, None, 10.0, 10.0)?;
        let a = fixed(&mut h.man, Some(root), 1.0, 1.0)?;
        let b = fixed(&mut h.man, None, 1.0, 1.0)?;
        let c = fixed(&mut h.man, None, 1.0, 1.0)?;
        h.man.insert_child(root, b, 0);
        h.man.insert_child(root, c, 99);
        let children = h.man.node(root).map(|n| n.entity().children().to_vec());
        assert_eq!(children, Some(vec![b, a, c]));
        Ok(())
    }

    #[test]
    fn clone_copies_the_subtree() -> Result<()> {
        let mut h = Harness::new()?;
        let b = h.man.add_button(None, "ok", Color::WHITE);
        h.man.set_name(b, "ok-button")?;
        let copy = h.man.clone_node(b, None)?;
        assert_ne!(copy, b);
        let label = |id| match h.man.node(id).map(|n| n.data()) {
            Some(ElementData::Button(bd)) => bd.label(),
            _ => None,
        };
        let (orig_label, copy_label) = (label(b), label(copy));
        assert!(copy_label.is_some());
        assert_ne!(orig_label, copy_label);
        assert_eq!(h.man.child(copy, 0), copy_label);
        assert_eq!(h.man.find_by_name("ok-button"), Some(b));
        assert!(matches!(
            h.man.clone_node(NodeId::default(), None),
            Err(Error::NodeNotFound(_))
        ));
        Ok(())
    }

    #[test]
    fn draw_list_is_back_to_front() -> Result<()> {
        let mut h = Harness::new()?;
        let root = fixed(&mut h.man, None, 100.0, 100.0)?;
        let child = fixed(&mut h.man, Some(root), 10.0, 10.0)?;
        h.man.panel_mut(root)?.set_color(Color::WHITE);
        h.man.panel_mut(child)?.set_color(Color::BLACK);
        h.frame();
        let nodes: Vec<NodeId> = h.man.draw_list().iter().map(|d| d.node).collect();
        assert_eq!(nodes, vec![root, child]);

        h.man.hide(child);
        h.frame();
        let nodes: Vec<NodeId> = h.man.draw_list().iter().map(|d| d.node).collect();
        assert_eq!(nodes, vec![root]);
        Ok(())
    }

    #[test]
    fn hovered_lists_painted_nodes() -> Result<()> {
        let mut h = Harness::new()?;
        let root = fixed(&mut h.man, None, 100.0, 100.0)?;
        let clear = fixed(&mut h.man, Some(root), 10.0, 10.0)?;
        h.man.panel_mut(root)?.set_color(Color::WHITE);
        h.frame();
        h.move_to(5.0, 5.0);
        let hovered = h.man.hovered();
        assert!(hovered.contains(&root));
        assert!(!hovered.contains(&clear));
        Ok(())
    }

    #[test]
    fn tab_moves_focus() -> Result<()> {
        let mut h = Harness::new()?;
        let root = fixed(&mut h.man, None, 400.0, 100.0)?;
        let first = h.man.add_input(Some(root), "first");
        let second = h.man.add_input(Some(root), "second");
        h.frame();
        h.click(10.0, 10.0);
        assert!(h.man.input_mut(first)?.data().is_focused());
        h.type_text("hi");
        assert_eq!(h.man.input_mut(first)?.text(), "hi");
        h.key(Key::Tab);
        assert!(!h.man.input_mut(first)?.data().is_focused());
        assert!(h.man.input_mut(second)?.data().is_focused());
        h.key(Key::Tab);
        assert!(h.man.input_mut(first)?.data().is_focused());
        h.press(300.0, 300.0);
        assert!(!h.man.input_mut(first)?.data().is_focused());
        Ok(())
    }

    #[test]
    fn select_picks_from_the_list() -> Result<()> {
        let mut h = Harness::new()?;
        let options = vec![SelectOption::new("Red", "r"), SelectOption::new("Blue", "b")];
        let sel = h.man.add_select(None, "colour", options);
        h.frame();
        h.click(10.0, 10.0);
        assert!(h.man.select_mut(sel)?.data().is_open());
        h.frame();
        h.click(10.0, 70.0);
        let s = h.man.select_mut(sel)?;
        assert!(!s.data().is_open());
        assert_eq!(s.data().value(), Some("b"));
        Ok(())
    }

    #[test]
    fn slider_and_progress_clamp() -> Result<()> {
        let mut h = Harness::new()?;
        let slider = h.man.add_slider(None);
        let bar = h.man.add_progress_bar(None);
        h.man.set_slider_value(slider, 2.0)?;
        h.man.set_progress(bar, -1.0)?;
        h.frame();
        let slider_value = match h.man.node(slider).map(|n| n.data()) {
            Some(ElementData::Slider(s)) => s.value(),
            _ => -1.0,
        };
        let bar_value = match h.man.node(bar).map(|n| n.data()) {
            Some(ElementData::ProgressBar(p)) => p.value(),
            _ => -1.0,
        };
        assert_eq!((slider_value, bar_value), (1.0, 0.0));
        Ok(())
    }

    #[test]
    #[should_panic(expected = "not a Label")]
    fn wrong_kind_panics() {
        let mut man = manager(1).expect("manager");
        let panel = man.add_panel(None);
        let _ = man.label_mut(panel);
    }

    #[test]
    fn missing_textures_are_logged_not_fatal() -> Result<()> {
        let mut h = Harness::builder().texture("logo", 32.0, 16.0).build()?;
        let good = h.man.add_image(None, Some("logo"));
        let bad = h.man.add_image(None, Some("nope"));
        let tex = |id| {
            h.man
                .node(id)
                .and_then(|n| n.try_panel())
                .and_then(|p| p.texture().map(|t| t.size))
        };
        assert_eq!(tex(good), Some(Vec2::new(32.0, 16.0)));
        assert_eq!(tex(bad), None);
        Ok(())
    }

    #[test]
    fn clear_removes_everything() -> Result<()> {
        let mut h = Harness::new()?;
        let root = fixed(&mut h.man, None, 10.0, 10.0)?;
        fixed(&mut h.man, Some(root), 1.0, 1.0)?;
        h.man.add_label(None, "x");
        assert_eq!(h.man.len(), 3);
        h.man.clear();
        assert!(h.man.is_empty());
        Ok(())
    }
}
