//! Pointer events, claiming and callback bookkeeping.

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    };

    use arbor::{
        Manager, NodeId,
        error::Result,
        event::EventType,
        style::Color,
        testing::Harness,
        widgets::{ContentFit, ElementData},
    };

    /// A shared counter and a callback that bumps it.
    fn counter() -> (Arc<AtomicUsize>, impl FnMut(&mut Manager, NodeId) + Send + 'static) {
        let n = Arc::new(AtomicUsize::new(0));
        let c = n.clone();
        (n, move |_: &mut Manager, _: NodeId| {
            c.fetch_add(1, Ordering::SeqCst);
        })
    }

    fn count(n: &AtomicUsize) -> usize {
        n.load(Ordering::SeqCst)
    }

    fn fixed(h: &mut Harness, parent: Option<NodeId>, w: f32, ht: f32) -> Result<NodeId> {
        let id = h.man.add_panel(parent);
        h.man.panel_mut(id)?.set_fit(ContentFit::None);
        h.man.layout_mut(id)?.scale(w, ht);
        Ok(id)
    }

    #[test]
    fn click_fires_once() -> Result<()> {
        let mut h = Harness::new()?;
        let b = h.man.add_button(None, "ok", Color::WHITE);
        let (clicks, cb) = counter();
        h.man.add_event(b, EventType::Click, cb)?;
        h.frame();
        h.click(10.0, 10.0);
        assert_eq!(count(&clicks), 1);
        h.frames(3);
        assert_eq!(count(&clicks), 1);
        Ok(())
    }

    #[test]
    fn front_most_node_claims() -> Result<()> {
        let mut h = Harness::new()?;
        let root = fixed(&mut h, None, 200.0, 200.0)?;
        let child = fixed(&mut h, Some(root), 50.0, 50.0)?;
        let (outer, cb) = counter();
        h.man.add_event(root, EventType::Click, cb)?;
        let (inner, cb) = counter();
        h.man.add_event(child, EventType::Click, cb)?;
        h.frame();
        h.click(10.0, 10.0);
        assert_eq!((count(&inner), count(&outer)), (1, 0));
        h.click(150.0, 150.0);
        assert_eq!((count(&inner), count(&outer)), (1, 1));
        Ok(())
    }

    #[test]
    fn click_through_passes_to_parent() -> Result<()> {
        let mut h = Harness::new()?;
        let root = fixed(&mut h, None, 200.0, 200.0)?;
        let child = fixed(&mut h, Some(root), 50.0, 50.0)?;
        h.man.panel_mut(child)?.allow_click_through();
        let (outer, cb) = counter();
        h.man.add_event(root, EventType::Click, cb)?;
        let (inner, cb) = counter();
        h.man.add_event(child, EventType::Click, cb)?;
        h.frame();
        h.click(10.0, 10.0);
        assert_eq!((count(&inner), count(&outer)), (1, 1));
        Ok(())
    }

    #[test]
    fn builtin_only_receivers_pass_to_their_parent() -> Result<()> {
        let mut h = Harness::new()?;
        let root = fixed(&mut h, None, 400.0, 100.0)?;
        let input = h.man.add_input(Some(root), "name");
        let (outer, cb) = counter();
        h.man.add_event(root, EventType::Click, cb)?;
        h.frame();
        h.click(10.0, 10.0);
        assert!(h.man.input_mut(input)?.data().is_focused());
        assert_eq!(count(&outer), 1);

        let (inner, cb) = counter();
        h.man.add_event(input, EventType::Click, cb)?;
        h.advance(1.0);
        h.click(10.0, 10.0);
        assert_eq!((count(&inner), count(&outer)), (1, 1));
        Ok(())
    }

    #[test]
    fn pass_through_stops_at_the_direct_parent() -> Result<()> {
        let mut h = Harness::new()?;
        let root = fixed(&mut h, None, 400.0, 100.0)?;
        let mid = fixed(&mut h, Some(root), 300.0, 80.0)?;
        let input = h.man.add_input(Some(mid), "name");
        let (outer, cb) = counter();
        h.man.add_event(root, EventType::Click, cb)?;
        h.frame();
        h.click(10.0, 10.0);
        assert!(h.man.input_mut(input)?.data().is_focused());
        assert_eq!(count(&outer), 0);
        Ok(())
    }

    #[test]
    fn press_outside_is_a_miss() -> Result<()> {
        let mut h = Harness::new()?;
        let root = fixed(&mut h, None, 200.0, 200.0)?;
        let child = fixed(&mut h, Some(root), 50.0, 50.0)?;
        let (misses, cb) = counter();
        h.man.add_event(child, EventType::Miss, cb)?;
        h.frame();
        h.press(150.0, 150.0);
        assert_eq!(count(&misses), 1);
        h.release(150.0, 150.0);
        h.press(10.0, 10.0);
        assert_eq!(count(&misses), 1);
        Ok(())
    }

    #[test]
    fn double_click() -> Result<()> {
        let mut h = Harness::new()?;
        let b = fixed(&mut h, None, 100.0, 100.0)?;
        let (clicks, cb) = counter();
        h.man.add_event(b, EventType::Click, cb)?;
        let (doubles, cb) = counter();
        h.man.add_event(b, EventType::DoubleClick, cb)?;
        h.frame();
        h.click(10.0, 10.0);
        h.click(10.0, 10.0);
        assert_eq!((count(&clicks), count(&doubles)), (1, 1));
        h.advance(1.0);
        h.click(10.0, 10.0);
        assert_eq!((count(&clicks), count(&doubles)), (2, 1));
        Ok(())
    }

    #[test]
    fn enter_and_exit() -> Result<()> {
        let mut h = Harness::new()?;
        let b = fixed(&mut h, None, 100.0, 100.0)?;
        let (enters, cb) = counter();
        h.man.add_event(b, EventType::Enter, cb)?;
        let (exits, cb) = counter();
        h.man.add_event(b, EventType::Exit, cb)?;
        h.frame();
        h.move_to(10.0, 10.0);
        h.move_to(20.0, 20.0);
        assert_eq!((count(&enters), count(&exits)), (1, 0));
        h.move_to(300.0, 300.0);
        assert_eq!((count(&enters), count(&exits)), (1, 1));
        Ok(())
    }

    #[test]
    fn drag_suppresses_click() -> Result<()> {
        let mut h = Harness::new()?;
        let b = fixed(&mut h, None, 100.0, 100.0)?;
        let (clicks, cb) = counter();
        h.man.add_event(b, EventType::Click, cb)?;
        let (starts, cb) = counter();
        h.man.add_event(b, EventType::DragStart, cb)?;
        let (ends, cb) = counter();
        h.man.add_event(b, EventType::DragEnd, cb)?;
        h.frame();
        h.move_to(10.0, 10.0);
        h.press(10.0, 10.0);
        h.move_to(30.0, 10.0);
        assert_eq!(count(&starts), 1);
        h.release(60.0, 10.0);
        assert_eq!((count(&ends), count(&clicks)), (1, 0));
        Ok(())
    }

    #[test]
    fn callback_can_remove_itself() -> Result<()> {
        let mut h = Harness::new()?;
        let b = fixed(&mut h, None, 100.0, 100.0)?;
        let fired = Arc::new(AtomicUsize::new(0));
        let slot = Arc::new(Mutex::new(None));
        let (f, s) = (fired.clone(), slot.clone());
        let eid = h.man.add_event(b, EventType::Click, move |man, id| {
            f.fetch_add(1, Ordering::SeqCst);
            let own = *s.lock().expect("lock");
            if let Some(e) = own {
                assert!(man.remove_event(id, e));
            }
        })?;
        *slot.lock().expect("lock") = Some(eid);
        h.frame();
        h.click(10.0, 10.0);
        h.advance(1.0);
        h.click(10.0, 10.0);
        assert_eq!(count(&fired), 1);
        assert!(h.man.node(b).is_some_and(|n| n.events().is_empty(EventType::Click)));
        Ok(())
    }

    #[test]
    fn remove_unknown_event() -> Result<()> {
        let mut h = Harness::new()?;
        let a = fixed(&mut h, None, 10.0, 10.0)?;
        let b = fixed(&mut h, None, 10.0, 10.0)?;
        let (_, cb) = counter();
        let eid = h.man.add_event(a, EventType::Click, cb)?;
        assert!(!h.man.remove_event(b, eid));
        assert!(h.man.remove_event(a, eid));
        assert!(!h.man.remove_event(a, eid));
        Ok(())
    }

    #[test]
    fn requests_wait_for_dispatch() -> Result<()> {
        let mut h = Harness::new()?;
        let cb_node = h.man.add_checkbox(None, false);
        let (changes, cb) = counter();
        h.man.add_event(cb_node, EventType::Change, cb)?;
        h.man.set_checked(cb_node, true)?;
        assert_eq!(count(&changes), 0);
        h.frame();
        assert_eq!(count(&changes), 1);

        h.man.set_deferred_events(false);
        h.man.set_checked(cb_node, false)?;
        assert_eq!(count(&changes), 2);
        h.man.set_checked(cb_node, false)?;
        assert_eq!(count(&changes), 2);
        Ok(())
    }

    #[test]
    fn checkbox_toggles_on_click() -> Result<()> {
        let mut h = Harness::new()?;
        let cb_node = h.man.add_checkbox(None, false);
        let (changes, cb) = counter();
        h.man.add_event(cb_node, EventType::Change, cb)?;
        h.frame();
        h.click(5.0, 5.0);
        let checked = h.man.node(cb_node).map(|n| match n.data() {
            ElementData::Checkbox(c) => c.is_checked(),
            _ => false,
        });
        assert_eq!(checked, Some(true));
        assert_eq!(count(&changes), 1);
        Ok(())
    }

    #[test]
    fn destroy_fires_for_the_subtree() -> Result<()> {
        let mut h = Harness::new()?;
        let root = fixed(&mut h, None, 100.0, 100.0)?;
        let child = fixed(&mut h, Some(root), 10.0, 10.0)?;
        let (gone, cb) = counter();
        h.man.add_event(child, EventType::Destroy, cb)?;
        h.frame();
        h.man.destroy(root);
        assert_eq!(count(&gone), 1);
        assert!(!h.man.contains(root));
        assert!(!h.man.contains(child));
        assert!(h.man.is_empty());
        Ok(())
    }

    #[test]
    fn render_fires_after_relayout() -> Result<()> {
        let mut h = Harness::new()?;
        let root = fixed(&mut h, None, 100.0, 100.0)?;
        let (renders, cb) = counter();
        h.man.add_event(root, EventType::Render, cb)?;
        h.frame();
        assert_eq!(count(&renders), 1);
        h.frame();
        assert_eq!(count(&renders), 1);
        h.man.layout_mut(root)?.scale(50.0, 50.0);
        h.frame();
        assert_eq!(count(&renders), 2);
        Ok(())
    }

    #[test]
    fn button_tints_while_hovered() -> Result<()> {
        let mut h = Harness::new()?;
        let b = h.man.add_button(None, "go", Color::WHITE);
        h.frame();
        let color = |h: &Harness| h.man.node(b).and_then(|n| n.try_panel()).map(|p| p.color());
        h.move_to(10.0, 10.0);
        assert_eq!(color(&h), Some(Color::WHITE.scale_rgb(0.8)));
        h.move_to(300.0, 300.0);
        assert_eq!(color(&h), Some(Color::WHITE));
        Ok(())
    }
}
