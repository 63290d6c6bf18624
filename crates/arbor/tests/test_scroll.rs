//! Scrolling containers.

#[cfg(test)]
mod tests {
    use arbor::{
        NodeId,
        error::Result,
        geom::Vec2,
        testing::Harness,
        widgets::{ContentFit, Overflow, PanelFlags, ScrollDirection},
    };

    /// A 200x100 vertical scroller holding one 200x300 child.
    fn scroller(h: &mut Harness) -> Result<(NodeId, NodeId)> {
        let root = h.man.add_panel(None);
        let child = h.man.add_panel(Some(root));
        {
            let mut p = h.man.panel_mut(root)?;
            p.set_fit(ContentFit::None);
            p.set_overflow(Overflow::Scroll);
            p.set_scroll_direction(ScrollDirection::VERTICAL);
        }
        h.man.layout_mut(root)?.scale(200.0, 100.0);
        h.man.panel_mut(child)?.set_fit(ContentFit::None);
        h.man.layout_mut(child)?.scale(200.0, 300.0);
        Ok((root, child))
    }

    #[test]
    fn max_scroll_follows_content() -> Result<()> {
        let mut h = Harness::new()?;
        let (root, _) = scroller(&mut h)?;
        h.frame();
        assert_eq!(h.man.panel_mut(root)?.max_scroll(), Vec2::new(0.0, 200.0));
        Ok(())
    }

    #[test]
    fn requested_scroll_is_clamped() -> Result<()> {
        let mut h = Harness::new()?;
        let (root, child) = scroller(&mut h)?;
        h.frame();
        h.man.panel_mut(root)?.set_scroll_y(500.0);
        h.frame();
        assert_eq!(h.man.panel_mut(root)?.scroll_y(), 200.0);
        let c = h.man.node(child).map(|n| n.entity().position());
        assert_eq!(c, Some(Vec2::new(0.0, -200.0)));

        h.man.panel_mut(root)?.set_scroll_y(-50.0);
        h.frame();
        assert_eq!(h.man.panel_mut(root)?.scroll_y(), 0.0);
        Ok(())
    }

    #[test]
    fn scroll_before_first_layout() -> Result<()> {
        let mut h = Harness::new()?;
        let (root, _) = scroller(&mut h)?;
        h.man.panel_mut(root)?.set_scroll_y(150.0);
        h.frame();
        assert_eq!(h.man.panel_mut(root)?.scroll_y(), 150.0);
        Ok(())
    }

    #[test]
    fn wheel_scrolls_and_clamps() -> Result<()> {
        let mut h = Harness::new()?;
        let (root, _) = scroller(&mut h)?;
        h.frame();
        h.wheel(50.0, 50.0, Vec2::new(0.0, -1.0));
        assert_eq!(h.man.panel_mut(root)?.scroll_y(), 20.0);
        h.wheel(50.0, 50.0, Vec2::new(0.0, -100.0));
        assert_eq!(h.man.panel_mut(root)?.scroll_y(), 200.0);
        h.wheel(50.0, 50.0, Vec2::new(0.0, 100.0));
        assert_eq!(h.man.panel_mut(root)?.scroll_y(), 0.0);
        Ok(())
    }

    #[test]
    fn frozen_ignores_wheel() -> Result<()> {
        let mut h = Harness::new()?;
        let (root, _) = scroller(&mut h)?;
        h.frame();
        h.man.panel_mut(root)?.freeze();
        h.wheel(50.0, 50.0, Vec2::new(0.0, -1.0));
        assert_eq!(h.man.panel_mut(root)?.scroll_y(), 0.0);
        Ok(())
    }

    #[test]
    fn wheel_outside_does_nothing() -> Result<()> {
        let mut h = Harness::new()?;
        let (root, _) = scroller(&mut h)?;
        h.frame();
        h.wheel(500.0, 500.0, Vec2::new(0.0, -1.0));
        assert_eq!(h.man.panel_mut(root)?.scroll_y(), 0.0);
        Ok(())
    }

    #[test]
    fn bars_show_on_hover() -> Result<()> {
        let mut h = Harness::new()?;
        let (root, _) = scroller(&mut h)?;
        h.frame();
        h.move_to(50.0, 50.0);
        h.frame();
        let pd = h.man.node(root).and_then(|n| n.try_panel()).cloned();
        let Some(pd) = pd else {
            panic!("root is a container");
        };
        assert!(pd.flags().contains(PanelFlags::BARS_VISIBLE));
        let (x, y) = pd.scroll_bars();
        assert!(x.is_none());
        let y = y.map(|r| (r.x, r.y, r.w, (r.h * 100.0).round()));
        assert_eq!(y, Some((192.0, 0.0, 8.0, 3333.0)));

        h.move_to(500.0, 500.0);
        h.frame();
        let visible = h
            .man
            .node(root)
            .and_then(|n| n.try_panel())
            .map(|p| p.flags().contains(PanelFlags::BARS_VISIBLE));
        assert_eq!(visible, Some(false));
        Ok(())
    }

    #[test]
    fn scroll_to_child_brings_it_into_view() -> Result<()> {
        let mut h = Harness::new()?;
        let root = h.man.add_panel(None);
        {
            let mut p = h.man.panel_mut(root)?;
            p.set_fit(ContentFit::None);
            p.set_scroll_direction(ScrollDirection::VERTICAL);
        }
        h.man.layout_mut(root)?.scale(100.0, 100.0);
        let mut rows = Vec::new();
        for _ in 0..5 {
            let c = h.man.add_panel(Some(root));
            h.man.panel_mut(c)?.set_fit(ContentFit::None);
            h.man.layout_mut(c)?.scale(100.0, 50.0);
            rows.push(c);
        }
        h.frame();
        h.man.panel_mut(root)?.scroll_to_child(rows[3]);
        h.frame();
        assert_eq!(h.man.panel_mut(root)?.scroll_y(), 100.0);
        h.man.panel_mut(root)?.scroll_to_child(rows[0]);
        h.frame();
        assert_eq!(h.man.panel_mut(root)?.scroll_y(), 0.0);
        Ok(())
    }
}
