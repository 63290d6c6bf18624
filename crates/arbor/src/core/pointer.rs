//! Pointer edge detection. Each tick turns the input snapshot and a node's
//! interaction flags into event requests for that node.

use crate::core::{
    event::EventType,
    frame::{Deferred, FrameCx, WorkerScratch},
    id::NodeId,
    node::{Node, UiFlags},
};

/// Release distance from the drag start beyond which a press no longer
/// counts as a click.
const CLICK_DRAG_TOLERANCE: f32 = 5.0;

/// Update hover, press and drag state for one node and queue the events
/// those edges produce.
pub(crate) fn pointer_events(id: NodeId, node: &mut Node, frame: &FrameCx<'_>, scratch: &mut WorkerScratch) {
    if !node.entity.active_in_tree {
        node.flags.remove(
            UiFlags::HOVERING
                | UiFlags::IS_DOWN
                | UiFlags::IS_RIGHT_DOWN
                | UiFlags::DRAG
                | UiFlags::LAST_ACTIVE,
        );
        return;
    }
    let input = frame.input;
    let p = input.pointer;
    let contained = node.hit(p);
    let was_hovering = node.flags.contains(UiFlags::HOVERING);
    enter_exit(id, node, frame, scratch, contained, was_hovering);
    let hovering = contained;

    if node.flags.contains(UiFlags::IS_DOWN)
        && !node.flags.contains(UiFlags::DRAG)
        && p.distance(node.down_pos) > frame.config.drag_threshold
    {
        node.flags.insert(UiFlags::DRAG);
        node.drag_start_pos = p;
        scratch.request(id, node, EventType::DragStart);
    }

    if input.pressed {
        if hovering && !node.flags.contains(UiFlags::IS_DOWN) {
            node.flags.insert(UiFlags::IS_DOWN | UiFlags::CANT_MISS);
            node.down_pos = p;
            scratch.request(id, node, EventType::Down);
        } else if !hovering && !node.flags.contains(UiFlags::CANT_MISS) {
            scratch.request(id, node, EventType::Miss);
        }
    }
    if input.right_pressed && hovering {
        node.flags.insert(UiFlags::IS_RIGHT_DOWN);
        scratch.request(id, node, EventType::RightDown);
    }

    if input.released {
        release(id, node, frame, scratch, hovering);
    }
    if input.right_released && node.flags.contains(UiFlags::IS_RIGHT_DOWN) {
        node.flags.remove(UiFlags::IS_RIGHT_DOWN);
        if hovering {
            scratch.request(id, node, EventType::RightUp);
            scratch.request(id, node, EventType::RightClick);
        }
    }
    if input.scrolled() && hovering {
        scratch.request(id, node, EventType::Scroll);
    }
    node.flags.insert(UiFlags::LAST_ACTIVE);
}

/// Hover transitions and pointer motion.
fn enter_exit(
    id: NodeId,
    node: &mut Node,
    frame: &FrameCx<'_>,
    scratch: &mut WorkerScratch,
    contained: bool,
    was_hovering: bool,
) {
    let drag_data = frame.input.drag_data;
    match (contained, was_hovering) {
        (true, false) => {
            node.flags.insert(UiFlags::HOVERING);
            let entered = scratch.request(id, node, EventType::Enter);
            if let (true, Some(parent)) = (entered, node.entity.parent) {
                scratch.deferred.push(Deferred::Request(parent, EventType::Exit));
            }
            if drag_data {
                scratch.request(id, node, EventType::DropEnter);
            }
        }
        (false, true) => {
            node.flags.remove(UiFlags::HOVERING);
            scratch.request(id, node, EventType::Exit);
            let listens = !node.events.is_empty(EventType::Enter);
            if let (true, Some(parent)) = (listens, node.entity.parent) {
                scratch.deferred.push(Deferred::ResetHover(parent));
            }
            if drag_data {
                scratch.request(id, node, EventType::DropExit);
            }
        }
        (true, true) if frame.input.pointer_moved => {
            scratch.request(id, node, EventType::Move);
        }
        _ => {}
    }
}

/// Primary button release: up, drop, drag end, and click or double click.
fn release(id: NodeId, node: &mut Node, frame: &FrameCx<'_>, scratch: &mut WorkerScratch, hovering: bool) {
    let input = frame.input;
    if hovering {
        scratch.request(id, node, EventType::Up);
        if input.drag_data {
            scratch.request(id, node, EventType::Drop);
        }
    }
    if node.flags.contains(UiFlags::LAST_ACTIVE | UiFlags::IS_DOWN) {
        node.flags.remove(UiFlags::IS_DOWN);
        let dragging = node.flags.contains(UiFlags::DRAG);
        let dragged = dragging && node.drag_start_pos.distance(input.pointer) > CLICK_DRAG_TOLERANCE;
        if dragging {
            node.flags.remove(UiFlags::DRAG);
            scratch.request(id, node, EventType::DragEnd);
        }
        if hovering && !dragged {
            let elapsed = input.runtime - node.last_click;
            if node.last_click > 0.0
                && elapsed < frame.config.double_click_time
                && !node.events.is_empty(EventType::DoubleClick)
            {
                node.last_click = 0.0;
                scratch.request(id, node, EventType::DoubleClick);
            } else {
                node.last_click = input.runtime;
                scratch.request(id, node, EventType::Click);
            }
        } else if !hovering {
            scratch.request(id, node, EventType::Miss);
        }
    }
    node.flags.remove(UiFlags::CANT_MISS);
}
