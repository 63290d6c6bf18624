use std::{array, mem};

use arbor_geom::Vec2;
use strum::{Display, EnumCount, EnumIter};

use crate::core::{
    id::{EventId, NodeId},
    manager::Manager,
};

/// Events a node can receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumCount, EnumIter)]
pub enum EventType {
    /// The pointer entered the node.
    Enter,
    /// The pointer left the node.
    Exit,
    /// The pointer moved inside the node.
    Move,
    /// The primary button went down on the node.
    Down,
    /// The primary button went up over the node.
    Up,
    /// Press and release on the node without dragging.
    Click,
    /// Two clicks within the double click time.
    DoubleClick,
    /// The secondary button went down on the node.
    RightDown,
    /// The secondary button went up over the node.
    RightUp,
    /// Secondary press and release on the node.
    RightClick,
    /// A press or release landed outside the node.
    Miss,
    /// A press turned into a drag.
    DragStart,
    /// A drag ended.
    DragEnd,
    /// Drag data was released over the node.
    Drop,
    /// The pointer entered the node carrying drag data.
    DropEnter,
    /// The pointer left the node carrying drag data.
    DropExit,
    /// The wheel moved over the node.
    Scroll,
    /// The node's value changed.
    Change,
    /// The node's value was committed.
    Submit,
    /// A key went down while the node had focus.
    KeyDown,
    /// A key went up while the node had focus.
    KeyUp,
    /// The node's draw commands were rebuilt.
    Render,
    /// The node is being destroyed.
    Destroy,
}

impl EventType {
    /// Pointer events that only the front-most interested node receives.
    pub fn is_claimable(self) -> bool {
        matches!(
            self,
            Self::Down
                | Self::Up
                | Self::Click
                | Self::DoubleClick
                | Self::RightDown
                | Self::RightUp
                | Self::RightClick
                | Self::Scroll
        )
    }
}

/// An event callback. It receives the manager and the node the event fired
/// on, so handlers may mutate any node.
pub type EventCallback = Box<dyn FnMut(&mut Manager, NodeId) + Send>;

/// Per-node callback lists, one per event type.
pub struct EventRegistry {
    /// Callbacks indexed by event type.
    lists: [Vec<(EventId, EventCallback)>; EventType::COUNT],
}

impl Default for EventRegistry {
    fn default() -> Self {
        Self {
            lists: array::from_fn(|_| Vec::new()),
        }
    }
}

impl EventRegistry {
    /// Register a callback.
    pub(crate) fn add(&mut self, ty: EventType, id: EventId, cb: EventCallback) {
        self.lists[ty as usize].push((id, cb));
    }

    /// Remove a callback by id, from whichever list holds it.
    pub(crate) fn remove(&mut self, id: EventId) -> bool {
        for list in &mut self.lists {
            let before = list.len();
            list.retain(|(e, _)| *e != id);
            if list.len() != before {
                return true;
            }
        }
        false
    }

    /// Are there no callbacks for `ty`?
    pub fn is_empty(&self, ty: EventType) -> bool {
        self.lists[ty as usize].is_empty()
    }

    /// Number of callbacks for `ty`.
    pub fn len(&self, ty: EventType) -> usize {
        self.lists[ty as usize].len()
    }

    /// Take the callbacks for `ty` out so they can run with the manager
    /// borrowed mutably.
    pub(crate) fn take(&mut self, ty: EventType) -> Vec<(EventId, EventCallback)> {
        mem::take(&mut self.lists[ty as usize])
    }

    /// Put taken callbacks back ahead of any registered while they ran.
    /// Ids in `removed` were dropped during the run and are not restored.
    pub(crate) fn restore(
        &mut self,
        ty: EventType,
        mut cbs: Vec<(EventId, EventCallback)>,
        removed: &[EventId],
    ) {
        cbs.retain(|(id, _)| !removed.contains(id));
        let added = mem::take(&mut self.lists[ty as usize]);
        cbs.extend(added);
        self.lists[ty as usize] = cbs;
    }

    /// Drop every callback.
    pub(crate) fn clear(&mut self) {
        for list in &mut self.lists {
            list.clear();
        }
    }
}

/// Keys the engine reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Delete before the cursor.
    Backspace,
    /// Delete after the cursor.
    Delete,
    /// Cursor left.
    Left,
    /// Cursor right.
    Right,
    /// Cursor to start.
    Home,
    /// Cursor to end.
    End,
    /// Commit.
    Enter,
    /// Next field.
    Tab,
    /// Abandon.
    Escape,
    /// Any other key.
    Other(u32),
}

/// A key edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// Which key.
    pub key: Key,
    /// True on press, false on release.
    pub pressed: bool,
    /// Shift was held.
    pub shift: bool,
}

/// One tick of input from the windowing layer.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InputState {
    /// Pointer position in world coordinates.
    pub pointer: Vec2,
    /// The pointer moved this tick.
    pub pointer_moved: bool,
    /// The primary button went down this tick.
    pub pressed: bool,
    /// The primary button went up this tick.
    pub released: bool,
    /// The secondary button went down this tick.
    pub right_pressed: bool,
    /// The secondary button went up this tick.
    pub right_released: bool,
    /// Wheel delta.
    pub scroll: Vec2,
    /// Key edges.
    pub keys: Vec<KeyEvent>,
    /// Characters typed this tick.
    pub text: String,
    /// Seconds since start.
    pub runtime: f64,
    /// The pointer is carrying drag data.
    pub drag_data: bool,
}

impl InputState {
    /// Did the wheel move?
    pub fn scrolled(&self) -> bool {
        !self.scroll.approx(Vec2::ZERO)
    }

    /// Pointer moved to `p`.
    pub fn moved_to(mut self, p: Vec2) -> Self {
        self.pointer = p;
        self.pointer_moved = true;
        self
    }

    /// Primary press at `p`.
    pub fn press(self, p: Vec2) -> Self {
        Self {
            pressed: true,
            ..self.moved_to(p)
        }
    }

    /// Primary release at `p`.
    pub fn release(self, p: Vec2) -> Self {
        Self {
            released: true,
            ..self.moved_to(p)
        }
    }

    /// Wheel delta at the current pointer.
    pub fn wheel(mut self, delta: Vec2) -> Self {
        self.scroll = delta;
        self
    }

    /// Runtime clock.
    pub fn at(mut self, runtime: f64) -> Self {
        self.runtime = runtime;
        self
    }
}
