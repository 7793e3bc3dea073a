use super::event_source::{EventSource, Subscription};
use super::sizes::Viewport;
use std::cell::Cell;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerKind {
    Move,
    Down(PointerButton),
    Up(PointerButton),
    Wheel { delta_y: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub x: f64,
    pub y: f64,
    /// Normalized device coordinates, x right and y up, both in [-1, 1].
    pub ndc: [f32; 2],
    pub kind: PointerKind,
}

/// Pointer-input source. Tracks the last known cursor position so button
/// and wheel events carry coordinates too.
pub struct PointerService {
    source: EventSource<PointerEvent>,
    position: Cell<(f64, f64)>,
}

impl PointerService {
    pub fn new() -> Self {
        Self {
            source: EventSource::new(),
            position: Cell::new((0.0, 0.0)),
        }
    }

    pub fn on_pointer(&self, consumer: impl FnMut(&PointerEvent) + 'static) -> Subscription {
        self.source.subscribe(consumer)
    }

    pub fn move_to(&self, x: f64, y: f64, viewport: Viewport) {
        self.position.set((x, y));
        self.dispatch(PointerKind::Move, viewport);
    }

    pub fn press(&self, button: PointerButton, viewport: Viewport) {
        self.dispatch(PointerKind::Down(button), viewport);
    }

    pub fn release(&self, button: PointerButton, viewport: Viewport) {
        self.dispatch(PointerKind::Up(button), viewport);
    }

    pub fn wheel(&self, delta_y: f32, viewport: Viewport) {
        self.dispatch(PointerKind::Wheel { delta_y }, viewport);
    }

    fn dispatch(&self, kind: PointerKind, viewport: Viewport) {
        let (x, y) = self.position.get();
        let event = PointerEvent {
            x,
            y,
            ndc: normalized(x, y, viewport),
            kind,
        };
        self.source.emit(&event);
    }
}

impl Default for PointerService {
    fn default() -> Self {
        Self::new()
    }
}

fn normalized(x: f64, y: f64, viewport: Viewport) -> [f32; 2] {
    if viewport.is_empty() {
        return [0.0, 0.0];
    }
    [
        (x / viewport.width as f64 * 2.0 - 1.0) as f32,
        -(y / viewport.height as f64 * 2.0 - 1.0) as f32,
    ]
}
