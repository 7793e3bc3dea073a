use super::event_source::{EventSource, Subscription};
use std::cell::Cell;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    pub pixel_ratio: f64,
}

impl Viewport {
    pub fn new(width: u32, height: u32, pixel_ratio: f64) -> Self {
        Self {
            width,
            height,
            pixel_ratio,
        }
    }

    pub fn aspect(&self) -> f32 {
        if self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(0, 0, 1.0)
    }
}

/// Screen-resize source.
pub struct SizesService {
    source: EventSource<Viewport>,
    current: Cell<Viewport>,
    max_pixel_ratio: f64,
}

impl SizesService {
    pub fn new(max_pixel_ratio: f64) -> Self {
        Self {
            source: EventSource::new(),
            current: Cell::new(Viewport::default()),
            max_pixel_ratio,
        }
    }

    pub fn on_resize(&self, consumer: impl FnMut(&Viewport) + 'static) -> Subscription {
        self.source.subscribe(consumer)
    }

    pub fn viewport(&self) -> Viewport {
        self.current.get()
    }

    /// Records the new size and notifies consumers. Zero-area sizes
    /// (minimized windows) are recorded but not emitted.
    pub fn resize(&self, width: u32, height: u32, pixel_ratio: f64) {
        let viewport = Viewport::new(width, height, pixel_ratio.min(self.max_pixel_ratio));
        self.current.set(viewport);
        if viewport.is_empty() {
            log::debug!("ignoring empty viewport {}x{}", width, height);
            return;
        }
        self.source.emit(&viewport);
    }
}
