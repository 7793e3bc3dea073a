// Event sources the viewer wires into the engine

pub mod event_source;
pub mod pointer;
pub mod sizes;
pub mod time;

pub use event_source::{EventSource, Subscription};
pub use pointer::{PointerButton, PointerEvent, PointerKind, PointerService};
pub use sizes::{SizesService, Viewport};
pub use time::{Tick, TimeService};

use crate::settings::Settings;
use std::rc::Rc;

/// The three services a viewer subscribes to.
pub struct Services {
    pub time: TimeService,
    pub sizes: SizesService,
    pub pointer: PointerService,
}

impl Services {
    pub fn new(settings: &Settings) -> Rc<Self> {
        Rc::new(Self {
            time: TimeService::new(settings.viewer.max_frame_delta),
            sizes: SizesService::new(settings.viewer.max_pixel_ratio),
            pointer: PointerService::new(),
        })
    }
}
