use super::event_source::{EventSource, Subscription};
use std::cell::Cell;
use std::time::Instant;

/// One frame of the time source, in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    pub elapsed: f64,
    pub delta: f64,
}

#[derive(Debug, Clone, Copy)]
struct Clock {
    start: Instant,
    last: Instant,
}

/// Per-frame time source. The event loop calls `tick` once per redraw.
pub struct TimeService {
    source: EventSource<Tick>,
    clock: Cell<Option<Clock>>,
    max_delta: f64,
}

impl TimeService {
    pub fn new(max_delta: f64) -> Self {
        Self {
            source: EventSource::new(),
            clock: Cell::new(None),
            max_delta,
        }
    }

    pub fn on_tick(&self, consumer: impl FnMut(&Tick) + 'static) -> Subscription {
        self.source.subscribe(consumer)
    }

    pub fn start(&self, now: Instant) {
        self.clock.set(Some(Clock {
            start: now,
            last: now,
        }));
        log::debug!("time source started");
    }

    pub fn stop(&self) {
        if self.clock.take().is_some() {
            log::debug!("time source stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.clock.get().is_some()
    }

    /// Advances the clock to `now` and emits the resulting tick.
    /// Returns `None` while the source is stopped.
    pub fn tick(&self, now: Instant) -> Option<Tick> {
        let mut clock = self.clock.get()?;

        let delta = now
            .saturating_duration_since(clock.last)
            .as_secs_f64()
            .min(self.max_delta);
        clock.last = now;
        self.clock.set(Some(clock));

        let tick = Tick {
            elapsed: now.saturating_duration_since(clock.start).as_secs_f64(),
            delta,
        };
        self.source.emit(&tick);
        Some(tick)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    #[test]
    fn ticks_before_start_are_ignored() {
        let time = TimeService::new(0.1);
        assert_eq!(time.tick(Instant::now()), None);
    }

    #[test]
    fn tick_reports_elapsed_and_delta() {
        let time = TimeService::new(1.0);
        let start = Instant::now();
        time.start(start);

        let first = time.tick(start + Duration::from_millis(20)).unwrap();
        assert!((first.delta - 0.020).abs() < 1e-9);
        assert!((first.elapsed - 0.020).abs() < 1e-9);

        let second = time.tick(start + Duration::from_millis(50)).unwrap();
        assert!((second.delta - 0.030).abs() < 1e-9);
        assert!((second.elapsed - 0.050).abs() < 1e-9);
    }

    #[test]
    fn delta_is_clamped_after_a_stall() {
        let time = TimeService::new(0.1);
        let start = Instant::now();
        time.start(start);

        let tick = time.tick(start + Duration::from_secs(3)).unwrap();
        assert!((tick.delta - 0.1).abs() < 1e-9);
        assert!((tick.elapsed - 3.0).abs() < 1e-9);
    }

    #[test]
    fn consumers_receive_ticks_until_stopped() {
        let time = TimeService::new(0.1);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let _sub = {
            let seen = Rc::clone(&seen);
            time.on_tick(move |tick| seen.borrow_mut().push(tick.elapsed))
        };

        let start = Instant::now();
        time.start(start);
        time.tick(start + Duration::from_millis(16));
        time.stop();
        time.tick(start + Duration::from_millis(32));

        assert_eq!(seen.borrow().len(), 1);
        assert!(!time.is_running());
    }
}
