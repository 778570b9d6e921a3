/// Input events the viewer understands.
/// The host translates its platform events into these.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// The cursor moved to absolute window coordinates (x, y), y down.
    PointerMove { x: f32, y: f32 },
    /// The cursor was captured (or re-captured). The next move sample is a
    /// reference point, not a delta.
    PointerCapture,
    /// Scroll wheel moved. Only `dy` drives zoom.
    Scroll { dx: f32, dy: f32 },
    /// A key was pressed (auto-repeat may send this again while held).
    KeyDown { key_code: u32 },
    /// A key was released.
    KeyUp { key_code: u32 },
    /// The drawable surface changed size.
    Resize { width: u32, height: u32 },
    /// The host asks the viewer to stop (window close).
    CloseRequested,
}

/// A queue of input events.
/// The host pushes events as they arrive; the viewer drains them once per frame.
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32),
        }
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Drain all pending events. Returns a Vec and clears the queue.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    /// Iterate over pending events without consuming them.
    pub fn iter(&self) -> impl Iterator<Item = &InputEvent> {
        self.events.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_drain() {
        let mut q = InputQueue::new();
        q.push(InputEvent::PointerMove { x: 10.0, y: 20.0 });
        q.push(InputEvent::KeyDown { key_code: 32 });
        assert_eq!(q.len(), 2);
        let events = q.drain();
        assert_eq!(events.len(), 2);
        assert!(q.is_empty());
    }

    #[test]
    fn drain_preserves_arrival_order() {
        let mut q = InputQueue::new();
        q.push(InputEvent::KeyDown { key_code: 87 });
        q.push(InputEvent::KeyUp { key_code: 87 });
        q.push(InputEvent::CloseRequested);
        let seen: Vec<_> = q.iter().copied().collect();
        assert_eq!(
            seen,
            vec![
                InputEvent::KeyDown { key_code: 87 },
                InputEvent::KeyUp { key_code: 87 },
                InputEvent::CloseRequested,
            ]
        );
        assert_eq!(q.drain(), seen);
    }
}
