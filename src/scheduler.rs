// Recurring per-frame task, armed only while there is something to animate.
// Visual: none by itself; it decides whether the glitter/fade gets a step this frame.
//
// The host offers a frame on every display refresh; the card keeps the handle
// `start` gave it and only steps while the scheduler still owns that handle.
// Cancelling retires the handle for good; re-arming hands out a new one.

/// Identifies one armed run of the frame task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

#[derive(Debug, Default)]
pub struct FrameScheduler {
    next_id: u64,
    active: Option<FrameHandle>,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the task. Already armed: keeps (and returns) the current handle.
    pub fn start(&mut self) -> FrameHandle {
        if let Some(h) = self.active {
            return h;
        }
        let h = FrameHandle(self.next_id);
        self.next_id += 1;
        self.active = Some(h);
        tracing::debug!(handle = h.0, "frame loop armed");
        h
    }

    /// Release the handle. Returns the handle that was armed, if any.
    pub fn cancel(&mut self) -> Option<FrameHandle> {
        let h = self.active.take();
        if let Some(h) = h {
            tracing::debug!(handle = h.0, "frame loop released");
        }
        h
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// True when `handle` is the one currently armed.
    pub fn owns(&self, handle: FrameHandle) -> bool {
        self.active == Some(handle)
    }
}
