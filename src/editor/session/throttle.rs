use std::time::Duration;

/// Rate limiter for drag samples plus a trailing change notification.
///
/// Samples arriving sooner than `min_interval` after the last accepted one are
/// dropped. When a gesture ends, one notification becomes due `quiet_period`
/// later; none fire while a gesture is still running.
#[derive(Debug, Clone)]
pub struct DragThrottle {
    min_interval: Duration,
    quiet_period: Duration,
    last_accepted: Option<Duration>,
    notify_at: Option<Duration>,
    gesture_active: bool,
}

impl DragThrottle {
    pub fn new(min_interval: Duration, quiet_period: Duration) -> Self {
        Self {
            min_interval,
            quiet_period,
            last_accepted: None,
            notify_at: None,
            gesture_active: false,
        }
    }

    pub fn configure(&mut self, min_interval: Duration, quiet_period: Duration) {
        self.min_interval = min_interval;
        self.quiet_period = quiet_period;
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    pub fn begin(&mut self) {
        self.gesture_active = true;
        self.last_accepted = None;
    }

    /// Whether a sample at `now` should be applied
    pub fn accept(&mut self, now: Duration) -> bool {
        if let Some(last) = self.last_accepted
            && now.saturating_sub(last) < self.min_interval
        {
            return false;
        }
        self.last_accepted = Some(now);
        true
    }

    /// End the gesture and schedule its single trailing notification
    pub fn finish(&mut self, now: Duration) {
        self.gesture_active = false;
        self.last_accepted = None;
        self.notify_at = Some(now + self.quiet_period);
    }

    /// True exactly once per finished gesture, after the quiet period
    pub fn poll(&mut self, now: Duration) -> bool {
        if self.gesture_active {
            return false;
        }
        match self.notify_at {
            Some(due) if now >= due => {
                self.notify_at = None;
                true
            }
            _ => false,
        }
    }

    pub fn reset(&mut self) {
        self.gesture_active = false;
        self.last_accepted = None;
        self.notify_at = None;
    }
}
