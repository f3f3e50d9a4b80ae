/// Horizontal scroll position over a repeating strip of items.
///
/// The offset always stays in `[0, total_width)` once there is something to
/// scroll; an empty strip leaves it untouched.
#[derive(Debug, Clone, Default)]
pub struct ScrollClock {
    offset: f32,
    speed: f32,
    item_span: f32,
    count: usize,
}

/// Wrap `offset` into `[0, total)`. Non-positive totals leave it alone.
pub fn wrap_offset(offset: f32, total: f32) -> f32 {
    if !offset.is_finite() {
        return 0.0;
    }
    if !total.is_finite() || total <= 0.0 {
        return offset;
    }
    let wrapped = offset.rem_euclid(total);
    // rem_euclid can round up to `total` for tiny negative inputs
    if wrapped >= total { 0.0 } else { wrapped }
}

impl ScrollClock {
    /// Apply the current speed, item span and item count.
    /// The offset is re-wrapped if the strip got shorter.
    pub fn configure(&mut self, speed: f32, item_span: f32, count: usize) {
        self.speed = speed;
        self.item_span = item_span;
        self.count = count;
        if count > 0 {
            self.offset = wrap_offset(self.offset, self.total_width());
        }
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn total_width(&self) -> f32 {
        self.count as f32 * self.item_span
    }

    /// Move the strip by `speed * elapsed` pixels
    pub fn advance(&mut self, elapsed: f32) {
        if self.count == 0 || !elapsed.is_finite() {
            return;
        }
        let total = self.total_width();
        if total <= 0.0 {
            return;
        }
        self.offset = wrap_offset(self.offset + self.speed * elapsed, total);
    }

    /// First and last item index touched by a viewport starting at the
    /// current offset. `last` is smaller than `first` when the window wraps.
    pub fn visible_window(&self, viewport_width: f32) -> Option<(usize, usize)> {
        if self.count == 0 || self.item_span <= 0.0 || !viewport_width.is_finite() {
            return None;
        }
        let first = (self.offset / self.item_span).floor() as usize % self.count;
        let visible = ((viewport_width.max(0.0) / self.item_span).ceil() as usize + 1).min(self.count);
        let last = (first + visible - 1) % self.count;
        Some((first, last))
    }
}
