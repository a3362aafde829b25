use std::collections::VecDeque;

use crate::network::display::PacketDisplayData;
use crate::network::record::PacketFrame;

pub const DEFAULT_FEED_CAPACITY: usize = 10_000;
pub const DEFAULT_AUTOSCROLL_THRESHOLD: usize = 3;

// Snapshot of the viewport at the moment an event is handled. offset is the
// index of the first visible row, viewport the number of visible rows,
// content the total number of rows backing the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollMetrics {
    pub offset: usize,
    pub viewport: usize,
    pub content: usize,
}

impl ScrollMetrics {
    // Rows between the bottom of the viewport and the bottom of the content.
    fn distance_to_bottom(&self) -> usize {
        self.content.saturating_sub(self.offset + self.viewport)
    }

    pub fn bottom_offset(&self) -> usize {
        self.content.saturating_sub(self.viewport)
    }
}

// Decides, per UI event, whether the view follows new content. Owns nothing
// but the pinned flag; rendering-framework agnostic.
#[derive(Debug, Clone)]
pub struct AutoscrollController {
    pinned_to_bottom: bool,
    threshold: usize,
}

impl AutoscrollController {
    pub fn new(threshold: usize) -> Self {
        AutoscrollController {
            pinned_to_bottom: true,
            threshold,
        }
    }

    pub fn pinned(&self) -> bool {
        self.pinned_to_bottom
    }

    // Called on every user-initiated scroll event. Scrolling away from the
    // bottom unpins; scrolling back within the threshold re-pins.
    pub fn on_scroll(&mut self, metrics: ScrollMetrics) -> bool {
        self.pinned_to_bottom = metrics.distance_to_bottom() < self.threshold;
        self.pinned_to_bottom
    }

    // Called once per content-append batch. Returns the offset to force the
    // viewport to when pinned; None leaves the reader's position untouched.
    pub fn on_mutation(&self, metrics: ScrollMetrics) -> Option<usize> {
        if self.pinned_to_bottom {
            Some(metrics.bottom_offset())
        } else {
            None
        }
    }
}

impl Default for AutoscrollController {
    fn default() -> Self {
        AutoscrollController::new(DEFAULT_AUTOSCROLL_THRESHOLD)
    }
}

// Append-only buffer of display rows with a bounded retention window. Rows
// arrive in non-decreasing capture_no order; the producer guarantees that,
// the feed just stores them. The matching source frames are kept alongside
// so the detail view can be rebuilt from the original record.
pub struct LiveFeed {
    rows: VecDeque<PacketDisplayData>,
    frames: VecDeque<PacketFrame>,
    capacity: usize,
}

impl LiveFeed {
    pub fn new(capacity: usize) -> Self {
        LiveFeed {
            rows: VecDeque::new(),
            frames: VecDeque::new(),
            capacity,
        }
    }

    pub fn push(&mut self, frame: PacketFrame) {
        if self.rows.len() == self.capacity {
            self.rows.pop_front();
            self.frames.pop_front();
        }
        self.rows.push_back(PacketDisplayData::from_frame(&frame));
        self.frames.push_back(frame);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &VecDeque<PacketDisplayData> {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&PacketDisplayData> {
        self.rows.get(index)
    }

    pub fn frame(&self, index: usize) -> Option<&PacketFrame> {
        self.frames.get(index)
    }
}
