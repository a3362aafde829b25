use std::sync::{
    atomic::AtomicBool,
    Arc, Mutex,
};

use crossbeam_channel::Receiver;

use crate::config::Config;
use crate::feed::{AutoscrollController, LiveFeed, ScrollMetrics};
use crate::network::aggregator::HostStats;
use crate::network::display::PacketFrameExt;
use crate::network::record::SocketInfo;
use crate::source::RecordEnvelope;

// Tab enum for better organization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Packets,
    RemoteHosts,
    Sockets,
}

impl Tab {
    pub fn to_string(&self) -> &str {
        match self {
            Tab::Packets => "Packets",
            Tab::RemoteHosts => "Remote Hosts",
            Tab::Sockets => "Sockets",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Tab::Packets => Tab::RemoteHosts,
            Tab::RemoteHosts => Tab::Sockets,
            Tab::Sockets => Tab::Packets,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            Tab::Packets => Tab::Sockets,
            Tab::RemoteHosts => Tab::Packets,
            Tab::Sockets => Tab::RemoteHosts,
        }
    }
}

// Options for sorting the remote hosts table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostSort {
    TotalBytes,
    TotalPackets,
    UpdatedAt,
}

impl HostSort {
    pub fn to_string(&self) -> &str {
        match self {
            HostSort::TotalBytes => "Bytes",
            HostSort::TotalPackets => "Packets",
            HostSort::UpdatedAt => "Last Seen",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            HostSort::TotalBytes => HostSort::TotalPackets,
            HostSort::TotalPackets => HostSort::UpdatedAt,
            HostSort::UpdatedAt => HostSort::TotalBytes,
        }
    }
}

pub struct App {
    pub feed: LiveFeed,
    pub autoscroll: AutoscrollController,
    pub host_stats: Arc<Mutex<HostStats>>,
    pub sockets: Vec<SocketInfo>,
    pub rx: Receiver<RecordEnvelope>,
    pub running: Arc<AtomicBool>,
    pub current_tab: Tab,
    pub show_help: bool,
    pub show_detail: bool,
    pub host_sort: HostSort,
    // Scroll state per table. packet_viewport is recorded by the draw pass
    // so key handling can build ScrollMetrics for the controller.
    pub packet_offset: usize,
    pub packet_viewport: usize,
    pub host_offset: usize,
    pub socket_offset: usize,
}

impl App {
    pub fn new(
        config: &Config,
        rx: Receiver<RecordEnvelope>,
        host_stats: Arc<Mutex<HostStats>>,
        running: Arc<AtomicBool>,
    ) -> Self {
        App {
            feed: LiveFeed::new(config.feed_capacity),
            autoscroll: AutoscrollController::new(config.autoscroll_threshold),
            host_stats,
            sockets: Vec::new(),
            rx,
            running,
            current_tab: Tab::Packets,
            show_help: false,
            show_detail: false,
            host_sort: HostSort::TotalBytes,
            packet_offset: 0,
            packet_viewport: 0,
            host_offset: 0,
            socket_offset: 0,
        }
    }

    // Drains everything the producer delivered since the last tick. One
    // mutation notification per batch, however large the batch is.
    pub fn update(&mut self) {
        let mut appended = 0;
        while let Ok(envelope) = self.rx.try_recv() {
            match envelope {
                RecordEnvelope::Packet(frame) => {
                    self.feed.push(frame);
                    appended += 1;
                }
                RecordEnvelope::Sockets(sockets) => {
                    self.sockets = sockets;
                }
            }
        }
        if appended > 0 {
            if let Some(offset) = self.autoscroll.on_mutation(self.packet_metrics()) {
                self.packet_offset = offset;
            }
        }
    }

    pub fn packet_metrics(&self) -> ScrollMetrics {
        ScrollMetrics {
            offset: self.packet_offset,
            viewport: self.packet_viewport,
            content: self.feed.len(),
        }
    }

    // User-initiated scroll on the packets table. Every call re-evaluates
    // the pinned state.
    pub fn scroll_packets_by(&mut self, delta: isize) {
        let bottom = self.packet_metrics().bottom_offset();
        let offset = self.packet_offset as isize + delta;
        self.packet_offset = offset.clamp(0, bottom as isize) as usize;
        self.autoscroll.on_scroll(self.packet_metrics());
    }

    pub fn scroll_packets_to_top(&mut self) {
        self.packet_offset = 0;
        self.autoscroll.on_scroll(self.packet_metrics());
    }

    pub fn scroll_packets_to_bottom(&mut self) {
        self.packet_offset = self.packet_metrics().bottom_offset();
        self.autoscroll.on_scroll(self.packet_metrics());
    }

    // The newest visible row, rebuilt with its layers for the detail view.
    pub fn detail_packet(&self) -> Option<PacketFrameExt> {
        if self.feed.is_empty() {
            return None;
        }
        let last_visible = (self.packet_offset + self.packet_viewport.max(1))
            .min(self.feed.len())
            - 1;
        self.feed.frame(last_visible).map(PacketFrameExt::from_frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::record::PacketFrame;
    use crate::utils::default_local_networks;
    use std::sync::atomic::AtomicBool;

    fn bare_frame(no: usize) -> PacketFrame {
        PacketFrame {
            capture_no: no,
            if_index: 1,
            if_name: "eth0".to_string(),
            datalink: None,
            ip: None,
            transport: None,
            packet_len: 64,
            timestamp: "2024-05-01T10:00:00+09:00".to_string(),
        }
    }

    fn test_app(rx: Receiver<RecordEnvelope>) -> App {
        let stats = Arc::new(Mutex::new(HostStats::new(default_local_networks())));
        let mut app = App::new(&Config::default(), rx, stats, Arc::new(AtomicBool::new(true)));
        app.packet_viewport = 10;
        app
    }

    #[test]
    fn pinned_view_follows_appended_batch() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let mut app = test_app(rx);

        for no in 1..=50 {
            tx.send(RecordEnvelope::Packet(bare_frame(no))).unwrap();
        }
        app.update();

        assert_eq!(app.feed.len(), 50);
        assert_eq!(app.packet_offset, 40);
        assert!(app.autoscroll.pinned());
    }

    #[test]
    fn unpinned_view_keeps_reading_position() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let mut app = test_app(rx);

        for no in 1..=50 {
            tx.send(RecordEnvelope::Packet(bare_frame(no))).unwrap();
        }
        app.update();

        // Reader scrolls far up: unpinned.
        app.scroll_packets_by(-35);
        assert_eq!(app.packet_offset, 5);
        assert!(!app.autoscroll.pinned());

        // More rows arrive; the offset must not move.
        for no in 51..=80 {
            tx.send(RecordEnvelope::Packet(bare_frame(no))).unwrap();
        }
        app.update();
        assert_eq!(app.packet_offset, 5);

        // Jumping back to the bottom re-pins.
        app.scroll_packets_to_bottom();
        assert!(app.autoscroll.pinned());
    }

    #[test]
    fn socket_snapshot_replaces_previous() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let mut app = test_app(rx);
        tx.send(RecordEnvelope::Sockets(Vec::new())).unwrap();
        app.update();
        assert!(app.sockets.is_empty());
    }
}
