use std::collections::HashMap;
use std::net::IpAddr;

use serde::{Deserialize, Serialize};

use super::display::resolve_protocol;
use super::record::PacketFrame;
use crate::utils::{is_local_ip, timestamp_now, IpRange};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Egress,
    Ingress,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficInfo {
    pub packet_sent: usize,
    pub packet_received: usize,
    pub bytes_sent: usize,
    pub bytes_received: usize,
}

impl TrafficInfo {
    pub fn new() -> Self {
        TrafficInfo {
            packet_sent: 0,
            packet_received: 0,
            bytes_sent: 0,
            bytes_received: 0,
        }
    }

    fn count(&mut self, direction: Direction, bytes: usize) {
        match direction {
            Direction::Egress => {
                self.packet_sent += 1;
                self.bytes_sent += bytes;
            }
            Direction::Ingress => {
                self.packet_received += 1;
                self.bytes_received += bytes;
            }
        }
    }

    pub fn total_bytes(&self) -> usize {
        self.bytes_sent + self.bytes_received
    }

    pub fn total_packets(&self) -> usize {
        self.packet_sent + self.packet_received
    }
}

// Running traffic summary for one remote peer on one interface. Hostname
// and geo/ASN attribution are opaque strings filled in by external
// resolvers; this core never populates them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteHostInfo {
    pub if_index: u32,
    pub if_name: String,
    pub mac_addr: String,
    pub ip_addr: IpAddr,
    pub hostname: String,
    pub country_code: String,
    pub country_name: String,
    pub asn: String,
    pub as_name: String,
    pub traffic_info: TrafficInfo,
    pub protocol_stat: HashMap<String, TrafficInfo>,
    pub first_seen: String,
    pub updated_at: String,
}

impl RemoteHostInfo {
    pub fn new(if_index: u32, if_name: String, mac_addr: String, ip_addr: IpAddr, now: String) -> Self {
        RemoteHostInfo {
            if_index,
            if_name,
            mac_addr,
            ip_addr,
            hostname: String::new(),
            country_code: String::new(),
            country_name: String::new(),
            asn: String::new(),
            as_name: String::new(),
            traffic_info: TrafficInfo::new(),
            protocol_stat: HashMap::new(),
            first_seen: now.clone(),
            updated_at: now,
        }
    }
}

// Per-peer traffic aggregation keyed by (interface, peer address). Shared
// between the producer thread and the UI behind a mutex; all methods are
// plain synchronous mutations.
#[derive(Debug)]
pub struct HostStats {
    pub remote_hosts: HashMap<(u32, IpAddr), RemoteHostInfo>,
    local_networks: Vec<IpRange>,
}

impl HostStats {
    pub fn new(local_networks: Vec<IpRange>) -> Self {
        HostStats {
            remote_hosts: HashMap::new(),
            local_networks,
        }
    }

    pub fn reset(&mut self) {
        self.remote_hosts.clear();
    }

    // Folds one frame into the per-peer counters. Frames whose peer cannot
    // be identified (no IP layer, unparseable addresses) are skipped; the
    // aggregate never moves backwards.
    pub fn update(&mut self, frame: &PacketFrame) {
        let (source, destination) = match frame_addrs(frame) {
            Some(addrs) => addrs,
            None => return,
        };

        // A packet counts as sent when its source is one of the local
        // host's addresses, received otherwise.
        let direction = if is_local_ip(source, &self.local_networks) {
            Direction::Egress
        } else {
            Direction::Ingress
        };
        let peer = match direction {
            Direction::Egress => destination,
            Direction::Ingress => source,
        };
        let mac_addr = peer_mac(frame, direction);
        let protocol = resolve_protocol(frame);

        // One timestamp per record so a freshly created aggregate has
        // first_seen == updated_at.
        let now = timestamp_now();
        let host = self
            .remote_hosts
            .entry((frame.if_index, peer))
            .or_insert_with(|| {
                RemoteHostInfo::new(
                    frame.if_index,
                    frame.if_name.clone(),
                    mac_addr,
                    peer,
                    now.clone(),
                )
            });
        host.traffic_info.count(direction, frame.packet_len);
        host.protocol_stat
            .entry(protocol)
            .or_insert_with(TrafficInfo::new)
            .count(direction, frame.packet_len);
        host.updated_at = now;
    }

    pub fn host_count(&self) -> usize {
        self.remote_hosts.len()
    }
}

fn frame_addrs(frame: &PacketFrame) -> Option<(IpAddr, IpAddr)> {
    let ip = frame.ip.as_ref()?;
    if let Some(ipv4) = &ip.ipv4 {
        let src = ipv4.source.parse().ok()?;
        let dst = ipv4.destination.parse().ok()?;
        return Some((src, dst));
    }
    if let Some(ipv6) = &ip.ipv6 {
        let src = ipv6.source.parse().ok()?;
        let dst = ipv6.destination.parse().ok()?;
        return Some((src, dst));
    }
    None
}

// The peer's hardware address sits on the far side of the ethernet header
// relative to the traffic direction.
fn peer_mac(frame: &PacketFrame, direction: Direction) -> String {
    let ethernet = frame
        .datalink
        .as_ref()
        .and_then(|datalink| datalink.ethernet.as_ref());
    match ethernet {
        Some(ethernet) => match direction {
            Direction::Egress => ethernet.destination.clone(),
            Direction::Ingress => ethernet.source.clone(),
        },
        None => "00:00:00:00:00:00".to_string(),
    }
}
