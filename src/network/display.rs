use serde::{Deserialize, Serialize};

use super::record::PacketFrame;
use super::types::{tcp_flags, DatalinkLayer, IpLayer, TransportLayer};

// Rendered for any field that could not be resolved from the frame.
pub const UNRESOLVED: &str = "-";

// Flattened, render-ready projection of a PacketFrame. Never persisted;
// always regenerable from its source frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PacketDisplayData {
    pub capture_no: usize,
    pub timestamp: String,
    pub if_index: u32,
    pub if_name: String,
    pub src_addr: String,
    pub dst_addr: String,
    pub src_port: Option<u16>,
    pub dst_port: Option<u16>,
    pub protocol: String,
    pub packet_len: usize,
    pub info: String,
}

// Display fields plus the original layers, for the packet detail view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PacketFrameExt {
    pub capture_no: usize,
    pub timestamp: String,
    pub if_index: u32,
    pub if_name: String,
    pub src_addr: String,
    pub dst_addr: String,
    pub src_port: Option<u16>,
    pub dst_port: Option<u16>,
    pub protocol: String,
    pub packet_len: usize,
    pub info: String,
    pub datalink: Option<DatalinkLayer>,
    pub ip: Option<IpLayer>,
    pub transport: Option<TransportLayer>,
}

// Most specific successfully decoded layer wins: ICMP variants over the
// transport protocol, transport over the raw IP next-level code, IP over
// the datalink ethertype.
pub fn resolve_protocol(frame: &PacketFrame) -> String {
    if let Some(ip) = &frame.ip {
        if ip.icmp.is_some() {
            return "ICMP".to_string();
        }
        if ip.icmpv6.is_some() {
            return "ICMPv6".to_string();
        }
    }
    if let Some(transport) = &frame.transport {
        if transport.tcp.is_some() {
            return "TCP".to_string();
        }
        if transport.udp.is_some() {
            return "UDP".to_string();
        }
    }
    if let Some(ip) = &frame.ip {
        if let Some(ipv4) = &ip.ipv4 {
            return ipv4.next_level_protocol.to_uppercase();
        }
        if let Some(ipv6) = &ip.ipv6 {
            return ipv6.next_header.to_uppercase();
        }
    }
    if let Some(datalink) = &frame.datalink {
        if datalink.arp.is_some() {
            return "ARP".to_string();
        }
        if let Some(ethernet) = &datalink.ethernet {
            return ethernet.ethertype.to_uppercase();
        }
    }
    "UNKNOWN".to_string()
}

// IP layer addresses first, then datalink hardware addresses, then the
// placeholder. Absence of a layer is data, not an error.
fn resolve_addrs(frame: &PacketFrame) -> (String, String) {
    if let Some(ip) = &frame.ip {
        if let Some(ipv4) = &ip.ipv4 {
            return (ipv4.source.clone(), ipv4.destination.clone());
        }
        if let Some(ipv6) = &ip.ipv6 {
            return (ipv6.source.clone(), ipv6.destination.clone());
        }
    }
    if let Some(datalink) = &frame.datalink {
        if let Some(arp) = &datalink.arp {
            return (arp.sender_hw_addr.clone(), arp.target_hw_addr.clone());
        }
        if let Some(ethernet) = &datalink.ethernet {
            return (ethernet.source.clone(), ethernet.destination.clone());
        }
    }
    (UNRESOLVED.to_string(), UNRESOLVED.to_string())
}

// Ports only exist for port-bearing protocols. Anything else gets None,
// never zero.
fn resolve_ports(frame: &PacketFrame, protocol: &str) -> (Option<u16>, Option<u16>) {
    let transport = match &frame.transport {
        Some(transport) => transport,
        None => return (None, None),
    };
    match protocol {
        "TCP" => transport
            .tcp
            .as_ref()
            .map(|tcp| (Some(tcp.source), Some(tcp.destination)))
            .unwrap_or((None, None)),
        "UDP" => transport
            .udp
            .as_ref()
            .map(|udp| (Some(udp.source), Some(udp.destination)))
            .unwrap_or((None, None)),
        _ => (None, None),
    }
}

// One formatter per protocol family. New protocols plug in here without
// touching the projector or any consumer.
pub trait InfoFormatter: Sync {
    fn format(&self, frame: &PacketFrame) -> String;
}

struct TcpInfo;
struct UdpInfo;
struct IcmpInfo;
struct Icmpv6Info;
struct ArpInfo;
struct GenericInfo;

pub fn formatter_for(protocol: &str) -> &'static dyn InfoFormatter {
    match protocol {
        "TCP" => &TcpInfo,
        "UDP" => &UdpInfo,
        "ICMP" => &IcmpInfo,
        "ICMPv6" => &Icmpv6Info,
        "ARP" => &ArpInfo,
        _ => &GenericInfo,
    }
}

fn tcp_flag_names(flags: u8) -> String {
    let mut names: Vec<&str> = Vec::new();
    if flags & tcp_flags::SYN != 0 {
        names.push("SYN");
    }
    if flags & tcp_flags::FIN != 0 {
        names.push("FIN");
    }
    if flags & tcp_flags::RST != 0 {
        names.push("RST");
    }
    if flags & tcp_flags::PSH != 0 {
        names.push("PSH");
    }
    if flags & tcp_flags::ACK != 0 {
        names.push("ACK");
    }
    if flags & tcp_flags::URG != 0 {
        names.push("URG");
    }
    if flags & tcp_flags::ECE != 0 {
        names.push("ECE");
    }
    if flags & tcp_flags::CWR != 0 {
        names.push("CWR");
    }
    names.join(", ")
}

impl InfoFormatter for TcpInfo {
    fn format(&self, frame: &PacketFrame) -> String {
        let tcp = match frame.transport.as_ref().and_then(|t| t.tcp.as_ref()) {
            Some(tcp) => tcp,
            None => return format!("TCP Len={}", frame.packet_len),
        };
        format!(
            "[{}] Seq={} Ack={} Win={} Len={}",
            tcp_flag_names(tcp.flags),
            tcp.sequence,
            tcp.acknowledgement,
            tcp.window,
            frame.packet_len
        )
    }
}

impl InfoFormatter for UdpInfo {
    fn format(&self, frame: &PacketFrame) -> String {
        let udp = match frame.transport.as_ref().and_then(|t| t.udp.as_ref()) {
            Some(udp) => udp,
            None => return format!("UDP Len={}", frame.packet_len),
        };
        format!("{} \u{2192} {} Len={}", udp.source, udp.destination, udp.length)
    }
}

impl InfoFormatter for IcmpInfo {
    fn format(&self, frame: &PacketFrame) -> String {
        let icmp = match frame.ip.as_ref().and_then(|ip| ip.icmp.as_ref()) {
            Some(icmp) => icmp,
            None => return format!("ICMP Len={}", frame.packet_len),
        };
        format!("{} ({})", icmp.icmp_type, icmp.icmp_code)
    }
}

impl InfoFormatter for Icmpv6Info {
    fn format(&self, frame: &PacketFrame) -> String {
        let icmpv6 = match frame.ip.as_ref().and_then(|ip| ip.icmpv6.as_ref()) {
            Some(icmpv6) => icmpv6,
            None => return format!("ICMPv6 Len={}", frame.packet_len),
        };
        format!("{} ({})", icmpv6.icmpv6_type, icmpv6.icmpv6_code)
    }
}

impl InfoFormatter for ArpInfo {
    fn format(&self, frame: &PacketFrame) -> String {
        let arp = match frame.datalink.as_ref().and_then(|dl| dl.arp.as_ref()) {
            Some(arp) => arp,
            None => return format!("ARP Len={}", frame.packet_len),
        };
        let op = arp.operation.to_lowercase();
        if op.contains("request") {
            format!("Who has {}? Tell {}", arp.target_proto_addr, arp.sender_proto_addr)
        } else if op.contains("reply") {
            format!("{} is at {}", arp.sender_proto_addr, arp.sender_hw_addr)
        } else {
            format!(
                "{} {} \u{2192} {}",
                arp.operation, arp.sender_proto_addr, arp.target_proto_addr
            )
        }
    }
}

impl InfoFormatter for GenericInfo {
    fn format(&self, frame: &PacketFrame) -> String {
        format!("{} Len={}", resolve_protocol(frame), frame.packet_len)
    }
}

impl PacketDisplayData {
    // Total function: every frame projects to a row, whatever is missing.
    pub fn from_frame(frame: &PacketFrame) -> Self {
        let protocol = resolve_protocol(frame);
        let (src_addr, dst_addr) = resolve_addrs(frame);
        let (src_port, dst_port) = resolve_ports(frame, &protocol);
        let info = formatter_for(&protocol).format(frame);
        PacketDisplayData {
            capture_no: frame.capture_no,
            timestamp: frame.timestamp.clone(),
            if_index: frame.if_index,
            if_name: frame.if_name.clone(),
            src_addr,
            dst_addr,
            src_port,
            dst_port,
            protocol,
            packet_len: frame.packet_len,
            info,
        }
    }
}

impl PacketFrameExt {
    pub fn from_frame(frame: &PacketFrame) -> Self {
        let row = PacketDisplayData::from_frame(frame);
        PacketFrameExt {
            capture_no: row.capture_no,
            timestamp: row.timestamp,
            if_index: row.if_index,
            if_name: row.if_name,
            src_addr: row.src_addr,
            dst_addr: row.dst_addr,
            src_port: row.src_port,
            dst_port: row.dst_port,
            protocol: row.protocol,
            packet_len: row.packet_len,
            info: row.info,
            datalink: frame.datalink.clone(),
            ip: frame.ip.clone(),
            transport: frame.transport.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::types::*;

    fn tcp_header(src: u16, dst: u16, flags: u8) -> TcpHeader {
        TcpHeader {
            source: src,
            destination: dst,
            sequence: 1000,
            acknowledgement: 2000,
            data_offset: 5,
            reserved: 0,
            flags,
            window: 65535,
            checksum: 0,
            urgent_ptr: 0,
            options: Vec::new(),
        }
    }

    fn ipv4_header(src: &str, dst: &str, next: &str) -> Ipv4Header {
        Ipv4Header {
            version: 4,
            header_length: 5,
            dscp: 0,
            ecn: 0,
            total_length: 60,
            identification: 0,
            flags: 2,
            fragment_offset: 0,
            ttl: 64,
            next_level_protocol: next.to_string(),
            checksum: 0,
            source: src.to_string(),
            destination: dst.to_string(),
            options: Vec::new(),
        }
    }

    fn frame(
        datalink: Option<DatalinkLayer>,
        ip: Option<IpLayer>,
        transport: Option<TransportLayer>,
    ) -> PacketFrame {
        PacketFrame {
            capture_no: 1,
            if_index: 2,
            if_name: "eth0".to_string(),
            datalink,
            ip,
            transport,
            packet_len: 60,
            timestamp: "2024-05-01T10:00:00+09:00".to_string(),
        }
    }

    #[test]
    fn tcp_ipv4_syn_ack_projects_fully() {
        let f = frame(
            None,
            Some(IpLayer {
                ipv4: Some(ipv4_header("10.0.0.1", "10.0.0.2", "Tcp")),
                ..Default::default()
            }),
            Some(TransportLayer {
                tcp: Some(tcp_header(443, 51000, tcp_flags::SYN | tcp_flags::ACK)),
                udp: None,
            }),
        );
        let row = PacketDisplayData::from_frame(&f);
        assert_eq!(row.src_addr, "10.0.0.1");
        assert_eq!(row.dst_addr, "10.0.0.2");
        assert_eq!(row.src_port, Some(443));
        assert_eq!(row.dst_port, Some(51000));
        assert_eq!(row.protocol, "TCP");
        assert!(row.info.contains("SYN, ACK"));
        assert!(row.info.contains("Seq=1000"));
    }

    #[test]
    fn projection_is_idempotent() {
        let f = frame(
            None,
            Some(IpLayer {
                ipv4: Some(ipv4_header("192.168.1.5", "8.8.8.8", "Udp")),
                ..Default::default()
            }),
            Some(TransportLayer {
                tcp: None,
                udp: Some(UdpHeader {
                    source: 53124,
                    destination: 53,
                    length: 48,
                    checksum: 0,
                }),
            }),
        );
        assert_eq!(
            PacketDisplayData::from_frame(&f),
            PacketDisplayData::from_frame(&f)
        );
    }

    #[test]
    fn icmp_wins_over_transport() {
        // Contradictory but representable: both ICMP and TCP decoded. The
        // more specific ICMP label must win.
        let f = frame(
            None,
            Some(IpLayer {
                ipv4: Some(ipv4_header("10.0.0.1", "10.0.0.2", "Icmp")),
                icmp: Some(IcmpHeader {
                    icmp_type: "Echo Request".to_string(),
                    icmp_code: "No Code".to_string(),
                    checksum: 0,
                }),
                ..Default::default()
            }),
            Some(TransportLayer {
                tcp: Some(tcp_header(1, 2, tcp_flags::SYN)),
                udp: None,
            }),
        );
        let row = PacketDisplayData::from_frame(&f);
        assert_eq!(row.protocol, "ICMP");
        // Port suppression: ICMP is not port-bearing even though a
        // transport layer is present.
        assert_eq!(row.src_port, None);
        assert_eq!(row.dst_port, None);
        assert!(row.info.contains("Echo Request"));
    }

    #[test]
    fn falls_back_to_ip_protocol_code_then_ethertype() {
        let f = frame(
            Some(DatalinkLayer {
                ethernet: Some(EthernetHeader {
                    destination: "ff:ff:ff:ff:ff:ff".to_string(),
                    source: "aa:bb:cc:dd:ee:ff".to_string(),
                    ethertype: "IPv4".to_string(),
                }),
                arp: None,
            }),
            Some(IpLayer {
                ipv4: Some(ipv4_header("10.0.0.1", "10.0.0.2", "Ospf")),
                ..Default::default()
            }),
            None,
        );
        let row = PacketDisplayData::from_frame(&f);
        assert_eq!(row.protocol, "OSPF");
        assert_eq!(row.src_port, None);

        let eth_only = frame(
            Some(DatalinkLayer {
                ethernet: Some(EthernetHeader {
                    destination: "ff:ff:ff:ff:ff:ff".to_string(),
                    source: "aa:bb:cc:dd:ee:ff".to_string(),
                    ethertype: "Vlan".to_string(),
                }),
                arp: None,
            }),
            None,
            None,
        );
        let row = PacketDisplayData::from_frame(&eth_only);
        assert_eq!(row.protocol, "VLAN");
        // No IP layer: addresses come from the datalink hardware addresses.
        assert_eq!(row.src_addr, "aa:bb:cc:dd:ee:ff");
        assert_eq!(row.dst_addr, "ff:ff:ff:ff:ff:ff");
    }

    #[test]
    fn arp_request_info() {
        let f = frame(
            Some(DatalinkLayer {
                ethernet: None,
                arp: Some(ArpHeader {
                    hardware_type: "Ethernet".to_string(),
                    protocol_type: "Ipv4".to_string(),
                    hw_addr_len: 6,
                    proto_addr_len: 4,
                    operation: "Request".to_string(),
                    sender_hw_addr: "aa:bb:cc:dd:ee:ff".to_string(),
                    sender_proto_addr: "192.168.1.10".to_string(),
                    target_hw_addr: "00:00:00:00:00:00".to_string(),
                    target_proto_addr: "192.168.1.1".to_string(),
                }),
            }),
            None,
            None,
        );
        let row = PacketDisplayData::from_frame(&f);
        assert_eq!(row.protocol, "ARP");
        assert_eq!(row.src_addr, "aa:bb:cc:dd:ee:ff");
        assert_eq!(row.info, "Who has 192.168.1.1? Tell 192.168.1.10");
    }

    #[test]
    fn empty_frame_uses_placeholders() {
        let f = frame(None, None, None);
        let row = PacketDisplayData::from_frame(&f);
        assert_eq!(row.src_addr, UNRESOLVED);
        assert_eq!(row.dst_addr, UNRESOLVED);
        assert_eq!(row.protocol, "UNKNOWN");
        assert_eq!(row.src_port, None);
        assert_eq!(row.dst_port, None);
    }

    #[test]
    fn ext_keeps_layers_alongside_display_fields() {
        let f = frame(
            None,
            Some(IpLayer {
                ipv4: Some(ipv4_header("10.0.0.1", "10.0.0.2", "Tcp")),
                ..Default::default()
            }),
            Some(TransportLayer {
                tcp: Some(tcp_header(22, 40000, tcp_flags::ACK)),
                udp: None,
            }),
        );
        let ext = PacketFrameExt::from_frame(&f);
        assert_eq!(ext.protocol, "TCP");
        assert_eq!(ext.transport, f.transport);
        assert_eq!(ext.ip, f.ip);
    }
}
