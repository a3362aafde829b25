use serde::{Deserialize, Serialize};

// Raw TCP flag bits as they appear on the wire. Decoding policy (which
// combinations mean what) belongs to the presentation layer.
pub mod tcp_flags {
    pub const FIN: u8 = 0b0000_0001;
    pub const SYN: u8 = 0b0000_0010;
    pub const RST: u8 = 0b0000_0100;
    pub const PSH: u8 = 0b0000_1000;
    pub const ACK: u8 = 0b0001_0000;
    pub const URG: u8 = 0b0010_0000;
    pub const ECE: u8 = 0b0100_0000;
    pub const CWR: u8 = 0b1000_0000;
}

// One layer group per stack layer. At most one variant is populated per
// group; an entirely empty group means the decoder could not go deeper.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatalinkLayer {
    pub ethernet: Option<EthernetHeader>,
    pub arp: Option<ArpHeader>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IpLayer {
    pub ipv4: Option<Ipv4Header>,
    pub ipv6: Option<Ipv6Header>,
    pub icmp: Option<IcmpHeader>,
    pub icmpv6: Option<Icmpv6Header>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransportLayer {
    pub tcp: Option<TcpHeader>,
    pub udp: Option<UdpHeader>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EthernetHeader {
    pub destination: String,
    pub source: String,
    pub ethertype: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArpHeader {
    pub hardware_type: String,
    pub protocol_type: String,
    pub hw_addr_len: u8,
    pub proto_addr_len: u8,
    pub operation: String,
    pub sender_hw_addr: String,
    pub sender_proto_addr: String,
    pub target_hw_addr: String,
    pub target_proto_addr: String,
}

// Options preserve wire order. Kinds without a length marker (NOP/EOL)
// carry length = None.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ipv4OptionHeader {
    pub copied: u8,
    pub class: u8,
    pub number: String,
    pub length: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ipv4Header {
    pub version: u8,
    pub header_length: u8,
    pub dscp: u8,
    pub ecn: u8,
    pub total_length: u16,
    pub identification: u16,
    pub flags: u8,
    pub fragment_offset: u16,
    pub ttl: u8,
    pub next_level_protocol: String,
    pub checksum: u16,
    pub source: String,
    pub destination: String,
    pub options: Vec<Ipv4OptionHeader>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ipv6Header {
    pub version: u8,
    pub traffic_class: u8,
    pub flow_label: u32,
    pub payload_length: u16,
    pub next_header: String,
    pub hop_limit: u8,
    pub source: String,
    pub destination: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IcmpHeader {
    pub icmp_type: String,
    pub icmp_code: String,
    pub checksum: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Icmpv6Header {
    pub icmpv6_type: String,
    pub icmpv6_code: String,
    pub checksum: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TcpOptionHeader {
    pub kind: String,
    pub length: Option<u8>,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TcpHeader {
    pub source: u16,
    pub destination: u16,
    pub sequence: u32,
    pub acknowledgement: u32,
    pub data_offset: u8,
    pub reserved: u8,
    pub flags: u8,
    pub window: u16,
    pub checksum: u16,
    pub urgent_ptr: u16,
    pub options: Vec<TcpOptionHeader>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UdpHeader {
    pub source: u16,
    pub destination: u16,
    pub length: u16,
    pub checksum: u16,
}

