use serde::{Deserialize, Serialize};

use super::types::{DatalinkLayer, IpLayer, TransportLayer};

// One captured packet as delivered by the capture engine. Created once,
// immutable afterwards. capture_no is strictly increasing within a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PacketFrame {
    pub capture_no: usize,
    pub if_index: u32,
    pub if_name: String,
    pub datalink: Option<DatalinkLayer>,
    pub ip: Option<IpLayer>,
    pub transport: Option<TransportLayer>,
    pub packet_len: usize,
    pub timestamp: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransportProtocol {
    TCP,
    UDP,
}

impl TransportProtocol {
    pub fn as_str(&self) -> &str {
        match self {
            TransportProtocol::TCP => "TCP",
            TransportProtocol::UDP => "UDP",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AddressFamily {
    IPv4,
    IPv6,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SocketStatus {
    Closed,
    Listen,
    SynSent,
    SynReceived,
    Established,
    FinWait1,
    FinWait2,
    CloseWait,
    Closing,
    LastAck,
    TimeWait,
    DeleteTcb,
    Unknown,
}

impl std::fmt::Display for SocketStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let label = match self {
            SocketStatus::Closed => "CLOSED",
            SocketStatus::Listen => "LISTEN",
            SocketStatus::SynSent => "SYN_SENT",
            SocketStatus::SynReceived => "SYN_RCVD",
            SocketStatus::Established => "ESTABLISHED",
            SocketStatus::FinWait1 => "FIN_WAIT_1",
            SocketStatus::FinWait2 => "FIN_WAIT_2",
            SocketStatus::CloseWait => "CLOSE_WAIT",
            SocketStatus::Closing => "CLOSING",
            SocketStatus::LastAck => "LAST_ACK",
            SocketStatus::TimeWait => "TIME_WAIT",
            SocketStatus::DeleteTcb => "DELETE_TCB",
            SocketStatus::Unknown => "UNKNOWN",
        };
        write!(f, "{}", label)
    }
}

// User attribution for a process. Absent on the owning record when the
// engine could not resolve it (permissions, kernel threads).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    pub user_id: String,
    pub group_id: String,
    pub user_name: String,
    pub groups: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessInfo {
    pub pid: u32,
    pub name: String,
    pub exe_path: String,
    pub cmd: Vec<String>,
    pub status: String,
    pub user_info: Option<UserInfo>,
    pub start_time: String,
    pub elapsed_time: u64,
}

// One socket table entry. Remote peer is absent for listening sockets;
// process is absent when attribution failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocketInfo {
    pub local_ip_addr: String,
    pub local_port: u16,
    pub remote_ip_addr: Option<String>,
    pub remote_port: Option<u16>,
    pub protocol: TransportProtocol,
    pub status: SocketStatus,
    pub ip_version: AddressFamily,
    pub process: Option<ProcessInfo>,
}

#[cfg(test)]
mod tests {
    use super::*;

    // The JSON field names and nullability are the contract with the
    // capture engine and must survive reserialization untouched.
    #[test]
    fn packet_frame_wire_fields() {
        let raw = r#"{
            "capture_no": 42,
            "if_index": 2,
            "if_name": "eth0",
            "datalink": {
                "ethernet": {
                    "destination": "ff:ff:ff:ff:ff:ff",
                    "source": "aa:bb:cc:dd:ee:ff",
                    "ethertype": "IPv4"
                },
                "arp": null
            },
            "ip": {
                "ipv4": {
                    "version": 4,
                    "header_length": 5,
                    "dscp": 0,
                    "ecn": 0,
                    "total_length": 60,
                    "identification": 1234,
                    "flags": 2,
                    "fragment_offset": 0,
                    "ttl": 64,
                    "next_level_protocol": "Tcp",
                    "checksum": 40000,
                    "source": "10.0.0.1",
                    "destination": "10.0.0.2",
                    "options": [
                        {"copied": 0, "class": 0, "number": "Nop", "length": null},
                        {"copied": 1, "class": 0, "number": "Timestamp", "length": 8}
                    ]
                },
                "ipv6": null,
                "icmp": null,
                "icmpv6": null
            },
            "transport": null,
            "packet_len": 60,
            "timestamp": "2024-05-01T10:00:00+09:00"
        }"#;
        let frame: PacketFrame = serde_json::from_str(raw).unwrap();
        assert_eq!(frame.capture_no, 42);
        assert!(frame.transport.is_none());
        let ipv4 = frame.ip.as_ref().unwrap().ipv4.as_ref().unwrap();
        // Option order is wire order, never resorted.
        assert_eq!(ipv4.options[0].number, "Nop");
        assert_eq!(ipv4.options[0].length, None);
        assert_eq!(ipv4.options[1].length, Some(8));

        let back = serde_json::to_value(&frame).unwrap();
        assert_eq!(back["if_name"], "eth0");
        assert_eq!(back["datalink"]["arp"], serde_json::Value::Null);
        assert_eq!(back["ip"]["ipv4"]["options"][0]["length"], serde_json::Value::Null);
        assert_eq!(back["ip"]["ipv4"]["next_level_protocol"], "Tcp");
    }

    #[test]
    fn socket_info_nullable_remote_and_process() {
        let raw = r#"{
            "local_ip_addr": "0.0.0.0",
            "local_port": 8080,
            "remote_ip_addr": null,
            "remote_port": null,
            "protocol": "TCP",
            "status": "Listen",
            "ip_version": "IPv4",
            "process": null
        }"#;
        let socket: SocketInfo = serde_json::from_str(raw).unwrap();
        assert_eq!(socket.protocol, TransportProtocol::TCP);
        assert_eq!(socket.status, SocketStatus::Listen);
        assert!(socket.remote_ip_addr.is_none());
        assert!(socket.process.is_none());
        assert_eq!(socket.status.to_string(), "LISTEN");
    }

    #[test]
    fn process_info_with_user() {
        let raw = r#"{
            "pid": 1234,
            "name": "curl",
            "exe_path": "/usr/bin/curl",
            "cmd": ["curl", "https://example.com"],
            "status": "Run",
            "user_info": {
                "user_id": "1000",
                "group_id": "1000",
                "user_name": "alice",
                "groups": ["alice", "wheel"]
            },
            "start_time": "2024-05-01T09:59:00+09:00",
            "elapsed_time": 60
        }"#;
        let proc: ProcessInfo = serde_json::from_str(raw).unwrap();
        assert_eq!(proc.cmd.len(), 2);
        assert_eq!(proc.user_info.as_ref().unwrap().user_name, "alice");
    }
}
