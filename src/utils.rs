use std::net::IpAddr;

use chrono::Local;

// Simplified network range for checking if an IP is local
#[derive(Debug, Clone)]
pub struct IpRange {
    base: [u8; 4],
    mask: [u8; 4],
}

impl IpRange {
    pub fn new(base: [u8; 4], prefix: u8) -> Self {
        let mut mask = [0; 4];
        for i in 0..4 {
            if (i * 8) < prefix as usize {
                if (i + 1) * 8 <= prefix as usize {
                    // Full byte is masked
                    mask[i] = 0xFF;
                } else {
                    // Partial byte
                    let bits = prefix as usize - (i * 8);
                    mask[i] = 0xFF << (8 - bits);
                }
            }
        }

        IpRange { base, mask }
    }

    pub fn contains(&self, ip: &IpAddr) -> bool {
        if let IpAddr::V4(ipv4) = ip {
            let octets = ipv4.octets();
            for i in 0..4 {
                if (octets[i] & self.mask[i]) != (self.base[i] & self.mask[i]) {
                    return false;
                }
            }
            true
        } else {
            false
        }
    }
}

// Checks the configured ranges plus the IPv6 scopes that are always local.
pub fn is_local_ip(ip: IpAddr, local_networks: &[IpRange]) -> bool {
    match ip {
        IpAddr::V4(_) => local_networks.iter().any(|net| net.contains(&ip)),
        IpAddr::V6(ipv6) => {
            // loopback or link-local (fe80::/10)
            ipv6.is_loopback() || (ipv6.segments()[0] & 0xffc0) == 0xfe80
        }
    }
}

// Default local ranges used when the config does not name any.
pub fn default_local_networks() -> Vec<IpRange> {
    vec![
        IpRange::new([10, 0, 0, 0], 8),     // 10.0.0.0/8
        IpRange::new([172, 16, 0, 0], 12),  // 172.16.0.0/12
        IpRange::new([192, 168, 0, 0], 16), // 192.168.0.0/16
        IpRange::new([127, 0, 0, 0], 8),    // 127.0.0.0/8
        IpRange::new([169, 254, 0, 0], 16), // 169.254.0.0/16
    ]
}

// Record timestamps are RFC3339 in local time, same as the capture engine.
pub fn timestamp_now() -> String {
    Local::now().to_rfc3339()
}

// Helper function to format bytes
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

// Helper to create centered rect
pub fn centered_rect(percent_x: u16, percent_y: u16, r: ratatui::prelude::Rect) -> ratatui::prelude::Rect {
    use ratatui::prelude::*;

    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ip_range_matches_prefix() {
        let range = IpRange::new([172, 16, 0, 0], 12);
        assert!(range.contains(&"172.20.1.1".parse().unwrap()));
        assert!(!range.contains(&"172.32.0.1".parse().unwrap()));
    }

    #[test]
    fn v6_link_local_is_local() {
        assert!(is_local_ip("fe80::1".parse().unwrap(), &[]));
        assert!(is_local_ip("::1".parse().unwrap(), &[]));
        assert!(!is_local_ip("2001:db8::1".parse().unwrap(), &[]));
    }
}
