use ratatui::{
    prelude::*,
    style::{Color, Style},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap},
};

use crate::app::App;
use crate::network::display::PacketFrameExt;
use crate::utils::centered_rect;

// Timestamps are RFC3339; the table only has room for the clock part.
fn short_time(timestamp: &str) -> &str {
    timestamp.get(11..19).unwrap_or(timestamp)
}

pub fn draw_packets(f: &mut Frame, app: &mut App, area: Rect) {
    // Rows available inside the borders, minus the header line.
    let viewport = area.height.saturating_sub(3) as usize;
    app.packet_viewport = viewport;

    let rows = app
        .feed
        .rows()
        .iter()
        .skip(app.packet_offset)
        .take(viewport)
        .map(|row| {
            Row::new(vec![
                Cell::from(format!("{}", row.capture_no)),
                Cell::from(short_time(&row.timestamp).to_string()),
                Cell::from(row.src_addr.clone()),
                Cell::from(row.dst_addr.clone()),
                Cell::from(match (row.src_port, row.dst_port) {
                    (Some(src), Some(dst)) => format!("{} \u{2192} {}", src, dst),
                    _ => String::new(),
                }),
                Cell::from(row.protocol.clone()),
                Cell::from(format!("{}", row.packet_len)),
                Cell::from(row.info.clone()),
            ])
        })
        .collect::<Vec<_>>();

    let widths = [
        Constraint::Length(7),  // No.
        Constraint::Length(8),  // Time
        Constraint::Length(24), // Source
        Constraint::Length(24), // Destination
        Constraint::Length(13), // Ports
        Constraint::Length(7),  // Proto
        Constraint::Length(6),  // Len
        Constraint::Min(20),    // Info
    ];

    let follow = if app.autoscroll.pinned() {
        "following"
    } else {
        "paused (End to follow)"
    };
    let title = format!("Packets ({}) - {}", app.feed.len(), follow);

    let table = Table::new(rows, widths)
        .header(
            Row::new(vec![
                Cell::from("No."),
                Cell::from("Time"),
                Cell::from("Source"),
                Cell::from("Destination"),
                Cell::from("Ports"),
                Cell::from("Proto"),
                Cell::from("Len"),
                Cell::from("Info"),
            ])
            .style(Style::default().fg(Color::Yellow)),
        )
        .block(Block::default().borders(Borders::ALL).title(title));

    f.render_widget(table, area);

    if app.feed.is_empty() {
        let message = Paragraph::new("Waiting for records...")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray));
        f.render_widget(message, centered_rect(60, 20, area));
    }
}

// Full-frame view of the newest visible packet, layers included.
pub fn draw_packet_detail(f: &mut Frame, ext: &PacketFrameExt, area: Rect) {
    let detail_area = centered_rect(70, 70, area);
    f.render_widget(Clear, detail_area);

    let mut lines: Vec<String> = vec![
        format!("No. {}  {}", ext.capture_no, ext.timestamp),
        format!("Interface: {} ({})", ext.if_name, ext.if_index),
        format!("{} \u{2192} {}  [{}]", ext.src_addr, ext.dst_addr, ext.protocol),
        format!("Length: {}", ext.packet_len),
        format!("Info: {}", ext.info),
        String::new(),
    ];

    if let Some(datalink) = &ext.datalink {
        if let Some(ethernet) = &datalink.ethernet {
            lines.push(format!(
                "Ethernet: {} \u{2192} {} ({})",
                ethernet.source, ethernet.destination, ethernet.ethertype
            ));
        }
        if let Some(arp) = &datalink.arp {
            lines.push(format!(
                "ARP: {} {} ({}) \u{2192} {} ({})",
                arp.operation,
                arp.sender_proto_addr,
                arp.sender_hw_addr,
                arp.target_proto_addr,
                arp.target_hw_addr
            ));
        }
    }
    if let Some(ip) = &ext.ip {
        if let Some(ipv4) = &ip.ipv4 {
            lines.push(format!(
                "IPv4: ttl={} id={} proto={} options={}",
                ipv4.ttl,
                ipv4.identification,
                ipv4.next_level_protocol,
                ipv4.options.len()
            ));
        }
        if let Some(ipv6) = &ip.ipv6 {
            lines.push(format!(
                "IPv6: hop_limit={} next={}",
                ipv6.hop_limit, ipv6.next_header
            ));
        }
        if let Some(icmp) = &ip.icmp {
            lines.push(format!("ICMP: {} ({})", icmp.icmp_type, icmp.icmp_code));
        }
        if let Some(icmpv6) = &ip.icmpv6 {
            lines.push(format!(
                "ICMPv6: {} ({})",
                icmpv6.icmpv6_type, icmpv6.icmpv6_code
            ));
        }
    }
    if let Some(transport) = &ext.transport {
        if let Some(tcp) = &transport.tcp {
            lines.push(format!(
                "TCP: seq={} ack={} win={} flags={:#010b} options={}",
                tcp.sequence,
                tcp.acknowledgement,
                tcp.window,
                tcp.flags,
                tcp.options.len()
            ));
        }
        if let Some(udp) = &transport.udp {
            lines.push(format!("UDP: len={} checksum={:#06x}", udp.length, udp.checksum));
        }
    }
    lines.push(String::new());
    lines.push("Press Enter or Esc to close".to_string());

    let detail = Paragraph::new(lines.join("\n"))
        .block(Block::default().title("Packet Detail").borders(Borders::ALL))
        .wrap(Wrap { trim: false });
    f.render_widget(detail, detail_area);
}
