use ratatui::{
    prelude::*,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
};

use crate::app::{App, HostSort};
use crate::utils::{centered_rect, format_bytes};

pub fn draw_hosts(f: &mut Frame, app: &mut App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with controls
            Constraint::Min(0),    // Host list
        ])
        .split(area);

    let header_text = format!(
        "Sort: {} | Use s to change | Arrow keys to navigate",
        app.host_sort.to_string()
    );
    let header = Paragraph::new(header_text)
        .block(Block::default().borders(Borders::ALL).title("Remote Host Controls"))
        .alignment(Alignment::Center);
    f.render_widget(header, chunks[0]);

    // try_lock so a busy producer never stalls the draw pass.
    if let Ok(stats) = app.host_stats.try_lock() {
        let mut hosts: Vec<_> = stats.remote_hosts.values().collect();
        match app.host_sort {
            HostSort::TotalBytes => {
                hosts.sort_by(|a, b| {
                    b.traffic_info.total_bytes().cmp(&a.traffic_info.total_bytes())
                });
            }
            HostSort::TotalPackets => {
                hosts.sort_by(|a, b| {
                    b.traffic_info
                        .total_packets()
                        .cmp(&a.traffic_info.total_packets())
                });
            }
            HostSort::UpdatedAt => {
                hosts.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
            }
        }

        let table_state = TableState::default()
            .with_selected(Some(app.host_offset.min(hosts.len().saturating_sub(1))));

        let rows = hosts
            .iter()
            .map(|host| {
                let mut protocols: Vec<&str> =
                    host.protocol_stat.keys().map(|k| k.as_str()).collect();
                protocols.sort();
                Row::new(vec![
                    Cell::from(host.if_name.clone()),
                    Cell::from(host.ip_addr.to_string()),
                    Cell::from(host.mac_addr.clone()),
                    Cell::from(format_bytes(host.traffic_info.bytes_sent as u64)),
                    Cell::from(format_bytes(host.traffic_info.bytes_received as u64)),
                    Cell::from(format!("{}", host.traffic_info.total_packets())),
                    Cell::from(protocols.join(",")),
                    Cell::from(host.updated_at.clone()),
                ])
            })
            .collect::<Vec<_>>();

        let widths = [
            Constraint::Length(8),  // Interface
            Constraint::Length(24), // IP
            Constraint::Length(18), // MAC
            Constraint::Length(10), // Sent
            Constraint::Length(10), // Received
            Constraint::Length(8),  // Packets
            Constraint::Length(14), // Protocols
            Constraint::Min(20),    // Last Seen
        ];

        let table = Table::new(rows, widths)
            .header(
                Row::new(vec![
                    Cell::from("If"),
                    Cell::from("Remote IP"),
                    Cell::from("MAC"),
                    Cell::from("Sent"),
                    Cell::from("Received"),
                    Cell::from("Packets"),
                    Cell::from("Protocols"),
                    Cell::from("Last Seen"),
                ])
                .style(Style::default().fg(Color::Yellow)),
            )
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!("Remote Hosts ({})", stats.host_count())),
            )
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");

        f.render_stateful_widget(table, chunks[1], &mut table_state.clone());

        if hosts.is_empty() {
            let message = Paragraph::new("No remote hosts observed yet...")
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::Gray));
            f.render_widget(message, centered_rect(60, 20, chunks[1]));
        }
    } else {
        let message = Paragraph::new("Could not access host data...")
            .alignment(Alignment::Center);
        f.render_widget(message, chunks[1]);
    }
}
