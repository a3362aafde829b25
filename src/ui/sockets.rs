use ratatui::{
    prelude::*,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
};

use crate::app::App;
use crate::utils::centered_rect;

pub fn draw_sockets(f: &mut Frame, app: &mut App, area: Rect) {
    let table_state = TableState::default()
        .with_selected(Some(app.socket_offset.min(app.sockets.len().saturating_sub(1))));

    let rows = app
        .sockets
        .iter()
        .map(|socket| {
            let remote = match (&socket.remote_ip_addr, socket.remote_port) {
                (Some(addr), Some(port)) => format!("{}:{}", addr, port),
                (Some(addr), None) => addr.clone(),
                _ => "-".to_string(),
            };
            // Attribution may be missing; that is data, not a failure.
            let (pid, name, user) = match &socket.process {
                Some(process) => (
                    format!("{}", process.pid),
                    process.name.clone(),
                    process
                        .user_info
                        .as_ref()
                        .map(|user| user.user_name.clone())
                        .unwrap_or_else(|| "-".to_string()),
                ),
                None => ("-".to_string(), "-".to_string(), "-".to_string()),
            };
            Row::new(vec![
                Cell::from(socket.protocol.as_str()),
                Cell::from(format!("{}:{}", socket.local_ip_addr, socket.local_port)),
                Cell::from(remote),
                Cell::from(socket.status.to_string()),
                Cell::from(pid),
                Cell::from(name),
                Cell::from(user),
            ])
        })
        .collect::<Vec<_>>();

    let widths = [
        Constraint::Length(6),  // Proto
        Constraint::Length(26), // Local
        Constraint::Length(26), // Remote
        Constraint::Length(13), // Status
        Constraint::Length(7),  // PID
        Constraint::Length(20), // Process
        Constraint::Min(10),    // User
    ];

    let table = Table::new(rows, widths)
        .header(
            Row::new(vec![
                Cell::from("Proto"),
                Cell::from("Local"),
                Cell::from("Remote"),
                Cell::from("Status"),
                Cell::from("PID"),
                Cell::from("Process"),
                Cell::from("User"),
            ])
            .style(Style::default().fg(Color::Yellow)),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Sockets ({})", app.sockets.len())),
        )
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");

    f.render_stateful_widget(table, area, &mut table_state.clone());

    if app.sockets.is_empty() {
        let message = Paragraph::new("No socket snapshot received yet...")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray));
        f.render_widget(message, centered_rect(60, 20, area));
    }
}
