use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

use crate::utils::centered_rect;

pub fn draw_help_overlay(f: &mut Frame, area: Rect) {
    // Create a centered box for the help
    let help_area = centered_rect(60, 60, area);

    // Clear the area first
    f.render_widget(ratatui::widgets::Clear, help_area);

    let help_text = "
Keyboard Shortcuts

q: Quit the application
←/→: Navigate between tabs
h: Show/hide this help

----- Packets Tab Shortcuts -----
↑/↓: Scroll the live feed (scrolling away pauses following)
PgUp/PgDn: Page up/down
Home: Jump to the oldest retained packet
End: Jump to the newest packet and resume following
Enter: Show/hide detail for the newest visible packet

----- Remote Hosts Tab Shortcuts -----
s: Change sorting (Bytes, Packets, Last Seen)
c: Clear accumulated host aggregates
↑/↓: Navigate the host list

----- Sockets Tab Shortcuts -----
↑/↓: Navigate the socket list

Press any key to close this help
";

    let help = Paragraph::new(help_text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .alignment(Alignment::Center)
        .wrap(ratatui::widgets::Wrap { trim: true });

    f.render_widget(help, help_area);
}
