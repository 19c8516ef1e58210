//! Post-login session screen.

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::app::App;

use super::helpers::centered_rect;
use super::theme::{COLOR_BORDER, COLOR_DIM, COLOR_HEADER, COLOR_SUCCESS};

pub fn render_session(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let outer_block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(COLOR_BORDER));
    frame.render_widget(outer_block, area);

    let inner = area.inner(Margin::new(2, 1));

    let title = Paragraph::new("VESTIBULE")
        .style(Style::default().fg(COLOR_HEADER).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center);
    frame.render_widget(title, Rect::new(inner.x, inner.y, inner.width, 1));

    let mut lines = vec![
        Line::from(Span::styled(
            "✓ Successfully signed in!",
            Style::default().fg(COLOR_SUCCESS),
        )),
        Line::default(),
    ];

    if let Some(session) = &app.session {
        lines.push(Line::from(format!("Account:  {}", session.account)));
        lines.push(Line::from(format!("Token:    {}", session.token)));
        lines.push(Line::from(format!(
            "Expires:  {}",
            session.expires_at.format("%Y-%m-%d %H:%M UTC")
        )));
        if app.flow.credentials().remember_me {
            lines.push(Line::from(Span::styled(
                "This device will be remembered.",
                Style::default().fg(COLOR_DIM),
            )));
        }
    }

    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "[l] Sign out  [q] Quit",
        Style::default().fg(COLOR_DIM),
    )));

    let card_height = lines.len() as u16 + 2;
    let card_area = centered_rect(inner, 52, card_height);
    let card = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(COLOR_BORDER)),
        )
        .alignment(Alignment::Center);
    frame.render_widget(card, card_area);
}
