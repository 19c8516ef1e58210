//! Sign-in screen rendering.
//!
//! A pure view over the app state: the form card with its fields, the
//! per-channel passcode rows (only while requested), inline validation
//! errors, and the generic failure banner.

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
};

use crate::app::{App, Focus};
use crate::auth::channel::{ChannelState, OtpChannel};
use crate::auth::credentials::{CredentialField, CODE_LEN, COUNTRY_CODES};
use crate::auth::flow::SubmissionState;

use super::helpers::{centered_rect, SPINNER_FRAMES};
use super::theme::{
    COLOR_ACCENT, COLOR_BORDER, COLOR_DIM, COLOR_DISABLED, COLOR_ERROR, COLOR_HEADER,
};

const CARD_WIDTH: u16 = 58;

pub fn render_sign_in(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Outer block with double border
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

    let subtitle = Paragraph::new("Enter your credentials and verify with 2FA")
        .style(Style::default().fg(COLOR_DIM))
        .alignment(Alignment::Center);
    frame.render_widget(subtitle, Rect::new(inner.x, inner.y + 1, inner.width, 1));

    let lines = form_lines(app);
    let card_height = lines.len() as u16 + 2;
    let body = Rect::new(
        inner.x,
        inner.y + 3,
        inner.width,
        inner.height.saturating_sub(3),
    );
    let card_area = centered_rect(body, CARD_WIDTH, card_height);

    let card_block = Block::default()
        .title(" Admin Sign-In ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(COLOR_BORDER));
    let card = Paragraph::new(lines)
        .block(card_block)
        .wrap(Wrap { trim: false });
    frame.render_widget(card, card_area);
}

fn form_lines(app: &App) -> Vec<Line<'static>> {
    let creds = app.flow.credentials();
    let mut lines = Vec::new();

    // Email channel
    lines.push(text_row("Email", creds.email.clone(), app.focus == Focus::Email, false));
    push_error(&mut lines, app, CredentialField::Email);
    lines.push(button_row(
        otp_button_label(app.flow.channel(OtpChannel::Email)),
        app.focus == Focus::SendEmailOtp,
        app.flow.can_request(OtpChannel::Email),
    ));
    if app.flow.channel(OtpChannel::Email).requested {
        lines.push(code_row(
            "Email OTP",
            &creds.email_otp,
            app.focus == Focus::EmailOtp,
        ));
        push_error(&mut lines, app, CredentialField::EmailOtp);
    }
    lines.push(Line::default());

    // Phone channel
    lines.push(country_row(&creds.country_code, app.focus == Focus::CountryCode));
    lines.push(text_row(
        "Phone Number",
        creds.phone_number.clone(),
        app.focus == Focus::PhoneNumber,
        false,
    ));
    push_error(&mut lines, app, CredentialField::PhoneNumber);
    lines.push(button_row(
        otp_button_label(app.flow.channel(OtpChannel::Phone)),
        app.focus == Focus::SendPhoneOtp,
        app.flow.can_request(OtpChannel::Phone),
    ));
    if app.flow.channel(OtpChannel::Phone).requested {
        lines.push(code_row(
            "Phone OTP",
            &creds.phone_otp,
            app.focus == Focus::PhoneOtp,
        ));
        push_error(&mut lines, app, CredentialField::PhoneOtp);
    }
    lines.push(Line::default());

    // Password and authenticator
    lines.push(text_row(
        "Password",
        creds.password.clone(),
        app.focus == Focus::Password,
        true,
    ));
    push_error(&mut lines, app, CredentialField::Password);
    lines.push(code_row(
        "Authenticator Code",
        &creds.authenticator_code,
        app.focus == Focus::AuthenticatorCode,
    ));
    push_error(&mut lines, app, CredentialField::AuthenticatorCode);
    lines.push(Line::default());

    // Remember me and submit
    lines.push(checkbox_row(
        "Remember me",
        creds.remember_me,
        app.focus == Focus::RememberMe,
    ));
    lines.push(submit_row(app));

    if let SubmissionState::Failed(reason) = app.flow.submission() {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            format!("  ✗ {}", reason.user_message()),
            Style::default().fg(COLOR_ERROR),
        )));
    }

    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "  [Tab] Next  [Enter] Select/Log in  [Esc] Quit",
        Style::default().fg(COLOR_DIM),
    )));

    lines
}

/// Label for a channel's request button, mirroring its lifecycle.
fn otp_button_label(state: &ChannelState) -> String {
    if state.in_flight {
        "Checking...".to_string()
    } else if state.requested {
        if state.seconds_remaining > 0 {
            format!("Resend in {}s", state.seconds_remaining)
        } else {
            "Reset OTP".to_string()
        }
    } else {
        "Send OTP".to_string()
    }
}

fn marker(focused: bool) -> Span<'static> {
    if focused {
        Span::styled("▸ ", Style::default().fg(COLOR_ACCENT))
    } else {
        Span::raw("  ")
    }
}

fn value_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(COLOR_ACCENT).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    }
}

fn text_row(label: &str, value: String, focused: bool, masked: bool) -> Line<'static> {
    let shown = if masked {
        "•".repeat(value.chars().count())
    } else {
        value
    };
    let caret = if focused { "▏" } else { "" };
    Line::from(vec![
        marker(focused),
        Span::styled(format!("{:<20}", label), Style::default().fg(COLOR_DIM)),
        Span::styled(format!("{}{}", shown, caret), value_style(focused)),
    ])
}

/// Six single-digit cells, filled left to right.
fn code_row(label: &str, value: &str, focused: bool) -> Line<'static> {
    let mut cells = String::new();
    for i in 0..CODE_LEN {
        let c = value.chars().nth(i).unwrap_or('_');
        cells.push(c);
        if i + 1 < CODE_LEN {
            cells.push(' ');
        }
    }
    Line::from(vec![
        marker(focused),
        Span::styled(format!("{:<20}", label), Style::default().fg(COLOR_DIM)),
        Span::styled(cells, value_style(focused)),
    ])
}

fn country_row(code: &str, focused: bool) -> Line<'static> {
    let label = COUNTRY_CODES
        .iter()
        .find(|(value, _)| *value == code)
        .map(|(_, label)| *label)
        .unwrap_or(code);
    Line::from(vec![
        marker(focused),
        Span::styled(format!("{:<20}", "Code"), Style::default().fg(COLOR_DIM)),
        Span::styled(format!("◂ {} ▸", label), value_style(focused)),
    ])
}

fn button_row(label: String, focused: bool, enabled: bool) -> Line<'static> {
    let style = if focused {
        Style::default().fg(COLOR_ACCENT).add_modifier(Modifier::BOLD)
    } else if enabled {
        Style::default()
    } else {
        Style::default().fg(COLOR_DISABLED)
    };
    Line::from(vec![
        marker(focused),
        Span::raw(" ".repeat(20)),
        Span::styled(format!("[ {} ]", label), style),
    ])
}

fn checkbox_row(label: &str, checked: bool, focused: bool) -> Line<'static> {
    let mark = if checked { "[x]" } else { "[ ]" };
    Line::from(vec![
        marker(focused),
        Span::styled(format!("{} {}", mark, label), value_style(focused)),
    ])
}

fn submit_row(app: &App) -> Line<'static> {
    let focused = app.focus == Focus::Submit;
    if app.flow.is_submitting() {
        let frame = SPINNER_FRAMES[app.tick_count as usize % SPINNER_FRAMES.len()];
        Line::from(vec![
            marker(focused),
            Span::styled(
                format!("{} Logging in...", frame),
                Style::default().fg(COLOR_DISABLED),
            ),
        ])
    } else {
        button_row("Log in".to_string(), focused, true)
    }
}

fn push_error(lines: &mut Vec<Line<'static>>, app: &App, field: CredentialField) {
    if let Some(err) = app.flow.field_error(field) {
        lines.push(Line::from(Span::styled(
            format!("    {}", err),
            Style::default().fg(COLOR_ERROR),
        )));
    }
}
