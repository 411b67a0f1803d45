//! Widget layout and drawing.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::state::StatusKind;

use super::{App, Field};

pub(super) fn draw(f: &mut Frame, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),  // address bar
            Constraint::Length(9),  // forms
            Constraint::Min(5),     // feed
            Constraint::Length(3),  // status
            Constraint::Length(1),  // key hints
        ])
        .split(f.size());

    draw_address_bar(f, app, rows[0]);
    draw_forms(f, app, rows[1]);
    draw_feed(f, app, rows[2]);
    draw_status(f, app, rows[3]);
    draw_hints(f, rows[4]);
}

fn input_block(title: &str, focused: bool) -> Block<'_> {
    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Block::default()
        .borders(Borders::ALL)
        .title(format!(" {title} "))
        .border_style(border_style)
}

fn draw_address_bar(f: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == Field::Address;
    let input = Paragraph::new(app.address_input.as_str())
        .block(input_block("API address (Enter: connect)", focused));
    f.render_widget(input, area);
}

fn draw_forms(f: &mut Frame, app: &App, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    // Registration form.
    let register_rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .split(columns[0]);

    let email = Paragraph::new(app.session.credentials.email.as_str())
        .block(input_block("Email", app.focus == Field::Email));
    f.render_widget(email, register_rows[0]);

    let username = Paragraph::new(app.session.credentials.username.as_str())
        .block(input_block("Username", app.focus == Field::Username));
    f.render_widget(username, register_rows[1]);

    let masked = "\u{2022}".repeat(app.session.credentials.password.chars().count());
    let password =
        Paragraph::new(masked).block(input_block("Password", app.focus == Field::Password));
    f.render_widget(password, register_rows[2]);

    // Compose form.
    let compose_rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)])
        .split(columns[1]);

    let author = Paragraph::new(app.session.post_draft.author_id.as_str())
        .block(input_block("Author id", app.focus == Field::AuthorId));
    f.render_widget(author, compose_rows[0]);

    let content = Paragraph::new(app.session.post_draft.content.as_str())
        .wrap(Wrap { trim: false })
        .block(input_block("What's happening?", app.focus == Field::Content));
    f.render_widget(content, compose_rows[1]);
}

fn draw_feed(f: &mut Frame, app: &App, area: Rect) {
    let title = if app.session.feed.is_loading {
        " Feed (loading...) "
    } else {
        " Feed "
    };

    let items: Vec<ListItem> = if app.session.feed.posts.is_empty() {
        vec![ListItem::new(Line::from(Span::styled(
            "No posts yet. Create one using the form above.",
            Style::default().fg(Color::DarkGray),
        )))]
    } else {
        app.session
            .feed
            .posts
            .iter()
            .map(|post| {
                let mut meta = format!("#{} by author #{}", post.id, post.author_id);
                if let Some(created_at) = post.created_at {
                    meta.push_str(&format!(" at {}", created_at.format("%Y-%m-%d %H:%M")));
                }
                ListItem::new(vec![
                    Line::from(Span::styled(
                        meta,
                        Style::default()
                            .fg(Color::DarkGray)
                            .add_modifier(Modifier::ITALIC),
                    )),
                    Line::from(post.content.as_str()),
                ])
            })
            .collect()
    };

    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(list, area);
}

fn draw_status(f: &mut Frame, app: &App, area: Rect) {
    let (text, style) = match &app.session.status {
        Some(status) => {
            let color = match status.kind {
                StatusKind::Success => Color::Green,
                StatusKind::Error => Color::Red,
            };
            (status.text.as_str(), Style::default().fg(color))
        }
        None => ("", Style::default()),
    };

    let status = Paragraph::new(text)
        .style(style)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(" Status "));
    f.render_widget(status, area);
}

fn draw_hints(f: &mut Frame, area: Rect) {
    let hints = Paragraph::new(
        "Tab: next field  Enter: submit  Ctrl-R: refresh feed  Esc: quit",
    )
    .style(Style::default().fg(Color::DarkGray));
    f.render_widget(hints, area);
}
