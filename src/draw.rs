use tui::backend::Backend;
use tui::layout::{Alignment, Constraint, Layout, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, Paragraph, Tabs};
use tui::{Frame, Terminal};

use crate::app::{App, MenuItem};
use crate::components::bars;
use crate::state::network::{ERROR_CHAR, LoadingState};
use crate::ui::layout::LayoutAreas;
use chrono::Local;
use hackathon_api::{ActivityItem, ActivityKind, Challenge, Difficulty, LeaderboardRow};

static TABS: &[&str; 4] = &["Leaderboard", "Activity", "Challenges", "Team"];

pub fn draw<B>(terminal: &mut Terminal<B>, app: &mut App, loading: LoadingState)
where
    B: Backend,
{
    let current_size = terminal.size().unwrap_or_default();
    if current_size.width <= 10 || current_size.height <= 10 {
        return;
    }

    let mut layout = LayoutAreas::new(current_size);

    terminal
        .draw(|f| {
            let presentation = app.presentation.is_fullscreen();
            layout.update(f.area(), presentation);

            draw_header(f, layout.header, app);

            if !presentation {
                draw_tabs(f, layout.tab_bar, app);
            }

            let mut main = layout.main;
            let mut logs_area: Option<Rect> = None;
            if app.state.show_logs && main.height >= 16 {
                let [top, bottom] =
                    Layout::vertical([Constraint::Fill(1), Constraint::Length(8)]).areas(main);
                main = top;
                logs_area = Some(bottom);
            }

            match app.state.active_tab {
                MenuItem::Leaderboard => draw_leaderboard(f, main, app),
                MenuItem::Activity => draw_activity(f, main, app),
                MenuItem::Challenges => draw_challenges(f, main, app),
                MenuItem::Team => draw_team(f, main, app),
                MenuItem::Help => draw_help(f, main),
            }

            if let Some(area) = logs_area {
                draw_logs(f, area);
            }

            draw_loading_spinner(f, f.area(), app, loading);
        })
        .unwrap();
}

pub fn default_border<'a>(color: Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}

fn draw_header(f: &mut Frame, header: [Rect; 2], app: &App) {
    let countdown = &app.state.countdown;
    let countdown_style = if countdown.expired {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    } else if countdown.days == 0 && countdown.hours == 0 {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Green)
    };

    let left = Paragraph::new(Line::from(vec![
        Span::styled("Hackathon", Style::default().fg(Color::White).add_modifier(Modifier::BOLD)),
        Span::raw("  deadline "),
        Span::styled(countdown.readout(), countdown_style),
    ]))
    .block(default_border(Color::DarkGray));
    f.render_widget(left, header[0]);

    let status = if let Some(err) = app.state.last_error.as_deref() {
        Line::from(Span::styled(err.to_string(), Style::default().fg(Color::Red)))
    } else {
        let stamp = app
            .state
            .refresh
            .last_updated
            .as_deref()
            .unwrap_or("never")
            .to_string();
        Line::from(vec![
            Span::styled("updated ", Style::default().fg(Color::DarkGray)),
            Span::styled(stamp, Style::default().fg(Color::Gray)),
        ])
    };
    let right = Paragraph::new(status)
        .alignment(Alignment::Right)
        .block(default_border(Color::DarkGray));
    f.render_widget(right, header[1]);
}

fn draw_tabs(f: &mut Frame, tab_bar: [Rect; 2], app: &App) {
    let style = Style::default().fg(Color::White);
    let border_type = BorderType::Rounded;

    let tab_index = match app.state.active_tab {
        MenuItem::Leaderboard => 0,
        MenuItem::Activity => 1,
        MenuItem::Challenges => 2,
        MenuItem::Team => 3,
        MenuItem::Help => 0,
    };

    let titles: Vec<Line> = TABS.iter().map(|t| Line::from(*t)).collect();
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::LEFT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .highlight_style(Style::default().add_modifier(Modifier::UNDERLINED))
        .select(tab_index)
        .style(style);
    f.render_widget(tabs, tab_bar[0]);

    let help = Paragraph::new("Help: ? ")
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .borders(Borders::RIGHT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .style(style);
    f.render_widget(help, tab_bar[1]);
}

fn draw_leaderboard(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Leaderboard ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = &app.state.refresh.snapshot.leaderboard;
    if rows.is_empty() {
        draw_empty_state(f, inner, app, "Waiting for leaderboard data...");
        return;
    }

    let max_score = rows.iter().map(|r| r.score).max().unwrap_or(0);
    let name_width = 18usize;
    // rank(4) + name + score(6) + padding
    let bar_width = inner
        .width
        .saturating_sub(name_width as u16 + 14)
        .min(40);

    let mut lines = Vec::with_capacity(rows.len());
    let offset = app.state.refresh.leaderboard_scroll as usize;
    for row in rows.iter().skip(offset).take(inner.height as usize) {
        lines.push(leaderboard_line(row, max_score, name_width, bar_width));
    }

    f.render_widget(Paragraph::new(lines), inner);
}

fn leaderboard_line(row: &LeaderboardRow, max_score: u32, name_width: usize, bar_width: u16) -> Line<'static> {
    let rank_style = match row.rank {
        1 => Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        2 | 3 => Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        _ => Style::default().fg(Color::Gray),
    };

    Line::from(vec![
        Span::styled(format!("{:>3} ", row.rank), rank_style),
        Span::styled(
            bars::padded_name(&row.team, name_width),
            Style::default().fg(Color::White),
        ),
        Span::styled(format!(" {:>5} ", row.score), Style::default().fg(Color::Gray)),
        Span::styled(
            bars::score_bar(row.score, max_score, bar_width),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(
            format!("  {} commits, {} devs", row.commits, row.contributors),
            Style::default().fg(Color::DarkGray),
        ),
    ])
}

fn draw_activity(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Recent Activity ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let items = &app.state.refresh.snapshot.activity;
    if items.is_empty() {
        draw_empty_state(f, inner, app, "No activity yet. Push some commits!");
        return;
    }

    let mut lines = Vec::new();
    let offset = app.state.refresh.activity_scroll as usize;
    for item in items.iter().skip(offset).take(inner.height as usize) {
        lines.push(activity_line(item, inner.width));
    }

    f.render_widget(Paragraph::new(lines), inner);
}

fn activity_line(item: &ActivityItem, width: u16) -> Line<'static> {
    let stamp = item
        .occurred_at
        .map(|t| t.with_timezone(&Local).format("%H:%M").to_string())
        .unwrap_or_else(|| "--:--".to_string());
    let (icon, icon_style) = match item.kind {
        ActivityKind::Commit => ('●', Style::default().fg(Color::Green)),
        ActivityKind::Submission => ('▶', Style::default().fg(Color::Magenta)),
    };

    let prefix_len = stamp.chars().count() + 3 + item.team.chars().count() + 2;
    let detail_width = (width as usize).saturating_sub(prefix_len).max(8);
    let detail: String = item.detail.chars().take(detail_width).collect();

    Line::from(vec![
        Span::styled(format!("{stamp} "), Style::default().fg(Color::DarkGray)),
        Span::styled(format!("{icon} "), icon_style),
        Span::styled(item.team.clone(), Style::default().fg(Color::White)),
        Span::styled(format!("  {detail}"), Style::default().fg(Color::Gray)),
    ])
}

fn draw_challenges(f: &mut Frame, area: Rect, app: &App) {
    let filter_label = app
        .state
        .challenges
        .filter
        .map(|d| d.label())
        .unwrap_or("all");
    let block = default_border(Color::White).title(format!(" Challenges [{filter_label}] "));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let challenges = &app.state.challenges.challenges;
    if challenges.is_empty() {
        draw_empty_state(f, inner, app, "No challenges match this filter (d cycles it)");
        return;
    }

    let mut list_area = inner;
    let mut detail_area: Option<Rect> = None;
    if inner.width >= 80 {
        let [left, right] =
            Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)]).areas(inner);
        list_area = left;
        detail_area = Some(right);
    }

    let mut lines = Vec::new();
    let selected = app.state.challenges.selected;
    let visible = list_area.height as usize;
    let offset = selected.saturating_sub(visible.saturating_sub(1));
    for (idx, c) in challenges.iter().enumerate().skip(offset).take(visible) {
        let marker = if idx == selected { '>' } else { ' ' };
        let title: String = c.title.chars().take(list_area.width.saturating_sub(14) as usize).collect();
        lines.push(Line::from(vec![
            Span::raw(format!("{marker} ")),
            Span::styled(format!("{:<6} ", c.difficulty.label()), difficulty_style(c.difficulty)),
            Span::styled(
                title,
                if idx == selected {
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::Gray)
                },
            ),
        ]));
    }
    f.render_widget(Paragraph::new(lines), list_area);

    if let Some(detail) = detail_area
        && let Some(challenge) = app.state.challenges.selected_challenge()
    {
        draw_challenge_detail(f, detail, challenge);
    }
}

fn difficulty_style(difficulty: Difficulty) -> Style {
    match difficulty {
        Difficulty::Easy => Style::default().fg(Color::Green),
        Difficulty::Medium => Style::default().fg(Color::Yellow),
        Difficulty::Hard => Style::default().fg(Color::Red),
    }
}

fn draw_challenge_detail(f: &mut Frame, area: Rect, challenge: &Challenge) {
    let block = default_border(Color::DarkGray).title(format!(" {} ", challenge.title));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let tags = challenge
        .tags
        .iter()
        .map(|t| t.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    let mut lines = vec![
        Line::from(vec![
            Span::styled("difficulty: ", Style::default().fg(Color::DarkGray)),
            Span::styled(challenge.difficulty.label(), difficulty_style(challenge.difficulty)),
        ]),
        Line::from(vec![
            Span::styled("tags: ", Style::default().fg(Color::DarkGray)),
            Span::styled(if tags.is_empty() { "none".to_string() } else { tags }, Style::default().fg(Color::Gray)),
        ]),
        Line::from(""),
    ];
    for chunk in wrap_text(&challenge.description, inner.width.max(1) as usize) {
        lines.push(Line::from(Span::styled(chunk, Style::default().fg(Color::White))));
    }

    f.render_widget(Paragraph::new(lines), inner);
}

/// Greedy word wrap; long words are hard-split at the width.
fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > width {
            out.push(std::mem::take(&mut current));
        }
        if word.chars().count() > width {
            for c in word.chars() {
                if current.chars().count() == width {
                    out.push(std::mem::take(&mut current));
                }
                current.push(c);
            }
            continue;
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

fn draw_team(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" My Team ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    if let Some(form) = app.state.team.form.as_ref() {
        draw_team_form(f, inner, form);
        return;
    }

    let Some(team) = app.state.team.team.as_ref() else {
        f.render_widget(
            Paragraph::new("No team yet.\n\nPress e to create one.")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center),
            inner,
        );
        return;
    };

    let mut lines = vec![
        Line::from(Span::styled(
            team.name.clone(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(team.description.clone(), Style::default().fg(Color::Gray))),
        Line::from(vec![
            Span::styled("repo: ", Style::default().fg(Color::DarkGray)),
            Span::styled(team.repository_link.clone(), Style::default().fg(Color::Cyan)),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("leader ", Style::default().fg(Color::DarkGray)),
            Span::styled(team.leader.clone(), Style::default().fg(Color::Yellow)),
            Span::styled(
                format!("   {} contributors", team.contributor_count()),
                Style::default().fg(Color::DarkGray),
            ),
        ]),
        Line::from(""),
    ];

    if team.members.is_empty() {
        lines.push(Line::from(Span::styled(
            "No members yet (a adds one)",
            Style::default().fg(Color::DarkGray),
        )));
    } else {
        for (idx, member) in team.members.iter().enumerate() {
            let marker = if idx == app.state.team.selected_member { '>' } else { ' ' };
            lines.push(Line::from(format!("{marker} {member}")));
        }
    }

    lines.push(Line::from(""));
    if let Some(input) = app.state.team.member_input.as_ref() {
        lines.push(Line::from(vec![
            Span::styled("add member: ", Style::default().fg(Color::Yellow)),
            Span::styled(format!("{input}_"), Style::default().fg(Color::White)),
        ]));
    } else {
        lines.push(Line::from(Span::styled(
            "e=edit  a=add member  x=remove member  D=delete team",
            Style::default().fg(Color::DarkGray),
        )));
    }

    f.render_widget(Paragraph::new(lines), inner);
}

fn draw_team_form(f: &mut Frame, area: Rect, form: &crate::state::app_state::TeamFormDraft) {
    use crate::state::app_state::FormField;

    let title = if form.existing_id.is_some() { "Edit Team" } else { "Create Team" };
    let mut lines = vec![
        Line::from(Span::styled(title, Style::default().fg(Color::White).add_modifier(Modifier::BOLD))),
        Line::from(""),
    ];

    for (field, value) in [
        (FormField::Name, &form.name),
        (FormField::Description, &form.description),
        (FormField::RepositoryLink, &form.repository_link),
    ] {
        let focused = field == form.focus;
        let cursor = if focused { "_" } else { "" };
        let value_style = if focused {
            Style::default().fg(Color::White)
        } else {
            Style::default().fg(Color::Gray)
        };
        lines.push(Line::from(vec![
            Span::styled(
                format!("{:<12}", field.label()),
                if focused {
                    Style::default().fg(Color::Yellow)
                } else {
                    Style::default().fg(Color::DarkGray)
                },
            ),
            Span::styled(format!("{value}{cursor}"), value_style),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Tab=next field  Enter=save  Esc=cancel",
        Style::default().fg(Color::DarkGray),
    )));
    if !form.is_submittable() {
        lines.push(Line::from(Span::styled(
            "A team needs a name",
            Style::default().fg(Color::Red),
        )));
    }

    f.render_widget(Paragraph::new(lines), area);
}

fn draw_help(f: &mut Frame, area: Rect) {
    let block = default_border(Color::DarkGray).title(" Help ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let text = "q=quit  1=Leaderboard  2=Activity  3=Challenges  4=Team\n\
                j/k=scroll  d=difficulty filter  r=refresh now\n\
                f=presentation mode (Esc exits)  \"=logs\n\n\
                Team tab: e=edit  a=add member  x=remove  D=delete";
    f.render_widget(
        Paragraph::new(text)
            .style(Style::default().fg(Color::Gray))
            .alignment(Alignment::Center),
        inner,
    );
}

fn draw_logs(f: &mut Frame, area: Rect) {
    let widget = tui_logger::TuiLoggerWidget::default()
        .block(default_border(Color::DarkGray).title(" Logs "))
        .style_error(Style::default().fg(Color::Red))
        .style_warn(Style::default().fg(Color::Yellow))
        .style_info(Style::default().fg(Color::Gray))
        .style_debug(Style::default().fg(Color::DarkGray));
    f.render_widget(widget, area);
}

fn draw_empty_state(f: &mut Frame, area: Rect, app: &App, idle_msg: &str) {
    let msg = if let Some(err) = app.state.last_error.as_deref() {
        format!("Load failed:\n{err}")
    } else {
        idle_msg.to_string()
    };
    f.render_widget(
        Paragraph::new(msg)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center),
        area,
    );
}

fn draw_loading_spinner(f: &mut Frame, area: Rect, app: &App, loading: LoadingState) {
    if !loading.is_loading && loading.spinner_char != ERROR_CHAR {
        return;
    }
    let style = match loading.spinner_char {
        ERROR_CHAR => Style::default().fg(Color::Red),
        _ => Style::default().fg(Color::White),
    };
    let spinner = Paragraph::new(loading.spinner_char.to_string())
        .alignment(Alignment::Right)
        .style(style);
    let area = if app.presentation.is_fullscreen() {
        Rect::new(area.width.saturating_sub(3), area.height.saturating_sub(2), 1, 1)
    } else {
        Rect::new(area.width.saturating_sub(3), 1, 1, 1)
    };
    f.render_widget(spinner, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_breaks_on_word_boundaries() {
        let lines = wrap_text("build a terminal dashboard", 10);
        assert_eq!(lines, vec!["build a", "terminal", "dashboard"]);
    }

    #[test]
    fn wrap_hard_splits_long_words() {
        let lines = wrap_text("abcdefghij", 4);
        assert_eq!(lines, vec!["abcd", "efgh", "ij"]);
    }
}
