use crate::app::{App, MenuItem};
use crate::state::messages::NetworkRequest;
use crate::state::refresher::RefreshRequester;
use crossterm::event::KeyCode::Char;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

pub async fn handle_key_bindings(
    key_event: KeyEvent,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
    refresh: &RefreshRequester,
) {
    let mut guard = app.lock().await;

    // Text-entry surfaces swallow printable keys, so route them first.
    if guard.state.active_tab == MenuItem::Team {
        if guard.state.team.form.is_some() {
            handle_team_form_keys(key_event, &mut guard, network_requests).await;
            return;
        }
        if guard.state.team.member_input.is_some() {
            handle_member_input_keys(key_event, &mut guard, network_requests).await;
            return;
        }
    }

    match (guard.state.active_tab, key_event.code, key_event.modifiers) {
        // Quit
        (_, Char('q'), _) | (_, Char('c'), KeyModifiers::CONTROL) => {
            crate::cleanup_terminal();
            std::process::exit(0);
        }

        // Tab switching
        (_, Char('1'), _) => guard.update_tab(MenuItem::Leaderboard),
        (_, Char('2'), _) => guard.update_tab(MenuItem::Activity),
        (_, Char('3'), _) => guard.update_tab(MenuItem::Challenges),
        (_, Char('4'), _) => guard.update_tab(MenuItem::Team),
        (_, Char('?'), _) => guard.update_tab(MenuItem::Help),
        (MenuItem::Help, KeyCode::Esc, _) => guard.exit_help(),

        // Leaderboard navigation
        (MenuItem::Leaderboard, Char('j') | KeyCode::Down, _) => {
            guard.state.refresh.leaderboard_scroll_down();
        }
        (MenuItem::Leaderboard, Char('k') | KeyCode::Up, _) => {
            guard.state.refresh.leaderboard_scroll_up();
        }

        // Activity feed navigation
        (MenuItem::Activity, Char('j') | KeyCode::Down, _) => {
            guard.state.refresh.activity_scroll_down();
        }
        (MenuItem::Activity, Char('k') | KeyCode::Up, _) => {
            guard.state.refresh.activity_scroll_up();
        }

        // Challenge catalogue
        (MenuItem::Challenges, Char('j') | KeyCode::Down, _) => {
            guard.state.challenges.navigate_down();
        }
        (MenuItem::Challenges, Char('k') | KeyCode::Up, _) => {
            guard.state.challenges.navigate_up();
        }
        (MenuItem::Challenges, Char('d'), _) => {
            let difficulty = guard.state.challenges.cycle_filter();
            drop(guard);
            let _ = network_requests
                .send(NetworkRequest::LoadChallenges { difficulty })
                .await;
            return;
        }

        // Team management
        (MenuItem::Team, Char('e'), _) => guard.state.team.begin_edit(),
        (MenuItem::Team, Char('a'), _) => guard.state.team.begin_member_input(),
        (MenuItem::Team, Char('j') | KeyCode::Down, _) => guard.state.team.member_down(),
        (MenuItem::Team, Char('k') | KeyCode::Up, _) => guard.state.team.member_up(),
        (MenuItem::Team, Char('x'), _) => {
            let target = guard
                .state
                .team
                .team
                .as_ref()
                .map(|t| t.id)
                .zip(guard.state.team.selected_member_login());
            if let Some((team_id, login)) = target {
                drop(guard);
                let _ = network_requests
                    .send(NetworkRequest::RemoveMember { team_id, login })
                    .await;
                return;
            }
        }
        (MenuItem::Team, Char('D'), _) => {
            if let Some(id) = guard.state.team.team.as_ref().map(|t| t.id) {
                drop(guard);
                let _ = network_requests.send(NetworkRequest::DeleteTeam { id }).await;
                return;
            }
        }

        // Presentation mode: Esc always exits, 'f' toggles.
        (_, KeyCode::Esc, _) if guard.presentation.is_fullscreen() => {
            guard.exit_presentation();
        }
        (_, Char('f'), _) => guard.toggle_presentation(),

        // Manual refresh shares the in-flight guard with the scheduler.
        (_, Char('r'), _) => {
            drop(guard);
            refresh.request().await;
            return;
        }

        (_, Char('"'), _) => guard.toggle_show_logs(),

        _ => {}
    }
}

async fn handle_team_form_keys(
    key_event: KeyEvent,
    guard: &mut tokio::sync::MutexGuard<'_, App>,
    network_requests: &mpsc::Sender<NetworkRequest>,
) {
    match (key_event.code, key_event.modifiers) {
        (Char('c'), KeyModifiers::CONTROL) => {
            crate::cleanup_terminal();
            std::process::exit(0);
        }
        (KeyCode::Esc, _) => guard.state.team.cancel_edit(),
        (KeyCode::Tab, _) => {
            if let Some(form) = guard.state.team.form.as_mut() {
                form.focus_next();
            }
        }
        (KeyCode::Backspace, _) => {
            if let Some(form) = guard.state.team.form.as_mut() {
                form.backspace();
            }
        }
        (KeyCode::Enter, _) => {
            let submission = guard
                .state
                .team
                .form
                .as_ref()
                .filter(|f| f.is_submittable())
                .map(|f| (f.existing_id, f.to_form()));
            if let Some((id, form)) = submission {
                let _ = network_requests.send(NetworkRequest::SaveTeam { id, form }).await;
            }
        }
        (Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => {
            if let Some(form) = guard.state.team.form.as_mut() {
                form.push_char(c);
            }
        }
        _ => {}
    }
}

async fn handle_member_input_keys(
    key_event: KeyEvent,
    guard: &mut tokio::sync::MutexGuard<'_, App>,
    network_requests: &mpsc::Sender<NetworkRequest>,
) {
    match (key_event.code, key_event.modifiers) {
        (Char('c'), KeyModifiers::CONTROL) => {
            crate::cleanup_terminal();
            std::process::exit(0);
        }
        (KeyCode::Esc, _) => guard.state.team.cancel_member_input(),
        (KeyCode::Backspace, _) => {
            if let Some(input) = guard.state.team.member_input.as_mut() {
                input.pop();
            }
        }
        (KeyCode::Enter, _) => {
            let submission = guard.state.team.team.as_ref().map(|t| t.id).zip(
                guard
                    .state
                    .team
                    .member_input
                    .as_ref()
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty()),
            );
            if let Some((team_id, login)) = submission {
                guard.state.team.cancel_member_input();
                let _ = network_requests
                    .send(NetworkRequest::AddMember { team_id, login })
                    .await;
            }
        }
        (Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => {
            if let Some(input) = guard.state.team.member_input.as_mut() {
                input.push(c);
            }
        }
        _ => {}
    }
}
