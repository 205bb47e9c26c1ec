use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use bi3oo_core::model::ALL_CATEGORIES;
use bi3oo_core::{Action, Screen};
use crate::app::{App, InputMode, PostField};
use crate::tui::AppEvent;

pub fn handle_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Resize(_, _) => {}
        AppEvent::Tick => app.tick_animation(),
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Global keys that work in any mode
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    match app.screen() {
        Screen::Home | Screen::Results => match app.input_mode {
            InputMode::Normal => handle_feed_normal(app, key),
            InputMode::Editing => handle_search_editing(app, key),
        },
        Screen::Detail => handle_detail(app, key),
        Screen::Login => handle_login(app, key),
        Screen::PostAd => handle_post_ad(app, key),
        Screen::Messages => handle_messages(app, key),
    }
}

fn handle_feed_normal(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,

        // Navigation
        KeyCode::Char('j') | KeyCode::Down => app.listing_down(),
        KeyCode::Char('k') | KeyCode::Up => app.listing_up(),
        KeyCode::Char('g') => {
            if !app.market.state().listings.is_empty() {
                app.listing_state.select(Some(0));
            }
        }
        KeyCode::Char('G') => {
            let len = app.market.state().listings.len();
            if len > 0 {
                app.listing_state.select(Some(len - 1));
            }
        }
        KeyCode::Enter => app.open_selected(),

        // Search
        KeyCode::Char('/') | KeyCode::Char('s') => app.input_mode = InputMode::Editing,
        KeyCode::Char(c @ '1'..='9') => {
            let idx = c as usize - '1' as usize;
            app.select_category(idx);
        }
        KeyCode::Char('0') => app.dispatch(Action::SelectCategory(ALL_CATEGORIES.to_string())),
        KeyCode::Char('r') => app.dispatch(Action::Refresh),

        // Account and posting
        KeyCode::Char('p') => app.dispatch(Action::PostAdClicked),
        KeyCode::Char('l') => {
            if !app.market.state().is_logged_in() {
                app.dispatch(Action::LoginClicked);
            }
        }
        KeyCode::Char('o') => {
            if app.market.state().is_logged_in() {
                app.logout();
            }
        }

        KeyCode::Char('h') => app.dispatch(Action::GoHome),
        KeyCode::Esc | KeyCode::Backspace => {
            if app.screen() == Screen::Results {
                app.dispatch(Action::Back);
            }
        }
        _ => {}
    }
}

fn handle_search_editing(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.input_mode = InputMode::Normal,
        KeyCode::Enter => app.submit_search(),
        KeyCode::Tab | KeyCode::BackTab => app.search.toggle_field(),
        KeyCode::Backspace => {
            app.search.input().pop();
        }
        KeyCode::Char(c) => app.search.input().push(c),
        _ => {}
    }
}

fn handle_detail(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('c') | KeyCode::Enter => app.dispatch(Action::ContactSeller),
        KeyCode::Char('j') | KeyCode::Down => {
            app.detail_scroll = app.detail_scroll.saturating_add(1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.detail_scroll = app.detail_scroll.saturating_sub(1);
        }
        KeyCode::Char('h') => app.dispatch(Action::GoHome),
        KeyCode::Char('l') => {
            if !app.market.state().is_logged_in() {
                app.dispatch(Action::LoginClicked);
            }
        }
        KeyCode::Esc | KeyCode::Backspace => app.dispatch(Action::Back),
        _ => {}
    }
}

fn handle_login(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.dispatch(Action::Back),
        KeyCode::Enter => app.submit_login(),
        KeyCode::Tab | KeyCode::Down => app.login.next_field(),
        KeyCode::BackTab | KeyCode::Up => app.login.prev_field(),
        KeyCode::Char('n') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.login.toggle_mode();
        }
        KeyCode::Char('v') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.login.show_password = !app.login.show_password;
        }
        KeyCode::Backspace => {
            app.login.input().pop();
        }
        KeyCode::Char(c) => {
            app.login.error = None;
            app.login.input().push(c);
        }
        _ => {}
    }
}

fn handle_post_ad(app: &mut App, key: KeyEvent) {
    let on_category = app.post.field() == PostField::Category;
    match key.code {
        KeyCode::Esc => {
            if !app.post.prev_step() {
                app.dispatch(Action::CancelPostAd);
            }
        }
        KeyCode::Enter => {
            if app.post.is_last_step() {
                if app.post.next_step() {
                    app.submit_post();
                }
            } else {
                app.post.next_step();
            }
        }
        KeyCode::Tab | KeyCode::Down | KeyCode::Up | KeyCode::BackTab => app.post.next_field(),
        KeyCode::Right if on_category => app.post.cycle_category(true),
        KeyCode::Left if on_category => app.post.cycle_category(false),
        KeyCode::Backspace => {
            if let Some(input) = app.post.input() {
                input.pop();
            }
        }
        KeyCode::Char(c) => {
            if let Some(input) = app.post.input() {
                input.push(c);
            }
        }
        _ => {}
    }
}

fn handle_messages(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.dispatch(Action::Back),
        KeyCode::Enter => app.send_chat(),
        KeyCode::Up => app.chat_scroll = app.chat_scroll.saturating_sub(1),
        KeyCode::Down => app.chat_scroll = app.chat_scroll.saturating_add(1),
        KeyCode::PageUp => app.chat_scroll = app.chat_scroll.saturating_sub(10),
        KeyCode::PageDown => app.chat_scroll = app.chat_scroll.saturating_add(10),
        KeyCode::Backspace => {
            app.chat_input.pop();
        }
        KeyCode::Char(c) => app.chat_input.push(c),
        _ => {}
    }
}
