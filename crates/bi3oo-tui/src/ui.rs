use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};
use bi3oo_core::model::{category_label, ALL_CATEGORIES};
use bi3oo_core::{Listing, ListingDraft, Screen, Sender, CATEGORIES};
use crate::app::{App, InputMode, LoginField, PostField, SearchField};

const ACCENT: Color = Color::Rgb(236, 90, 19);

/// Ensure the selected item in a list is visible by adjusting the ListState offset.
fn ensure_selected_visible(state: &mut ListState, visible_height: usize) {
    let visible_height = visible_height.max(1);

    if let Some(selected) = state.selected() {
        // Offset range where the selected row stays on screen
        let min_offset = selected.saturating_sub(visible_height - 1);
        let max_offset = selected;

        let new_offset = state.offset().clamp(min_offset, max_offset);
        if new_offset != state.offset() {
            *state.offset_mut() = new_offset;
        }
    }
}

/// Wrap text on word boundaries to fit within a given width
fn wrap_text_to_width(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    let mut current_line = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();

        if current_len == 0 {
            current_line = word.to_string();
            current_len = word_len;
        } else if current_len + 1 + word_len <= width {
            current_line.push(' ');
            current_line.push_str(word);
            current_len += 1 + word_len;
        } else {
            lines.push(current_line);
            current_line = word.to_string();
            current_len = word_len;
        }
    }

    if !current_line.is_empty() {
        lines.push(current_line);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }

    lines
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width.saturating_sub(2));
    let height = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

fn dots(frame: u8) -> String {
    ".".repeat(frame as usize + 1)
}

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, body, footer
    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area);

    match app.screen() {
        Screen::Home | Screen::Results => render_feed_screen(app, frame, body_area),
        Screen::Detail => render_detail_screen(app, frame, body_area),
        Screen::Login => render_login_screen(app, frame, body_area),
        Screen::PostAd => render_post_ad_screen(app, frame, body_area),
        Screen::Messages => render_messages_screen(app, frame, body_area),
    }

    render_footer(app, frame, footer_area);
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let account = match &app.market.state().user {
        Some(user) => format!(" {} ", user.name),
        None => " Se connecter (l) ".to_string(),
    };

    let mut spans = vec![
        Span::styled(" bi3oo ", Style::default().fg(Color::White).bg(ACCENT).bold()),
        Span::raw(" "),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::Gray),
        ),
        Span::raw("  "),
        Span::styled(account, Style::default().fg(Color::White).bold()),
    ];

    if let Some(status) = &app.status {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(status.clone(), Style::default().fg(Color::Green)));
    }

    let header = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let mode_style = match app.input_mode {
        InputMode::Normal => Style::default().bg(Color::Blue).fg(Color::White),
        InputMode::Editing => Style::default().bg(Color::Yellow).fg(Color::Black),
    };

    let mode_text = match app.screen() {
        Screen::Home => " ACCUEIL ",
        Screen::Results => " RÉSULTATS ",
        Screen::Detail => " ANNONCE ",
        Screen::Login => " CONNEXION ",
        Screen::PostAd => " DÉPOSER ",
        Screen::Messages => " MESSAGES ",
    };

    // Key style: dark background with bright text for visibility on both light/dark terminals
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);

    let pairs: Vec<(&str, &str)> = match (app.screen(), app.input_mode) {
        (Screen::Home | Screen::Results, InputMode::Editing) => vec![
            ("Enter", "rechercher"),
            ("Tab", "quoi/où"),
            ("Esc", "annuler"),
        ],
        (Screen::Home | Screen::Results, InputMode::Normal) => {
            let mut pairs = vec![
                ("j/k", "nav"),
                ("Enter", "voir"),
                ("/", "rechercher"),
                ("1-7", "catégorie"),
                ("p", "déposer"),
            ];
            if app.market.state().is_logged_in() {
                pairs.push(("o", "déconnexion"));
            } else {
                pairs.push(("l", "connexion"));
            }
            pairs.extend([("r", "rafraîchir"), ("q", "quitter")]);
            pairs
        }
        (Screen::Detail, _) => vec![
            ("c", "contacter"),
            ("j/k", "défiler"),
            ("Esc", "retour"),
            ("h", "accueil"),
        ],
        (Screen::Login, _) => vec![
            ("Tab", "champ"),
            ("Enter", "valider"),
            ("Ctrl-N", if app.login.registering { "connexion" } else { "inscription" }),
            ("Ctrl-V", "afficher"),
            ("Esc", "retour"),
        ],
        (Screen::PostAd, _) => {
            let mut pairs = vec![("Tab", "champ")];
            if app.post.field() == PostField::Category {
                pairs.push(("←/→", "catégorie"));
            }
            pairs.push(("Enter", if app.post.is_last_step() { "publier" } else { "suivant" }));
            pairs.push(("Esc", if app.post.step > 1 { "précédent" } else { "annuler" }));
            pairs
        }
        (Screen::Messages, _) => vec![
            ("Enter", "envoyer"),
            ("↑/↓", "défiler"),
            ("Esc", "retour"),
        ],
    };

    let mut spans = vec![Span::styled(mode_text, mode_style)];
    for (key, label) in pairs {
        spans.push(Span::styled(format!(" {} ", key), key_style));
        spans.push(Span::styled(format!(" {} ", label), label_style));
    }

    let footer = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
    frame.render_widget(footer, area);
}

fn render_feed_screen(app: &mut App, frame: &mut Frame, area: Rect) {
    let [search_area, category_area, list_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(1),
        Constraint::Min(0),
    ])
    .areas(area);

    render_search_bar(app, frame, search_area);
    render_category_bar(app, frame, category_area);

    let state = app.market.state();
    let title = if app.screen() == Screen::Results && !state.search.query.is_empty() {
        format!(" Résultats pour \"{}\" ", state.search.query)
    } else if state.search.category != ALL_CATEGORIES {
        format!(" {} ", category_label(&state.search.category))
    } else {
        match &state.user {
            Some(user) => format!(" Bienvenue {} ", user.name),
            None => " Annonces récentes ".to_string(),
        }
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(title)
        .title_bottom(Line::from(format!(" {} annonces ", state.listings.len())).right_aligned());

    if state.loading {
        let text = if state.search.query.is_empty() {
            format!("Chargement des annonces{}", dots(app.animation_frame))
        } else {
            format!("Recherche intelligente en cours{}", dots(app.animation_frame))
        };
        let loading = Paragraph::new(Span::styled(
            text,
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        ))
        .block(block);
        frame.render_widget(loading, list_area);
        return;
    }

    if state.listings.is_empty() {
        let empty = Paragraph::new(Span::styled(
            "Aucune annonce trouvée pour cette recherche.",
            Style::default().fg(Color::DarkGray),
        ))
        .block(block);
        frame.render_widget(empty, list_area);
        return;
    }

    let items: Vec<ListItem> = state.listings.iter().map(listing_item).collect();
    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");

    // Each item spans two rows
    let visible_height = (list_area.height.saturating_sub(2) / 2) as usize;
    ensure_selected_visible(&mut app.listing_state, visible_height);
    frame.render_stateful_widget(list, list_area, &mut app.listing_state);
}

fn listing_item(listing: &Listing) -> ListItem<'static> {
    let mut title = vec![
        Span::styled(listing.title.clone(), Style::default().fg(Color::White).bold()),
        Span::raw("  "),
        Span::styled(listing.display_price(), Style::default().fg(ACCENT).bold()),
    ];
    if listing.is_pro {
        title.push(Span::raw(" "));
        title.push(Span::styled(" PRO ", Style::default().fg(Color::Black).bg(Color::Yellow)));
    }
    if listing.is_local() {
        title.push(Span::raw(" "));
        title.push(Span::styled("(vous)", Style::default().fg(Color::Green)));
    }

    let meta = Line::from(Span::styled(
        format!(
            "  {} · {} · {}",
            category_label(&listing.category),
            listing.location,
            listing.date
        ),
        Style::default().fg(Color::DarkGray),
    ));

    ListItem::new(vec![Line::from(title), meta])
}

fn render_search_bar(app: &mut App, frame: &mut Frame, area: Rect) {
    let editing = app.input_mode == InputMode::Editing;
    let [query_area, location_area] = Layout::horizontal([
        Constraint::Percentage(65),
        Constraint::Percentage(35),
    ])
    .areas(area);

    let field_block = |title: &'static str, focused: bool| {
        let color = if focused { Color::Yellow } else { Color::DarkGray };
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color))
            .title(title)
    };

    let query_focused = editing && app.search.field == SearchField::Query;
    let location_focused = editing && app.search.field == SearchField::Location;

    let query_text = if app.search.query.is_empty() && !query_focused {
        Span::styled("Que recherchez-vous ? (/)", Style::default().fg(Color::DarkGray))
    } else {
        Span::raw(app.search.query.clone())
    };
    let location_text = if app.search.location.is_empty() && !location_focused {
        Span::styled("Ville, code postal", Style::default().fg(Color::DarkGray))
    } else {
        Span::raw(app.search.location.clone())
    };

    frame.render_widget(
        Paragraph::new(query_text).block(field_block(" Recherche ", query_focused)),
        query_area,
    );
    frame.render_widget(
        Paragraph::new(location_text).block(field_block(" Localisation ", location_focused)),
        location_area,
    );

    if query_focused {
        let x = app.search.query.chars().count() as u16;
        frame.set_cursor_position((query_area.x + 1 + x, query_area.y + 1));
    } else if location_focused {
        let x = app.search.location.chars().count() as u16;
        frame.set_cursor_position((location_area.x + 1 + x, location_area.y + 1));
    }
}

fn render_category_bar(app: &App, frame: &mut Frame, area: Rect) {
    let current = app.market.state().search.category.as_str();
    let selected = Style::default().fg(Color::White).bg(ACCENT).bold();
    let normal = Style::default().fg(Color::Gray);

    let mut spans = vec![Span::styled(
        " 0 Tout ",
        if current == ALL_CATEGORIES { selected } else { normal },
    )];
    for (i, (id, label)) in CATEGORIES.iter().enumerate() {
        let style = if *id == current { selected } else { normal };
        spans.push(Span::styled(format!(" {} {} ", i + 1, label), style));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_detail_screen(app: &mut App, frame: &mut Frame, area: Rect) {
    let Some(listing) = app.market.state().selected.clone() else {
        let empty = Paragraph::new("Aucune annonce sélectionnée.")
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(empty, area);
        return;
    };

    let [main_area, side_area] = Layout::horizontal([
        Constraint::Percentage(68),
        Constraint::Percentage(32),
    ])
    .areas(area);

    let width = main_area.width.saturating_sub(2) as usize;
    let mut lines = vec![
        Line::from(Span::styled(listing.title.clone(), Style::default().fg(Color::White).bold())),
        Line::from(Span::styled(
            listing.display_price(),
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("{} · {}", listing.location, listing.date),
            Style::default().fg(Color::DarkGray),
        )),
        Line::default(),
        Line::from(Span::styled("Description", Style::default().fg(Color::Cyan).bold())),
    ];
    for paragraph in listing.description.lines() {
        lines.extend(wrap_text_to_width(paragraph, width).into_iter().map(Line::from));
    }
    lines.push(Line::default());
    lines.push(Line::from(vec![
        Span::styled("Catégorie : ", Style::default().fg(Color::DarkGray)),
        Span::raw(category_label(&listing.category).to_string()),
    ]));
    lines.push(Line::from(vec![
        Span::styled("Photo : ", Style::default().fg(Color::DarkGray)),
        Span::styled(listing.image_url.clone(), Style::default().fg(Color::Blue)),
    ]));

    let max_scroll = (lines.len() as u16).saturating_sub(main_area.height.saturating_sub(2));
    app.detail_scroll = app.detail_scroll.min(max_scroll);

    let main = Paragraph::new(Text::from(lines))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Annonce "),
        )
        .scroll((app.detail_scroll, 0));
    frame.render_widget(main, main_area);

    let seller_kind = if listing.is_pro { "Professionnel" } else { "Particulier" };
    let initial = listing
        .seller_name
        .chars()
        .next()
        .map(|c| c.to_uppercase().to_string())
        .unwrap_or_default();

    let side = Paragraph::new(vec![
        Line::from(vec![
            Span::styled(format!(" {} ", initial), Style::default().fg(Color::White).bg(ACCENT).bold()),
            Span::raw(" "),
            Span::styled(listing.seller_name.clone(), Style::default().bold()),
        ]),
        Line::from(Span::styled(seller_kind, Style::default().fg(Color::DarkGray))),
        Line::default(),
        Line::from(vec![
            Span::styled(" c ", Style::default().bg(ACCENT).fg(Color::White)),
            Span::raw(" Contacter le vendeur"),
        ]),
        Line::default(),
        Line::from(Span::styled(
            "Ne payez jamais à l'avance et privilégiez la remise en main propre.",
            Style::default().fg(Color::Yellow),
        )),
    ])
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Vendeur "),
    );
    frame.render_widget(side, side_area);
}

fn render_login_screen(app: &App, frame: &mut Frame, area: Rect) {
    let form = &app.login;
    let field_count = form.fields().len() as u16;
    let popup = centered_rect(56, 6 + field_count * 3, area);
    frame.render_widget(Clear, popup);

    let title = if form.registering {
        " Créer un compte "
    } else {
        " Connexion "
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(ACCENT))
        .title(title);
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let mut constraints = vec![Constraint::Length(1)];
    constraints.extend(form.fields().iter().map(|_| Constraint::Length(3)));
    constraints.push(Constraint::Length(1));
    constraints.push(Constraint::Min(0));
    let rows = Layout::vertical(constraints).split(inner);

    let intro = if form.registering {
        "Inscrivez-vous pour déposer et contacter."
    } else {
        "Connectez-vous pour gérer vos annonces."
    };
    frame.render_widget(
        Paragraph::new(Span::styled(intro, Style::default().fg(Color::DarkGray))),
        rows[0],
    );

    for (i, field) in form.fields().iter().enumerate() {
        let (label, value) = match field {
            LoginField::Email => (" Adresse e-mail ", form.email.clone()),
            LoginField::Password => {
                let value = if form.show_password {
                    form.password.clone()
                } else {
                    "•".repeat(form.password.chars().count())
                };
                (" Mot de passe ", value)
            }
            LoginField::Name => (" Nom affiché (optionnel) ", form.name.clone()),
        };
        let focused = *field == form.field;
        let color = if focused { Color::Yellow } else { Color::DarkGray };
        let row = rows[i + 1];
        let input = Paragraph::new(value.clone()).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color))
                .title(label),
        );
        frame.render_widget(input, row);

        if focused {
            let x = (value.chars().count() as u16).min(row.width.saturating_sub(3));
            frame.set_cursor_position((row.x + 1 + x, row.y + 1));
        }
    }

    if let Some(error) = &form.error {
        let row = rows[form.fields().len() + 1];
        frame.render_widget(
            Paragraph::new(Span::styled(error.clone(), Style::default().fg(Color::Red))),
            row,
        );
    }
}

fn render_post_ad_screen(app: &App, frame: &mut Frame, area: Rect) {
    let form = &app.post;
    let popup = centered_rect(70, area.height.saturating_sub(2), area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(ACCENT))
        .title(" Déposer une annonce ")
        .title_bottom(
            Line::from(format!(" Étape {}/{} ", form.step, ListingDraft::STEPS)).right_aligned(),
        );
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let fields = PostField::for_step(form.step);
    let mut constraints = vec![Constraint::Length(1), Constraint::Length(1)];
    for field in fields {
        let height = if *field == PostField::Description { 7 } else { 3 };
        constraints.push(Constraint::Length(height));
    }
    constraints.push(Constraint::Length(1));
    constraints.push(Constraint::Min(0));
    let rows = Layout::vertical(constraints).split(inner);

    // Progress bar
    let filled = (inner.width as usize * form.step as usize) / ListingDraft::STEPS as usize;
    let bar = Line::from(vec![
        Span::styled("━".repeat(filled), Style::default().fg(ACCENT)),
        Span::styled(
            "━".repeat((inner.width as usize).saturating_sub(filled)),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    frame.render_widget(Paragraph::new(bar), rows[0]);

    let focused_field = form.field();
    for (i, field) in fields.iter().enumerate() {
        let row = rows[i + 2];
        let focused = *field == focused_field;
        let color = if focused { Color::Yellow } else { Color::DarkGray };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color))
            .title(format!(" {} ", field.label()));

        let value = match field {
            PostField::Title => form.draft.title.clone(),
            PostField::Category => match form.category_idx {
                Some(idx) => format!("◀ {} ▶", CATEGORIES[idx].1),
                None => "◀ Choisir ▶".to_string(),
            },
            PostField::Description => form.draft.description.clone(),
            PostField::ImageUrl => form.image_url.clone(),
            PostField::Price => form.draft.price.clone(),
            PostField::Location => form.draft.location.clone(),
            PostField::SellerName => form.draft.seller_name.clone(),
        };

        let paragraph = Paragraph::new(value.clone())
            .block(block)
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, row);

        if focused && *field != PostField::Category {
            let width = row.width.saturating_sub(2).max(1) as usize;
            let count = value.chars().count();
            let (x, y) = if *field == PostField::Description {
                ((count % width) as u16, (count / width) as u16)
            } else {
                (count.min(width.saturating_sub(1)) as u16, 0)
            };
            frame.set_cursor_position((row.x + 1 + x, row.y + 1 + y));
        }
    }

    if let Some(error) = &form.error {
        let row = rows[fields.len() + 2];
        frame.render_widget(
            Paragraph::new(Span::styled(error.clone(), Style::default().fg(Color::Red))),
            row,
        );
    }
}

fn render_messages_screen(app: &mut App, frame: &mut Frame, area: Rect) {
    let [banner_area, chat_area, input_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(3),
    ])
    .areas(area);

    frame.render_widget(
        Paragraph::new(Span::styled(
            " Pour votre sécurité, ne communiquez jamais vos coordonnées bancaires. ",
            Style::default().fg(Color::Black).bg(Color::Yellow),
        )),
        banner_area,
    );

    // Inner size for scroll calculations
    app.chat_height = chat_area.height.saturating_sub(2);
    app.chat_width = chat_area.width.saturating_sub(2);

    let (title, seller) = match &app.chat {
        Some(chat) => (
            format!(" {} · {} ", chat.listing().title, chat.listing().display_price()),
            chat.listing().seller_name.clone(),
        ),
        None => (" Messages ".to_string(), "Vendeur".to_string()),
    };

    let mut lines: Vec<Line> = Vec::new();
    if let Some(chat) = &app.chat {
        for msg in chat.messages() {
            let (name, color) = match msg.sender {
                Sender::Me => ("Vous".to_string(), Color::Cyan),
                Sender::Them => (seller.clone(), ACCENT),
            };
            lines.push(Line::from(vec![
                Span::styled(name, Style::default().fg(color).add_modifier(Modifier::BOLD)),
                Span::styled(format!("  {}", msg.timestamp), Style::default().fg(Color::DarkGray)),
            ]));
            for line in msg.text.lines() {
                lines.push(Line::from(line.to_string()));
            }
            lines.push(Line::default());
        }
    }

    if app.chat_waiting {
        lines.push(Line::from(Span::styled(
            seller.clone(),
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(Span::styled(
            format!("écrit{}", dots(app.animation_frame)),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )));
    }

    let chat = Paragraph::new(Text::from(lines))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(title),
        )
        .wrap(Wrap { trim: true })
        .scroll((app.chat_scroll, 0));
    frame.render_widget(chat, chat_area);

    let input_color = if app.chat_waiting { Color::DarkGray } else { Color::Yellow };
    let input_text = if app.chat_input.is_empty() {
        Span::styled("Écrivez votre message...", Style::default().fg(Color::DarkGray))
    } else {
        Span::raw(app.chat_input.clone())
    };
    let input = Paragraph::new(input_text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(input_color)),
    );
    frame.render_widget(input, input_area);

    let x = (app.chat_input.chars().count() as u16).min(input_area.width.saturating_sub(3));
    frame.set_cursor_position((input_area.x + 1 + x, input_area.y + 1));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_text_to_width() {
        let lines = wrap_text_to_width("Très bon état général, peu servi", 12);
        assert_eq!(lines, vec!["Très bon", "état", "général, peu", "servi"]);
    }

    #[test]
    fn test_wrap_empty_text() {
        assert_eq!(wrap_text_to_width("", 10), vec![String::new()]);
    }

    #[test]
    fn test_ensure_selected_visible_scrolls_down() {
        let mut state = ListState::default();
        state.select(Some(9));
        ensure_selected_visible(&mut state, 4);
        assert_eq!(state.offset(), 6);
    }

    #[test]
    fn test_centered_rect_fits_area() {
        let area = Rect::new(0, 0, 40, 10);
        let rect = centered_rect(60, 20, area);
        assert!(rect.width <= 38);
        assert!(rect.height <= 10);
    }
}
