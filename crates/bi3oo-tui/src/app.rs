use bi3oo_core::{
    Action, ChatSession, Effect, Listing, ListingDraft, Marketplace, Screen, CATEGORIES,
};
use ratatui::widgets::ListState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchField {
    #[default]
    Query,
    Location,
}

/// Home/results search bar
#[derive(Debug, Default)]
pub struct SearchForm {
    pub query: String,
    pub location: String,
    pub field: SearchField,
}

impl SearchForm {
    pub fn input(&mut self) -> &mut String {
        match self.field {
            SearchField::Query => &mut self.query,
            SearchField::Location => &mut self.location,
        }
    }

    pub fn toggle_field(&mut self) {
        self.field = match self.field {
            SearchField::Query => SearchField::Location,
            SearchField::Location => SearchField::Query,
        };
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginField {
    #[default]
    Email,
    Password,
    Name,
}

#[derive(Debug, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub name: String,
    pub field: LoginField,
    pub registering: bool,
    pub show_password: bool,
    pub error: Option<String>,
}

impl LoginForm {
    pub fn fields(&self) -> &'static [LoginField] {
        if self.registering {
            &[LoginField::Email, LoginField::Password, LoginField::Name]
        } else {
            &[LoginField::Email, LoginField::Password]
        }
    }

    pub fn next_field(&mut self) {
        let fields = self.fields();
        let idx = fields.iter().position(|f| *f == self.field).unwrap_or(0);
        self.field = fields[(idx + 1) % fields.len()];
    }

    pub fn prev_field(&mut self) {
        let fields = self.fields();
        let idx = fields.iter().position(|f| *f == self.field).unwrap_or(0);
        self.field = fields[(idx + fields.len() - 1) % fields.len()];
    }

    pub fn input(&mut self) -> &mut String {
        match self.field {
            LoginField::Email => &mut self.email,
            LoginField::Password => &mut self.password,
            LoginField::Name => &mut self.name,
        }
    }

    pub fn toggle_mode(&mut self) {
        self.registering = !self.registering;
        self.error = None;
        if !self.fields().contains(&self.field) {
            self.field = LoginField::Email;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostField {
    Title,
    Category,
    Description,
    ImageUrl,
    Price,
    Location,
    SellerName,
}

impl PostField {
    pub fn for_step(step: u8) -> &'static [PostField] {
        match step {
            1 => &[PostField::Title, PostField::Category],
            2 => &[PostField::Description, PostField::ImageUrl],
            _ => &[PostField::Price, PostField::Location, PostField::SellerName],
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PostField::Title => "Quel est le titre de l'annonce ?",
            PostField::Category => "Choisissez la catégorie",
            PostField::Description => "Description détaillée",
            PostField::ImageUrl => "Lien d'une photo (optionnel)",
            PostField::Price => "Quel est votre prix ? (€)",
            PostField::Location => "Où se situe votre bien ?",
            PostField::SellerName => "Votre pseudo",
        }
    }
}

/// Three-step post-ad wizard
#[derive(Debug)]
pub struct PostAdForm {
    pub draft: ListingDraft,
    pub step: u8,
    pub field_idx: usize,
    pub category_idx: Option<usize>,
    pub image_url: String,
    pub error: Option<String>,
}

impl PostAdForm {
    pub fn new(seller_name: Option<&str>) -> Self {
        Self {
            draft: ListingDraft {
                seller_name: seller_name.unwrap_or_default().to_string(),
                ..Default::default()
            },
            step: 1,
            field_idx: 0,
            category_idx: None,
            image_url: String::new(),
            error: None,
        }
    }

    pub fn field(&self) -> PostField {
        let fields = PostField::for_step(self.step);
        fields[self.field_idx.min(fields.len() - 1)]
    }

    pub fn next_field(&mut self) {
        self.field_idx = (self.field_idx + 1) % PostField::for_step(self.step).len();
    }

    /// Text buffer behind the focused field; the category is picked, not typed.
    pub fn input(&mut self) -> Option<&mut String> {
        match self.field() {
            PostField::Title => Some(&mut self.draft.title),
            PostField::Category => None,
            PostField::Description => Some(&mut self.draft.description),
            PostField::ImageUrl => Some(&mut self.image_url),
            PostField::Price => Some(&mut self.draft.price),
            PostField::Location => Some(&mut self.draft.location),
            PostField::SellerName => Some(&mut self.draft.seller_name),
        }
    }

    pub fn cycle_category(&mut self, forward: bool) {
        let len = CATEGORIES.len();
        let idx = match (self.category_idx, forward) {
            (None, _) => 0,
            (Some(i), true) => (i + 1) % len,
            (Some(i), false) => (i + len - 1) % len,
        };
        self.category_idx = Some(idx);
        self.draft.category = CATEGORIES[idx].0.to_string();
    }

    /// Advance when the current step validates. Returns false otherwise.
    pub fn next_step(&mut self) -> bool {
        if !self.draft.validate_step(self.step) {
            self.error = Some(step_hint(self.step).to_string());
            return false;
        }
        self.error = None;
        if self.step < ListingDraft::STEPS {
            self.step += 1;
            self.field_idx = 0;
        }
        true
    }

    /// Go back one step. Returns false on the first step.
    pub fn prev_step(&mut self) -> bool {
        self.error = None;
        if self.step > 1 {
            self.step -= 1;
            self.field_idx = 0;
            true
        } else {
            false
        }
    }

    pub fn is_last_step(&self) -> bool {
        self.step == ListingDraft::STEPS
    }

    pub fn draft_for_submit(&self) -> ListingDraft {
        ListingDraft {
            image_url: Some(self.image_url.clone()).filter(|u| !u.trim().is_empty()),
            ..self.draft.clone()
        }
    }
}

fn step_hint(step: u8) -> &'static str {
    match step {
        1 => "Un titre d'au moins 3 caractères et une catégorie sont requis.",
        2 => "La description doit faire au moins 10 caractères.",
        _ => "Prix, localisation et pseudo sont requis.",
    }
}

/// Async work queued by a key press, run after the next frame is drawn.
#[derive(Debug)]
pub enum Pending {
    Effect(Effect),
    OpenChat,
    ChatReply(String),
}

pub struct App {
    pub should_quit: bool,
    pub market: Marketplace,
    pub input_mode: InputMode,

    pub listing_state: ListState,
    pub search: SearchForm,
    pub detail_scroll: u16,

    pub login: LoginForm,
    pub post: PostAdForm,

    pub chat: Option<ChatSession>,
    pub chat_input: String,
    pub chat_waiting: bool,
    pub chat_scroll: u16,
    pub chat_height: u16,
    pub chat_width: u16,

    pub pending: Option<Pending>,
    pub status: Option<String>,
    pub animation_frame: u8,
}

impl App {
    pub fn new(market: Marketplace) -> Self {
        Self {
            should_quit: false,
            market,
            input_mode: InputMode::Normal,
            listing_state: ListState::default(),
            search: SearchForm::default(),
            detail_scroll: 0,
            login: LoginForm::default(),
            post: PostAdForm::new(None),
            chat: None,
            chat_input: String::new(),
            chat_waiting: false,
            chat_scroll: 0,
            chat_height: 0,
            chat_width: 0,
            pending: None,
            status: None,
            animation_frame: 0,
        }
    }

    pub fn screen(&self) -> Screen {
        self.market.state().screen
    }

    pub fn is_loading(&self) -> bool {
        self.market.state().loading
    }

    /// Apply an action to the marketplace; its effect runs on the next loop turn.
    pub fn dispatch(&mut self, action: Action) {
        let before = self.screen();
        if let Some(effect) = self.market.apply(action) {
            self.pending = Some(Pending::Effect(effect));
        }
        self.on_screen_change(before);
    }

    fn on_screen_change(&mut self, before: Screen) {
        let now = self.screen();
        if now == before {
            return;
        }
        self.input_mode = InputMode::Normal;
        self.status = None;

        match now {
            Screen::Login => self.login = LoginForm::default(),
            Screen::PostAd => {
                let name = self.market.state().user.as_ref().map(|u| u.name.as_str());
                self.post = PostAdForm::new(name);
            }
            Screen::Messages => {
                let selected_id = self.market.state().selected.as_ref().map(|l| l.id.clone());
                let same_listing = match (&self.chat, &selected_id) {
                    (Some(chat), Some(id)) => &chat.listing().id == id,
                    _ => false,
                };
                if !same_listing {
                    self.chat = None;
                    self.chat_input.clear();
                    self.chat_waiting = true;
                    self.pending = Some(Pending::OpenChat);
                }
            }
            Screen::Detail => self.detail_scroll = 0,
            Screen::Home | Screen::Results => {}
        }
    }

    pub async fn run_pending(&mut self, pending: Pending) {
        match pending {
            Pending::Effect(effect) => {
                self.market.run_effect(effect).await;
                self.reset_listing_selection();
            }
            Pending::OpenChat => {
                self.chat = self.market.open_chat().await;
                self.chat_waiting = false;
                self.scroll_chat_to_bottom();
            }
            Pending::ChatReply(text) => {
                if let Some(chat) = self.chat.as_mut() {
                    chat.receive_reply(self.market.content(), &text).await;
                }
                self.chat_waiting = false;
                self.scroll_chat_to_bottom();
            }
        }
    }

    fn reset_listing_selection(&mut self) {
        let selected = if self.market.state().listings.is_empty() {
            None
        } else {
            Some(0)
        };
        self.listing_state.select(selected);
    }

    // Listing navigation
    pub fn selected_listing(&self) -> Option<&Listing> {
        self.listing_state
            .selected()
            .and_then(|i| self.market.state().listings.get(i))
    }

    pub fn listing_down(&mut self) {
        let len = self.market.state().listings.len();
        if len > 0 {
            let i = self.listing_state.selected().unwrap_or(0);
            self.listing_state.select(Some((i + 1).min(len - 1)));
        }
    }

    pub fn listing_up(&mut self) {
        let i = self.listing_state.selected().unwrap_or(0);
        self.listing_state.select(Some(i.saturating_sub(1)));
    }

    pub fn open_selected(&mut self) {
        if let Some(listing) = self.selected_listing().cloned() {
            self.dispatch(Action::OpenListing(listing));
        }
    }

    pub fn submit_search(&mut self) {
        let query = self.search.query.clone();
        let location = self.search.location.clone();
        self.input_mode = InputMode::Normal;
        self.dispatch(Action::Search { query, location });
    }

    pub fn select_category(&mut self, idx: usize) {
        if let Some((id, _)) = CATEGORIES.get(idx) {
            self.dispatch(Action::SelectCategory(id.to_string()));
        }
    }

    pub fn submit_login(&mut self) {
        let before = self.screen();
        let form = &self.login;
        let result = if form.registering {
            self.market.register(&form.email, &form.password, &form.name)
        } else {
            self.market.login(&form.email, &form.password)
        };

        match result {
            Ok(user) => {
                self.on_screen_change(before);
                self.status = Some(format!("Bienvenue {}", user.name));
            }
            Err(e) => self.login.error = Some(e.user_message()),
        }
    }

    pub fn logout(&mut self) {
        let before = self.screen();
        self.market.logout();
        self.on_screen_change(before);
        self.status = Some("Vous êtes déconnecté".to_string());
    }

    pub fn submit_post(&mut self) {
        let before = self.screen();
        let draft = self.post.draft_for_submit();
        match self.market.post_ad(&draft) {
            Ok(_) => {
                self.on_screen_change(before);
                self.listing_state.select(Some(0));
                self.status = Some("Annonce publiée".to_string());
            }
            Err(e) => self.post.error = Some(e.user_message()),
        }
    }

    pub fn send_chat(&mut self) {
        let text = std::mem::take(&mut self.chat_input);
        if self.chat_waiting {
            self.chat_input = text;
            return;
        }
        if let Some(chat) = self.chat.as_mut() {
            if let Some(text) = chat.push_user(&text) {
                self.chat_waiting = true;
                self.pending = Some(Pending::ChatReply(text));
                self.scroll_chat_to_bottom();
            }
        }
    }

    pub fn tick_animation(&mut self) {
        if self.is_loading() || self.chat_waiting {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }

    /// Scroll the transcript so the last message (or the typing indicator) is visible
    pub fn scroll_chat_to_bottom(&mut self) {
        let wrap_width = if self.chat_width > 0 {
            self.chat_width as usize
        } else {
            50
        };

        let mut total_lines: u16 = 0;
        if let Some(chat) = &self.chat {
            for msg in chat.messages() {
                total_lines = total_lines.saturating_add(1); // Sender line
                for line in msg.text.lines() {
                    let char_count = line.chars().count();
                    let wrapped = u16::try_from(char_count / wrap_width + 1).unwrap_or(u16::MAX);
                    total_lines = total_lines.saturating_add(wrapped);
                }
                total_lines = total_lines.saturating_add(1); // Blank line after message
            }
        }
        if self.chat_waiting {
            total_lines = total_lines.saturating_add(2);
        }

        let visible_height = if self.chat_height > 0 {
            self.chat_height
        } else {
            20
        };

        self.chat_scroll = total_lines.saturating_sub(visible_height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bi3oo_core::{ContentProvider, ContentService, LocalStore, MemoryKv};
    use std::sync::Arc;

    struct Offline;

    #[async_trait::async_trait]
    impl ContentProvider for Offline {
        async fn generate(
            &self,
            _prompt: &str,
            _schema: Option<&serde_json::Value>,
        ) -> anyhow::Result<String> {
            anyhow::bail!("offline")
        }

        fn name(&self) -> &'static str {
            "offline"
        }
    }

    fn app() -> App {
        let store = LocalStore::open(Arc::new(MemoryKv::new()));
        let content = ContentService::new(Arc::new(Offline));
        App::new(Marketplace::new(store, content))
    }

    #[tokio::test]
    async fn test_search_queues_effect_then_loads() {
        let mut app = app();
        app.search.query = "velo".to_string();
        app.submit_search();

        assert_eq!(app.screen(), Screen::Results);
        assert!(app.is_loading());
        let pending = app.pending.take().unwrap();
        app.run_pending(pending).await;

        assert!(!app.is_loading());
        assert_eq!(app.listing_state.selected(), Some(0));
        assert!(app.selected_listing().is_some());
    }

    #[test]
    fn test_post_ad_guard_then_login_form() {
        let mut app = app();
        app.dispatch(Action::PostAdClicked);
        assert_eq!(app.screen(), Screen::Login);

        app.login.registering = true;
        app.login.email = "jo@exemple.com".to_string();
        app.login.password = "pw".to_string();
        app.login.name = "Jo".to_string();
        app.submit_login();

        assert_eq!(app.screen(), Screen::PostAd);
        assert_eq!(app.post.draft.seller_name, "Jo");
    }

    #[test]
    fn test_login_error_is_shown() {
        let mut app = app();
        app.dispatch(Action::LoginClicked);
        app.login.email = "ghost@exemple.com".to_string();
        app.login.password = "pw".to_string();
        app.submit_login();

        assert_eq!(app.screen(), Screen::Login);
        assert_eq!(app.login.error.as_deref(), Some("Utilisateur non trouvé"));
    }

    #[test]
    fn test_wizard_blocks_invalid_step() {
        let mut form = PostAdForm::new(Some("Jo"));
        form.draft.title = "Vé".to_string();
        assert!(!form.next_step());
        assert!(form.error.is_some());

        form.draft.title = "Vélo".to_string();
        form.cycle_category(true);
        assert_eq!(form.draft.category, "maison");
        assert!(form.next_step());
        assert_eq!(form.step, 2);
        assert_eq!(form.field(), PostField::Description);
    }

    #[test]
    fn test_scroll_survives_huge_transcript() {
        let mut app = app();
        let listing = bi3oo_core::content::fallback_listings().remove(0);
        let mut chat = ChatSession::new(listing);
        let long = "a".repeat(200_000);
        for _ in 0..3 {
            chat.push_user(&long);
        }
        app.chat = Some(chat);
        app.chat_width = 10;
        app.chat_height = 20;
        app.chat_waiting = true;

        app.scroll_chat_to_bottom();
        assert_eq!(app.chat_scroll, u16::MAX - 20);
    }

    #[tokio::test]
    async fn test_contact_seller_opens_chat() {
        let mut app = app();
        app.dispatch(Action::LoginClicked);
        app.login.registering = true;
        app.login.email = "jo@exemple.com".to_string();
        app.login.password = "pw".to_string();
        app.submit_login();

        app.dispatch(Action::OpenListing(bi3oo_core::content::fallback_listings().remove(0)));
        app.dispatch(Action::ContactSeller);
        assert_eq!(app.screen(), Screen::Messages);
        assert!(app.chat_waiting);

        let pending = app.pending.take().unwrap();
        app.run_pending(pending).await;
        assert_eq!(app.chat.as_ref().unwrap().messages().len(), 2);

        app.chat_input = "Dernier prix ?".to_string();
        app.send_chat();
        let pending = app.pending.take().unwrap();
        app.run_pending(pending).await;
        assert_eq!(app.chat.as_ref().unwrap().messages().len(), 4);
        assert!(!app.chat_waiting);
    }
}
