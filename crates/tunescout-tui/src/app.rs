// TUI application state and event handling
use ratatui::widgets::ListState;
use tunescout_core::{
    fallback::quick_searches, SearchBackend, SearchMode, SearchOrchestrator, SearchResult,
    SessionState, Tab,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,    // Navigating results
    Searching, // Typing in search box
}

pub struct App<B> {
    pub should_quit: bool,
    pub input_mode: InputMode,
    pub search_input: String,
    pub selected_index: usize,
    pub list_state: ListState,
    /// Transient status line (playback errors and the like)
    pub status_message: Option<String>,
    orchestrator: SearchOrchestrator<B>,
}

impl<B: SearchBackend> App<B> {
    pub fn new(orchestrator: SearchOrchestrator<B>) -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));
        let search_input = orchestrator.state().query.clone();

        Self {
            should_quit: false,
            input_mode: InputMode::Searching,
            search_input,
            selected_index: 0,
            list_state,
            status_message: None,
            orchestrator,
        }
    }

    pub fn session(&self) -> &SessionState {
        self.orchestrator.state()
    }

    pub fn enter_search_mode(&mut self) {
        self.input_mode = InputMode::Searching;
    }

    pub fn enter_normal_mode(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn mark_loading(&mut self) {
        self.orchestrator.state_mut().loading = true;
    }

    /// Run the query currently in the input box
    pub async fn submit_search(&mut self) {
        self.orchestrator.set_query(self.search_input.clone());
        self.status_message = None;
        let manual = match self.session().mode {
            SearchMode::Single => Some(self.session().active_tab),
            SearchMode::Dual => None,
        };
        self.orchestrator.search(manual).await;
        self.reset_selection();
    }

    /// Search the prefilled default query and hand focus to the results
    pub async fn initial_search(&mut self) {
        self.enter_normal_mode();
        self.submit_search().await;
    }

    /// Fill the input with the n-th suggestion for the active tab and search
    pub async fn run_quick_search(&mut self, index: usize) -> bool {
        let Some(query) = quick_searches(self.session().active_tab).get(index) else {
            return false;
        };
        self.search_input = (*query).to_string();
        self.submit_search().await;
        true
    }

    /// Tab key: cycles sources in single mode, result tabs in dual mode
    pub fn next_tab(&mut self) {
        let session = self.session();
        match session.mode {
            SearchMode::Single => {
                let next = match session.active_tab {
                    Tab::YouTube => Tab::Jamendo,
                    Tab::Jamendo | Tab::All => Tab::YouTube,
                };
                self.orchestrator.select_source(next);
            }
            SearchMode::Dual => {
                let next = match session.active_tab {
                    Tab::All => Tab::YouTube,
                    Tab::YouTube => Tab::Jamendo,
                    Tab::Jamendo => Tab::All,
                };
                self.orchestrator.state_mut().show_tab(next);
            }
        }
        self.reset_selection();
    }

    pub fn toggle_mode(&mut self) {
        let mode = match self.session().mode {
            SearchMode::Single => SearchMode::Dual,
            SearchMode::Dual => SearchMode::Single,
        };
        self.orchestrator.set_mode(mode);
        if mode == SearchMode::Dual {
            self.orchestrator.state_mut().show_tab(Tab::All);
        }
        self.reset_selection();
    }

    pub fn visible_results(&self) -> Vec<&SearchResult> {
        self.session().current_results()
    }

    pub fn next_result(&mut self) {
        let len = self.visible_results().len();
        if len > 0 {
            self.selected_index = (self.selected_index + 1).min(len - 1);
            self.list_state.select(Some(self.selected_index));
        }
    }

    pub fn previous_result(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
        self.list_state.select(Some(self.selected_index));
    }

    /// Mark the selected entry as now playing and return where to play it
    pub fn play_selected(&mut self) -> Option<String> {
        let index = self.selected_index;
        self.orchestrator
            .state_mut()
            .play(index)
            .and_then(|track| track.playback_url())
    }

    fn reset_selection(&mut self) {
        self.selected_index = 0;
        self.list_state.select(Some(0));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::time::Duration;
    use tunescout_core::{FetchError, Source};

    struct FixedBackend {
        youtube_up: bool,
    }

    fn track(source: Source, id: &str) -> SearchResult {
        SearchResult {
            id: id.to_string(),
            title: format!("Track {}", id),
            source,
            thumbnail: None,
            channel: Some("chan".into()),
            artwork: None,
            artist: Some("artist".into()),
            stream_url: Some(format!("https://stream/{}", id)),
            license: None,
        }
    }

    #[async_trait]
    impl SearchBackend for FixedBackend {
        async fn fetch(
            &self,
            source: Source,
            _query: &str,
            _timeout: Duration,
        ) -> Result<Vec<SearchResult>, FetchError> {
            match source {
                Source::YouTube if !self.youtube_up => {
                    Err(FetchError::Unavailable("connection refused".into()))
                }
                Source::YouTube => Ok(vec![track(source, "yt1"), track(source, "yt2")]),
                Source::Jamendo => Ok(vec![track(source, "jm1")]),
            }
        }
    }

    fn app(youtube_up: bool) -> App<FixedBackend> {
        App::new(SearchOrchestrator::new(FixedBackend { youtube_up }))
    }

    #[test]
    fn test_input_starts_with_default_query() {
        let app = app(true);
        assert_eq!(app.search_input, "Coke Studio Pakistan");
        assert_eq!(app.input_mode, InputMode::Searching);
    }

    #[tokio::test]
    async fn test_blocked_youtube_lands_on_jamendo() {
        let mut app = app(false);
        app.submit_search().await;

        assert!(app.session().is_fallback);
        assert_eq!(app.session().active_tab, Tab::Jamendo);
        assert_eq!(app.visible_results().len(), 1);
    }

    #[tokio::test]
    async fn test_navigation_is_clamped() {
        let mut app = app(true);
        app.submit_search().await;

        app.next_result();
        app.next_result();
        assert_eq!(app.selected_index, 1);
        app.previous_result();
        app.previous_result();
        assert_eq!(app.selected_index, 0);
    }

    #[tokio::test]
    async fn test_play_selected_video_returns_watch_url() {
        let mut app = app(true);
        app.submit_search().await;
        app.next_result();

        let url = app.play_selected().unwrap();
        assert_eq!(url, "https://www.youtube.com/watch?v=yt2");
        assert_eq!(app.session().now_playing().unwrap().id, "yt2");
    }

    #[tokio::test]
    async fn test_initial_search_shows_default_results() {
        let mut app = app(true);
        app.initial_search().await;

        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.session().query, "Coke Studio Pakistan");
        assert_eq!(app.visible_results().len(), 2);
    }

    #[tokio::test]
    async fn test_enter_on_empty_list_keeps_now_playing() {
        let mut app = app(true);
        app.submit_search().await;
        app.play_selected().unwrap();

        // Jamendo tab has nothing until it is searched
        app.next_tab();
        assert!(app.visible_results().is_empty());
        assert!(app.play_selected().is_none());
        assert_eq!(app.session().now_playing().unwrap().id, "yt1");
    }

    #[tokio::test]
    async fn test_dual_mode_cycles_result_tabs() {
        let mut app = app(true);
        app.toggle_mode();
        assert_eq!(app.session().mode, SearchMode::Dual);

        app.submit_search().await;
        assert_eq!(app.session().result_counts(), (2, 1, 3));

        app.next_tab();
        assert_eq!(app.session().active_tab, Tab::Jamendo);
        app.next_tab();
        assert_eq!(app.session().active_tab, Tab::All);
        assert_eq!(app.visible_results().len(), 3);
    }

    #[tokio::test]
    async fn test_quick_search_fills_input() {
        let mut app = app(true);
        assert!(app.run_quick_search(0).await);
        assert_eq!(app.search_input, "Coke Studio");
        assert!(!app.run_quick_search(99).await);
    }
}
