//! App actor - message loop processing UI events and network responses

use std::time::{Duration, Instant};

use tokio::sync::mpsc;

use crate::app::state::AppState;
use crate::config::Config;
use crate::messages::{NetworkCommand, NetworkResponse, RenderState, UiEvent};
use crate::router::Route;

/// How often expired notifications are pruned
const TICK_INTERVAL: Duration = Duration::from_millis(250);

/// App actor that processes UI events and network responses
pub struct AppActor {
    state: AppState,
    network_tx: mpsc::UnboundedSender<NetworkCommand>,
    render_tx: mpsc::UnboundedSender<RenderState>,
}

impl AppActor {
    pub fn new(
        config: &Config,
        start_route: Route,
        network_tx: mpsc::UnboundedSender<NetworkCommand>,
        render_tx: mpsc::UnboundedSender<RenderState>,
    ) -> Self {
        AppActor {
            state: AppState::new(config, start_route),
            network_tx,
            render_tx,
        }
    }

    /// Run the actor message loop
    pub async fn run(
        mut self,
        mut ui_rx: mpsc::UnboundedReceiver<UiEvent>,
        mut net_rx: mpsc::UnboundedReceiver<NetworkResponse>,
    ) {
        // Mount the starting route
        if let Some(cmd) = self.state.mount_current() {
            self.send(cmd);
        }
        let _ = self.render_tx.send(self.state.to_render_state());

        let mut tick = tokio::time::interval(TICK_INTERVAL);

        loop {
            tokio::select! {
                Some(event) = ui_rx.recv() => {
                    if self.handle_ui_event(event) {
                        // Quit signal received
                        let _ = self.network_tx.send(NetworkCommand::Shutdown);
                        break;
                    }
                    let _ = self.render_tx.send(self.state.to_render_state());
                }
                Some(response) = net_rx.recv() => {
                    self.state.handle_response(response);
                    let _ = self.render_tx.send(self.state.to_render_state());
                }
                _ = tick.tick() => {
                    if self.state.tick(Instant::now()) {
                        let _ = self.render_tx.send(self.state.to_render_state());
                    }
                }
                else => break,
            }
        }
    }

    fn send(&self, cmd: NetworkCommand) {
        if self.network_tx.send(cmd).is_err() {
            tracing::error!("Network actor is gone; command dropped");
        }
    }

    /// Handle a UI event, returns true if quit was requested
    fn handle_ui_event(&mut self, event: UiEvent) -> bool {
        match event {
            // Routing
            UiEvent::Navigate(route) => {
                if let Some(cmd) = self.state.navigate(route) {
                    self.send(cmd);
                }
            }

            // Field focus
            UiEvent::NextField => self.state.next_field(),
            UiEvent::PrevField => self.state.prev_field(),

            // Input editing
            UiEvent::StartEditing => self.state.start_editing(),
            UiEvent::StopEditing => self.state.stop_editing(),
            UiEvent::CharInput(c) => self.state.enter_char(c),
            UiEvent::Backspace => self.state.delete_char(),
            UiEvent::CursorLeft => self.state.move_cursor_left(),
            UiEvent::CursorRight => self.state.move_cursor_right(),

            // Choice fields
            UiEvent::OptionNext => self.state.option_next(),
            UiEvent::OptionPrev => self.state.option_prev(),
            UiEvent::ToggleOption => self.state.toggle_option(),

            // Form actions
            UiEvent::Submit => {
                let today = chrono::Local::now().date_naive();
                if let Some(cmd) = self.state.submit(today) {
                    self.send(cmd);
                }
            }
            UiEvent::ResetForm => self.state.reset_form(),

            // Listing
            UiEvent::NextUser => self.state.next_user(),
            UiEvent::PrevUser => self.state.prev_user(),
            UiEvent::DownloadResume => {
                if let Some(cmd) = self.state.download_resume() {
                    self.send(cmd);
                }
            }
            UiEvent::RefreshUsers => {
                if let Some(cmd) = self.state.refresh_users() {
                    self.send(cmd);
                }
            }

            // Popups
            UiEvent::ToggleHelp => self.state.toggle_help(),
            UiEvent::CloseHelp => self.state.close_help(),

            // System
            UiEvent::Quit => return true,
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use reqwest::Url;

    use crate::listing::ListingStatus;

    fn config() -> Config {
        Config {
            base_url: Url::parse("http://localhost:4000/").unwrap(),
            download_dir: PathBuf::from("."),
            log_file: PathBuf::from("test.log"),
            request_timeout: Duration::from_secs(5),
        }
    }

    #[tokio::test]
    async fn test_listing_route_fetches_on_start_and_settles() {
        let (ui_tx, ui_rx) = mpsc::unbounded_channel();
        let (net_cmd_tx, mut net_cmd_rx) = mpsc::unbounded_channel();
        let (net_resp_tx, net_resp_rx) = mpsc::unbounded_channel();
        let (render_tx, mut render_rx) = mpsc::unbounded_channel();

        let actor = AppActor::new(&config(), Route::Users, net_cmd_tx, render_tx);
        let handle = tokio::spawn(actor.run(ui_rx, net_resp_rx));

        let Some(NetworkCommand::FetchUsers { id }) = net_cmd_rx.recv().await else {
            panic!("expected an initial fetch");
        };
        let first = render_rx.recv().await.unwrap();
        assert!(matches!(first.listing_status, ListingStatus::Loading { .. }));

        net_resp_tx
            .send(NetworkResponse::UsersFetched { id, result: Ok(Vec::new()) })
            .unwrap();
        let settled = loop {
            let state = render_rx.recv().await.unwrap();
            if state.listing_status != first.listing_status {
                break state;
            }
        };
        assert_eq!(settled.listing_status, ListingStatus::Loaded);

        ui_tx.send(UiEvent::Quit).unwrap();
        assert!(matches!(net_cmd_rx.recv().await, Some(NetworkCommand::Shutdown)));
        handle.await.unwrap();
    }
}
