use crate::state::messages::{DataRequest, DataResponse};
use futsal_api::loader::{self, LoadError};
use log::{debug, error, info};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;

const SPINNER_CHARS: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
pub const ERROR_CHAR: char = '!';

#[derive(Debug, Copy, Clone)]
pub struct LoadingState {
    pub is_loading: bool,
    pub spinner_char: char,
}

impl Default for LoadingState {
    fn default() -> Self {
        Self { is_loading: false, spinner_char: ' ' }
    }
}

/// Loads the team document off the UI loop.
pub struct DataWorker {
    requests: mpsc::Receiver<DataRequest>,
    responses: mpsc::Sender<DataResponse>,
    is_loading: Arc<AtomicBool>,
}

impl DataWorker {
    pub fn new(requests: mpsc::Receiver<DataRequest>, responses: mpsc::Sender<DataResponse>) -> Self {
        Self {
            requests,
            responses,
            is_loading: Arc::new(AtomicBool::new(false)),
        }
    }

    pub async fn run(mut self) {
        while let Some(request) = self.requests.recv().await {
            self.start_loading_animation().await;

            let result = match request {
                DataRequest::LoadTeam => self.handle_load_team().await,
                DataRequest::ReloadTeam => {
                    info!("reloading team document");
                    self.handle_load_team().await
                }
            };

            debug!("data request complete");
            self.stop_loading_animation(result.is_ok()).await;

            let response = result.unwrap_or_else(|err| DataResponse::Error {
                message: err.to_string(),
            });

            if let Err(e) = self.responses.send(response).await {
                error!("Failed to send data response: {e}");
                break;
            }
        }
    }

    async fn handle_load_team(&self) -> Result<DataResponse, LoadError> {
        let team = tokio::task::spawn_blocking(loader::load_team)
            .await
            .map_err(|e| LoadError::Invalid(format!("loader task failed: {e}")))??;
        debug!(
            "loaded {} with {} players and {} matches",
            team.name,
            team.players.len(),
            team.matches.len()
        );
        Ok(DataResponse::TeamLoaded { team })
    }

    async fn start_loading_animation(&self) {
        self.is_loading.store(true, Ordering::Relaxed);

        let mut loading_state = LoadingState { is_loading: true, spinner_char: SPINNER_CHARS[0] };
        let _ = self
            .responses
            .send(DataResponse::LoadingStateChanged { loading_state })
            .await;

        let responses = self.responses.clone();
        let is_loading = self.is_loading.clone();

        tokio::spawn(async move {
            let mut spinner_index = 1;
            let mut interval = tokio::time::interval(Duration::from_millis(33));
            loop {
                interval.tick().await;
                if !is_loading.load(Ordering::Relaxed) {
                    break;
                }
                loading_state.spinner_char = SPINNER_CHARS[spinner_index];
                spinner_index = (spinner_index + 1) % SPINNER_CHARS.len();
                let _ = responses
                    .send(DataResponse::LoadingStateChanged { loading_state })
                    .await;
            }
        });
    }

    async fn stop_loading_animation(&self, is_ok: bool) {
        self.is_loading.store(false, Ordering::Relaxed);
        tokio::time::sleep(Duration::from_millis(15)).await;

        let spinner_char = if is_ok { ' ' } else { ERROR_CHAR };
        let _ = self
            .responses
            .send(DataResponse::LoadingStateChanged {
                loading_state: LoadingState { is_loading: false, spinner_char },
            })
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn load_request_reports_team_and_settles_spinner() {
        let (req_tx, req_rx) = mpsc::channel(4);
        let (resp_tx, mut resp_rx) = mpsc::channel(64);
        let worker = tokio::spawn(DataWorker::new(req_rx, resp_tx).run());

        req_tx.send(DataRequest::LoadTeam).await.unwrap();
        drop(req_tx);

        let mut team = None;
        let mut last_loading = None;
        while let Some(response) = resp_rx.recv().await {
            match response {
                DataResponse::TeamLoaded { team: t } => team = Some(t),
                DataResponse::LoadingStateChanged { loading_state } => {
                    last_loading = Some(loading_state)
                }
                DataResponse::Error { message } => panic!("unexpected error: {message}"),
            }
            if team.is_some() {
                break;
            }
        }
        worker.await.unwrap();

        assert!(!team.unwrap().players.is_empty());
        let settled = last_loading.unwrap();
        assert!(!settled.is_loading);
        assert_eq!(settled.spinner_char, ' ');
    }
}
