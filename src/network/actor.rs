//! Network actor - runs backend calls in the Tokio async runtime

use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::messages::{NetworkCommand, NetworkResponse};
use crate::network::client::ApiClient;

/// Network actor that turns commands into HTTP calls
pub struct NetworkActor {
    client: ApiClient,
    response_tx: mpsc::UnboundedSender<NetworkResponse>,
    active_requests: JoinSet<()>,
}

impl NetworkActor {
    pub fn new(client: ApiClient, response_tx: mpsc::UnboundedSender<NetworkResponse>) -> Self {
        NetworkActor {
            client,
            response_tx,
            active_requests: JoinSet::new(),
        }
    }

    /// Run the network actor message loop
    pub async fn run(mut self, mut cmd_rx: mpsc::UnboundedReceiver<NetworkCommand>) {
        loop {
            tokio::select! {
                biased;

                cmd = cmd_rx.recv() => {
                    match cmd {
                        Some(NetworkCommand::FetchUsers { id }) => {
                            let response_tx = self.response_tx.clone();
                            let client = self.client.clone();

                            self.active_requests.spawn(async move {
                                tracing::info!(id, "Executing user fetch");
                                let result = client.fetch_users().await;
                                if let Err(e) = &result {
                                    tracing::warn!(id, error = %e, "User fetch failed");
                                }
                                let _ = response_tx.send(NetworkResponse::UsersFetched { id, result });
                            });
                        }

                        Some(NetworkCommand::SubmitRegistration { id, registration }) => {
                            let response_tx = self.response_tx.clone();
                            let client = self.client.clone();

                            self.active_requests.spawn(async move {
                                tracing::info!(id, resume = %registration.resume.file_name, "Posting registration");
                                let result = client.create_user(&registration).await;
                                if let Err(e) = &result {
                                    tracing::warn!(id, error = %e, "Registration POST failed");
                                }
                                let _ = response_tx.send(NetworkResponse::RegistrationSubmitted { id, result });
                            });
                        }

                        Some(NetworkCommand::DownloadResume { id, url, destination }) => {
                            let response_tx = self.response_tx.clone();
                            let client = self.client.clone();

                            self.active_requests.spawn(async move {
                                tracing::info!(id, url = %url, "Downloading resume");
                                let result = client.download(url, &destination).await;
                                if let Err(e) = &result {
                                    tracing::warn!(id, error = %e, "Resume download failed");
                                }
                                let _ = response_tx.send(NetworkResponse::ResumeDownloaded { id, result });
                            });
                        }

                        Some(NetworkCommand::Shutdown) | None => {
                            self.active_requests.abort_all();
                            break;
                        }
                    }
                }

                // Clean up completed tasks
                Some(result) = self.active_requests.join_next() => {
                    if let Err(e) = result {
                        if e.is_panic() {
                            tracing::error!(error = %e, "Network task panicked");
                        }
                    }
                }
            }
        }
    }
}
