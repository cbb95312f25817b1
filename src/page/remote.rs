use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tracing::{error, info};

use super::{Page, POST_CONTENT_INPUT_ID};
use crate::client::NetworkClient;
use crate::utils::app_error::ClientError;

/// Page served by the network server.
///
/// Input values live in memory, reloading fetches the current location again.
pub struct RemotePage {
    client: NetworkClient,
    location: String,
    inputs: Mutex<HashMap<String, String>>,
    reloads: AtomicUsize,
    failures: Mutex<Vec<String>>,
}

impl RemotePage {
    /// A page at `location` holding an empty post input
    pub fn new(client: NetworkClient, location: impl Into<String>) -> Self {
        Self::with_inputs(client, location, [POST_CONTENT_INPUT_ID])
    }

    pub fn with_inputs<'a>(
        client: NetworkClient,
        location: impl Into<String>,
        input_ids: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        Self {
            client,
            location: location.into(),
            inputs: Mutex::new(
                input_ids
                    .into_iter()
                    .map(|id| (id.to_string(), String::new()))
                    .collect(),
            ),
            reloads: AtomicUsize::new(0),
            failures: Mutex::new(Vec::new()),
        }
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    /// Reloads that got the page back from the server
    pub fn reload_count(&self) -> usize {
        self.reloads.load(Ordering::SeqCst)
    }

    /// Failures reported so far, oldest first
    pub fn failures(&self) -> Vec<String> {
        self.failures
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl Page for RemotePage {
    fn input_value(&self, id: &str) -> Result<String, ClientError> {
        let inputs = self.inputs.lock().unwrap_or_else(|e| e.into_inner());
        inputs
            .get(id)
            .cloned()
            .ok_or_else(|| ClientError::MissingElement(id.to_string()))
    }

    fn set_input_value(&self, id: &str, value: &str) -> Result<(), ClientError> {
        let mut inputs = self.inputs.lock().unwrap_or_else(|e| e.into_inner());
        match inputs.get_mut(id) {
            Some(input) => {
                *input = value.to_string();
                Ok(())
            }
            None => Err(ClientError::MissingElement(id.to_string())),
        }
    }

    async fn reload(&self) -> Result<(), ClientError> {
        let page = self.client.fetch_page(&self.location).await?;
        self.reloads.fetch_add(1, Ordering::SeqCst);
        info!("Reloaded {} ({} bytes)", self.location, page.len());
        Ok(())
    }

    fn report_failure(&self, e: &ClientError) {
        error!("Could not publish the post : {e}");
        self.failures
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(e.to_string());
    }
}
