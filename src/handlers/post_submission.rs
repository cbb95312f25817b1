use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::client::NetworkClient;
use crate::page::{Document, Page, SubmitHandler, NEW_POST_FORM_ID, POST_CONTENT_INPUT_ID};
use crate::session::SessionIndicator;
use crate::structs::post::NewPost;
use crate::utils::app_error::ClientError;

/// Publishes the content of the new post form without leaving the page
pub struct PostSubmissionHandler {
    page: Arc<dyn Page>,
    client: NetworkClient,
}

impl PostSubmissionHandler {
    pub fn new(page: Arc<dyn Page>, client: NetworkClient) -> Self {
        Self { page, client }
    }

    /// Hook the handler on the new post form once the document is built.
    ///
    /// Returns whether the form is now intercepted. Anonymous visitors keep the
    /// native form.
    pub fn on_document_ready(
        session: &SessionIndicator,
        document: &mut Document,
        client: NetworkClient,
    ) -> Result<bool, ClientError> {
        let Some(username) = session.username() else {
            info!("No user logged in, new post form left untouched");
            return Ok(false);
        };

        let handler = Arc::new(Self::new(document.page(), client));
        document
            .form_mut(NEW_POST_FORM_ID)?
            .set_on_submit(handler);

        info!("New post form intercepted for {username}");
        Ok(true)
    }

    /// Send `draft` as a new post, then empty the input and reload the page.
    ///
    /// Once the post is sent, a failed reload is `ReloadFailed`.
    pub async fn publish(
        page: &dyn Page,
        client: &NetworkClient,
        draft: String,
    ) -> Result<(), ClientError> {
        client.publish_post(&NewPost::new(draft)).await?;

        page.set_input_value(POST_CONTENT_INPUT_ID, "")?;
        page.reload()
            .await
            .map_err(|e| ClientError::ReloadFailed(Box::new(e)))
    }
}

impl SubmitHandler for PostSubmissionHandler {
    fn on_submit(&self) -> JoinHandle<Result<(), ClientError>> {
        //The draft is the one displayed when the form was submitted
        let draft = self.page.input_value(POST_CONTENT_INPUT_ID);
        let page = self.page.clone();
        let client = self.client.clone();

        tokio::spawn(async move {
            let result = match draft {
                Ok(draft) => Self::publish(page.as_ref(), &client, draft).await,
                Err(e) => Err(e),
            };

            match &result {
                Err(e) if e.post_was_published() => warn!("{e}"),
                Err(e) => {
                    warn!("New post submission failed : {e}");
                    page.report_failure(e);
                }
                Ok(()) => {}
            }

            result
        })
    }
}
