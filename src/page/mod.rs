pub mod remote;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::task::JoinHandle;

use crate::utils::app_error::ClientError;

pub const NEW_POST_FORM_ID: &str = "new-post";
pub const POST_CONTENT_INPUT_ID: &str = "post-content";

/// The rendered page the composer lives in
#[async_trait]
pub trait Page: Send + Sync {
    fn input_value(&self, id: &str) -> Result<String, ClientError>;

    fn set_input_value(&self, id: &str, value: &str) -> Result<(), ClientError>;

    /// Reload the whole page from the server, bypassing caches
    async fn reload(&self) -> Result<(), ClientError>;

    /// Called when an intercepted submission failed
    fn report_failure(&self, _error: &ClientError) {}
}

/// Script that replaces the native submission of a form.
///
/// Runs synchronously when the form is submitted and hands back the task doing
/// the actual work.
pub trait SubmitHandler: Send + Sync {
    fn on_submit(&self) -> JoinHandle<Result<(), ClientError>>;
}

pub enum SubmitOutcome {
    /// Nothing intercepted the submission, the page does a regular form post
    Native,
    /// The native submission was cancelled, the task runs the scripted one
    Intercepted(JoinHandle<Result<(), ClientError>>),
}

impl SubmitOutcome {
    pub fn is_native(&self) -> bool {
        matches!(self, SubmitOutcome::Native)
    }

    /// Wait for the scripted submission. A native submission is not ours to wait on.
    pub async fn finished(self) -> Option<Result<(), ClientError>> {
        match self {
            SubmitOutcome::Native => None,
            SubmitOutcome::Intercepted(task) => Some(task.await.unwrap_or_else(|e| {
                Err(ClientError::TaskFailed(e.to_string()))
            })),
        }
    }
}

pub struct Form {
    id: String,
    on_submit: Option<Arc<dyn SubmitHandler>>,
}

impl Form {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            on_submit: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_intercepted(&self) -> bool {
        self.on_submit.is_some()
    }

    /// Replace the submit override, last one wins
    pub fn set_on_submit(&mut self, handler: Arc<dyn SubmitHandler>) {
        self.on_submit = Some(handler);
    }

    pub fn submit(&self) -> SubmitOutcome {
        match &self.on_submit {
            Some(handler) => SubmitOutcome::Intercepted(handler.on_submit()),
            None => SubmitOutcome::Native,
        }
    }
}

/// Forms of a page once its markup is built
pub struct Document {
    page: Arc<dyn Page>,
    forms: HashMap<String, Form>,
}

impl Document {
    pub fn new(page: Arc<dyn Page>) -> Self {
        Self {
            page,
            forms: HashMap::new(),
        }
    }

    pub fn with_form(mut self, form: Form) -> Self {
        self.forms.insert(form.id().to_string(), form);
        self
    }

    pub fn page(&self) -> Arc<dyn Page> {
        self.page.clone()
    }

    pub fn form(&self, id: &str) -> Result<&Form, ClientError> {
        self.forms
            .get(id)
            .ok_or_else(|| ClientError::MissingElement(id.to_string()))
    }

    pub fn form_mut(&mut self, id: &str) -> Result<&mut Form, ClientError> {
        self.forms
            .get_mut(id)
            .ok_or_else(|| ClientError::MissingElement(id.to_string()))
    }

    pub fn submit(&self, id: &str) -> Result<SubmitOutcome, ClientError> {
        Ok(self.form(id)?.submit())
    }
}

#[cfg(test)]
mod tests {
    use super::remote::RemotePage;
    use super::*;
    use crate::client::NetworkClient;
    use crate::config::Config;

    struct Counting(std::sync::atomic::AtomicUsize);

    impl SubmitHandler for Counting {
        fn on_submit(&self) -> JoinHandle<Result<(), ClientError>> {
            self.0.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            tokio::spawn(async { Ok(()) })
        }
    }

    fn document() -> Document {
        let client = NetworkClient::new(&Config::default()).unwrap();
        Document::new(Arc::new(RemotePage::new(client, "/"))).with_form(Form::new(NEW_POST_FORM_ID))
    }

    #[test]
    fn forms_submit_natively_by_default() {
        let document = document();
        assert!(!document.form(NEW_POST_FORM_ID).unwrap().is_intercepted());
        assert!(document.submit(NEW_POST_FORM_ID).unwrap().is_native());
    }

    #[test]
    fn unknown_forms_are_missing() {
        let mut document = document();
        assert!(matches!(document.submit("login"), Err(ClientError::MissingElement(_))));
        assert!(document.form_mut("login").is_err());
    }

    #[tokio::test]
    async fn override_runs_on_every_submit() {
        let mut document = document();
        let handler = Arc::new(Counting(Default::default()));
        document
            .form_mut(NEW_POST_FORM_ID)
            .unwrap()
            .set_on_submit(handler.clone());

        for _ in 0..2 {
            let outcome = document.submit(NEW_POST_FORM_ID).unwrap();
            assert!(matches!(outcome.finished().await, Some(Ok(()))));
        }
        assert_eq!(handler.0.load(std::sync::atomic::Ordering::SeqCst), 2);
    }
}
