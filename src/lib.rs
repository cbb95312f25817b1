pub mod client;
pub mod command;
pub mod config;
pub mod handlers;
pub mod middleware;
pub mod page;
pub mod session;
pub mod structs;
pub mod utils;

pub use client::NetworkClient;
pub use config::Config;
pub use handlers::post_submission::PostSubmissionHandler;
pub use page::{Document, Form, Page, SubmitOutcome};
pub use session::SessionIndicator;
pub use utils::app_error::ClientError;
