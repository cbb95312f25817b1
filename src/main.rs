use std::process::ExitCode;
use std::sync::Arc;

use futures_util::future::join_all;
use network_composer::command::Command;
use network_composer::page::remote::RemotePage;
use network_composer::page::{Form, Page, NEW_POST_FORM_ID, POST_CONTENT_INPUT_ID};
use network_composer::{ClientError, Config, Document, NetworkClient, PostSubmissionHandler, SubmitOutcome};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), ClientError> {
    let config = Config::from_env()?;
    let client = NetworkClient::new(&config)?;

    let page = Arc::new(RemotePage::new(client.clone(), config.location.clone()));
    let mut document = Document::new(page.clone()).with_form(Form::new(NEW_POST_FORM_ID));

    if !PostSubmissionHandler::on_document_ready(&config.session, &mut document, client.clone())? {
        return Ok(());
    }

    info!(
        "Composing on {}{}, type a post and press enter",
        client.base_url(),
        page.location()
    );

    let mut submissions = Vec::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match Command::parse(&line) {
            Ok(command) => command,
            Err(e) => {
                warn!("{e}");
                continue;
            }
        };

        match command {
            Command::Post(content) => {
                page.set_input_value(POST_CONTENT_INPUT_ID, &content)?;
                match document.submit(NEW_POST_FORM_ID)? {
                    SubmitOutcome::Intercepted(task) => submissions.push(task),
                    SubmitOutcome::Native => warn!("New post form is not intercepted"),
                }
            }
            Command::Edit { post_id, content } => match client.edit_post(post_id, content).await {
                Ok(reply) => info!("{}", reply.message.unwrap_or_default()),
                Err(e) => warn!("Could not edit post {post_id} : {e}"),
            },
            Command::Like { post_id } => match client.like_post(post_id).await {
                Ok(true) => info!("Post {post_id} liked"),
                Ok(false) => info!("Post {post_id} unliked"),
                Err(e) => warn!("Could not like post {post_id} : {e}"),
            },
            Command::Follow { username } => match client.follow_user(&username).await {
                Ok(reply) => info!("{}", reply.message.unwrap_or_default()),
                Err(e) => warn!("Could not follow {username} : {e}"),
            },
        }
    }

    let failed = join_all(submissions)
        .await
        .into_iter()
        .filter(|result| match result {
            Ok(Ok(())) => false,
            Ok(Err(e)) => !e.post_was_published(),
            Err(_) => true,
        })
        .count();
    if failed > 0 {
        warn!("{failed} post(s) were not published");
    }

    Ok(())
}
