use std::fmt;

use hyper::StatusCode;

#[derive(Debug)]
pub enum ClientError {
    //Configuration errors
    InvalidConfig(String),
    InvalidUri(String),
    InvalidHeader(String),
    //Request errors
    RequestBuild(hyper::http::Error),
    Transport(hyper::Error),
    Timeout,
    Encode(serde_json::Error),
    //Reply errors
    InvalidJson(serde_json::Error),
    Rejected {
        status: StatusCode,
        message: Option<String>,
    },
    //Page errors
    MissingElement(String),
    /// The post went through but the page that shows it did not come back
    ReloadFailed(Box<ClientError>),
    InvalidCommand(String),
    TaskFailed(String),
    Io(std::io::Error),
}

impl ClientError {
    /// Whether the post reached the server despite the error
    pub fn post_was_published(&self) -> bool {
        matches!(self, ClientError::ReloadFailed(_))
    }

    /// Status of the reply when the server answered but refused the request
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::InvalidConfig(reason) => write!(f, "invalid configuration: {reason}"),
            ClientError::InvalidUri(uri) => write!(f, "invalid uri `{uri}`"),
            ClientError::InvalidHeader(name) => write!(f, "invalid value for header {name}"),
            ClientError::RequestBuild(e) => write!(f, "could not build request: {e}"),
            ClientError::Transport(e) => write!(f, "request failed: {e}"),
            ClientError::Timeout => write!(f, "request timed out"),
            ClientError::Encode(e) => write!(f, "could not encode payload: {e}"),
            ClientError::InvalidJson(e) => write!(f, "reply is not valid json: {e}"),
            ClientError::Rejected {
                status,
                message: Some(message),
            } => write!(f, "server answered {status}: {message}"),
            ClientError::Rejected {
                status,
                message: None,
            } => write!(f, "server answered {status}"),
            ClientError::MissingElement(id) => write!(f, "no element with id `{id}` on the page"),
            ClientError::ReloadFailed(e) => write!(f, "post published but the page could not be reloaded: {e}"),
            ClientError::InvalidCommand(reason) => write!(f, "invalid command: {reason}"),
            ClientError::TaskFailed(reason) => write!(f, "submission did not finish: {reason}"),
            ClientError::Io(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ClientError::RequestBuild(e) => Some(e),
            ClientError::Transport(e) => Some(e),
            ClientError::Encode(e) | ClientError::InvalidJson(e) => Some(e),
            ClientError::Io(e) => Some(e),
            ClientError::ReloadFailed(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

impl From<hyper::Error> for ClientError {
    fn from(e: hyper::Error) -> Self {
        ClientError::Transport(e)
    }
}

impl From<std::io::Error> for ClientError {
    fn from(e: std::io::Error) -> Self {
        ClientError::Io(e)
    }
}

impl From<hyper::http::Error> for ClientError {
    fn from(e: hyper::http::Error) -> Self {
        ClientError::RequestBuild(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_message_is_shown() {
        let error = ClientError::Rejected {
            status: StatusCode::FORBIDDEN,
            message: Some("Can't edit another user's post".to_string()),
        };
        assert_eq!(error.status(), Some(StatusCode::FORBIDDEN));
        assert_eq!(
            error.to_string(),
            "server answered 403 Forbidden: Can't edit another user's post"
        );
    }

    #[test]
    fn only_rejections_carry_a_status() {
        assert_eq!(ClientError::Timeout.status(), None);
    }

    #[test]
    fn failed_reload_still_means_published() {
        let error = ClientError::ReloadFailed(Box::new(ClientError::Timeout));
        assert!(error.post_was_published());
        assert!(!ClientError::Timeout.post_was_published());
        assert_eq!(
            error.to_string(),
            "post published but the page could not be reloaded: request timed out"
        );
    }
}
