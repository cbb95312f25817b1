use crate::utils::app_error::ClientError;

/// One line typed in the composer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Anything that is not a command is the text of a new post, empty included
    Post(String),
    Edit { post_id: i64, content: String },
    Like { post_id: i64 },
    Follow { username: String },
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, ClientError> {
        let line = line.trim_end_matches(['\r', '\n']);

        let Some(rest) = line.strip_prefix('/') else {
            return Ok(Command::Post(line.to_string()));
        };
        //A doubled slash publishes the line without its first slash
        if rest.starts_with('/') {
            return Ok(Command::Post(rest.to_string()));
        }

        let (name, args) = rest.split_once(' ').unwrap_or((rest, ""));
        match name {
            "edit" => {
                let (post_id, content) = args.trim_start().split_once(' ').ok_or_else(|| {
                    ClientError::InvalidCommand("usage: /edit <post id> <content>".to_string())
                })?;
                Ok(Command::Edit {
                    post_id: parse_post_id(post_id)?,
                    content: content.to_string(),
                })
            }
            "like" => Ok(Command::Like {
                post_id: parse_post_id(args.trim())?,
            }),
            "follow" => {
                let username = args.trim();
                if username.is_empty() || username.contains(char::is_whitespace) {
                    return Err(ClientError::InvalidCommand(
                        "usage: /follow <username>".to_string(),
                    ));
                }
                Ok(Command::Follow {
                    username: username.to_string(),
                })
            }
            other => Err(ClientError::InvalidCommand(format!(
                "unknown command `/{other}`, start the line with // to post it"
            ))),
        }
    }
}

fn parse_post_id(value: &str) -> Result<i64, ClientError> {
    value
        .parse()
        .map_err(|_| ClientError::InvalidCommand(format!("`{value}` is not a post id")))
}
