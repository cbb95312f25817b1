/// Who is logged in on the rendered page, if anyone.
///
/// Set by the server when the page is rendered and never changed afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionIndicator {
    username: Option<String>,
}

impl SessionIndicator {
    pub fn anonymous() -> Self {
        Self { username: None }
    }

    pub fn logged_in(username: impl Into<String>) -> Self {
        Self::from_rendered(Some(&username.into()))
    }

    /// An absent or empty rendered value means nobody is logged in
    pub fn from_rendered(value: Option<&str>) -> Self {
        match value {
            Some(username) if !username.is_empty() => Self {
                username: Some(username.to_string()),
            },
            _ => Self::anonymous(),
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.username.is_some()
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }
}
