use std::hash::{Hash, Hasher};

/// A login identity. Two users are the same user when their names match.
#[derive(Debug, Clone)]
pub struct User {
    username: String,
    credential: String,
}

impl User {
    pub fn new<U: Into<String>, C: Into<String>>(username: U, credential: C) -> Self {
        Self {
            username: username.into(),
            credential: credential.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Plain comparison against the stored credential.
    pub fn credential_matches(&self, credential: &str) -> bool {
        self.credential == credential
    }
}

impl PartialEq for User {
    fn eq(&self, other: &Self) -> bool {
        self.username == other.username
    }
}

impl Eq for User {}

impl Hash for User {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.username.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::User;

    #[test]
    fn users_compare_by_name_only() {
        assert_eq!(User::new("alice", "1234"), User::new("alice", "other"));
        assert_ne!(User::new("alice", "1234"), User::new("bob", "1234"));
    }
}
