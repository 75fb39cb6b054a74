use crate::model::User;
use std::collections::HashMap;

pub const DEFAULT_USERNAME: &str = "alice";
pub const DEFAULT_CREDENTIAL: &str = "1234";

/// Username-keyed lookup for the login gate.
#[derive(Debug, Default, Clone)]
pub struct UserDirectory {
    users: HashMap<String, User>,
}

impl UserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// The directory every session starts with: a single `alice` account.
    pub fn seeded() -> Self {
        let mut directory = Self::new();
        directory.insert(User::new(DEFAULT_USERNAME, DEFAULT_CREDENTIAL));
        directory
    }

    /// Builds from configured credentials, falling back to [`Self::seeded`]
    /// when none are given.
    pub fn from_credentials<'a, I>(credentials: I) -> Self
    where
        I: IntoIterator<Item = (&'a String, &'a String)>,
    {
        let mut directory = Self::new();
        for (username, credential) in credentials {
            directory.insert(User::new(username.as_str(), credential.as_str()));
        }
        if directory.is_empty() {
            return Self::seeded();
        }
        directory
    }

    pub fn insert(&mut self, user: User) {
        self.users.insert(user.username().to_string(), user);
    }

    pub fn get(&self, username: &str) -> Option<&User> {
        self.users.get(username)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn authenticate(&self, username: &str, credential: &str) -> bool {
        self.get(username)
            .is_some_and(|user| user.credential_matches(credential))
    }
}

#[cfg(test)]
mod tests {
    use super::UserDirectory;
    use std::collections::HashMap;

    #[test]
    fn seeded_directory_accepts_alice() {
        let directory = UserDirectory::seeded();
        assert!(directory.authenticate("alice", "1234"));
        assert!(!directory.authenticate("alice", "wrong"));
        assert!(!directory.authenticate("bob", "1234"));
    }

    #[test]
    fn credentials_are_compared_exactly() {
        let directory = UserDirectory::seeded();
        assert!(!directory.authenticate("alice", "1234 "));
        assert!(!directory.authenticate("Alice", "1234"));
    }

    #[test]
    fn configured_credentials_replace_seed() {
        let credentials: HashMap<String, String> =
            [("bob".to_string(), "hunter2".to_string())].into_iter().collect();
        let directory = UserDirectory::from_credentials(&credentials);

        assert_eq!(directory.len(), 1);
        assert!(directory.authenticate("bob", "hunter2"));
        assert!(!directory.authenticate("alice", "1234"));
    }

    #[test]
    fn empty_credentials_fall_back_to_seed() {
        let directory = UserDirectory::from_credentials(&HashMap::new());
        assert!(directory.authenticate("alice", "1234"));
    }
}
