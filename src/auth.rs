use std::rc::Rc;

use log::{info, warn};
use thiserror::Error;

use crate::model::User;
use crate::storage::keys::{SESSION_USER_KEY, USERS_KEY};
use crate::storage::{read_json, write_json, KeyValueStore};

/// Identifier stamped on play records when nobody is logged in.
pub const GUEST_USER: &str = "guest";

const DEMO_EMAIL: &str = "demo@gamehub.com";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("a user already exists with email {0}")]
    DuplicateEmail(String),
    #[error("invalid email or password")]
    InvalidCredentials,
}

/// Local user directory plus the current session, both held in the key-value
/// store. This is the whole auth collaborator: the engines only consume
/// `user_id()`.
pub struct AuthService {
    store: Rc<dyn KeyValueStore>,
}

impl AuthService {
    pub fn new(store: Rc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn users(&self) -> Vec<User> {
        read_json(self.store.as_ref(), USERS_KEY).unwrap_or_default()
    }

    /// Registers a new user and logs them in. Duplicate emails are rejected.
    pub fn register(&self, user: User) -> Result<User, AuthError> {
        let mut users = self.users();
        if users.iter().any(|existing| existing.email == user.email) {
            return Err(AuthError::DuplicateEmail(user.email));
        }
        users.push(user.clone());
        write_json(self.store.as_ref(), USERS_KEY, &users);
        self.set_session(&user);
        info!(target: "auth", "Registered user {}", user.email);
        Ok(user)
    }

    pub fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let user = self
            .users()
            .into_iter()
            .find(|user| user.email == email && user.password == password)
            .ok_or(AuthError::InvalidCredentials)?;
        self.set_session(&user);
        Ok(user)
    }

    pub fn logout(&self) {
        self.store.remove(SESSION_USER_KEY);
    }

    /// The logged-in user, if any. A corrupt session entry is discarded and
    /// treated as logged out.
    pub fn current_user(&self) -> Option<User> {
        let raw = self.store.get(SESSION_USER_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(error) => {
                warn!(target: "auth", "Discarding corrupt session entry: {}", error);
                self.store.remove(SESSION_USER_KEY);
                None
            }
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.current_user().is_some()
    }

    /// Identifier for stamping play records; `"guest"` when logged out.
    pub fn user_id(&self) -> String {
        self.current_user()
            .map(|user| user.email)
            .unwrap_or_else(|| GUEST_USER.to_string())
    }

    /// Seeds the demo account the hub's login screen advertises.
    pub fn ensure_demo_user(&self) {
        let users = self.users();
        if users.iter().any(|user| user.email == DEMO_EMAIL) {
            return;
        }
        let mut users = users;
        users.push(User::new("Demo User", DEMO_EMAIL, "demo123"));
        write_json(self.store.as_ref(), USERS_KEY, &users);
    }

    fn set_session(&self, user: &User) {
        write_json(self.store.as_ref(), SESSION_USER_KEY, user);
    }
}
