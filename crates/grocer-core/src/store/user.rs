//! # User Slice
//!
//! The signed-in user, if any.

use serde::{Deserialize, Serialize};

use super::Reducer;
use crate::types::{Theme, User};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserState {
    pub user: Option<User>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum UserAction {
    /// Login finished or user details were re-fetched.
    Loaded(User),
    ThemeChanged(Theme),
    SignedOut,
}

impl Reducer for UserState {
    type Action = UserAction;

    fn reduce(mut self, action: UserAction) -> Self {
        match action {
            UserAction::Loaded(user) => self.user = Some(user),
            UserAction::ThemeChanged(theme) => {
                if let Some(user) = self.user.as_mut() {
                    user.theme = Some(theme);
                }
            }
            UserAction::SignedOut => self.user = None,
        }
        self
    }
}

impl UserState {
    pub fn is_signed_in(&self) -> bool {
        self.user.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.user.as_ref().map(User::is_admin).unwrap_or(false)
    }

    /// Theme stored on the server for this user.
    pub fn remote_theme(&self) -> Option<Theme> {
        self.user.as_ref().and_then(|u| u.theme)
    }
}
