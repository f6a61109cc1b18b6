//! Administrator PIN entry.
//!
//! The password lives only in RAM and returns to the default on every restart.

use core::fmt;

use heapless::String;

pub const PASSWORD_LEN: usize = 4;
pub const DEFAULT_PASSWORD: &str = "1234";

/// Up to four keypad characters.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PinEntry {
    digits: String<PASSWORD_LEN>,
}

impl PinEntry {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            digits: String::new(),
        }
    }

    /// Builds an entry from `text`, keeping at most the first four characters.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        let mut entry = Self::new();
        for c in text.chars() {
            if !entry.push(c) {
                break;
            }
        }
        entry
    }

    /// Appends `c`. Returns `false` once the entry is full.
    pub fn push(&mut self, c: char) -> bool {
        self.digits.push(c).is_ok()
    }

    /// Removes the last character, if any.
    pub fn pop(&mut self) -> Option<char> {
        self.digits.pop()
    }

    pub fn clear(&mut self) {
        self.digits.clear();
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        self.digits.as_str()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.digits.chars().count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.digits.is_empty()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.len() == PASSWORD_LEN
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AuthError {
    /// Entered PIN differs from the stored password.
    Mismatch,
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::Mismatch => f.write_str("password mismatch"),
        }
    }
}

/// PIN buffers for the login and password-change screens.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdminSession {
    pub entered: PinEntry,
    pub new: PinEntry,
    correct: PinEntry,
}

impl AdminSession {
    #[must_use]
    pub fn new(password: &str) -> Self {
        Self {
            entered: PinEntry::new(),
            new: PinEntry::new(),
            correct: PinEntry::from_text(password),
        }
    }

    /// Checks the login buffer against the stored password and clears it.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Mismatch`] when the buffers differ.
    pub fn verify(&mut self) -> Result<(), AuthError> {
        let matched = self.entered == self.correct;
        self.entered.clear();
        if matched {
            Ok(())
        } else {
            Err(AuthError::Mismatch)
        }
    }

    /// Stores the new-password buffer once it holds four characters.
    pub fn commit_new(&mut self) -> bool {
        if !self.new.is_complete() {
            return false;
        }
        self.correct = core::mem::take(&mut self.new);
        true
    }

    #[must_use]
    pub fn password(&self) -> &str {
        self.correct.as_str()
    }
}

impl Default for AdminSession {
    fn default() -> Self {
        Self::new(DEFAULT_PASSWORD)
    }
}
