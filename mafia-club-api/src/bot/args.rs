use std::str::FromStr;

use mafia_club_app::{ServiceError, ServiceResult};

/// Whitespace separated command arguments, read left to right.
pub struct Args<'a> {
    rest: &'a str,
    usage: &'static str,
}

impl<'a> Args<'a> {
    pub fn new(text: &'a str, usage: &'static str) -> Self {
        Self { rest: text, usage }
    }

    pub fn word(&mut self) -> Option<&'a str> {
        let text = self.rest.trim_start();
        if text.is_empty() {
            self.rest = text;
            return None;
        }
        let end = text.find(char::is_whitespace).unwrap_or(text.len());
        let (word, rest) = text.split_at(end);
        self.rest = rest;
        Some(word)
    }

    /// The next argument, parsed. Missing or malformed input yields the usage line.
    pub fn next<T: FromStr>(&mut self) -> ServiceResult<T> {
        match self.word().map(str::parse::<T>) {
            Some(Ok(value)) => Ok(value),
            _ => self.usage_error(),
        }
    }

    /// Everything not consumed yet, trimmed.
    pub fn rest(self) -> &'a str {
        self.rest.trim()
    }

    pub fn finish(self) -> ServiceResult<()> {
        if self.rest.trim().is_empty() {
            Ok(())
        } else {
            self.usage_error()
        }
    }

    pub fn usage_error<T>(&self) -> ServiceResult<T> {
        ServiceError::validation(format!("Usage: {}", self.usage))
    }
}
