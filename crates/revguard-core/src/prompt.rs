//! Review prompts and the reduced prompt used by the `simplified` strategy.

use serde::{Deserialize, Serialize};

use crate::domain::ReviewFile;

/// Maximum characters of user content kept in a simplified prompt.
pub const SIMPLIFIED_USER_LIMIT: usize = 4_000;

pub const SIMPLIFIED_LABEL: &str = "CRITICAL ISSUES ONLY";

const SIMPLIFIED_SYSTEM: &str = "You are a code reviewer. Report only critical security or \
correctness issues. Respond with JSON only, exactly in the shape \
{\"issues\":[{\"severity\":\"CRITICAL|HIGH\",\"category\":string,\"description\":string}]}. \
Return {\"issues\":[]} when nothing critical is found.";

/// Prompt handed to the AI completion caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewPrompt {
    pub system: String,
    pub user: String,
}

impl ReviewPrompt {
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
        }
    }

    /// Reduced prompt: labeled, truncated user content and a strict output schema.
    ///
    /// Without an original prompt the user content is rebuilt from `files`.
    pub fn simplified(original: Option<&ReviewPrompt>, files: &[ReviewFile]) -> Self {
        let body = match original {
            Some(p) => p.user.clone(),
            None => files_listing(files),
        };
        let (body, truncated) = truncate_chars(&body, SIMPLIFIED_USER_LIMIT);
        let mut user = format!("[{SIMPLIFIED_LABEL}]\n{body}");
        if truncated {
            user.push_str("\n[truncated]");
        }
        Self::new(SIMPLIFIED_SYSTEM, user)
    }
}

fn files_listing(files: &[ReviewFile]) -> String {
    let mut out = String::new();
    for file in files {
        let path = file.path.as_deref().unwrap_or("<unnamed>");
        out.push_str("--- ");
        out.push_str(path);
        out.push('\n');
        if let Some(content) = &file.content {
            out.push_str(content);
            if !content.ends_with('\n') {
                out.push('\n');
            }
        }
    }
    out
}

/// Truncate to at most `limit` chars on a char boundary.
fn truncate_chars(s: &str, limit: usize) -> (&str, bool) {
    match s.char_indices().nth(limit) {
        Some((idx, _)) => (&s[..idx], true),
        None => (s, false),
    }
}
