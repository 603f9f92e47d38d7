//! Table-of-contents recognition seam
//!
//! The vision call itself (HTTP, auth, retries) lives outside this crate
//! behind the [`Recognizer`] trait; what lives here is the pure part:
//! digging the model's text out of each provider's response shape and
//! turning it into a normalized chapter list. Models wrap their JSON in
//! markdown fences and chatter around it, so extraction is a bracket scan,
//! not a strict parse of the whole message.

use serde_json::Value;

use crate::error::{Error, Result};
use crate::toc::ChapterEntry;

/// Capability of sending TOC page images plus a prompt to a vision model and
/// getting back a structured chapter list.
///
/// A failed attempt is one error for the whole call; there are no partial
/// results and the core never retries on its own.
pub trait Recognizer {
    fn recognize(&self, images: &[Vec<u8>], prompt: &str) -> Result<Vec<ChapterEntry>>;
}

/// Supported vision providers, keyed by response payload shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Gemini,
    OpenAi,
    /// OpenAI-compatible API
    DeepSeek,
    Anthropic,
    /// OpenAI-compatible API
    Zhipu,
    /// OpenAI-compatible API
    Qwen,
}

impl Provider {
    pub fn name(&self) -> &'static str {
        match self {
            Provider::Gemini => "Gemini",
            Provider::OpenAi => "OpenAI",
            Provider::DeepSeek => "DeepSeek",
            Provider::Anthropic => "Anthropic",
            Provider::Zhipu => "Zhipu",
            Provider::Qwen => "Qwen",
        }
    }

    /// Parse a raw provider response into the normalized chapter list.
    pub fn parse_response(&self, payload: &Value) -> Result<Vec<ChapterEntry>> {
        // Transport layers surface failures as an "error" member
        if let Some(err) = payload.get("error") {
            return Err(Error::Recognition(format!(
                "{} returned an error: {err}",
                self.name()
            )));
        }

        let text = match self {
            Provider::Gemini => gemini_text(payload),
            Provider::Anthropic => anthropic_text(payload),
            // OpenAI and compatibles share one shape
            Provider::OpenAi | Provider::DeepSeek | Provider::Zhipu | Provider::Qwen => {
                openai_text(payload)
            }
        }
        .ok_or_else(|| {
            Error::Recognition(format!("{} response carried no text content", self.name()))
        })?;

        entries_from_text(text).ok_or_else(|| {
            Error::Recognition(format!("{} response had no parsable chapter list", self.name()))
        })
    }
}

/// Gemini native shape: `candidates[0].content.parts[0].text`.
fn gemini_text(payload: &Value) -> Option<&str> {
    payload
        .get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .get(0)?
        .get("text")?
        .as_str()
}

/// OpenAI-compatible shape: `choices[0].message.content`.
fn openai_text(payload: &Value) -> Option<&str> {
    payload
        .get("choices")?
        .get(0)?
        .get("message")?
        .get("content")?
        .as_str()
}

/// Anthropic shape: `content` is an array of blocks; take the first text one.
fn anthropic_text(payload: &Value) -> Option<&str> {
    let content = payload.get("content")?;
    match content {
        Value::Array(blocks) => blocks
            .iter()
            .find(|b| b.get("type").and_then(Value::as_str) == Some("text"))?
            .get("text")?
            .as_str(),
        Value::String(s) => Some(s.as_str()),
        _ => None,
    }
}

/// Extract the chapter array out of model chatter: strip a markdown code
/// fence if present, then take the outermost `[...]`.
fn entries_from_text(text: &str) -> Option<Vec<ChapterEntry>> {
    let body = if let Some(fenced) = text.split("```json").nth(1) {
        fenced.split("```").next().unwrap_or(fenced)
    } else if let Some(fenced) = text.split("```").nth(1) {
        fenced
    } else {
        text
    };

    let start = body.find('[')?;
    let end = body.rfind(']')?;
    if end < start {
        return None;
    }

    serde_json::from_str(&body[start..=end]).ok()
}
