use serde::Deserialize;
use tracing::debug;

use crate::provider::ProviderError;

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

/// Pull the text of the first candidate out of a `generateContent` body.
pub fn extract_candidate_text(body: &str) -> Result<String, ProviderError> {
    let response: GenerateResponse =
        serde_json::from_str(body).map_err(|e| ProviderError::Malformed(e.to_string()))?;

    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        Err(ProviderError::Empty)
    } else {
        Ok(text)
    }
}

fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop an info string such as ```json
    let rest = rest.split_once('\n').map(|(_, body)| body).unwrap_or(rest);
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

/// Map typographic characters to ones found on a keyboard.
fn to_typeable(ch: char) -> Option<&'static str> {
    match ch {
        '\u{2018}' | '\u{2019}' => Some("'"),
        '\u{201c}' | '\u{201d}' => Some("\""),
        '\u{2013}' | '\u{2014}' => Some("-"),
        '\u{2026}' => Some("..."),
        '\u{00a0}' => Some(" "),
        _ => None,
    }
}

/// Normalize model prose into a single typeable line.
pub fn clean_prose(raw: &str) -> Result<String, ProviderError> {
    let body = strip_code_fence(raw);

    let mut mapped = String::with_capacity(body.len());
    for ch in body.chars() {
        match to_typeable(ch) {
            Some(rep) => mapped.push_str(rep),
            None => mapped.push(ch),
        }
    }

    let collapsed = mapped.split_whitespace().collect::<Vec<_>>().join(" ");
    let unquoted = collapsed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(&collapsed)
        .trim();

    if unquoted.is_empty() {
        Err(ProviderError::Empty)
    } else {
        Ok(unquoted.to_string())
    }
}

/// Parse a word list given as a JSON array, falling back to splitting on
/// commas and whitespace. Only alphabetic words survive, lowercased.
pub fn parse_word_list(raw: &str, count: usize) -> Result<Vec<String>, ProviderError> {
    let body = strip_code_fence(raw);

    let json = match (body.find('['), body.rfind(']')) {
        (Some(start), Some(end)) if start < end => {
            match serde_json::from_str::<Vec<String>>(&body[start..=end]) {
                Ok(words) => Some(words),
                Err(err) => {
                    debug!(error = %err, "word list is not a JSON array, splitting instead");
                    None
                }
            }
        }
        _ => None,
    };

    let candidates = json.unwrap_or_else(|| {
        body.split(|c: char| c == ',' || c.is_whitespace())
            .map(|w| w.trim_matches(|c: char| !c.is_alphabetic()).to_string())
            .collect()
    });

    let words: Vec<String> = candidates
        .into_iter()
        .map(|w| w.trim().to_lowercase())
        .filter(|w| !w.is_empty() && w.chars().all(|c| c.is_ascii_lowercase()))
        .take(count)
        .collect();

    if words.is_empty() {
        Err(ProviderError::Malformed("no usable words".to_string()))
    } else {
        Ok(words)
    }
}
