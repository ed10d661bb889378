use crate::config::Difficulty;
use crate::provider::{CoachingRequest, PracticeTextRequest};

fn join_keys(keys: &[char]) -> String {
    keys.iter()
        .map(|&ch| match ch {
            ' ' => "space".to_string(),
            _ => ch.to_string(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn style_for(difficulty: Difficulty) -> &'static str {
    match difficulty {
        Difficulty::Beginner => {
            "Use short, common words and simple sentences. Avoid punctuation other than periods."
        }
        Difficulty::Intermediate => {
            "Use everyday vocabulary with natural sentences, commas and periods."
        }
        Difficulty::Advanced => {
            "Use rich vocabulary, longer sentences, varied punctuation and the occasional number."
        }
    }
}

pub fn practice_text(request: &PracticeTextRequest) -> String {
    let mut prompt = format!(
        "Write a typing practice paragraph of 40 to 60 words about {topic}. {style}",
        topic = request.topic,
        style = style_for(request.difficulty),
    );
    if !request.focus_keys.is_empty() {
        prompt.push_str(&format!(
            " Favor words that contain these characters: {}.",
            join_keys(&request.focus_keys)
        ));
    }
    prompt.push_str(
        " Return plain prose only: no title, no markdown, no quotation marks around the text, no line breaks.",
    );
    prompt
}

pub fn coaching_tip(request: &CoachingRequest) -> String {
    let weak = if request.weak_keys.is_empty() {
        "none stood out".to_string()
    } else {
        join_keys(&request.weak_keys)
    };
    format!(
        "A typist just finished a practice session at {wpm} words per minute with {acc}% accuracy. \
         Their most error-prone keys: {weak}. Give one short, encouraging and specific tip of at \
         most two sentences. Plain text only.",
        wpm = request.wpm,
        acc = request.accuracy,
    )
}

pub fn practice_words(count: usize, difficulty: Difficulty) -> String {
    let lengths = match difficulty {
        Difficulty::Beginner => "3 to 5",
        Difficulty::Intermediate => "4 to 7",
        Difficulty::Advanced => "6 to 10",
    };
    format!(
        "Return a JSON array of {count} distinct lowercase English words, each {lengths} letters \
         long, using letters a-z only. Output only the JSON array."
    )
}
