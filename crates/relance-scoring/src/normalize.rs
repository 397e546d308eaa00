use relance_core::models::question::Question;

const DEFAULT_LABEL_LOW: &str = "Not at all satisfied";
const DEFAULT_LABEL_HIGH: &str = "Very satisfied";

/// Normalize loosely-shaped client input into tagged [`Question`] variants.
///
/// Accepted shapes:
/// - a bare string — becomes a scale question with default labels;
/// - an object with the prompt under `question`, `text`, or `label`, an
///   optional `type` (`free_text`/`text` selects free text, anything else is
///   a scale), and optional `label1`/`label_low` and `label5`/`label_high`.
///
/// Blank or malformed entries are filtered out. Order of the survivors is
/// preserved. An empty result means the creation request must be rejected
/// upstream.
pub fn normalize_questions(raw: &[serde_json::Value]) -> Vec<Question> {
    raw.iter().filter_map(normalize_one).collect()
}

fn normalize_one(value: &serde_json::Value) -> Option<Question> {
    if let Some(s) = value.as_str() {
        let prompt = s.trim();
        if prompt.is_empty() {
            return None;
        }
        return Some(scale(prompt, None, None));
    }

    let obj = value.as_object()?;
    let prompt = ["question", "text", "label"]
        .iter()
        .find_map(|k| obj.get(*k).and_then(|v| v.as_str()))
        .map(str::trim)
        .filter(|p| !p.is_empty())?;

    let kind = obj.get("type").and_then(|v| v.as_str()).unwrap_or("scale");
    if matches!(kind, "free_text" | "text") {
        return Some(Question::FreeText {
            prompt: prompt.to_string(),
        });
    }

    let low = ["label1", "label_low"]
        .iter()
        .find_map(|k| obj.get(*k).and_then(|v| v.as_str()));
    let high = ["label5", "label_high"]
        .iter()
        .find_map(|k| obj.get(*k).and_then(|v| v.as_str()));
    Some(scale(prompt, low, high))
}

fn scale(prompt: &str, low: Option<&str>, high: Option<&str>) -> Question {
    Question::Scale {
        prompt: prompt.to_string(),
        label_low: low.unwrap_or(DEFAULT_LABEL_LOW).to_string(),
        label_high: high.unwrap_or(DEFAULT_LABEL_HIGH).to_string(),
    }
}
