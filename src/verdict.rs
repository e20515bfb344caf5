//! Trade verdicts produced by the generative-text upstream.
//!
//! The system instruction, the way a verdict is read back out of an upstream
//! response, and the way it is emphasized for display all live here. The
//! analysis proxy, the MCP tool and the CLI preview share these definitions.

use std::fmt;

use serde_json::Value;

/// Instruction sent with every analysis request unless overridden in config.
pub const DEFAULT_SYSTEM_INSTRUCTION: &str = "You are MBridge AI, a strict institutional risk manager for Forex and Stocks. Analyze the user's input. If it is a trade rationale, check for emotional bias (FOMO, revenge, hope) and vague logic. If it is news, explain the impact on USD or S&P500. Output a verdict: 'APPROVED' or 'REJECTED' followed by a 1-2 sentence professional, stoic explanation. Keep it under 50 words. Be direct.";

/// Explanation shown with the canned verdict when no live analysis is available.
pub const DEMO_MODE_NOTICE: &str =
    "System is in demo mode. Please configure API key for live analysis.";

/// Shown when a preview could not reach the analysis service.
pub const OFFLINE_NOTICE: &str = "System Offline. Please try again later.";

/// Binary classification returned by the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Approved,
    Rejected,
}

impl Verdict {
    pub const ALL: [Verdict; 2] = [Verdict::Approved, Verdict::Rejected];

    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Approved => "APPROVED",
            Verdict::Rejected => "REJECTED",
        }
    }

    /// First verdict keyword appearing in `text`, if any.
    pub fn find(text: &str) -> Option<Verdict> {
        Self::ALL
            .iter()
            .filter_map(|v| text.find(v.as_str()).map(|pos| (pos, *v)))
            .min_by_key(|(pos, _)| *pos)
            .map(|(_, v)| v)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How verdict keywords are emphasized when rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emphasis {
    /// `**APPROVED**`, for terminals and MCP clients.
    Markdown,
    /// `<strong>APPROVED</strong>`, for web previews.
    Html,
}

impl Emphasis {
    fn wrap(&self, keyword: &str) -> String {
        match self {
            Emphasis::Markdown => format!("**{keyword}**"),
            Emphasis::Html => format!("<strong>{keyword}</strong>"),
        }
    }
}

/// Wrap every verdict keyword in `text` with the given emphasis.
pub fn emphasize(text: &str, emphasis: Emphasis) -> String {
    Verdict::ALL.iter().fold(text.to_string(), |acc, v| {
        acc.replace(v.as_str(), &emphasis.wrap(v.as_str()))
    })
}

/// Pull the generated text out of a `generateContent` response.
///
/// Reads `candidates[0].content.parts[0].text`.
pub fn extract_text(response: &Value) -> Option<&str> {
    response
        .get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .get(0)?
        .get("text")?
        .as_str()
}

/// The canned verdict used when no live analysis is available.
pub fn demo_verdict() -> String {
    format!("{}\n{}", Verdict::Rejected, DEMO_MODE_NOTICE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_find_verdict() {
        assert_eq!(
            Verdict::find("APPROVED. Clear invalidation level."),
            Some(Verdict::Approved)
        );
        assert_eq!(
            Verdict::find("Verdict: REJECTED - revenge trading, not APPROVED"),
            Some(Verdict::Rejected)
        );
        assert_eq!(Verdict::find("no keyword here"), None);
    }

    #[test]
    fn test_emphasize_all_occurrences() {
        let text = "REJECTED. FOMO entry. Would be APPROVED with a stop.";
        assert_eq!(
            emphasize(text, Emphasis::Markdown),
            "**REJECTED**. FOMO entry. Would be **APPROVED** with a stop."
        );
        assert_eq!(
            emphasize("APPROVED", Emphasis::Html),
            "<strong>APPROVED</strong>"
        );
    }

    #[test]
    fn test_extract_text() {
        let response = json!({
            "candidates": [{
                "content": { "parts": [{ "text": "APPROVED. Defined risk." }], "role": "model" }
            }]
        });
        assert_eq!(extract_text(&response), Some("APPROVED. Defined risk."));
        assert_eq!(extract_text(&json!({ "candidates": [] })), None);
    }

    #[test]
    fn test_demo_verdict() {
        let demo = demo_verdict();
        assert!(demo.starts_with("REJECTED\n"));
        assert_eq!(Verdict::find(&demo), Some(Verdict::Rejected));
    }

    #[test]
    fn test_instruction_names_both_verdicts() {
        for v in Verdict::ALL {
            assert!(DEFAULT_SYSTEM_INSTRUCTION.contains(v.as_str()));
        }
    }
}
