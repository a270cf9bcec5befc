//! Prompt construction and reply decoding

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::{constants::CRITIQUE_STATEMENT_PREVIEW_CHARS, models::Verdict};

use super::GatewayError;

/// Markdown code fence some models wrap JSON replies in
static CODE_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^\s*```[A-Za-z]*\s*(.*?)\s*```\s*$").expect("valid code fence pattern")
});

/// Normalized critique of one submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Critique {
    pub verdict: Verdict,
    pub critique: String,
    pub time_complexity: Option<String>,
    pub space_complexity: Option<String>,
}

/// Raw critique object as the model returns it
#[derive(Debug, Deserialize)]
struct CritiqueReply {
    verdict: String,
    critique: String,
    #[serde(default)]
    time_complexity: Option<String>,
    #[serde(default)]
    space_complexity: Option<String>,
}

pub fn translation_prompt(text: &str) -> String {
    format!(
        "Translate the following programming problem statement into Uzbek (Latin script). \
         Do NOT change formatting, markup, code, variable names, or numbers. \
         Do NOT add comments or explanations. Reply with the translation only.\n\n{text}"
    )
}

pub fn critique_prompt(problem_statement: &str, submitted_code: &str, language: &str) -> String {
    let statement: String = problem_statement
        .chars()
        .take(CRITIQUE_STATEMENT_PREVIEW_CHARS)
        .collect();

    format!(
        "You are an expert code judge. Analyze the submitted {language} code against the problem. \
         Do not assume the code was executed; reason about it.\n\n\
         Problem:\n{statement}\n\n\
         Submitted code ({language}):\n{submitted_code}\n\n\
         Respond ONLY with a JSON object with the fields \"verdict\" (one of \"correct\", \
         \"incorrect\", \"needs_review\"), \"time_complexity\", \"space_complexity\" and \
         \"critique\". The critique must assess correctness, efficiency, and idiomatic style \
         for {language}, and must be written in Uzbek."
    )
}

/// Response schema handed to the provider for critique requests
pub fn critique_response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "verdict": { "type": "STRING", "enum": ["correct", "incorrect", "needs_review"] },
            "time_complexity": { "type": "STRING" },
            "space_complexity": { "type": "STRING" },
            "critique": { "type": "STRING" }
        },
        "required": ["verdict", "time_complexity", "space_complexity", "critique"]
    })
}

/// Decode a translation reply
pub fn parse_translation(raw: &str) -> Result<String, GatewayError> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(GatewayError::UpstreamError("empty translation".to_string()));
    }
    Ok(text.to_string())
}

/// Decode a critique reply into a normalized [`Critique`]
pub fn parse_critique(raw: &str) -> Result<Critique, GatewayError> {
    let body = match CODE_FENCE.captures(raw) {
        Some(captures) => captures.get(1).map_or("", |m| m.as_str()),
        None => raw.trim(),
    };

    let reply: CritiqueReply = serde_json::from_str(body)
        .map_err(|e| GatewayError::UpstreamError(format!("critique is not valid JSON: {e}")))?;

    let verdict = Verdict::from_model_label(&reply.verdict).ok_or_else(|| {
        GatewayError::UpstreamError(format!("unknown verdict '{}'", reply.verdict))
    })?;

    let critique = reply.critique.trim().to_string();
    if critique.is_empty() {
        return Err(GatewayError::UpstreamError("empty critique".to_string()));
    }

    Ok(Critique {
        verdict,
        critique,
        time_complexity: non_blank(reply.time_complexity),
        space_complexity: non_blank(reply.space_complexity),
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_critique_plain_json() {
        let raw = r#"{"verdict":"correct","time_complexity":"O(n)","space_complexity":"O(1)","critique":"Yaxshi yechim."}"#;
        let critique = parse_critique(raw).unwrap();

        assert_eq!(critique.verdict, Verdict::Correct);
        assert_eq!(critique.critique, "Yaxshi yechim.");
        assert_eq!(critique.time_complexity.as_deref(), Some("O(n)"));
    }

    #[test]
    fn test_parse_critique_inside_code_fence() {
        let raw = "```json\n{\"verdict\":\"needs_review\",\"critique\":\"Tekshirish kerak.\"}\n```";
        let critique = parse_critique(raw).unwrap();

        assert_eq!(critique.verdict, Verdict::NeedsReview);
        assert_eq!(critique.time_complexity, None);
    }

    #[test]
    fn test_parse_critique_rejects_malformed_replies() {
        assert!(matches!(
            parse_critique("not json at all"),
            Err(GatewayError::UpstreamError(_))
        ));
        assert!(matches!(
            parse_critique(r#"{"verdict":"maybe","critique":"..."}"#),
            Err(GatewayError::UpstreamError(_))
        ));
        assert!(matches!(
            parse_critique(r#"{"verdict":"incorrect","critique":"   "}"#),
            Err(GatewayError::UpstreamError(_))
        ));
    }

    #[test]
    fn test_parse_translation_trims_and_rejects_empty() {
        assert_eq!(parse_translation("  Salom  \n").unwrap(), "Salom");
        assert!(parse_translation(" \n ").is_err());
    }

    #[test]
    fn test_critique_prompt_truncates_long_statements() {
        let statement = "x".repeat(CRITIQUE_STATEMENT_PREVIEW_CHARS + 500);
        let prompt = critique_prompt(&statement, "print(1)", "python");

        assert!(!prompt.contains(&"x".repeat(CRITIQUE_STATEMENT_PREVIEW_CHARS + 1)));
        assert!(prompt.contains("print(1)"));
        assert!(prompt.contains("Uzbek"));
    }
}
