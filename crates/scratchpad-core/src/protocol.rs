//! JSON wire format for the page layer
//!
//! A request carries one script and one test case; the response is the
//! [`Verdict`](crate::Verdict) serialized as-is.

use serde::{Deserialize, Serialize};

use crate::Result;

/// Request to run and optionally judge a script
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunRequest {
    /// Script text as typed by the user
    pub source_code: String,
    /// Raw input text, may be empty
    #[serde(default)]
    pub raw_input: String,
    /// Expected output, compared only when present and non-blank
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_output: Option<String>,
}

/// Encode a message to JSON
pub fn encode<T: Serialize>(msg: &T) -> Result<String> {
    Ok(serde_json::to_string(msg)?)
}

/// Decode a run request from JSON
pub fn decode_request(data: &str) -> Result<RunRequest> {
    Ok(serde_json::from_str(data)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RunnerConfig, ScratchpadError, judge};

    #[test]
    fn decodes_minimal_request() {
        let request = decode_request(r#"{"sourceCode": "console.log(1)"}"#).unwrap();
        assert_eq!(request.source_code, "console.log(1)");
        assert_eq!(request.raw_input, "");
        assert_eq!(request.expected_output, None);
    }

    #[test]
    fn rejects_request_without_code() {
        let err = decode_request(r#"{"rawInput": "1"}"#).unwrap_err();
        assert!(matches!(err, ScratchpadError::Protocol(_)));
    }

    #[test]
    fn verdict_encodes_camel_case() {
        let request = decode_request(
            r#"{"sourceCode": "console.log(input[0])", "rawInput": "5", "expectedOutput": "6"}"#,
        )
        .unwrap();
        let verdict = judge(
            &request.source_code,
            &request.raw_input,
            request.expected_output.as_deref(),
            &RunnerConfig::default(),
        );

        let json: serde_json::Value = serde_json::from_str(&encode(&verdict).unwrap()).unwrap();
        assert_eq!(json["execution"]["success"], true);
        assert_eq!(json["execution"]["capturedOutput"], "5");
        assert_eq!(json["comparison"]["isMatch"], false);
        assert!(json["execution"]["elapsedMillis"].is_number());
    }
}
