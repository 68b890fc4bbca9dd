//! Final answer composition

use serde::{Deserialize, Serialize};

/// The final output of one conversational turn: answer text plus an optional
/// side-channel image URL.
///
/// `image_url` is set only when the draw-image tool ran during the turn.
/// When it is set, the answer text must not restate the URL in prose; the
/// caller delivers the image through its own channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComposedAnswer {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl ComposedAnswer {
    /// Compose the final answer, scrubbing any textual restatement of the
    /// image URL the model may have produced despite instructions.
    pub fn compose(text: String, image_url: Option<String>) -> Self {
        let text = match image_url.as_deref() {
            Some(url) => text.replace(url, "").trim().to_string(),
            None => text,
        };
        Self { text, image_url }
    }

    /// Plain text answer with no side artifact
    pub fn text_only<S: Into<String>>(text: S) -> Self {
        Self {
            text: text.into(),
            image_url: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_scrubs_restated_url() {
        let answer = ComposedAnswer::compose(
            "Here is your image: https://img.example/x.png".to_string(),
            Some("https://img.example/x.png".to_string()),
        );
        assert_eq!(answer.text, "Here is your image:");
        assert_eq!(answer.image_url.as_deref(), Some("https://img.example/x.png"));
    }

    #[test]
    fn test_compose_without_image_leaves_text_alone() {
        let answer = ComposedAnswer::compose("All done.".to_string(), None);
        assert_eq!(answer, ComposedAnswer::text_only("All done."));
    }
}
