use std::time::Duration;

use log::{debug, info, warn};

use crate::config::Config;
use crate::gemini::{GeminiModel, Generator};
use crate::{ModelFailure, Transcript, Unavailable};

pub const PROMPT: &str = "You are a YouTube Video Summarizer. You will be taking the transcript text and summarizing \
the entire video and providing the important summary in points within 250 words. Please provide the \
summary of the content here:";

/// Transcript characters sent to the model; the rest is dropped
pub const DEFAULT_MAX_INPUT_CHARS: usize = 8000;

/// Text produced by one of the candidate models
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generated {
    pub model: String,
    pub text: String,
}

/// Tries an ordered list of generators, first success wins
pub struct Summarizer {
    generators: Vec<Box<dyn Generator>>,
    max_input_chars: usize,
    has_credential: bool,
}

impl Summarizer {
    /// Generators that already carry their credentials
    pub fn new(generators: Vec<Box<dyn Generator>>, max_input_chars: usize) -> Self {
        Self {
            generators,
            max_input_chars,
            has_credential: true,
        }
    }

    /// No API key: every submission goes straight to simple extraction
    pub fn without_credential(max_input_chars: usize) -> Self {
        Self {
            generators: Vec::new(),
            max_input_chars,
            has_credential: false,
        }
    }

    /// Gemini candidates from config
    pub fn gemini(client: &reqwest::Client, api_key: Option<&str>, config: &Config) -> Self {
        let Some(key) = api_key else {
            return Self::without_credential(config.max_input_chars);
        };
        let generators = config
            .models
            .iter()
            .map(|model| {
                Box::new(
                    GeminiModel::new(client.clone(), key, model.as_str())
                        .with_base_url(config.gemini_base_url.as_str())
                        .with_timeout(Duration::from_secs(config.timeout_secs)),
                ) as Box<dyn Generator>
            })
            .collect();
        Self::new(generators, config.max_input_chars)
    }

    pub fn has_credential(&self) -> bool {
        self.has_credential
    }

    pub fn is_available(&self) -> bool {
        self.has_credential && !self.generators.is_empty()
    }

    pub fn models(&self) -> Vec<&str> {
        self.generators.iter().map(|g| g.model()).collect()
    }

    pub async fn summarize(&self, transcript: &Transcript) -> Result<Generated, Unavailable> {
        if !self.has_credential {
            return Err(Unavailable::NoCredential);
        }
        if self.generators.is_empty() {
            return Err(Unavailable::NoModels);
        }

        let prompt = build_prompt(transcript.text(), self.max_input_chars);
        let mut failures = Vec::new();

        for generator in &self.generators {
            let model = generator.model();
            debug!("Trying model {model}");
            match generator.generate(&prompt).await {
                Ok(text) => {
                    info!("Summary generated by {model}");
                    return Ok(Generated {
                        model: model.to_string(),
                        text,
                    });
                }
                Err(e) => {
                    warn!("Model {model} failed: {e}");
                    failures.push(ModelFailure {
                        model: model.to_string(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        Err(Unavailable::AllModelsFailed(failures))
    }
}

/// Instruction prompt followed by the transcript, capped at `max_chars` characters
pub fn build_prompt(transcript: &str, max_chars: usize) -> String {
    let capped = match transcript.char_indices().nth(max_chars) {
        Some((idx, _)) => &transcript[..idx],
        None => transcript,
    };
    format!("{PROMPT}\n\nTranscript:\n{capped}")
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::GenerateError;

    struct Fake {
        model: &'static str,
        reply: Option<&'static str>,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Generator for Fake {
        fn model(&self) -> &str {
            self.model
        }

        async fn generate(&self, _prompt: &str) -> Result<String, GenerateError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.reply {
                Some(text) => Ok(text.to_string()),
                None => Err(GenerateError::Status {
                    status: 404,
                    body: "not found".to_string(),
                }),
            }
        }
    }

    fn fake(model: &'static str, reply: Option<&'static str>, calls: &Arc<AtomicUsize>) -> Box<dyn Generator> {
        Box::new(Fake {
            model,
            reply,
            calls: calls.clone(),
        })
    }

    fn transcript(text: &str) -> Transcript {
        Transcript::from_texts(crate::VideoId("cE72C0e0bKw".to_string()), [text])
    }

    #[test]
    fn test_prompt_truncates_over_budget() {
        let text = "a".repeat(8001);
        let prompt = build_prompt(&text, 8000);
        assert!(prompt.ends_with(&format!("Transcript:\n{}", "a".repeat(8000))));
        assert!(!prompt.ends_with(&"a".repeat(8001)));
    }

    #[test]
    fn test_prompt_exact_budget_unmodified() {
        let text = "b".repeat(8000);
        assert_eq!(build_prompt(&text, 8000), format!("{PROMPT}\n\nTranscript:\n{text}"));
    }

    #[test]
    fn test_prompt_counts_characters_not_bytes() {
        let text = "é".repeat(10);
        assert!(build_prompt(&text, 4).ends_with("\néééé"));
    }

    #[tokio::test]
    async fn test_first_success_wins() {
        let calls = Arc::new(AtomicUsize::new(0));
        let later = Arc::new(AtomicUsize::new(0));
        let summarizer = Summarizer::new(
            vec![
                fake("m1", None, &calls),
                fake("m2", Some("summary"), &calls),
                fake("m3", Some("unused"), &later),
            ],
            DEFAULT_MAX_INPUT_CHARS,
        );

        let out = summarizer.summarize(&transcript("Hello world")).await.unwrap();
        assert_eq!(
            out,
            Generated {
                model: "m2".to_string(),
                text: "summary".to_string()
            }
        );
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(later.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_all_models_failed() {
        let calls = Arc::new(AtomicUsize::new(0));
        let summarizer = Summarizer::new(
            vec![fake("m1", None, &calls), fake("m2", None, &calls)],
            DEFAULT_MAX_INPUT_CHARS,
        );

        let err = summarizer.summarize(&transcript("Hello world")).await.unwrap_err();
        match err {
            Unavailable::AllModelsFailed(failures) => {
                let models: Vec<_> = failures.iter().map(|f| f.model.as_str()).collect();
                assert_eq!(models, ["m1", "m2"]);
                assert_eq!(failures[0].reason, "API returned 404: not found");
            }
            other => panic!("unexpected: {other:?}"),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_no_credential() {
        let config = Config::default();
        let summarizer = Summarizer::gemini(&reqwest::Client::new(), None, &config);
        assert!(!summarizer.is_available());
        assert_eq!(
            summarizer.summarize(&transcript("Hello world")).await,
            Err(Unavailable::NoCredential)
        );
    }

    #[tokio::test]
    async fn test_key_without_models() {
        let config = Config {
            models: Vec::new(),
            ..Config::default()
        };
        let summarizer = Summarizer::gemini(&reqwest::Client::new(), Some("real-key"), &config);
        assert!(summarizer.has_credential());
        assert!(!summarizer.is_available());
        assert_eq!(
            summarizer.summarize(&transcript("Hello world")).await,
            Err(Unavailable::NoModels)
        );
    }

    #[test]
    fn test_gemini_candidates_follow_config_order() {
        let config = Config::default();
        let summarizer = Summarizer::gemini(&reqwest::Client::new(), Some("fake-key"), &config);
        assert_eq!(summarizer.models(), crate::gemini::DEFAULT_MODELS);
    }
}
