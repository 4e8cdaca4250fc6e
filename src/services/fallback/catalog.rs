//! Candidate catalog
//!
//! Turns static provider configuration plus the loaded credential set into
//! the ordered candidate list for a request profile. Providers without keys
//! are silently left out.

use std::time::Duration;

use super::candidate::{Candidate, ExtractionRule, LabelStyle, ProviderKind};
use crate::config::{Credentials, ProviderSettings};

pub const HUGGINGFACE_TEMPERATURE: f32 = 0.1;
pub const GOOGLE_TEMPERATURE: f32 = 0.3;

/// Label used when the keyless image endpoint answers
pub const IMAGE_FALLBACK_LABEL: &str = "Pollinations (public fallback)";

/// Which candidate ordering a text request uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextProfile {
    /// Equipment workflow: all three tiers, long OpenRouter model list
    Engineering,
    /// News desk actions: Google then OpenRouter, short model list
    NewsDesk,
}

impl TextProfile {
    fn includes_huggingface(&self) -> bool {
        matches!(self, TextProfile::Engineering)
    }

    fn openrouter_temperature(&self) -> f32 {
        match self {
            TextProfile::Engineering => 0.1,
            TextProfile::NewsDesk => 0.3,
        }
    }

    fn openrouter_extraction(&self) -> ExtractionRule {
        match self {
            TextProfile::Engineering => ExtractionRule::MessageContentOrReasoning,
            TextProfile::NewsDesk => ExtractionRule::MessageContent,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CandidateCatalog {
    providers: ProviderSettings,
    credentials: Credentials,
}

impl CandidateCatalog {
    pub fn new(providers: ProviderSettings, credentials: Credentials) -> Self {
        Self {
            providers,
            credentials,
        }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Ordered text candidates for `profile`
    pub fn text(&self, profile: TextProfile) -> Vec<Candidate> {
        let p = &self.providers;
        let mut candidates = Vec::new();

        if profile.includes_huggingface() {
            if let Some(key) = &self.credentials.huggingface {
                candidates.push(
                    Candidate::new(
                        1,
                        ProviderKind::HuggingFaceRouter,
                        &p.huggingface_chat_url,
                        &p.huggingface_chat_model,
                        ExtractionRule::MessageContentOrReasoning,
                    )
                    .with_credential(key.clone(), 1)
                    .with_temperature(HUGGINGFACE_TEMPERATURE)
                    .with_timeout(Duration::from_millis(p.huggingface_timeout_ms))
                    .with_label(LabelStyle::Named("Hugging Face".to_string())),
                );
            }
        }

        if let Some(key) = &self.credentials.google {
            candidates.push(
                Candidate::new(
                    2,
                    ProviderKind::GoogleGemini,
                    &p.google_base_url,
                    &p.google_model,
                    ExtractionRule::GeminiText,
                )
                .with_credential(key.clone(), 1)
                .with_temperature(GOOGLE_TEMPERATURE)
                .with_label(LabelStyle::Named("Google Direct".to_string())),
            );
        }

        let models = match profile {
            TextProfile::Engineering => &p.engineering_models,
            TextProfile::NewsDesk => &p.news_models,
        };

        // Model-major, key-minor: every key gets a chance on a model before
        // the next model is considered.
        for model in models {
            for (idx, key) in self.credentials.openrouter.iter().enumerate() {
                candidates.push(
                    Candidate::new(
                        3,
                        ProviderKind::OpenRouter,
                        &p.openrouter_url,
                        model,
                        profile.openrouter_extraction(),
                    )
                    .with_credential(key.clone(), idx + 1)
                    .with_temperature(profile.openrouter_temperature())
                    .with_label(LabelStyle::Keyed("OpenRouter".to_string()))
                    .with_header("HTTP-Referer", &p.site_url)
                    .with_header("X-Title", &p.app_title),
                );
            }
        }

        candidates
    }

    /// Ordered image candidates: configured models, then the keyless fallback
    pub fn image(&self) -> Vec<Candidate> {
        let p = &self.providers;
        let mut candidates = Vec::new();

        if let Some(key) = &self.credentials.huggingface {
            for model in &p.image_models {
                candidates.push(
                    Candidate::new(
                        1,
                        ProviderKind::HuggingFaceInference,
                        &p.huggingface_inference_url,
                        model,
                        ExtractionRule::ImageBytes,
                    )
                    .with_credential(key.clone(), 1)
                    .with_label(LabelStyle::Named("Hugging Face".to_string())),
                );
            }
        }

        candidates.push(
            Candidate::new(
                2,
                ProviderKind::PublicImage,
                &p.image_fallback_url,
                "pollinations",
                ExtractionRule::ImageBytes,
            )
            .with_label(LabelStyle::Fixed(IMAGE_FALLBACK_LABEL.to_string())),
        );

        candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog(credentials: Credentials) -> CandidateCatalog {
        CandidateCatalog::new(ProviderSettings::default(), credentials)
    }

    #[test]
    fn test_no_keys_no_text_candidates() {
        assert!(catalog(Credentials::default())
            .text(TextProfile::Engineering)
            .is_empty());
    }

    #[test]
    fn test_engineering_order() {
        let creds = Credentials::default()
            .with_huggingface("hf_key_0000001")
            .with_google("google_key_0001")
            .with_openrouter_keys(["or_key_00000001", "or_key_00000002"]);
        let candidates = catalog(creds).text(TextProfile::Engineering);

        // 1 HF + 1 Google + 8 models x 2 keys
        assert_eq!(candidates.len(), 18);
        assert_eq!(candidates[0].provider, ProviderKind::HuggingFaceRouter);
        assert_eq!(candidates[0].timeout, Some(Duration::from_millis(5_000)));
        assert_eq!(candidates[1].provider, ProviderKind::GoogleGemini);
        assert!(candidates[1].timeout.is_none());

        let tier3: Vec<(String, usize)> = candidates[2..6]
            .iter()
            .map(|c| (c.model.clone(), c.key_index))
            .collect();
        assert_eq!(
            tier3,
            vec![
                ("google/gemini-2.0-flash-exp:free".to_string(), 1),
                ("google/gemini-2.0-flash-exp:free".to_string(), 2),
                ("google/gemini-2.0-flash-lite-preview-02-05:free".to_string(), 1),
                ("google/gemini-2.0-flash-lite-preview-02-05:free".to_string(), 2),
            ]
        );
        assert!(candidates[2..].iter().all(|c| c.tier == 3));
        assert_eq!(candidates[0].label_for(None), "Hugging Face (GLM-4.5-Air)");
    }

    #[test]
    fn test_news_desk_skips_huggingface() {
        let creds = Credentials::default()
            .with_huggingface("hf_key_0000001")
            .with_openrouter_keys(["or_key_00000001"]);
        let candidates = catalog(creds).text(TextProfile::NewsDesk);

        assert_eq!(candidates.len(), 2);
        assert!(candidates.iter().all(|c| c.provider == ProviderKind::OpenRouter));
        assert_eq!(candidates[0].temperature, Some(0.3));
        assert_eq!(candidates[0].extraction, ExtractionRule::MessageContent);
        assert!(candidates[0]
            .headers
            .iter()
            .any(|(name, value)| name == "X-Title" && value == "TOiR AI Assistant"));
    }

    #[test]
    fn test_image_candidates_end_with_keyless_fallback() {
        let with_key = catalog(Credentials::default().with_huggingface("hf_key_0000001")).image();
        assert_eq!(with_key.len(), 4);
        assert_eq!(with_key[0].model, "black-forest-labs/FLUX.1-schnell");
        let last = with_key.last().unwrap();
        assert_eq!(last.provider, ProviderKind::PublicImage);
        assert!(last.credential.is_none());

        let keyless = catalog(Credentials::default()).image();
        assert_eq!(keyless.len(), 1);
        assert_eq!(keyless[0].label_for(None), IMAGE_FALLBACK_LABEL);
    }
}
