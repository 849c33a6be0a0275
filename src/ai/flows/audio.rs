// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Reference audio: speech synthesis wrapped as WAV.

use crate::ai::media::tts_pcm_to_wav_data_uri;
use crate::ai::{
    Generated, GenerateRequest, GenerativeModel, Part, ResponseFormat, TTS_MODEL, TTS_VOICE,
};
use crate::error::AppError;
use serde::{Deserialize, Serialize};
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AudioInput {
    #[validate(length(min = 1))]
    pub text: String,
    #[validate(length(min = 1))]
    pub language: String,
    #[validate(length(min = 1))]
    pub accent: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedAudio {
    /// `data:audio/wav;base64,...`
    pub audio_data_uri: String,
}

/// Read `text` aloud in the given language and accent.
pub async fn generate_audio(
    model: &dyn GenerativeModel,
    input: &AudioInput,
) -> Result<Generated<GeneratedAudio>, AppError> {
    input
        .validate()
        .map_err(|e| AppError::BadRequest(format!("generate_audio: {}", e)))?;

    let prompt = format!(
        "You are a voice actor. Read the following text in {} with a {} accent: {}",
        input.language, input.accent, input.text
    );
    let response = model
        .generate(GenerateRequest {
            model: TTS_MODEL.to_string(),
            parts: vec![Part::text(prompt)],
            format: ResponseFormat::Audio {
                voice: TTS_VOICE.to_string(),
            },
        })
        .await?;

    let audio = response
        .media
        .first()
        .ok_or_else(|| AppError::MissingMedia("no audio returned".to_string()))?;
    let audio_data_uri = tts_pcm_to_wav_data_uri(&audio.data)?;

    Ok(Generated {
        output: GeneratedAudio { audio_data_uri },
        tokens_used: response.usage.total(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{GenerateResponse, Media, TokenUsage};
    use futures_util::future::BoxFuture;
    use std::sync::Mutex;

    struct TtsModel {
        media: Option<Media>,
        seen: Mutex<Option<GenerateRequest>>,
    }

    impl GenerativeModel for TtsModel {
        fn generate(
            &self,
            request: GenerateRequest,
        ) -> BoxFuture<'_, Result<GenerateResponse, AppError>> {
            *self.seen.lock().unwrap() = Some(request);
            let media = self.media.clone().into_iter().collect();
            Box::pin(async move {
                Ok(GenerateResponse {
                    text: None,
                    media,
                    usage: TokenUsage {
                        input_tokens: 12,
                        output_tokens: 400,
                    },
                })
            })
        }
    }

    fn input() -> AudioInput {
        AudioInput {
            text: "Good morning".into(),
            language: "English".into(),
            accent: "British".into(),
        }
    }

    #[tokio::test]
    async fn test_pcm_is_wrapped_as_wav() {
        let model = TtsModel {
            media: Some(Media {
                mime_type: "audio/L16;codec=pcm;rate=24000".into(),
                data: "AAAAAA==".into(),
            }),
            seen: Mutex::new(None),
        };

        let result = generate_audio(&model, &input()).await.unwrap();
        assert!(result.output.audio_data_uri.starts_with("data:audio/wav;base64,UklGR"));
        assert_eq!(result.tokens_used, 412);

        let seen = model.seen.lock().unwrap();
        let request = seen.as_ref().unwrap();
        assert_eq!(request.model, "gemini-2.5-flash-preview-tts");
        assert_eq!(
            request.format,
            ResponseFormat::Audio {
                voice: "Algenib".into()
            }
        );
        assert_eq!(
            request.parts,
            vec![Part::text(
                "You are a voice actor. Read the following text in English with a British accent: Good morning"
            )]
        );
    }

    #[tokio::test]
    async fn test_no_audio_is_missing_media() {
        let model = TtsModel {
            media: None,
            seen: Mutex::new(None),
        };
        let err = generate_audio(&model, &input()).await.unwrap_err();
        assert!(matches!(err, AppError::MissingMedia(_)));
    }
}
