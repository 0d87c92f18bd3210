//! In-process whisper.cpp speech model.

use super::SpeechModel;
use crate::audio::to_whisper_wav;
use crate::config::Device;
use crate::error::{Result, VidchatError};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, instrument};
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

/// A whisper.cpp model loaded once and shared by every transcription.
pub struct LocalWhisperModel {
    context: Arc<WhisperContext>,
    name: String,
}

impl LocalWhisperModel {
    /// Load `ggml-{variant}.bin` from `model_dir` onto the selected device.
    pub fn load(model_dir: &Path, variant: &str, device: Device) -> Result<Self> {
        let model_path = model_dir.join(format!("ggml-{}.bin", variant));
        if !model_path.exists() {
            return Err(VidchatError::Config(format!(
                "whisper model not found at {}",
                model_path.display()
            )));
        }

        // whisper.cpp falls back to CPU when built without an accelerator.
        let use_gpu = !matches!(device, Device::Cpu);
        let params = WhisperContextParameters {
            use_gpu,
            ..Default::default()
        };

        let context = WhisperContext::new_with_params(&model_path.to_string_lossy(), params)
            .map_err(|e| VidchatError::Config(format!("failed to load whisper model: {}", e)))?;

        info!("Loaded whisper model {} (device: {}, gpu: {})", variant, device, use_gpu);

        Ok(Self {
            context: Arc::new(context),
            name: format!("whisper.cpp/{}", variant),
        })
    }
}

#[async_trait]
impl SpeechModel for LocalWhisperModel {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(skip(self), fields(audio_path = %audio_path.display()))]
    async fn recognize(&self, audio_path: &Path, language: &str) -> Result<String> {
        let temp_dir = tempfile::tempdir()?;
        let wav_path: PathBuf = temp_dir.path().join("audio.wav");
        to_whisper_wav(audio_path, &wav_path).await?;

        let samples = read_samples(&wav_path)?;
        let context = Arc::clone(&self.context);
        let language = language.to_string();

        tokio::task::spawn_blocking(move || run_inference(&context, &samples, &language))
            .await
            .map_err(|e| VidchatError::Transcription(format!("inference task failed: {}", e)))?
    }
}

fn read_samples(wav_path: &Path) -> Result<Vec<f32>> {
    let mut reader = hound::WavReader::open(wav_path)
        .map_err(|e| VidchatError::Transcription(format!("cannot read WAV: {}", e)))?;

    reader
        .samples::<i16>()
        .map(|s| {
            s.map(|v| v as f32 / i16::MAX as f32)
                .map_err(|e| VidchatError::Transcription(format!("corrupt WAV sample: {}", e)))
        })
        .collect()
}

fn run_inference(context: &WhisperContext, samples: &[f32], language: &str) -> Result<String> {
    let mut state = context
        .create_state()
        .map_err(|e| VidchatError::Transcription(e.to_string()))?;

    let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
    params.set_language(Some(language));
    params.set_print_progress(false);
    params.set_print_realtime(false);

    state
        .full(params, samples)
        .map_err(|e| VidchatError::Transcription(e.to_string()))?;

    let mut text = String::new();
    for segment in state.as_iter() {
        if let Ok(s) = segment.to_str() {
            text.push_str(s);
        }
    }

    Ok(text)
}
