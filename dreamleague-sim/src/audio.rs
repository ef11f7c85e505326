//! Voice shaping for spoken commentary and the best-effort narration boundary.
//!
//! Speech synthesis itself is an external service. With the `async` feature enabled,
//! [`narrate_commentary`] fans commentary out to an [`AudioNarrator`]; failures never affect the
//! text commentary.
use serde::{Deserialize, Serialize};

use crate::constants::{
    VOICE_PITCH_BASE, VOICE_PITCH_MAX, VOICE_RATE_BASE, VOICE_RATE_MAX, VOICE_STEP_PER_EXCITEMENT,
    VOICE_VOLUME_BASE, VOICE_VOLUME_MAX,
};

/// Speech parameters for one commentary line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VoiceProfile {
    pub volume: f32,
    pub rate: f32,
    pub pitch: f32,
}

impl VoiceProfile {
    /// Louder, faster, and higher as excitement rises, each capped.
    #[must_use]
    pub fn for_excitement(excitement: u8) -> Self {
        let step = f32::from(excitement) * VOICE_STEP_PER_EXCITEMENT;
        Self {
            volume: (VOICE_VOLUME_BASE + step).min(VOICE_VOLUME_MAX),
            rate: (VOICE_RATE_BASE + step).min(VOICE_RATE_MAX),
            pitch: (VOICE_PITCH_BASE + step).min(VOICE_PITCH_MAX),
        }
    }
}

#[cfg(feature = "async")]
pub use narration::{AudioNarrator, NarrationOptions, narrate_commentary};

#[cfg(feature = "async")]
mod narration {
    use log::warn;
    use std::time::Duration;

    use super::VoiceProfile;
    use crate::commentary::Commentary;

    /// External text-to-speech service.
    #[async_trait::async_trait]
    pub trait AudioNarrator: Send + Sync {
        /// Reference to generated audio (URL, buffer id, ...).
        type Handle: Send;
        type Error: std::error::Error + Send + Sync + 'static;

        async fn synthesize(
            &self,
            text: &str,
            voice: VoiceProfile,
        ) -> Result<Self::Handle, Self::Error>;
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct NarrationOptions {
        pub per_line_timeout: Duration,
    }

    impl Default for NarrationOptions {
        fn default() -> Self {
            Self {
                per_line_timeout: Duration::from_secs(5),
            }
        }
    }

    /// Request audio for each line in order; a failed or timed-out line yields `None`.
    ///
    /// Dropping the returned future cancels any outstanding request.
    pub async fn narrate_commentary<N>(
        narrator: &N,
        lines: &[Commentary],
        options: NarrationOptions,
    ) -> Vec<Option<N::Handle>>
    where
        N: AudioNarrator + ?Sized,
    {
        let mut audio = Vec::with_capacity(lines.len());
        for line in lines {
            let voice = VoiceProfile::for_excitement(line.excitement);
            let request = narrator.synthesize(&line.text, voice);
            let handle = match tokio::time::timeout(options.per_line_timeout, request).await {
                Ok(Ok(handle)) => Some(handle),
                Ok(Err(err)) => {
                    warn!("narration failed at minute {}: {err}", line.time);
                    None
                }
                Err(_) => {
                    warn!(
                        "narration timed out at minute {} after {:?}",
                        line.time, options.per_line_timeout
                    );
                    None
                }
            };
            audio.push(handle);
        }
        audio
    }

}
