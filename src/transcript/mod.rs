//! Transcript fetching for vidchat.
//!
//! Turns a YouTube URL or bare video id into a flat transcript string,
//! trying manually-authored caption tracks before auto-generated ones for
//! each preferred language in order.

mod youtube;

pub use youtube::YoutubeClient;

use crate::error::{Result, VidchatError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Suffix appended to a language code to address its auto-generated track.
pub const AUTO_SUFFIX: &str = "_auto";

/// URL marker preceding a video id.
const URL_MARKER: &str = "youtube.com/watch?v=";

/// A fetched transcript, immutable once produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptDocument {
    /// Video id this transcript came from.
    pub source_id: String,
    /// The full transcript as one flat string.
    pub text: String,
    /// Source id plus optional video info (title, author, ...).
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

/// A single available caption track for a video.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionTrack {
    /// BCP-47 language code (e.g. "en", "en-GB").
    pub language_code: String,
    /// True for auto-generated (ASR) tracks.
    pub auto_generated: bool,
    /// Source-specific URL for fetching the track payload.
    pub base_url: String,
}

impl CaptionTrack {
    /// Key under which this track is listed: the language code, with the
    /// auto-generated suffix appended for ASR tracks.
    pub fn listing_key(&self) -> String {
        if self.auto_generated {
            format!("{}{}", self.language_code, AUTO_SUFFIX)
        } else {
            self.language_code.clone()
        }
    }
}

/// One timed fragment of caption text.
#[derive(Debug, Clone)]
pub struct CaptionFragment {
    pub text: String,
    pub start_seconds: f64,
    pub duration_seconds: f64,
}

/// Descriptive attributes of a video, used to enrich transcript metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoInfo {
    pub title: String,
    pub description: Option<String>,
    pub view_count: Option<u64>,
    pub thumbnail_url: Option<String>,
    pub publish_date: Option<DateTime<Utc>>,
    pub duration_seconds: Option<u32>,
    pub author: Option<String>,
}

/// Result of listing the caption tracks of a video.
///
/// `Disabled` is a normal outcome, not an error: callers branch on it and
/// end up with an empty document list.
#[derive(Debug, Clone)]
pub enum TrackListing {
    /// Captions are turned off for this video.
    Disabled,
    /// Available tracks keyed by [`CaptionTrack::listing_key`].
    Available(HashMap<String, CaptionTrack>),
}

/// Trait for transcript source providers.
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    /// List the caption tracks available for a video.
    async fn list_tracks(&self, video_id: &str) -> Result<TrackListing>;

    /// Fetch the timed text fragments of a track.
    async fn fetch_track(&self, track: &CaptionTrack) -> Result<Vec<CaptionFragment>>;

    /// Fetch descriptive video attributes.
    async fn video_info(&self, video_id: &str) -> Result<VideoInfo>;
}

/// Extract a video id from a URL or bare id.
///
/// Lenient by design: the id is whatever follows the `watch?v=` marker, and
/// if the marker is absent the whole trimmed input is taken as the id.
/// Trailing query parameters (`&t=7s` and friends) are stripped.
pub fn extract_video_id(input: &str) -> Result<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(VidchatError::InvalidInput(
            "Empty video URL or id".to_string(),
        ));
    }

    let after_marker = match trimmed.find(URL_MARKER) {
        Some(pos) => &trimmed[pos + URL_MARKER.len()..],
        None => trimmed,
    };

    let id = after_marker
        .split('&')
        .next()
        .unwrap_or(after_marker)
        .to_string();

    if id.is_empty() {
        return Err(VidchatError::InvalidInput(format!(
            "No video id in input: {}",
            input
        )));
    }

    Ok(id)
}

/// Fetches transcripts with language fallback.
pub struct TranscriptFetcher {
    source: Arc<dyn TranscriptSource>,
    languages: Vec<String>,
    add_video_info: bool,
}

impl TranscriptFetcher {
    /// Create a fetcher with an ordered language preference list.
    pub fn new(source: Arc<dyn TranscriptSource>, languages: Vec<String>) -> Self {
        Self {
            source,
            languages,
            add_video_info: false,
        }
    }

    /// Also fetch video info and fold it into document metadata.
    pub fn with_video_info(mut self, add_video_info: bool) -> Self {
        self.add_video_info = add_video_info;
        self
    }

    /// Load the transcript for a video URL or id.
    ///
    /// Returns zero documents when captions are disabled, one otherwise.
    #[instrument(skip(self), fields(input = %input))]
    pub async fn load(&self, input: &str) -> Result<Vec<TranscriptDocument>> {
        let video_id = extract_video_id(input)?;

        let mut metadata = serde_json::Map::new();
        metadata.insert(
            "source".to_string(),
            serde_json::Value::String(video_id.clone()),
        );

        if self.add_video_info {
            let info = self.source.video_info(&video_id).await.map_err(|e| match e {
                VidchatError::Metadata(_) => e,
                other => VidchatError::Metadata(other.to_string()),
            })?;
            let value = serde_json::to_value(&info)?;
            if let serde_json::Value::Object(map) = value {
                metadata.extend(map);
            }
        }

        let tracks = match self.source.list_tracks(&video_id).await? {
            TrackListing::Disabled => {
                info!("Captions are disabled for video {}", video_id);
                return Ok(Vec::new());
            }
            TrackListing::Available(tracks) => tracks,
        };

        let track = self.select_track(&tracks).ok_or_else(|| {
            VidchatError::NoTranscriptFound(format!(
                "No transcript for video {} in any of the requested languages: {:?}",
                video_id, self.languages
            ))
        })?;

        debug!(
            "Selected {} track '{}' for video {}",
            if track.auto_generated {
                "auto-generated"
            } else {
                "manual"
            },
            track.language_code,
            video_id
        );

        let fragments = self.source.fetch_track(track).await?;
        let text = assemble_transcript(&fragments);

        Ok(vec![TranscriptDocument {
            source_id: video_id,
            text,
            metadata,
        }])
    }

    /// Pick the first available track in language preference order, trying
    /// the manual track before the auto-generated one for each language.
    fn select_track<'a>(
        &self,
        tracks: &'a HashMap<String, CaptionTrack>,
    ) -> Option<&'a CaptionTrack> {
        for language in &self.languages {
            if let Some(track) = tracks.get(language) {
                return Some(track);
            }
            if let Some(track) = tracks.get(&format!("{}{}", language, AUTO_SUFFIX)) {
                return Some(track);
            }
        }
        None
    }
}

/// Join trimmed fragment texts with single spaces into one flat string.
fn assemble_transcript(fragments: &[CaptionFragment]) -> String {
    fragments
        .iter()
        .map(|f| f.text.trim())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(code: &str, auto: bool) -> CaptionTrack {
        CaptionTrack {
            language_code: code.to_string(),
            auto_generated: auto,
            base_url: format!("https://example.test/{}", code),
        }
    }

    struct FakeSource {
        listing: TrackListing,
        info_fails: bool,
    }

    #[async_trait]
    impl TranscriptSource for FakeSource {
        async fn list_tracks(&self, _video_id: &str) -> Result<TrackListing> {
            Ok(self.listing.clone())
        }

        async fn fetch_track(&self, track: &CaptionTrack) -> Result<Vec<CaptionFragment>> {
            Ok(vec![
                CaptionFragment {
                    text: format!("  hello from {} ", track.listing_key()),
                    start_seconds: 0.0,
                    duration_seconds: 2.0,
                },
                CaptionFragment {
                    text: " second fragment".to_string(),
                    start_seconds: 2.0,
                    duration_seconds: 2.0,
                },
            ])
        }

        async fn video_info(&self, _video_id: &str) -> Result<VideoInfo> {
            if self.info_fails {
                return Err(VidchatError::Metadata("upstream unavailable".to_string()));
            }
            Ok(VideoInfo {
                title: "Test Video".to_string(),
                description: None,
                view_count: Some(42),
                thumbnail_url: None,
                publish_date: None,
                duration_seconds: Some(60),
                author: Some("Tester".to_string()),
            })
        }
    }

    fn listing(tracks: Vec<CaptionTrack>) -> TrackListing {
        TrackListing::Available(tracks.into_iter().map(|t| (t.listing_key(), t)).collect())
    }

    #[test]
    fn test_extract_video_id() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ").unwrap(),
            "dQw4w9WgXcQ"
        );
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=C_78DM8fG6E&t=7s").unwrap(),
            "C_78DM8fG6E"
        );
        // Fail-soft: no marker means the whole input is the id
        assert_eq!(extract_video_id("dQw4w9WgXcQ").unwrap(), "dQw4w9WgXcQ");
        assert!(matches!(
            extract_video_id("   "),
            Err(VidchatError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_manual_track_preferred_over_auto() {
        let source = Arc::new(FakeSource {
            listing: listing(vec![track("en", true), track("en", false)]),
            info_fails: false,
        });
        let fetcher = TranscriptFetcher::new(source, vec!["en".to_string()]);

        let docs = fetcher.load("dQw4w9WgXcQ").await.unwrap();
        assert_eq!(docs.len(), 1);
        assert!(docs[0].text.starts_with("hello from en "));
    }

    #[tokio::test]
    async fn test_language_priority_order() {
        let source = Arc::new(FakeSource {
            listing: listing(vec![track("es", false), track("en", true)]),
            info_fails: false,
        });

        // "en" first: only the auto track exists, so it wins
        let fetcher =
            TranscriptFetcher::new(source.clone(), vec!["en".to_string(), "es".to_string()]);
        let docs = fetcher.load("abc123").await.unwrap();
        assert!(docs[0].text.contains("en_auto"));

        // Reordering the preference list changes the selected track
        let fetcher = TranscriptFetcher::new(source, vec!["es".to_string(), "en".to_string()]);
        let docs = fetcher.load("abc123").await.unwrap();
        assert!(docs[0].text.contains("hello from es"));
    }

    #[tokio::test]
    async fn test_disabled_captions_yield_empty_list() {
        let source = Arc::new(FakeSource {
            listing: TrackListing::Disabled,
            info_fails: false,
        });
        let fetcher = TranscriptFetcher::new(source, vec!["en".to_string()]);

        let docs = fetcher.load("abc123").await.unwrap();
        assert!(docs.is_empty());
    }

    #[tokio::test]
    async fn test_no_matching_language() {
        let source = Arc::new(FakeSource {
            listing: listing(vec![track("fr", false)]),
            info_fails: false,
        });
        let fetcher = TranscriptFetcher::new(source, vec!["en".to_string(), "es".to_string()]);

        let err = fetcher.load("abc123").await.unwrap_err();
        assert!(matches!(err, VidchatError::NoTranscriptFound(_)));
    }

    #[tokio::test]
    async fn test_video_info_enrichment() {
        let source = Arc::new(FakeSource {
            listing: listing(vec![track("en", false)]),
            info_fails: false,
        });
        let fetcher =
            TranscriptFetcher::new(source, vec!["en".to_string()]).with_video_info(true);

        let docs = fetcher.load("abc123").await.unwrap();
        assert_eq!(docs[0].metadata["title"], "Test Video");
        assert_eq!(docs[0].metadata["source"], "abc123");
    }

    #[tokio::test]
    async fn test_video_info_failure_only_hurts_enriched_loads() {
        let make_source = || {
            Arc::new(FakeSource {
                listing: listing(vec![track("en", false)]),
                info_fails: true,
            })
        };

        let fetcher = TranscriptFetcher::new(make_source(), vec!["en".to_string()])
            .with_video_info(true);
        let err = fetcher.load("abc123").await.unwrap_err();
        assert!(matches!(err, VidchatError::Metadata(_)));

        // Without enrichment the same source failure is irrelevant
        let fetcher = TranscriptFetcher::new(make_source(), vec!["en".to_string()]);
        assert!(fetcher.load("abc123").await.is_ok());
    }
}
