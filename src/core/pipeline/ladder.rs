//! Format-candidate ladders
//!
//! A ladder is the ordered list of format candidates tried in sequence until
//! one succeeds, from most preferred (highest quality, preferred container)
//! down to guaranteed-compatible. Building it is a pure function of the
//! media kind, the platform hint, and the preferred height, so the ordering
//! is testable without any provider.

use super::platform::PlatformHint;
use super::types::{FormatCandidate, MediaKind, PostProcess};

/// Build the candidate ladder for one acquisition.
pub fn format_ladder(kind: MediaKind, hint: PlatformHint, prefer_height: u32) -> Vec<FormatCandidate> {
    match kind {
        MediaKind::Video => video_ladder(hint, prefer_height),
        MediaKind::Audio => vec![
            audio_candidate("bestaudio[ext=m4a]/bestaudio[ext=mp3]/bestaudio/best"),
            audio_candidate("bestaudio/best"),
        ],
        MediaKind::Image => vec![
            FormatCandidate::plain("b/best"),
            FormatCandidate::plain("best"),
        ],
        MediaKind::Document => vec![FormatCandidate::plain("best")],
    }
}

fn video_ladder(hint: PlatformHint, prefer_height: u32) -> Vec<FormatCandidate> {
    match hint {
        // Shorts are short and ubiquitous: go for the best merged stream
        // first, then step down through fixed heights.
        PlatformHint::YoutubeShorts | PlatformHint::YoutubeRegular => vec![
            FormatCandidate::plain("bv*+ba/b[ext=mp4]/b"),
            FormatCandidate::plain("bv[height<=1080]+ba/b[height<=1080]"),
            FormatCandidate::plain("bv[height<=720]+ba/b[height<=720]"),
            FormatCandidate::plain("best[height<=1080]/best[height<=720]"),
            FormatCandidate::plain("best[ext=mp4]/best"),
            FormatCandidate::plain("worst[height>=360]"),
            FormatCandidate::plain("best"),
        ],
        // Instagram rarely offers separate streams worth merging; prefer the
        // progressive mp4 outright.
        PlatformHint::InstagramReel | PlatformHint::InstagramPost => vec![
            FormatCandidate::plain("best[ext=mp4]/best"),
            FormatCandidate::plain("best[height<=1080]/best[height<=720]"),
            FormatCandidate::plain(format!("b[height<={prefer_height}]")),
            FormatCandidate::plain("worst[height>=360]"),
            FormatCandidate::plain("best"),
        ],
        PlatformHint::Tiktok | PlatformHint::Generic => vec![
            FormatCandidate::plain(format!(
                "bv*[ext=mp4][vcodec^=avc1][height<={prefer_height}]+ba[ext=m4a]"
            )),
            FormatCandidate::plain(format!("b[ext=mp4][vcodec^=avc1][height<={prefer_height}]")),
            FormatCandidate::plain(format!("b[height<={prefer_height}]")),
            FormatCandidate::plain("best[ext=mp4]/best"),
            FormatCandidate::plain("best"),
        ],
    }
}

fn audio_candidate(selector: &str) -> FormatCandidate {
    FormatCandidate {
        selector: selector.to_string(),
        post: PostProcess::ExtractAudio {
            codec: "mp3",
            quality: "192",
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_video_ladders_end_with_guaranteed_fallback() {
        for hint in [
            PlatformHint::YoutubeShorts,
            PlatformHint::InstagramReel,
            PlatformHint::Tiktok,
            PlatformHint::Generic,
        ] {
            let ladder = format_ladder(MediaKind::Video, hint, 1080);
            assert!(ladder.len() >= 5, "{hint:?} ladder too short");
            assert_eq!(ladder.last().unwrap().selector, "best");
        }
    }

    #[test]
    fn test_generic_video_ladder_prefers_avc_mp4_at_height() {
        let ladder = format_ladder(MediaKind::Video, PlatformHint::Generic, 720);
        assert_eq!(
            ladder[0].selector,
            "bv*[ext=mp4][vcodec^=avc1][height<=720]+ba[ext=m4a]"
        );
        assert!(ladder.iter().all(|c| c.post == PostProcess::None));
    }

    #[test]
    fn test_shorts_ladder_ignores_prefer_height() {
        // Shorts candidates use fixed 1080/720 steps regardless of the knob.
        let a = format_ladder(MediaKind::Video, PlatformHint::YoutubeShorts, 480);
        let b = format_ladder(MediaKind::Video, PlatformHint::YoutubeShorts, 2160);
        assert_eq!(a, b);
    }

    #[test]
    fn test_instagram_ladder_uses_prefer_height_mid_ladder() {
        let ladder = format_ladder(MediaKind::Video, PlatformHint::InstagramReel, 480);
        assert!(ladder.iter().any(|c| c.selector == "b[height<=480]"));
    }

    #[test]
    fn test_audio_ladder_extracts_mp3() {
        let ladder = format_ladder(MediaKind::Audio, PlatformHint::Generic, 1080);
        assert_eq!(ladder.len(), 2);
        for candidate in &ladder {
            assert_eq!(
                candidate.post,
                PostProcess::ExtractAudio {
                    codec: "mp3",
                    quality: "192"
                }
            );
        }
        assert_eq!(ladder[1].selector, "bestaudio/best");
    }

    #[test]
    fn test_image_ladder() {
        let ladder = format_ladder(MediaKind::Image, PlatformHint::InstagramPost, 1080);
        assert_eq!(ladder[0].selector, "b/best");
        assert_eq!(ladder[1].selector, "best");
    }
}
