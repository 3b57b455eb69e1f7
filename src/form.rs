// View state for the compose form. One exclusively-owned record carries the
// draft and the posted flag through the render/submit cycle; there is no
// other state in the program.

use std::path::{Path, PathBuf};

/// Advisory tweet length limit. Displayed, not enforced before submission.
pub const MAX_TWEET_CHARS: usize = 280;

/// Image extensions the file picker offers.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Everything the user has typed or picked for the current tweet.
#[derive(Debug, Clone, Default)]
pub struct Draft {
    pub text: String,
    pub include_media: bool,
    pub image: Option<PathBuf>,
}

impl Draft {
    /// The image to upload for this submit action, if any. A leftover picked
    /// file is ignored once "include media" is unchecked.
    pub fn media_to_upload(&self) -> Option<&Path> {
        if self.include_media {
            self.image.as_deref()
        } else {
            None
        }
    }
}

/// State for one interactive session.
#[derive(Debug, Default)]
pub struct FormState {
    pub draft: Draft,
    /// True once a tweet has been posted this session. Never reset
    /// in-process; the user restarts the app to post again.
    posted: bool,
}

impl FormState {
    pub fn new() -> Self {
        FormState::default()
    }

    pub fn posted(&self) -> bool {
        self.posted
    }

    pub fn mark_posted(&mut self) {
        self.posted = true;
    }
}

/// Number of characters in the draft text. Unicode scalar values, so "héllo"
/// counts as five.
pub fn char_count(text: &str) -> usize {
    text.chars().count()
}

/// The live counter line shown under the text input.
pub fn char_counter(text: &str) -> String {
    format!("{}/{} characters", char_count(text), MAX_TWEET_CHARS)
}
