//! Sidebar survey: a 0-10 rating, where the visitor heard about the site, free-text comments.
//! Submissions are acknowledged and logged, never stored.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MAX_RATING: u8 = 10;
pub const REFERRAL_OPTIONS: [&str; 3] = ["Social Media", "Advertisement", "Word of Mouth"];
pub const THANK_YOU_MESSAGE: &str = "Thank you for the feedback!";
const MAX_COMMENT_LEN: usize = 2000;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FeedbackForm {
    pub rating: u8,
    pub heard_from: String,
    #[serde(default)]
    pub comments: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedbackReceipt {
    pub status: &'static str,
    pub message: &'static str,
    pub rating: u8,
    pub heard_from: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeedbackError {
    #[error("rating must be between 0 and {max}, got {0}", max = MAX_RATING)]
    RatingOutOfRange(u8),
    #[error("unknown referral option '{0}'")]
    UnknownReferral(String),
    #[error("comments must be at most {max} characters", max = MAX_COMMENT_LEN)]
    CommentsTooLong,
}

pub fn acknowledge(form: &FeedbackForm) -> Result<FeedbackReceipt, FeedbackError> {
    if form.rating > MAX_RATING {
        return Err(FeedbackError::RatingOutOfRange(form.rating));
    }
    let heard_from = form.heard_from.trim();
    if !REFERRAL_OPTIONS.contains(&heard_from) {
        return Err(FeedbackError::UnknownReferral(form.heard_from.clone()));
    }
    if form.comments.chars().count() > MAX_COMMENT_LEN {
        return Err(FeedbackError::CommentsTooLong);
    }

    tracing::info!(
        rating = form.rating,
        heard_from,
        has_comments = !form.comments.trim().is_empty(),
        "feedback received"
    );
    Ok(FeedbackReceipt {
        status: "ok",
        message: THANK_YOU_MESSAGE,
        rating: form.rating,
        heard_from: heard_from.to_string(),
    })
}
