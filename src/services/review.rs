// SPDX-License-Identifier: MIT
// Copyright 2026 GreenMatch Authors

//! Proof-image review: asks the model whether an uploaded photo plausibly
//! relates to a challenge.
//!
//! The commentary is opaque text and never parsed; errors are folded into
//! the returned message so the endpoint always has something to show.

use crate::models::Challenge;
use crate::services::gemini::GeminiClient;

/// Reviews uploaded proof images for challenges.
pub struct ProofReviewer {
    gemini: Option<GeminiClient>,
}

impl ProofReviewer {
    pub fn new(gemini: Option<GeminiClient>) -> Self {
        Self { gemini }
    }

    /// Ask the model for friendly commentary on a proof photo.
    pub async fn review(
        &self,
        challenge: &Challenge,
        mime_type: &str,
        image_base64: &str,
    ) -> String {
        let client = match &self.gemini {
            Some(client) => client,
            None => return "Gemini not configured - treat this as manual confirmation.".to_string(),
        };

        let prompt = format!(
            "You check if a photo could plausibly be evidence for a sustainability challenge.\n\
             \n\
             Challenge:\n\
             Title: {}\n\
             Description: {}\n\
             \n\
             Reply in 3-4 short sentences:\n\
             - Is the image plausibly related? Be generous, not strict.\n\
             - Mention one positive aspect.\n\
             - If something clearly doesn't fit, point it out gently.\n\
             No scores, just a friendly explanation.",
            challenge.title, challenge.description
        );

        match client
            .generate_with_image(&prompt, mime_type, image_base64)
            .await
        {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(error = %err, "Proof review failed");
                format!("Error while calling Gemini: {}", err)
            }
        }
    }
}
