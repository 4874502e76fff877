// SPDX-License-Identifier: MIT
// Copyright 2026 GreenMatch Authors

//! Challenge generation: remote Gemini strategy with a deterministic
//! rule-based fallback.
//!
//! `generate` never fails from the caller's point of view. Any failure in
//! the remote call or in parsing its output is logged and treated as
//! "no challenges produced", and an empty remote result always falls
//! through to the fallback.

use serde::Deserialize;
use serde_json::Value;

use crate::models::{Challenge, Difficulty, Housing, Profile};
use crate::services::catalog::Catalog;
use crate::services::gemini::GeminiClient;

/// Upper bound on the fallback challenge list.
const MAX_FALLBACK_CHALLENGES: usize = 4;

/// Generates personalized challenges from a profile.
pub struct ChallengeGenerator {
    gemini: Option<GeminiClient>,
    catalog: Catalog,
}

/// Expected shape of the model's JSON output.
#[derive(Deserialize)]
struct GeneratedChallenges {
    #[serde(default)]
    challenges: Vec<Challenge>,
}

impl ChallengeGenerator {
    pub fn new(gemini: Option<GeminiClient>, catalog: Catalog) -> Self {
        Self { gemini, catalog }
    }

    /// Generate challenges for a profile.
    ///
    /// Tries the remote strategy first (when configured), then the
    /// deterministic fallback whenever the remote strategy yields nothing,
    /// regardless of why it was empty.
    pub async fn generate(&self, profile: &Profile) -> Vec<Challenge> {
        let remote = match &self.gemini {
            Some(client) => match self.generate_remote(client, profile).await {
                Ok(challenges) => challenges,
                Err(err) => {
                    tracing::warn!(error = %err, "Remote generation failed, using fallback");
                    vec![]
                }
            },
            None => vec![],
        };

        if remote.is_empty() {
            return fallback_challenges(profile);
        }
        remote
    }

    async fn generate_remote(
        &self,
        client: &GeminiClient,
        profile: &Profile,
    ) -> anyhow::Result<Vec<Challenge>> {
        let prompt = self.build_prompt(profile)?;
        let text = client.generate_text(&prompt).await?;
        let value = extract_json_block(&text)?;
        let parsed: GeneratedChallenges = serde_json::from_value(value)?;

        tracing::info!(count = parsed.challenges.len(), "Remote generation complete");
        Ok(parsed.challenges)
    }

    /// Assemble the generation prompt: fixed instructions, the persona
    /// and company catalogs as in-context guidance, and the user profile.
    fn build_prompt(&self, profile: &Profile) -> anyhow::Result<String> {
        let instructions = "\
You design personalised, realistic sustainability challenges.

You are given a library of archetype personas (ARCHETYPE_PERSONAS) describing \
values, constraints, and attitudes toward technology, and a curated list of \
sustainable companies (COMPANY_LISTS).

Silently match the user profile to one or two personas, then generate 3-4 \
challenges inspired by products or services from the company list. Each \
challenge must be feasible for the user's housing, budget, and comfort with \
technology, must describe a concrete behavior, and must state a rough monthly \
CO2 saving as a positive number in kg (typically 3-100).

Return ONLY valid JSON with exactly this structure, with no text outside the \
JSON block:

```json
{
  \"challenges\": [
    {
      \"id\": \"short_unique_id\",
      \"title\": \"short title\",
      \"description\": \"1-3 short sentences explaining what to do, referencing a company from the list.\",
      \"difficulty\": \"Easy | Medium | Advanced\",
      \"estimated_monthly_co2_saving_kg\": number,
      \"why_it_fits\": \"1-2 sentences explaining why this suits THIS user.\"
    }
  ]
}
```

Do not include persona names in the JSON.";

        Ok(format!(
            "{}\n\nARCHETYPE_PERSONAS:\n{}\n\nUser profile:\n{}\n\nCOMPANY_LISTS:\n{}",
            instructions,
            self.catalog.personas(),
            serde_json::to_string(profile)?,
            self.catalog.companies(),
        ))
    }
}

/// Extract a JSON value from free-form model output.
///
/// If the text contains a fenced code block (with an optional `json`
/// language tag), the first block's contents are parsed; otherwise the
/// whole trimmed text is.
pub fn extract_json_block(text: &str) -> Result<Value, ParseError> {
    let mut candidate = text.trim();

    if let Some(start) = candidate.find("```") {
        let after = &candidate[start + 3..];
        let after = after.strip_prefix("json").unwrap_or(after);
        if let Some(end) = after.find("```") {
            candidate = after[..end].trim();
        }
    }

    Ok(serde_json::from_str(candidate)?)
}

/// Errors from parsing model output.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("model output is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Deterministic rule-based challenges, used whenever the remote strategy
/// produces nothing.
///
/// Always yields the two unconditional challenges first, then the
/// conditional ones in a fixed order, capped at four total.
pub fn fallback_challenges(profile: &Profile) -> Vec<Challenge> {
    let habits = profile.habits.to_lowercase();
    let devices = profile.devices.join(" ").to_lowercase();

    let mut challenges = vec![
        Challenge {
            id: "heat_1c".to_string(),
            title: "Lower room temperature by 1\u{b0}C".to_string(),
            description: "Keep your rooms about 1\u{b0}C cooler than usual for the next 4 weeks."
                .to_string(),
            difficulty: Difficulty::Easy,
            estimated_monthly_co2_saving_kg: 20.0,
            why_it_fits: "A small, low-effort adjustment that usually doesn't reduce comfort."
                .to_string(),
        },
        Challenge {
            id: "standby".to_string(),
            title: "Turn off standby devices at night".to_string(),
            description: "Identify at least 5 devices and switch them fully off every night."
                .to_string(),
            difficulty: Difficulty::Easy,
            estimated_monthly_co2_saving_kg: 10.0,
            why_it_fits: "Quick action with visible impact on both your bill and emissions."
                .to_string(),
        },
    ];

    if habits.contains("car") {
        challenges.push(Challenge {
            id: "car_free_day".to_string(),
            title: "Choose one car-free workday".to_string(),
            description: "Once per week, use public transport, bike or walk instead of driving."
                .to_string(),
            difficulty: Difficulty::Medium,
            estimated_monthly_co2_saving_kg: 25.0,
            why_it_fits: "Targets your commuting pattern and also supports a healthier routine."
                .to_string(),
        });
    }

    if devices.contains("ev") {
        challenges.push(Challenge {
            id: "night_charging".to_string(),
            title: "Charge your EV mainly at night".to_string(),
            description: "Schedule your EV charging to off-peak or high-renewable hours."
                .to_string(),
            difficulty: Difficulty::Medium,
            estimated_monthly_co2_saving_kg: 30.0,
            why_it_fits: "You own an EV, so small changes in charging time can have a big effect."
                .to_string(),
        });
    }

    if profile.housing == Housing::House {
        challenges.push(Challenge {
            id: "shower_shorter".to_string(),
            title: "Shorten hot showers".to_string(),
            description:
                "Reduce each shower by around 2 minutes and slightly lower the hot water temperature."
                    .to_string(),
            difficulty: Difficulty::Medium,
            estimated_monthly_co2_saving_kg: 15.0,
            why_it_fits: "Water heating is a major energy consumer in houses.".to_string(),
        });
    }

    challenges.truncate(MAX_FALLBACK_CHALLENGES);
    challenges
}
