//! The user-submitted sustainability questionnaire.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Housing category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Housing {
    Apartment,
    House,
    Other,
}

impl Default for Housing {
    fn default() -> Self {
        Housing::Apartment
    }
}

/// A user's sustainability profile.
///
/// Replaced wholesale each time the profile form is submitted; the
/// previous version is not merged with the new one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Profile {
    #[validate(length(max = 100))]
    pub name: String,
    /// Age in years, bounded to the form's slider range
    #[validate(range(min = 16, max = 90))]
    pub age: u8,
    /// Country / region, free text
    #[serde(default)]
    #[validate(length(max = 100))]
    pub country: String,
    pub housing: Housing,
    /// Devices the user owns: preset selections plus free-text additions,
    /// already merged by the client
    #[serde(default)]
    pub devices: Vec<String>,
    /// What motivates the user (preset selections plus free text)
    #[serde(default)]
    pub motivations: Vec<String>,
    /// Free-text motivation; when present it is also folded into
    /// `motivations` at submission time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_motivation: Option<String>,
    /// Free-text description of current habits
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub habits: String,
}

impl Profile {
    /// Append the custom motivation to the motivation list, if it is
    /// non-empty and not already present.
    pub fn fold_custom_motivation(&mut self) {
        if let Some(custom) = &self.custom_motivation {
            let custom = custom.trim();
            if !custom.is_empty() && !self.motivations.iter().any(|m| m == custom) {
                self.motivations.push(custom.to_string());
            }
        }
    }
}
