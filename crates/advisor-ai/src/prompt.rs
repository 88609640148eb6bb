//! Prompt template for the advisory request

use advisor_model::{AdvisoryPrompt, LeadRequest};
use std::fmt::Write;

const PREAMBLE: &str = "You are an AI real estate advisor in Ajman, UAE.";
const CLOSING: &str =
    "Provide smart suggestions including potential areas and developer projects.";

/// Derive the advisory prompt for a lead
///
/// Text fields are trimmed so cosmetic whitespace does not split the cache.
/// Absent region or budget bounds are left out of the prompt entirely.
#[must_use]
pub fn build_prompt(lead: &LeadRequest) -> AdvisoryPrompt {
    let mut prompt = String::from(PREAMBLE);

    // Writing to a String cannot fail.
    let _ = write!(prompt, " Client name: {}.", lead.name.trim());

    if let Some(region) = lead.region() {
        let _ = write!(prompt, " Preferred region: {region}.");
    }

    match (lead.budget_min, lead.budget_max) {
        (Some(min), Some(max)) => {
            let _ = write!(prompt, " Budget range: AED {min} to AED {max}.");
        }
        (Some(min), None) => {
            let _ = write!(prompt, " Budget: at least AED {min}.");
        }
        (None, Some(max)) => {
            let _ = write!(prompt, " Budget: up to AED {max}.");
        }
        (None, None) => {}
    }

    let _ = write!(prompt, " A user is looking for: {}. {CLOSING}", lead.message.trim());

    AdvisoryPrompt::new(prompt)
}
