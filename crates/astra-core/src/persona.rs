//! The mentor persona and the fixed strings the relay falls back to.

use crate::model::CompletionRequest;

pub const MENTOR_NAME: &str = "Astra";

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Response-length budget for a single reply.
pub const MAX_REPLY_TOKENS: u32 = 150;

pub const TEMPERATURE: f32 = 0.7;

/// Returned in place of a reply when the model call fails.
pub const FALLBACK_REPLY: &str =
  "I'm having trouble thinking right now. Can you try asking me again in a moment?";

/// Returned when the model answers with no usable text.
pub const UNCLEAR_REPLY: &str =
  "I'm sorry, I didn't understand that. Can you try asking in a different way?";

const PERSONA: &str = "You are Astra, a kind, wise, slightly playful mentor \
helping a child learn real-world life skills. Always respond with \
encouragement, open-ended questions, and emotional intelligence. Keep your \
responses concise and age-appropriate for kids aged 8-13. Use emojis \
sparingly but meaningfully.";

/// The system instruction, personalised with the child's name when known.
pub fn system_instruction(child_name: Option<&str>) -> String {
  match child_name.map(str::trim).filter(|n| !n.is_empty()) {
    Some(name) => format!("{PERSONA} The child's name is {name}."),
    None => PERSONA.to_owned(),
  }
}

pub fn completion_request(
  message: &str,
  child_name: Option<&str>,
) -> CompletionRequest {
  CompletionRequest {
    system:      system_instruction(child_name),
    user:        message.to_owned(),
    max_tokens:  MAX_REPLY_TOKENS,
    temperature: TEMPERATURE,
  }
}

/// First message shown when a child opens the chat screen.
pub fn welcome_message(child_name: &str) -> String {
  format!(
    "Hi {child_name}! 🌟 I'm {MENTOR_NAME}, your AI mentor. I'm here to help \
     you learn and grow. What would you like to talk about today?"
  )
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn instruction_mentions_name_only_when_present() {
    let with = system_instruction(Some("Mia"));
    assert!(with.ends_with("The child's name is Mia."));
    assert!(with.starts_with("You are Astra"));

    let without = system_instruction(None);
    assert!(!without.contains("child's name"));
    assert_eq!(system_instruction(Some("   ")), without);
  }

  #[test]
  fn request_uses_fixed_budget() {
    let req = completion_request("hello", None);
    assert_eq!(req.user, "hello");
    assert_eq!(req.max_tokens, 150);
    assert!((req.temperature - 0.7).abs() < f32::EPSILON);
  }

  #[test]
  fn welcome_greets_by_name() {
    let msg = welcome_message("Mia");
    assert!(msg.starts_with("Hi Mia! 🌟 I'm Astra"));
    assert!(msg.ends_with("What would you like to talk about today?"));
  }
}
