/// Canned replies for the greetings that bypass the model entirely.
pub const GREETINGS: [(&str, &str); 4] = [
    ("hi", "Greetings, nice to meet you, what can I help you with?"),
    ("hello", "Hello there! How can I assist you today?"),
    ("hey", "Hey! What can I help you with?"),
    ("greetings", "Greetings! How may I be of service?"),
];

fn normalize(message: &str) -> String {
    let lowered = message.trim().to_lowercase();
    match lowered.strip_suffix(['!', '.']) {
        Some(stripped) => stripped.to_string(),
        None => lowered,
    }
}

/// Returns true when the whole message is one of the known greetings,
/// optionally followed by a single `!` or `.`.
pub fn is_simple_greeting(message: &str) -> bool {
    let normalized = normalize(message);
    GREETINGS.iter().any(|(key, _)| *key == normalized)
}

/// Canned reply for a greeting, or `None` when the message is not one.
///
/// A message that classifies as a greeting always gets a reply: if the exact
/// key cannot be found the `hi` reply is used.
pub fn greeting_response(message: &str) -> Option<&'static str> {
    if !is_simple_greeting(message) {
        return None;
    }
    let normalized = normalize(message);
    GREETINGS
        .iter()
        .find(|(key, _)| *key == normalized)
        .or_else(|| GREETINGS.first())
        .map(|(_, reply)| *reply)
}
