//! Log redaction for credential-like values.

const REDACTED_BEARER: &str = "[REDACTED_BEARER_TOKEN]";
const REDACTED_API_KEY: &str = "[REDACTED_API_KEY]";
const REDACTED_TOKEN: &str = "[REDACTED_TOKEN]";
const REDACTED_CREDENTIALS: &str = "[REDACTED_CREDENTIALS]";

/// Common prefixes of API keys and tokens, matched case-insensitively.
const TOKEN_PREFIXES: [&str; 6] = ["sk-", "pk-", "api_", "token_", "ey", "access_token"];

/// Replaces anything that looks like a secret with a fixed marker.
///
/// Every credential-like value must pass through here before it is placed
/// into a log record.
pub fn sanitize_for_logging(input: &str) -> String {
    let lowered = input.to_lowercase();

    if lowered.contains("bearer ") {
        return REDACTED_BEARER.to_string();
    }
    if lowered.starts_with("sk-") {
        return REDACTED_API_KEY.to_string();
    }
    if TOKEN_PREFIXES.iter().any(|prefix| lowered.starts_with(prefix)) {
        return REDACTED_TOKEN.to_string();
    }
    // Client ids and secrets don't have a reliable prefix; redact anything
    // long enough to be one that names itself as such.
    if input.len() > 20 && (lowered.contains("secret") || lowered.contains("client")) {
        return REDACTED_CREDENTIALS.to_string();
    }

    input.to_string()
}
