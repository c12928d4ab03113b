//! Decoding of relay responses.
//!
//! `CameraControlRemoteCmd.exe` wraps every payload in a fixed-width envelope
//! and reports errors at a fixed position. These offsets were measured against
//! the current digiCamControl release and are not documented anywhere, so all
//! knowledge of the response shape is kept in this module.

/// Number of characters the relay prints before a get/list payload.
pub const ENVELOPE_PREFIX: usize = 96;

/// Number of characters the relay prints after a get/list payload.
pub const ENVELOPE_SUFFIX: usize = 6;

/// Position at which the human-readable part of an error response starts.
pub const ERROR_OFFSET: usize = 109;

/// Token present in every successful `set` and most successful plain commands.
pub const NULL_TOKEN: &str = "null";

/// Empty quoted string; some plain commands report success with it instead of `null`.
pub const EMPTY_TOKEN: &str = r#""""#;

/// Marker the relay emits when a get/list key is not recognised.
pub const UNKNOWN_PARAMETER: &str = "Unknown parameter";

/// Status code reported for a successful command.
pub const SUCCESS_CODE: i32 = 0;

/// Status code reported for any failed command.
pub const FAILURE_CODE: i32 = -1;

/// A command that did not produce a recognised success response.
///
/// Spawn errors, rejected values and malformed output all end up here; only
/// the text differs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{detail}")]
pub struct CommandFailure {
    detail: String,
}

impl CommandFailure {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }

    /// The diagnostic text, already stripped of the relay's envelope where applicable.
    pub fn detail(&self) -> &str {
        &self.detail
    }

    /// Always [`FAILURE_CODE`].
    pub fn code(&self) -> i32 {
        FAILURE_CODE
    }
}

/// Result of a single relay command.
pub type CommandResult<T = ()> = Result<T, CommandFailure>;

/// Collapse a command result into the `0` / `-1` status convention.
pub fn status_code<T>(result: &CommandResult<T>) -> i32 {
    match result {
        Ok(_) => SUCCESS_CODE,
        Err(failure) => failure.code(),
    }
}

/// Classify the response to a plain command (`run`).
///
/// On failure the whole raw response is kept as the detail.
pub fn decode_run(raw: &str) -> CommandResult {
    if raw.contains(NULL_TOKEN) || raw.contains(EMPTY_TOKEN) {
        Ok(())
    } else {
        Err(CommandFailure::new(raw))
    }
}

/// Classify the response to `set <key> <value>`.
pub fn decode_set(raw: &str) -> CommandResult {
    if raw.contains(NULL_TOKEN) {
        Ok(())
    } else {
        Err(CommandFailure::new(error_detail(raw)))
    }
}

/// Extract the value from the response to `get <key>`.
pub fn decode_get(raw: &str) -> CommandResult<String> {
    if raw.contains(UNKNOWN_PARAMETER) {
        return Err(CommandFailure::new(error_detail(raw)));
    }
    Ok(payload(raw).to_string())
}

/// Extract the value list from the response to `list <key>`.
pub fn decode_list(raw: &str) -> CommandResult<Vec<String>> {
    if raw.contains(UNKNOWN_PARAMETER) {
        return Err(CommandFailure::new(error_detail(raw)));
    }
    Ok(split_list(payload(raw)))
}

/// Whether `raw` looks like a complete get response: long enough to carry the
/// envelope and not an unknown-parameter error.
pub fn is_enveloped(raw: &str) -> bool {
    !raw.contains(UNKNOWN_PARAMETER)
        && raw.chars().count() >= ENVELOPE_PREFIX + ENVELOPE_SUFFIX
}

/// The text between the envelope prefix and suffix.
///
/// Responses shorter than the envelope yield an empty payload.
pub fn payload(raw: &str) -> &str {
    slice_chars(raw, ENVELOPE_PREFIX, ENVELOPE_SUFFIX)
}

/// The error message of a failed response, starting at [`ERROR_OFFSET`].
pub fn error_detail(raw: &str) -> &str {
    slice_chars(raw, ERROR_OFFSET, 0)
}

/// Split a list payload on commas and drop the quote around each element.
///
/// Exactly one character is removed from each end of every element, quoted
/// or not.
pub fn split_list(payload: &str) -> Vec<String> {
    payload
        .split(',')
        .map(|element| slice_chars(element, 1, 1).to_string())
        .collect()
}

/// Characters `[start, len - trim_end)` of `text`, clamped to the string like
/// a slice that never panics.
fn slice_chars(text: &str, start: usize, trim_end: usize) -> &str {
    let len = text.chars().count();
    let end = len.saturating_sub(trim_end);
    if start >= end {
        return "";
    }

    let byte_offset = |n: usize| {
        text.char_indices()
            .nth(n)
            .map(|(i, _)| i)
            .unwrap_or(text.len())
    };
    &text[byte_offset(start)..byte_offset(end)]
}
