use alloc::string::String;

/// Number of consecutive backticks that make a fence.
pub(crate) const FENCE_LEN: u8 = 3;

/// Normalizes the raw text between an opening fence and the end of its line.
///
/// `" typescript: "` becomes `"typescript"`. Case is preserved.
pub(crate) fn normalize_language(raw: &str) -> String {
    raw.trim().trim_end_matches(':').trim_end().into()
}
