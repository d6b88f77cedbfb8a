use once_cell::sync::Lazy;
use regex::Regex;

static DOVI_PROFILE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^dovi_p(\d+)$").expect("dovi profile regex should compile")
});

/// Dynamic-range tokens the backend evaluator understands, strongest first.
/// Doubles as the default preference order of the `effect` rule.
pub const KNOWN_EFFECT_TOKENS: &[&str] = &[
    "dovi_p8",
    "dovi_p7",
    "dovi_p5",
    "dovi_other",
    "hdr10+",
    "hdr",
    "hlg",
    "sdr",
];

const DOVI_OTHER_TOKEN: &str = "dovi_other";
const DOVI_OTHER_LABEL: &str = "DoVi (Other)";
const HDR10_PLUS_TOKEN: &str = "hdr10+";
const HDR10_PLUS_LABEL: &str = "HDR10+";

/// Converts categorical values between the persisted token and the label the
/// operator edits.
///
/// `to_canonical(to_display(t)) == normalize(t)` holds for every token in
/// [`KNOWN_EFFECT_TOKENS`]. Unknown labels are never rejected; they take the
/// generic normalize path so newer backend tokens survive a round trip.
pub struct TagCanonicalizer;

impl TagCanonicalizer {
    /// Lowercase, trim, and join whitespace runs with `_`.
    pub fn normalize(raw: &str) -> String {
        raw.split_whitespace()
            .map(str::to_lowercase)
            .collect::<Vec<_>>()
            .join("_")
    }

    pub fn to_display(token: &str) -> String {
        let token = Self::normalize(token);
        match token.as_str() {
            DOVI_OTHER_TOKEN => DOVI_OTHER_LABEL.to_string(),
            HDR10_PLUS_TOKEN => HDR10_PLUS_LABEL.to_string(),
            _ => match DOVI_PROFILE_REGEX.captures(&token) {
                Some(captures) => format!("DoVi P{}", &captures[1]),
                None => token.replace('_', " ").to_uppercase(),
            },
        }
    }

    pub fn to_canonical(label: &str) -> String {
        let normalized = Self::normalize(label);
        if normalized == Self::normalize(DOVI_OTHER_LABEL) {
            return DOVI_OTHER_TOKEN.to_string();
        }
        normalized
    }

    pub fn default_effect_labels() -> Vec<String> {
        KNOWN_EFFECT_TOKENS
            .iter()
            .map(|token| Self::to_display(token))
            .collect()
    }
}
