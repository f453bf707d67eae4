/// Internal names of Valve's Proton builds start with this.
pub const PROTON_PREFIX: &str = "proton_";

/// Human-readable label for a compatibility tool's internal name.
///
/// `proton_<X><YZ>` is read as major `X`, minor `YZ` (minor `0` when absent),
/// which stops being right once there is a two-digit major. Non-numeric
/// Proton names (`proton_experimental`) get their remainder title-cased.
/// Everything else is title-cased with existing capitals kept.
pub fn format_name(name: &str) -> String {
    let Some(rest) = name.strip_prefix(PROTON_PREFIX) else {
        return title_case_keep_upper(name);
    };
    let mut chars = rest.chars();
    match chars.next() {
        Some(major) if major.is_ascii_digit() => {
            let minor = chars.as_str();
            let minor = if minor.is_empty() { "0" } else { minor };
            format!("Proton {major}.{minor}")
        }
        _ => format!("Proton {}", title_case(rest)).trim_end().to_string(),
    }
}

/// Title case where a character already upper-case in `s` stays upper-case.
/// Upper-case letters sort before lower-case ones, so the per-character
/// minimum of both spellings does exactly that.
pub fn title_case_keep_upper(s: &str) -> String {
    title_case(s)
        .chars()
        .zip(s.chars())
        .map(|(titled, orig)| titled.min(orig))
        .collect()
}

/// First letter of every run of letters upper-cased, the rest lower-cased.
/// Letters following digits or punctuation start a new run. Characters whose
/// case mapping is not a single character are left alone so the output lines
/// up with the input.
pub fn title_case(s: &str) -> String {
    let mut prev_letter = false;
    s.chars()
        .map(|c| {
            if !c.is_alphabetic() {
                prev_letter = false;
                return c;
            }
            let mapped = if prev_letter {
                single(c.to_lowercase())
            } else {
                single(c.to_uppercase())
            };
            prev_letter = true;
            mapped.unwrap_or(c)
        })
        .collect()
}

fn single(mut it: impl Iterator<Item = char>) -> Option<char> {
    let c = it.next()?;
    if it.next().is_some() { None } else { Some(c) }
}
