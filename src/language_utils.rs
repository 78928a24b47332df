use anyhow::{Result, anyhow};
use isolang::Language;

/// Language utilities for ISO language code handling
///
/// Subtitle file URLs and track labels are built from ISO 639-1 (2-letter)
/// codes, so everything here funnels toward that form. ISO 639-2 (3-letter)
/// input is accepted, including the bibliographic variants, and mapped down
/// when a 2-letter form exists.
/// Map an ISO 639-2/B (bibliographic) code to its ISO 639-2/T equivalent;
/// codes that are not B-variants pass through unchanged
fn part2b_to_part2t(code: &str) -> &str {
    match code {
        "fre" => "fra", // French
        "ger" => "deu", // German
        "dut" => "nld", // Dutch
        "gre" => "ell", // Greek
        "chi" => "zho", // Chinese
        "cze" => "ces", // Czech
        "ice" => "isl", // Icelandic
        "alb" => "sqi", // Albanian
        "arm" => "hye", // Armenian
        "baq" => "eus", // Basque
        "bur" => "mya", // Burmese
        "per" => "fas", // Persian
        "geo" => "kat", // Georgian
        "may" => "msa", // Malay
        "mac" => "mkd", // Macedonian
        "rum" => "ron", // Romanian
        "slo" => "slk", // Slovak
        "wel" => "cym", // Welsh
        other => other,
    }
}

/// Resolve a 2- or 3-letter code to a language
fn lookup(code: &str) -> Result<Language> {
    let normalized = code.trim().to_lowercase();

    let language = match normalized.len() {
        2 => Language::from_639_1(&normalized),
        3 => Language::from_639_3(part2b_to_part2t(&normalized)),
        _ => None,
    };

    language.ok_or_else(|| anyhow!("Invalid language code: {}", code))
}

/// Normalize a language code to ISO 639-1 (2-letter) format.
/// Errors for unknown codes and for languages without a 2-letter form,
/// since the candidate URL templates cannot express those.
pub fn normalize_to_part1(code: &str) -> Result<String> {
    let language = lookup(code)?;

    match language.to_639_1() {
        Some(part1) => Ok(part1.to_string()),
        None => Err(anyhow!(
            "Language code '{}' has no two-letter ISO 639-1 form",
            code
        )),
    }
}

/// Get the English language name from a code
pub fn get_language_name(code: &str) -> Result<String> {
    let language = lookup(code)?;
    Ok(language.to_name().to_string())
}
