use serde::Serialize;

use super::normalizer::{is_present, normalize_phone, trimmed_len};
use super::ProviderFields;

const STARTING_SCORE: f64 = 1.0;
const MIN_NAME_LEN: usize = 3;
const NPI_LEN: usize = 10;
const PHONE_LEN: usize = 10;
const MIN_ADDRESS_LEN: usize = 8;

/// Individual checks in the order they are evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    NameCompleteness,
    SpecialtyPresence,
    NpiPresence,
    NpiFormat,
    PhonePresence,
    PhoneFormat,
    AddressPresence,
    AddressCompleteness,
}

/// A triggered check, kept for audit output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Deficiency {
    pub check: CheckKind,
    pub penalty: f64,
    pub message: &'static str,
}

/// Score and ordered deficiencies produced by a single pass over the checklist.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreCard {
    pub score: f64,
    pub deficiencies: Vec<Deficiency>,
}

impl ScoreCard {
    pub fn issue_count(&self) -> usize {
        self.deficiencies.len()
    }

    pub fn primary_issue(&self) -> Option<&'static str> {
        self.deficiencies.first().map(|deficiency| deficiency.message)
    }
}

struct Subject<'a> {
    name: &'a str,
    specialty: Option<&'a str>,
    npi: Option<&'a str>,
    phone: String,
    address: Option<&'a str>,
}

struct Check {
    kind: CheckKind,
    penalty: f64,
    message: &'static str,
    flagged: fn(&Subject<'_>) -> bool,
}

const CHECKS: [Check; 8] = [
    Check {
        kind: CheckKind::NameCompleteness,
        penalty: 0.25,
        message: "Provider name is incomplete.",
        flagged: name_incomplete,
    },
    Check {
        kind: CheckKind::SpecialtyPresence,
        penalty: 0.05,
        message: "Specialty is missing.",
        flagged: specialty_missing,
    },
    Check {
        kind: CheckKind::NpiPresence,
        penalty: 0.25,
        message: "NPI is missing.",
        flagged: npi_missing,
    },
    Check {
        kind: CheckKind::NpiFormat,
        penalty: 0.2,
        message: "NPI format is invalid.",
        flagged: npi_malformed,
    },
    Check {
        kind: CheckKind::PhonePresence,
        penalty: 0.1,
        message: "Phone number is missing.",
        flagged: phone_missing,
    },
    Check {
        kind: CheckKind::PhoneFormat,
        penalty: 0.1,
        message: "Phone number format is invalid.",
        flagged: phone_malformed,
    },
    Check {
        kind: CheckKind::AddressPresence,
        penalty: 0.15,
        message: "Address is missing.",
        flagged: address_missing,
    },
    Check {
        kind: CheckKind::AddressCompleteness,
        penalty: 0.1,
        message: "Address appears incomplete.",
        flagged: address_incomplete,
    },
];

fn name_incomplete(subject: &Subject<'_>) -> bool {
    trimmed_len(subject.name) < MIN_NAME_LEN
}

fn specialty_missing(subject: &Subject<'_>) -> bool {
    !is_present(subject.specialty)
}

fn npi_missing(subject: &Subject<'_>) -> bool {
    !is_present(subject.npi)
}

fn npi_malformed(subject: &Subject<'_>) -> bool {
    match subject.npi {
        Some(npi) if !npi.is_empty() => !is_well_formed_npi(npi),
        _ => false,
    }
}

fn phone_missing(subject: &Subject<'_>) -> bool {
    subject.phone.is_empty()
}

fn phone_malformed(subject: &Subject<'_>) -> bool {
    !subject.phone.is_empty() && subject.phone.len() != PHONE_LEN
}

fn address_missing(subject: &Subject<'_>) -> bool {
    !is_present(subject.address)
}

fn address_incomplete(subject: &Subject<'_>) -> bool {
    match subject.address {
        Some(address) if !address.is_empty() => trimmed_len(address) < MIN_ADDRESS_LEN,
        _ => false,
    }
}

/// Exactly ten ASCII digits. No checksum or registry lookup.
pub fn is_well_formed_npi(npi: &str) -> bool {
    npi.len() == NPI_LEN && npi.bytes().all(|byte| byte.is_ascii_digit())
}

/// Run every check in order and clamp the accumulated score to `[0.0, 1.0]`.
pub fn score_fields(fields: &ProviderFields) -> ScoreCard {
    let subject = Subject {
        name: fields.provider_name.as_str(),
        specialty: fields.specialty.as_deref(),
        npi: fields.npi.as_deref(),
        phone: normalize_phone(fields.phone.as_deref()),
        address: fields.address.as_deref(),
    };

    let mut score = STARTING_SCORE;
    let mut deficiencies = Vec::new();

    for check in &CHECKS {
        if (check.flagged)(&subject) {
            score -= check.penalty;
            deficiencies.push(Deficiency {
                check: check.kind,
                penalty: check.penalty,
                message: check.message,
            });
        }
    }

    ScoreCard {
        score: score.clamp(0.0, 1.0),
        deficiencies,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> ProviderFields {
        ProviderFields::new(
            "Dr. Jane Smith",
            Some("Cardiology"),
            Some("1234567890"),
            Some("5551234567"),
            Some("123 Main Street"),
        )
    }

    fn checks(card: &ScoreCard) -> Vec<CheckKind> {
        card.deficiencies.iter().map(|item| item.check).collect()
    }

    #[test]
    fn complete_record_has_no_deficiencies() {
        let card = score_fields(&complete());
        assert_eq!(card.score, 1.0);
        assert!(card.deficiencies.is_empty());
        assert_eq!(card.primary_issue(), None);
    }

    #[test]
    fn malformed_npi_only_incurs_format_penalty() {
        let mut fields = complete();
        fields.npi = Some("12345abcde".to_string());
        let card = score_fields(&fields);
        assert_eq!(checks(&card), vec![CheckKind::NpiFormat]);
        assert!((card.score - 0.8).abs() < 1e-9);
    }

    #[test]
    fn whitespace_npi_counts_as_present_but_malformed() {
        let mut fields = complete();
        fields.npi = Some("  ".to_string());
        assert_eq!(checks(&score_fields(&fields)), vec![CheckKind::NpiFormat]);
    }

    #[test]
    fn phone_punctuation_is_ignored_before_length_check() {
        let mut fields = complete();
        fields.phone = Some("(555) 123-4567".to_string());
        assert!(score_fields(&fields).deficiencies.is_empty());

        fields.phone = Some("1-555-123-4567".to_string());
        assert_eq!(checks(&score_fields(&fields)), vec![CheckKind::PhoneFormat]);

        fields.phone = Some("n/a".to_string());
        assert_eq!(checks(&score_fields(&fields)), vec![CheckKind::PhonePresence]);
    }

    #[test]
    fn short_address_is_incomplete_not_missing() {
        let mut fields = complete();
        fields.address = Some("1 A St".to_string());
        let card = score_fields(&fields);
        assert_eq!(checks(&card), vec![CheckKind::AddressCompleteness]);
        assert_eq!(card.primary_issue(), Some("Address appears incomplete."));
    }

    #[test]
    fn short_name_is_flagged_after_trimming() {
        let mut fields = complete();
        fields.provider_name = "  Al  ".to_string();
        assert_eq!(
            checks(&score_fields(&fields)),
            vec![CheckKind::NameCompleteness]
        );
    }

    #[test]
    fn deficiencies_follow_checklist_order() {
        let fields = ProviderFields::new("Jo", None, Some("12"), None, Some("PO Box"));
        let card = score_fields(&fields);
        assert_eq!(
            checks(&card),
            vec![
                CheckKind::NameCompleteness,
                CheckKind::SpecialtyPresence,
                CheckKind::NpiFormat,
                CheckKind::PhonePresence,
                CheckKind::AddressCompleteness,
            ]
        );
        assert_eq!(card.primary_issue(), Some("Provider name is incomplete."));
    }

    #[test]
    fn npi_format_accepts_only_ascii_digits() {
        assert!(is_well_formed_npi("1234567890"));
        assert!(!is_well_formed_npi("123456789"));
        assert!(!is_well_formed_npi("12345678901"));
        assert!(!is_well_formed_npi("123456789O"));
        assert!(!is_well_formed_npi("١٢٣٤٥٦٧٨٩٠"));
    }
}
