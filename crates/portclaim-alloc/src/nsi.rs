//! Field rules for NSI service termination points

use crate::error::AllocationError;
use once_cell::sync::Lazy;
use portclaim_lifecycle::blocks::StpDetails;
use regex::{Regex, RegexBuilder};

/// Upper bound on requested bandwidth in Mbit/s
pub const MAX_BANDWIDTH: u32 = 400_000;

const TOPOLOGY_PATTERN: &str = r"^[-a-z0-9+,.;=_]+$";
const STP_ID_PATTERN: &str = r"^[-a-z0-9+,.;=_:]+$";
const DESCRIPTION_PATTERN: &str = r"^[^<>&]*$";
const NURN_PATTERN: &str = r"^urn:ogf:network:([^:]+):([0-9]+):([a-z0-9+,-.:;_!$()*@~&]*)$";
const FQDN_PATTERN: &str =
    r"^([a-z0-9](?:[-a-z0-9]{0,61}[a-z0-9])?\.)*[a-z0-9](?:[-a-z0-9]{0,61}[a-z0-9])?[.]?$";

fn case_insensitive(pattern: &str) -> Regex {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .expect("static NSI pattern is valid")
}

static TOPOLOGY: Lazy<Regex> = Lazy::new(|| case_insensitive(TOPOLOGY_PATTERN));
static STP_ID: Lazy<Regex> = Lazy::new(|| case_insensitive(STP_ID_PATTERN));
static DESCRIPTION: Lazy<Regex> = Lazy::new(|| case_insensitive(DESCRIPTION_PATTERN));
static NURN: Lazy<Regex> = Lazy::new(|| case_insensitive(NURN_PATTERN));
static FQDN: Lazy<Regex> = Lazy::new(|| case_insensitive(FQDN_PATTERN));

fn field_error(field: &'static str, message: impl Into<String>) -> AllocationError {
    AllocationError::FieldValue {
        field,
        message: message.into(),
    }
}

fn check_pattern(
    field: &'static str,
    label: &str,
    regex: &Regex,
    pattern: &str,
    value: &str,
) -> Result<(), AllocationError> {
    if regex.is_match(value) {
        Ok(())
    } else {
        Err(field_error(field, format!("{label} must match: {pattern}")))
    }
}

/// Topology may only use `[-a-z0-9+,.;=_]`
pub fn validate_topology(topology: &str) -> Result<(), AllocationError> {
    check_pattern("topology", "Topology", &TOPOLOGY, TOPOLOGY_PATTERN, topology)
}

/// STP identifier may only use `[-a-z0-9+,.;=_:]`
pub fn validate_stp_id(stp_id: &str) -> Result<(), AllocationError> {
    check_pattern("stp_id", "STP identifier", &STP_ID, STP_ID_PATTERN, stp_id)
}

/// Description may not contain `<`, `>` or `&`
pub fn validate_description(description: &str) -> Result<(), AllocationError> {
    check_pattern(
        "stp_description",
        "STP description",
        &DESCRIPTION,
        DESCRIPTION_PATTERN,
        description,
    )
}

/// Hostname check with the 253 character limit applied up front
#[must_use]
pub fn is_fqdn(hostname: &str) -> bool {
    let bytes = hostname.as_bytes();
    if bytes.len() >= 255 || (bytes.len() >= 254 && bytes[253] != b'.') {
        return false;
    }
    FQDN.is_match(hostname)
}

fn days_in_month(year: u32, month: u32) -> u32 {
    match month {
        2 if (year % 4 == 0 && year % 100 != 0) || year % 400 == 0 => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// Checks a NURN date of the form `YYYY`, `YYYYMM` or `YYYYMMDD`
///
/// The input is already known to be all digits.
pub fn validate_nurn_date(date: &str) -> Result<(), String> {
    let number = |range: std::ops::Range<usize>| -> u32 {
        date.get(range)
            .and_then(|digits| digits.parse().ok())
            .unwrap_or_default()
    };
    match date.len() {
        4 => Ok(()),
        6 | 8 => {
            let month = number(4..6);
            if !(1..=12).contains(&month) {
                let digits = date.get(4..6).unwrap_or_default();
                return Err(format!("{digits} is not a valid month number"));
            }
            if date.len() == 8 {
                let day = number(6..8);
                if day == 0 || day > days_in_month(number(0..4), month) {
                    return Err(format!("`{date}` is not a valid date"));
                }
            }
            Ok(())
        }
        _ => Err(format!("date `{date}` has invalid length")),
    }
}

/// Parses `urn:ogf:network:<fqdn>:<date>:<opaque>` and checks its parts
pub fn validate_nurn(nurn: &str) -> Result<(), String> {
    let Some(captures) = NURN.captures(nurn) else {
        return Err("not a valid NSI STP identifier (urn:ogf:network:...)".to_string());
    };
    let hostname = captures.get(1).map_or("", |m| m.as_str());
    if !is_fqdn(hostname) {
        return Err(format!("{hostname} is not a valid fqdn"));
    }
    validate_nurn_date(captures.get(2).map_or("", |m| m.as_str()))
}

/// Inbound and outbound alias are both set or both blank; each set one is a NURN
pub fn validate_aliases(
    is_alias_in: Option<&str>,
    is_alias_out: Option<&str>,
) -> Result<(), AllocationError> {
    let is_alias_in = is_alias_in.filter(|alias| !alias.is_empty());
    let is_alias_out = is_alias_out.filter(|alias| !alias.is_empty());
    for (field, alias) in [("is_alias_in", is_alias_in), ("is_alias_out", is_alias_out)] {
        if let Some(alias) = alias {
            validate_nurn(alias).map_err(|message| field_error(field, message))?;
        }
    }
    if is_alias_in.is_some() != is_alias_out.is_some() {
        return Err(field_error(
            "is_alias_out",
            "NSI inbound and outbound isAlias should either both have a value or be empty",
        ));
    }
    Ok(())
}

/// Bandwidth in `1..=MAX_BANDWIDTH`
pub fn validate_bandwidth(bandwidth: u32) -> Result<(), AllocationError> {
    if (1..=MAX_BANDWIDTH).contains(&bandwidth) {
        Ok(())
    } else {
        Err(field_error(
            "bandwidth",
            format!("bandwidth must be between 1 and {MAX_BANDWIDTH}"),
        ))
    }
}

/// Every field rule of an STP submission, stopping at the first failure
pub fn validate_stp_fields(
    topology: &str,
    stp_id: &str,
    details: &StpDetails,
) -> Result<(), AllocationError> {
    validate_topology(topology)?;
    validate_stp_id(stp_id)?;
    if let Some(description) = &details.stp_description {
        validate_description(description)?;
    }
    validate_aliases(details.is_alias_in.as_deref(), details.is_alias_out.as_deref())?;
    if let Some(bandwidth) = details.bandwidth {
        validate_bandwidth(bandwidth)?;
    }
    Ok(())
}
