// Local-part derivation and collision handling.
//
// A single-token name keeps the whole token as its local-part; multi-token
// names take the first token's initial plus the full last token. When the
// bare address is taken, an increasing numeric suffix is appended to the
// local-part until the registry accepts the candidate. Processing order
// therefore decides who keeps the bare address — callers must walk the
// batch in input row order to keep output reproducible.

use tracing::debug;

use crate::email::registry::EmailRegistry;
use crate::errors::RosterError;
use crate::roster::normalize::normalize_name;

/// Domain suffix appended to every derived local-part unless configured
/// otherwise.
pub const DEFAULT_DOMAIN: &str = "@gmail.com";

/// Derive the local-part base from normalized name tokens.
pub fn local_part_base(tokens: &[String]) -> String {
    match tokens {
        [only] => only.clone(),
        _ => {
            let initial = tokens[0].chars().next().map(String::from).unwrap_or_default();
            let last = tokens
                .last()
                .map(String::as_str)
                .unwrap_or_default();
            format!("{initial}{last}")
        }
    }
}

/// Derive and claim a unique address for one display name.
///
/// The registry claim is the atomic check-and-insert; on success the
/// returned address is already reserved. Fails with `InvalidName` when the
/// name normalizes to nothing.
pub fn assign_email(
    raw_name: &str,
    domain: &str,
    registry: &mut EmailRegistry,
) -> Result<String, RosterError> {
    let tokens = normalize_name(raw_name)?;
    let base = local_part_base(&tokens);

    let mut candidate = format!("{base}{domain}");
    let mut counter = 1u32;
    while !registry.claim(&candidate) {
        candidate = format!("{base}{counter}{domain}");
        counter += 1;
    }

    debug!(name = raw_name, email = %candidate, "assigned address");
    Ok(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assign(name: &str, registry: &mut EmailRegistry) -> String {
        assign_email(name, DEFAULT_DOMAIN, registry).unwrap()
    }

    #[test]
    fn multi_token_name_takes_initial_plus_last() {
        let mut registry = EmailRegistry::new();
        assert_eq!(assign("John Smith", &mut registry), "jsmith@gmail.com");
    }

    #[test]
    fn middle_names_are_skipped() {
        let mut registry = EmailRegistry::new();
        assert_eq!(
            assign("Mary Jane Watson", &mut registry),
            "mwatson@gmail.com"
        );
    }

    #[test]
    fn single_token_name_keeps_whole_token() {
        let mut registry = EmailRegistry::new();
        assert_eq!(assign("Madonna", &mut registry), "madonna@gmail.com");
    }

    #[test]
    fn collisions_get_increasing_suffixes() {
        let mut registry = EmailRegistry::new();
        assert_eq!(assign("John Smith", &mut registry), "jsmith@gmail.com");
        assert_eq!(assign("John Smith", &mut registry), "jsmith1@gmail.com");
        assert_eq!(assign("John Smith", &mut registry), "jsmith2@gmail.com");
        assert_eq!(assign("Jane Smith", &mut registry), "jsmith3@gmail.com");
    }

    #[test]
    fn suffixed_address_already_taken_is_skipped() {
        let mut registry = EmailRegistry::new();
        registry.reserve("jsmith1@gmail.com").unwrap();
        assert_eq!(assign("John Smith", &mut registry), "jsmith@gmail.com");
        // jsmith1 is reserved, so the next collision jumps to jsmith2.
        assert_eq!(assign("Jon Smith", &mut registry), "jsmith2@gmail.com");
    }

    #[test]
    fn custom_domain_is_honored() {
        let mut registry = EmailRegistry::new();
        let email = assign_email("John Smith", "@school.edu", &mut registry).unwrap();
        assert_eq!(email, "jsmith@school.edu");
    }

    #[test]
    fn invalid_name_propagates() {
        let mut registry = EmailRegistry::new();
        let err = assign_email("  !!  ", DEFAULT_DOMAIN, &mut registry).unwrap_err();
        assert!(matches!(err, RosterError::InvalidName { .. }));
        assert!(registry.is_empty());
    }

    #[test]
    fn assignment_is_deterministic_per_order() {
        let names = ["Ann Bell", "Abe Bell", "Ann Bell"];
        let run = || {
            let mut registry = EmailRegistry::new();
            names
                .iter()
                .map(|n| assign(n, &mut registry))
                .collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
        assert_eq!(
            run(),
            vec!["abell@gmail.com", "abell1@gmail.com", "abell2@gmail.com"]
        );
    }
}
