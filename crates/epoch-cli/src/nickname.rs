//! Named shortcuts for common activity codes.

use anyhow::{Result, bail};
use epoch_core::{Tlp, TlpKey};

use crate::cli::TlpFields;

/// Built-in nicknames and the codes they stand for.
pub const NICKNAMES: [(&str, i64); 3] = [("day", 0), ("break", -1), ("lunch", -2)];

/// Looks up a nickname, ignoring case.
pub fn lookup(name: &str) -> Option<i64> {
    NICKNAMES
        .iter()
        .find(|(nickname, _)| nickname.eq_ignore_ascii_case(name))
        .map(|&(_, code)| code)
}

/// Returns the nickname of a code, if it has one.
pub fn name_of(tlp_code: i64) -> Option<&'static str> {
    NICKNAMES
        .iter()
        .find(|&&(_, code)| code == tlp_code)
        .map(|&(name, _)| name)
}

/// Resolves a literal code number or a nickname to a code number.
pub fn resolve_code(input: &str) -> Result<i64> {
    let input = input.trim();
    if let Some(code) = lookup(input) {
        return Ok(code);
    }
    match input.parse::<i64>() {
        Ok(code) => Ok(code),
        Err(_) => bail!(
            "unknown activity code {input:?}: use a number or one of {}",
            NICKNAMES.map(|(name, _)| name).join(", ")
        ),
    }
}

/// Builds the identity of an activity code from user input.
pub fn resolve_key(input: &str, fields: &TlpFields) -> Result<TlpKey> {
    Ok(TlpKey {
        tlp_code: resolve_code(input)?,
        customer: fields.customer,
        product: fields.product,
        code: fields.code,
        slg: fields.slg,
        dlg: fields.dlg,
        prj: fields.prj,
    })
}

/// Builds an activity code from user input.
///
/// Without an explicit description, nicknamed codes are described by their
/// nickname and other codes get an empty description.
pub fn resolve_tlp(input: &str, fields: &TlpFields) -> Result<Tlp> {
    let key = resolve_key(input, fields)?;
    let description = fields
        .description
        .clone()
        .or_else(|| name_of(key.tlp_code).map(str::to_owned))
        .unwrap_or_default();
    Ok(Tlp::from_key(key, description))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nicknames_resolve_to_codes() {
        assert_eq!(resolve_code("day").unwrap(), 0);
        assert_eq!(resolve_code("break").unwrap(), -1);
        assert_eq!(resolve_code("Lunch").unwrap(), -2);
    }

    #[test]
    fn test_integers_are_literal_codes() {
        assert_eq!(resolve_code("42").unwrap(), 42);
        assert_eq!(resolve_code("-7").unwrap(), -7);
    }

    #[test]
    fn test_unknown_code_is_rejected() {
        let err = resolve_code("meeting").unwrap_err();
        assert!(err.to_string().contains("\"meeting\""));
    }

    #[test]
    fn test_nickname_becomes_default_description() {
        let tlp = resolve_tlp("lunch", &TlpFields::default()).unwrap();
        assert_eq!(tlp.tlp_code(), -2);
        assert_eq!(tlp.description(), "lunch");

        let tlp = resolve_tlp("12", &TlpFields::default()).unwrap();
        assert_eq!(tlp.description(), "");
    }

    #[test]
    fn test_fields_become_identity() {
        let fields = TlpFields {
            description: Some("client work".to_string()),
            customer: Some(5),
            slg: Some(0),
            ..TlpFields::default()
        };
        let tlp = resolve_tlp("3", &fields).unwrap();
        assert_eq!(*tlp.key(), TlpKey::new(3).with_customer(5).with_slg(0));
        assert_eq!(tlp.description(), "client work");
    }
}
