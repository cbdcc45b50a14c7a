//! Activity codes (TLPs) and their identity.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::error::IncompatibleCodes;

/// Separator placed between descriptions when codes are combined.
const DESCRIPTION_SEPARATOR: &str = "; ";

/// The classification fields that identify an activity code.
///
/// Optional fields distinguish "not set" (`None`) from any set value, so a
/// code with `customer: Some(0)` is a different code than one without a
/// customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TlpKey {
    pub tlp_code: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slg: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dlg: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prj: Option<i64>,
}

impl TlpKey {
    /// Creates a key with only the TLP code set.
    pub const fn new(tlp_code: i64) -> Self {
        Self {
            tlp_code,
            customer: None,
            product: None,
            code: None,
            slg: None,
            dlg: None,
            prj: None,
        }
    }

    #[must_use]
    pub const fn with_customer(mut self, customer: i64) -> Self {
        self.customer = Some(customer);
        self
    }

    #[must_use]
    pub const fn with_product(mut self, product: i64) -> Self {
        self.product = Some(product);
        self
    }

    #[must_use]
    pub const fn with_code(mut self, code: i64) -> Self {
        self.code = Some(code);
        self
    }

    #[must_use]
    pub const fn with_slg(mut self, slg: i64) -> Self {
        self.slg = Some(slg);
        self
    }

    #[must_use]
    pub const fn with_dlg(mut self, dlg: i64) -> Self {
        self.dlg = Some(dlg);
        self
    }

    #[must_use]
    pub const fn with_prj(mut self, prj: i64) -> Self {
        self.prj = Some(prj);
        self
    }

    /// The optional fields that are set, in declaration order.
    pub fn set_fields(&self) -> impl Iterator<Item = (&'static str, i64)> {
        [
            ("customer", self.customer),
            ("product", self.product),
            ("code", self.code),
            ("slg", self.slg),
            ("dlg", self.dlg),
            ("prj", self.prj),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.map(|v| (name, v)))
    }
}

/// Formats as the TLP code followed by each set field, e.g. `3 customer=5 prj=12`.
impl fmt::Display for TlpKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tlp_code)?;
        for (name, value) in self.set_fields() {
            write!(f, " {name}={value}")?;
        }
        Ok(())
    }
}

/// An activity code: identity fields plus a free-text description.
///
/// Equality and hashing use only the [`TlpKey`]; the description is ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tlp {
    #[serde(flatten)]
    key: TlpKey,
    description: String,
}

impl Tlp {
    /// Creates a code with no optional fields set.
    pub fn new(tlp_code: i64, description: impl Into<String>) -> Self {
        Self::from_key(TlpKey::new(tlp_code), description)
    }

    pub fn from_key(key: TlpKey, description: impl Into<String>) -> Self {
        Self {
            key,
            description: description.into(),
        }
    }

    pub const fn key(&self) -> &TlpKey {
        &self.key
    }

    pub const fn tlp_code(&self) -> i64 {
        self.key.tlp_code
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Combines two codes with the same identity, joining their descriptions.
    pub fn combine(&self, other: &Self) -> Result<Self, IncompatibleCodes> {
        if self.key != other.key {
            return Err(IncompatibleCodes {
                left: self.key,
                right: other.key,
            });
        }
        Ok(Self {
            key: self.key,
            description: format!(
                "{}{DESCRIPTION_SEPARATOR}{}",
                self.description, other.description
            ),
        })
    }
}

impl PartialEq for Tlp {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Tlp {}

impl Hash for Tlp {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}
