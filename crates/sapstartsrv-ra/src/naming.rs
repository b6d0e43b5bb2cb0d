//! Parsing and validation of the composite SAP instance identifier.
//!
//! The identifier follows `SID_NAME##_VIRTHOST`, for example
//! `PRD_ASCS00_sapprdas`. It is usually the file name of the instance
//! profile.

use thiserror::Error;

/// Maximum length of a virtual host name.
const MAX_HOST_LENGTH: usize = 255;

/// System identifiers SAP reserves for its own use.
const RESERVED_SYSTEM_IDS: &[&str] = &[
    "ADD", "ALL", "AMD", "AND", "ANY", "ARE", "ASC", "AUX", "AVG", "BIT", "CDC", "COM", "CON",
    "DBA", "END", "EPS", "FOR", "GET", "GID", "IBM", "INT", "KEY", "LOG", "LPT", "MAP", "MAX",
    "MIN", "MON", "NIX", "NOT", "NUL", "OFF", "OLD", "OMS", "OUT", "PAD", "PRN", "RAW", "REF",
    "ROW", "SAP", "SET", "SGA", "SHG", "SID", "SQL", "SUM", "SYS", "TMP", "TOP", "TRC", "UID",
    "USE", "USR", "VAR",
];

/// Errors raised while parsing or validating an instance identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NamingError {
    /// The composite string does not have the `SID_NAME##_VIRTHOST` shape.
    #[error("InstanceName parsing error. It must follow SID_NAME00_VIRTHOST syntax")]
    Parse,
    /// The system identifier is malformed or reserved.
    #[error("Parsing instance profile name: {0} is not a valid system ID!")]
    InvalidSystemId(String),
    /// The instance name token is malformed.
    #[error("Parsing instance profile name: {0} is not a valid instance name!")]
    InvalidInstanceName(String),
    /// The instance number is not exactly two digits.
    #[error("Parsing instance profile name: {0} is not a valid instance number!")]
    InvalidInstanceNumber(String),
    /// The virtual host name violates hostname rules.
    #[error("Parsing instance profile name: {0} is not a valid virtual host name!")]
    InvalidVirtualHost(String),
}

/// Identity of one SAP instance, derived from its composite identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceIdentity {
    system_id: String,
    instance_name: String,
    instance_number: String,
    virtual_host: String,
}

impl InstanceIdentity {
    /// Splits `composite` into its fields.
    ///
    /// Only the shape is checked here; [`InstanceIdentity::validate`] applies
    /// the per-field grammar. The virtual host keeps any further underscores.
    ///
    /// # Errors
    ///
    /// Returns [`NamingError::Parse`] when the string lacks three non-empty
    /// segments or the middle segment does not end in exactly two digits.
    pub fn parse(composite: &str) -> Result<Self, NamingError> {
        let mut segments = composite.splitn(3, '_');
        let (Some(system_id), Some(instance_name), Some(virtual_host)) =
            (segments.next(), segments.next(), segments.next())
        else {
            return Err(NamingError::Parse);
        };
        if system_id.is_empty() || virtual_host.is_empty() {
            return Err(NamingError::Parse);
        }
        let Some((name, number)) = split_instance_token(instance_name) else {
            return Err(NamingError::Parse);
        };
        if name.is_empty() || name.ends_with(|c: char| c.is_ascii_digit()) {
            return Err(NamingError::Parse);
        }
        Ok(Self {
            system_id: system_id.to_owned(),
            instance_name: instance_name.to_owned(),
            instance_number: number.to_owned(),
            virtual_host: virtual_host.to_owned(),
        })
    }

    /// Assembles an identity from already separated fields without checking
    /// them.
    pub fn from_parts(
        system_id: impl Into<String>,
        instance_name: impl Into<String>,
        instance_number: impl Into<String>,
        virtual_host: impl Into<String>,
    ) -> Self {
        Self {
            system_id: system_id.into(),
            instance_name: instance_name.into(),
            instance_number: instance_number.into(),
            virtual_host: virtual_host.into(),
        }
    }

    /// Checks every field against its grammar.
    ///
    /// Fields are checked in the order system ID, instance name, instance
    /// number, virtual host and only the first failure is reported.
    ///
    /// # Errors
    ///
    /// Returns the [`NamingError`] variant naming the first invalid field.
    pub fn validate(&self) -> Result<(), NamingError> {
        if !is_valid_system_id(&self.system_id) {
            return Err(NamingError::InvalidSystemId(self.system_id.clone()));
        }
        if !is_valid_instance_name(&self.instance_name) {
            return Err(NamingError::InvalidInstanceName(
                self.instance_name.clone(),
            ));
        }
        if !is_valid_instance_number(&self.instance_number) {
            return Err(NamingError::InvalidInstanceNumber(
                self.instance_number.clone(),
            ));
        }
        if !is_valid_virtual_host(&self.virtual_host) {
            return Err(NamingError::InvalidVirtualHost(self.virtual_host.clone()));
        }
        Ok(())
    }

    /// Three character SAP system identifier, e.g. `PRD`.
    #[must_use]
    pub fn system_id(&self) -> &str {
        &self.system_id
    }

    /// Instance name including its number, e.g. `ASCS00`.
    #[must_use]
    pub fn instance_name(&self) -> &str {
        &self.instance_name
    }

    /// Two digit instance number, e.g. `00`.
    #[must_use]
    pub fn instance_number(&self) -> &str {
        &self.instance_number
    }

    /// Virtual host name the instance binds to.
    #[must_use]
    pub fn virtual_host(&self) -> &str {
        &self.virtual_host
    }

    /// Operating system account owning the instance, e.g. `prdadm`.
    #[must_use]
    pub fn sid_adm(&self) -> String {
        format!("{}adm", self.system_id.to_lowercase())
    }

    /// systemd unit managing `sapstartsrv`, e.g. `SAPPRD_00.service`.
    #[must_use]
    pub fn unit_name(&self) -> String {
        format!("SAP{}_{}.service", self.system_id, self.instance_number)
    }

    /// Short label used in log messages, e.g. `PRD_ASCS00`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{}_{}", self.system_id, self.instance_name)
    }
}

/// Splits `NAME##` into its name and two digit number.
fn split_instance_token(token: &str) -> Option<(&str, &str)> {
    let split = token.len().checked_sub(2)?;
    if !token.is_char_boundary(split) {
        return None;
    }
    let (name, number) = token.split_at(split);
    is_valid_instance_number(number).then_some((name, number))
}

fn is_valid_system_id(value: &str) -> bool {
    let mut chars = value.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    value.len() == 3
        && first.is_ascii_uppercase()
        && chars.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        && !RESERVED_SYSTEM_IDS.contains(&value)
}

fn is_valid_instance_name(value: &str) -> bool {
    let Some((name, _)) = split_instance_token(value) else {
        return false;
    };
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    first.is_ascii_alphabetic()
        && name.chars().all(|c| c.is_ascii_alphanumeric())
        && !name.ends_with(|c: char| c.is_ascii_digit())
}

fn is_valid_instance_number(value: &str) -> bool {
    value.len() == 2 && value.chars().all(|c| c.is_ascii_digit())
}

fn is_valid_virtual_host(value: &str) -> bool {
    let Some(first) = value.chars().next() else {
        return false;
    };
    value.len() <= MAX_HOST_LENGTH
        && first.is_ascii_alphabetic()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        && !value.ends_with(['.', '-'])
        && value.split('.').all(|label| !label.is_empty())
}
