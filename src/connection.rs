use std::fmt;
use std::path::{Path, PathBuf};

use eventstore::ClientSettings;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};

use crate::errors::ConfigurationError;

// ============================================================================
// Connection Builder
// ============================================================================
//
// Connection strings name their TLS material relative to a certificate
// folder given on the command line. Before the client sees the string,
// every certificate parameter is rewritten to a path under that folder.
//
// ============================================================================

/// Query parameters that must be present and are resolved against the cert folder
pub const CERTIFICATE_PARAMETERS: [&str; 3] = ["userCertFile", "userKeyFile", "tlsCaFile"];

/// Characters escaped in rewritten parameter values. Path separators and
/// drive colons stay literal so the client sees a plain filesystem path.
const QUERY_VALUE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'&')
    .add(b'+')
    .add(b'<')
    .add(b'=')
    .add(b'>');

#[derive(Debug, Clone, PartialEq)]
struct QueryParameter {
    key: String,
    value: String,
    /// Segment as written in the input, re-emitted untouched unless rewritten
    raw: String,
}

/// A parsed connection string: everything before `?`, the query, and an optional fragment
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionDescriptor {
    base: String,
    parameters: Vec<QueryParameter>,
    fragment: Option<String>,
}

fn decode_component(component: &str) -> String {
    let spaced = component.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}

impl ConnectionDescriptor {
    pub fn parse(descriptor: &str) -> Result<Self, ConfigurationError> {
        let (scheme, _) = descriptor.split_once("://").ok_or_else(|| {
            ConfigurationError::InvalidDescriptor(format!("missing scheme in {descriptor:?}"))
        })?;
        let scheme_ok = scheme
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic())
            && scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
        if !scheme_ok {
            return Err(ConfigurationError::InvalidDescriptor(format!(
                "invalid scheme {scheme:?}"
            )));
        }

        let (rest, fragment) = match descriptor.split_once('#') {
            Some((rest, fragment)) => (rest, Some(fragment.to_string())),
            None => (descriptor, None),
        };
        let (base, query) = rest.split_once('?').unwrap_or((rest, ""));

        let parameters = query
            .split('&')
            .filter(|segment| !segment.is_empty())
            .map(|segment| {
                let (key, value) = segment.split_once('=').unwrap_or((segment, ""));
                QueryParameter {
                    key: decode_component(key),
                    value: decode_component(value),
                    raw: segment.to_string(),
                }
            })
            .collect();

        Ok(Self {
            base: base.to_string(),
            parameters,
            fragment,
        })
    }

    /// First value of `key`, decoded
    pub fn get(&self, key: &str) -> Option<&str> {
        self.parameters
            .iter()
            .find(|p| p.key == key)
            .map(|p| p.value.as_str())
    }

    /// Rewrite every certificate parameter to a path under `cert_folder`
    pub fn resolve_certificates(mut self, cert_folder: &Path) -> Result<Self, ConfigurationError> {
        for name in CERTIFICATE_PARAMETERS {
            let position = self
                .parameters
                .iter()
                .position(|p| p.key == name)
                .ok_or(ConfigurationError::MissingParameter(name))?;

            let relative = self.parameters[position].value.trim_start_matches(['/', '\\']);
            if relative.is_empty() {
                return Err(ConfigurationError::EmptyParameter(name));
            }
            let resolved = cert_folder.join(relative).to_string_lossy().into_owned();

            let encoded = utf8_percent_encode(&resolved, QUERY_VALUE).to_string();
            self.parameters[position] = QueryParameter {
                key: name.to_string(),
                raw: format!("{name}={encoded}"),
                value: resolved,
            };

            let mut seen = false;
            self.parameters.retain(|p| {
                if p.key != name {
                    return true;
                }
                let keep = !seen;
                seen = true;
                keep
            });
        }

        Ok(self)
    }

    /// Certificate paths, in `CERTIFICATE_PARAMETERS` order
    pub fn certificate_paths(&self) -> Result<Vec<(&'static str, PathBuf)>, ConfigurationError> {
        CERTIFICATE_PARAMETERS
            .iter()
            .map(|&name| {
                self.get(name)
                    .map(|value| (name, PathBuf::from(value)))
                    .ok_or(ConfigurationError::MissingParameter(name))
            })
            .collect()
    }
}

impl fmt::Display for ConnectionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.base)?;
        for (i, parameter) in self.parameters.iter().enumerate() {
            f.write_str(if i == 0 { "?" } else { "&" })?;
            f.write_str(&parameter.raw)?;
        }
        if let Some(fragment) = &self.fragment {
            write!(f, "#{fragment}")?;
        }
        Ok(())
    }
}

/// Validate `descriptor` and resolve its certificate parameters against `cert_folder`
pub fn resolve_connection_string(
    descriptor: &str,
    cert_folder: &Path,
) -> Result<String, ConfigurationError> {
    let resolved = ConnectionDescriptor::parse(descriptor)?.resolve_certificates(cert_folder)?;
    Ok(resolved.to_string())
}

/// Every certificate parameter must name an existing file
pub fn check_certificate_files(descriptor: &str) -> Result<(), ConfigurationError> {
    for (parameter, path) in ConnectionDescriptor::parse(descriptor)?.certificate_paths()? {
        if !path.is_file() {
            return Err(ConfigurationError::CertificateNotFound { parameter, path });
        }
        tracing::debug!(parameter, path = %path.display(), "Certificate file found");
    }
    Ok(())
}

/// Parse a resolved connection string into client settings
pub fn build_client_settings(descriptor: &str) -> Result<ClientSettings, ConfigurationError> {
    descriptor
        .parse::<ClientSettings>()
        .map_err(|e| ConfigurationError::InvalidSettings(e.to_string()))
}
