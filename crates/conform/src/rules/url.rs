use crate::context::ValidationContext;
use crate::error::{RuleError, ValidationFault};
use crate::traits::{Validator, Verdict};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::sync::OnceLock;
use url::{Host, Url};

fn data_url_regex() -> &'static Regex {
    static DATA_URL_REGEX: OnceLock<Regex> = OnceLock::new();
    DATA_URL_REGEX.get_or_init(|| {
        Regex::new(
            r"(?i)^data:(?:[a-z]+/[a-z0-9+.-]+(?:;[a-z0-9!#$%*+.{}|~`-]+=[a-z0-9!#$%*+.{}|~`-]+)*)?(?:;base64)?,[a-z0-9!$&',()*+;=._~:@/?%<>-]*$",
        )
        .unwrap()
    })
}

/// Accepted URL schemes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Schemes {
    /// Exact scheme names, compared case-insensitively
    List(Vec<String>),
    /// Regular expression the whole scheme must match
    Pattern(String),
}

impl Default for Schemes {
    fn default() -> Self {
        Schemes::List(vec!["http".to_string(), "https".to_string()])
    }
}

impl Schemes {
    fn accepts(&self, scheme: &str) -> Result<bool, ValidationFault> {
        match self {
            Schemes::List(names) => Ok(names.iter().any(|name| name.eq_ignore_ascii_case(scheme))),
            Schemes::Pattern(pattern) => {
                let regex = Regex::new(&format!("(?i)^(?:{pattern})$")).map_err(|source| {
                    ValidationFault::InvalidPattern {
                        pattern: pattern.clone(),
                        source,
                    }
                })?;
                Ok(regex.is_match(scheme))
            }
        }
    }
}

/// Options for `url`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UrlOptions {
    #[serde(default)]
    pub schemes: Schemes,
    /// Accept localhost, dotless hostnames and private, loopback or
    /// link-local addresses
    #[serde(default)]
    pub allow_local: bool,
    /// Accept `data:` URLs
    #[serde(default)]
    pub allow_data_url: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

fn is_local_v4(ip: &Ipv4Addr) -> bool {
    ip.is_private() || ip.is_loopback() || ip.is_link_local() || ip.is_unspecified()
}

fn is_local_v6(ip: &Ipv6Addr) -> bool {
    let first = ip.segments()[0];
    ip.is_loopback()
        || ip.is_unspecified()
        || (first & 0xfe00) == 0xfc00
        || (first & 0xffc0) == 0xfe80
}

/// Whether the public-internet rules hold for the host.
fn host_is_acceptable(host: Host<&str>, allow_local: bool) -> bool {
    match host {
        Host::Ipv4(ip) => allow_local || !is_local_v4(&ip),
        Host::Ipv6(ip) => allow_local || !is_local_v6(&ip),
        Host::Domain(domain) => {
            let domain = domain.trim_end_matches('.');
            if domain.eq_ignore_ascii_case("localhost") {
                return allow_local;
            }
            match domain.rsplit_once('.') {
                Some((_, tld)) => {
                    tld.starts_with("xn--")
                        || (tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic()))
                }
                None => allow_local,
            }
        }
    }
}

/// Checks that a string is an absolute URL with an accepted scheme.
#[derive(Debug, Clone, Copy, Default)]
pub struct UrlValidator;

impl UrlValidator {
    fn check(value: &str, options: &UrlOptions) -> Result<bool, ValidationFault> {
        if value.is_empty() || value.chars().any(char::is_whitespace) {
            return Ok(false);
        }

        if options.allow_data_url && data_url_regex().is_match(value) {
            return Ok(true);
        }

        let Ok(url) = Url::parse(value) else {
            return Ok(false);
        };
        if !options.schemes.accepts(url.scheme())? {
            return Ok(false);
        }

        Ok(url
            .host()
            .is_some_and(|host| host_is_acceptable(host, options.allow_local)))
    }
}

impl Validator for UrlValidator {
    fn validate(
        &self,
        value: &Value,
        spec: &Value,
        _ctx: &ValidationContext<'_>,
    ) -> Result<Verdict, ValidationFault> {
        let options: UrlOptions = super::options_from_spec("url", spec)?;

        let valid = match value.as_str() {
            Some(s) => Self::check(s, &options)?,
            None => false,
        };

        if valid {
            Ok(Verdict::Valid)
        } else {
            let message = super::pick(&[&options.message], "is not a valid url");
            Ok(RuleError::new("url", message).into())
        }
    }
}
