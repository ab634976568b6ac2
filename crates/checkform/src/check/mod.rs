//! The check value tree.
//!
//! A [`Check`] is the single value object the wizard edits. Its variant-
//! independent fields live directly on the struct; everything that differs by
//! check type lives in [`CheckSettings`], a closed sum type with one case per
//! [`CheckType`]. Serialization is externally tagged, so field paths read
//! `settings.http.method`, `settings.multihttp.entries.0.request.url`, and so on.

mod defaults;
mod settings;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

pub use defaults::{default_check, default_settings};
pub use settings::{
    Assertion, AssertionCondition, AssertionKind, AssertionSubject, BrowserSettings,
    DnsProtocol, DnsRecordType, DnsSettings, GrpcSettings, HttpHeader, HttpMethod, HttpSettings,
    IpVersion, MultiHttpEntry, MultiHttpRequest, MultiHttpSettings, MultiHttpVariable,
    PingSettings, QueryField, ScriptedSettings, TcpQueryResponse, TcpSettings,
    TracerouteSettings, VariableKind,
};

// ============================================================================
// CheckType
// ============================================================================

/// The discriminator of the check sum type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckType {
    Http,
    Ping,
    Dns,
    Tcp,
    Traceroute,
    #[serde(rename = "multihttp")]
    MultiHttp,
    Scripted,
    Browser,
    Grpc,
}

impl CheckType {
    /// Every check type, in presentation order.
    pub const ALL: [CheckType; 9] = [
        CheckType::Http,
        CheckType::Ping,
        CheckType::Dns,
        CheckType::Tcp,
        CheckType::Traceroute,
        CheckType::MultiHttp,
        CheckType::Scripted,
        CheckType::Browser,
        CheckType::Grpc,
    ];

    /// The lowercase tag used in settings paths and serialized checks.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Ping => "ping",
            Self::Dns => "dns",
            Self::Tcp => "tcp",
            Self::Traceroute => "traceroute",
            Self::MultiHttp => "multihttp",
            Self::Scripted => "scripted",
            Self::Browser => "browser",
            Self::Grpc => "grpc",
        }
    }

    /// Human label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Http => "HTTP",
            Self::Ping => "Ping",
            Self::Dns => "DNS",
            Self::Tcp => "TCP",
            Self::Traceroute => "Traceroute",
            Self::MultiHttp => "MultiHTTP",
            Self::Scripted => "Scripted",
            Self::Browser => "Browser",
            Self::Grpc => "gRPC",
        }
    }

    /// The presentation group of this check type.
    pub fn group(self) -> CheckTypeGroup {
        match self {
            Self::Http | Self::Ping | Self::Dns | Self::Tcp | Self::Traceroute | Self::Grpc => {
                CheckTypeGroup::ApiEndpoint
            }
            Self::MultiHttp => CheckTypeGroup::MultiStep,
            Self::Scripted => CheckTypeGroup::Scripted,
            Self::Browser => CheckTypeGroup::Browser,
        }
    }

    /// Parse a tag, falling back to `fallback` when it is absent or unknown.
    ///
    /// Used only when creating a new check; switching variants is strict.
    pub fn from_tag_or(tag: Option<&str>, fallback: CheckType) -> CheckType {
        match tag.map(str::parse::<CheckType>) {
            Some(Ok(check_type)) => check_type,
            Some(Err(err)) => {
                tracing::debug!(target: checkform_core::logging::targets::VARIANT, %err, %fallback, "falling back to default check type");
                fallback
            }
            None => fallback,
        }
    }
}

impl fmt::Display for CheckType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for CheckType {
    type Err = Error;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        CheckType::ALL
            .into_iter()
            .find(|t| t.tag() == tag)
            .ok_or_else(|| Error::unknown_variant(tag))
    }
}

/// UI-level grouping of check types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CheckTypeGroup {
    ApiEndpoint,
    MultiStep,
    Scripted,
    Browser,
}

impl CheckTypeGroup {
    /// Human label.
    pub fn label(self) -> &'static str {
        match self {
            Self::ApiEndpoint => "API Endpoint",
            Self::MultiStep => "Multi Step",
            Self::Scripted => "Scripted",
            Self::Browser => "Browser",
        }
    }
}

// ============================================================================
// CheckSettings
// ============================================================================

/// Variant-specific settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckSettings {
    Http(HttpSettings),
    Ping(PingSettings),
    Dns(DnsSettings),
    Tcp(TcpSettings),
    Traceroute(TracerouteSettings),
    #[serde(rename = "multihttp")]
    MultiHttp(MultiHttpSettings),
    Scripted(ScriptedSettings),
    Browser(BrowserSettings),
    Grpc(GrpcSettings),
}

impl CheckSettings {
    /// The discriminator of these settings.
    pub fn check_type(&self) -> CheckType {
        match self {
            Self::Http(_) => CheckType::Http,
            Self::Ping(_) => CheckType::Ping,
            Self::Dns(_) => CheckType::Dns,
            Self::Tcp(_) => CheckType::Tcp,
            Self::Traceroute(_) => CheckType::Traceroute,
            Self::MultiHttp(_) => CheckType::MultiHttp,
            Self::Scripted(_) => CheckType::Scripted,
            Self::Browser(_) => CheckType::Browser,
            Self::Grpc(_) => CheckType::Grpc,
        }
    }
}

// ============================================================================
// Check
// ============================================================================

/// A label row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub name: String,
    pub value: String,
}

impl Label {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// How eagerly the legacy alerting rules fire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSensitivity {
    #[default]
    None,
    Low,
    Medium,
    High,
}

/// A per-check alert row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckAlert {
    pub name: String,
    pub threshold: f64,
    /// Evaluation period in minutes.
    pub period: Option<u32>,
}

/// The value object edited by the wizard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Check {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub job: String,
    pub target: String,
    pub enabled: bool,
    /// Milliseconds between runs.
    pub frequency: u64,
    /// Milliseconds before a run is abandoned.
    pub timeout: u64,
    pub probes: Vec<u64>,
    pub labels: Vec<Label>,
    pub alert_sensitivity: AlertSensitivity,
    #[serde(default)]
    pub alerts: Vec<CheckAlert>,
    pub settings: CheckSettings,
}

impl Check {
    /// The variant tag of this check.
    pub fn check_type(&self) -> CheckType {
        self.settings.check_type()
    }

    /// Carry the variant-independent fields of `previous` over this check.
    ///
    /// Only fields the user already filled in are carried: a non-empty job,
    /// target, probe list or label list. Frequency and timeout carry only
    /// when they were moved off the previous variant's default, since each
    /// variant has its own timing bounds.
    pub fn with_common_fields_from(mut self, previous: &Check) -> Self {
        let untouched = default_check(previous.check_type());
        if !previous.job.is_empty() {
            self.job = previous.job.clone();
        }
        if !previous.target.is_empty() {
            self.target = previous.target.clone();
        }
        if !previous.probes.is_empty() {
            self.probes = previous.probes.clone();
        }
        if previous.frequency > 0 && previous.frequency != untouched.frequency {
            self.frequency = previous.frequency;
        }
        if !previous.labels.is_empty() {
            self.labels = previous.labels.clone();
        }
        if previous.timeout > 0 && previous.timeout != untouched.timeout {
            self.timeout = previous.timeout;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_type_round_trips_tags() {
        for check_type in CheckType::ALL {
            assert_eq!(check_type.tag().parse::<CheckType>().unwrap(), check_type);
        }
        assert!(matches!(
            "smtp".parse::<CheckType>(),
            Err(Error::UnknownVariant { tag }) if tag == "smtp"
        ));
    }

    #[test]
    fn test_from_tag_or_falls_back() {
        assert_eq!(CheckType::from_tag_or(Some("dns"), CheckType::Http), CheckType::Dns);
        assert_eq!(CheckType::from_tag_or(Some("nope"), CheckType::Http), CheckType::Http);
        assert_eq!(CheckType::from_tag_or(None, CheckType::Ping), CheckType::Ping);
    }

    #[test]
    fn test_groups() {
        assert_eq!(CheckType::Grpc.group(), CheckTypeGroup::ApiEndpoint);
        assert_eq!(CheckType::MultiHttp.group(), CheckTypeGroup::MultiStep);
        assert_eq!(CheckType::Browser.group(), CheckTypeGroup::Browser);
    }

    #[test]
    fn test_settings_serialize_externally_tagged() {
        let check = default_check(CheckType::MultiHttp);
        let value = serde_json::to_value(&check).unwrap();
        assert!(value["settings"]["multihttp"]["entries"].is_array());
        assert!(value.get("alertSensitivity").is_some());
    }

    #[test]
    fn test_common_fields_carry_only_when_filled() {
        let mut previous = default_check(CheckType::Http);
        previous.job = "homepage".into();
        previous.probes = vec![3, 4];
        previous.frequency = 0;

        let next = default_check(CheckType::Dns).with_common_fields_from(&previous);
        assert_eq!(next.job, "homepage");
        assert_eq!(next.probes, vec![3, 4]);
        assert_eq!(next.frequency, default_check(CheckType::Dns).frequency);
        assert_eq!(next.check_type(), CheckType::Dns);
    }

    #[test]
    fn test_default_timing_stays_with_its_variant() {
        let blank = default_check(CheckType::Http);
        let traceroute = default_check(CheckType::Traceroute);
        let next = traceroute.clone().with_common_fields_from(&blank);
        assert_eq!(next.frequency, traceroute.frequency);
        assert_eq!(next.timeout, traceroute.timeout);

        let mut edited = default_check(CheckType::Http);
        edited.frequency = 300_000;
        edited.timeout = 5_000;
        let next = traceroute.with_common_fields_from(&edited);
        assert_eq!(next.frequency, 300_000);
        assert_eq!(next.timeout, 5_000);
    }
}
