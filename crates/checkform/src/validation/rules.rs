//! Field rules shared by the standard schemas.

use std::collections::HashSet;
use std::net::IpAddr;
use std::sync::LazyLock;

use regex::Regex;

use super::{FeatureFlags, ValidationContext, ValidationOutcome};
use crate::check::{Check, CheckAlert, Label};
use crate::path::FieldPath;

const MAX_JOB_LENGTH: usize = 128;
const MAX_LABEL_VALUE_LENGTH: usize = 128;
const MIN_TIMEOUT_MS: u64 = 1_000;

static LABEL_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_]*$").expect("label name pattern compiles"));

fn is_label_name(name: &str) -> bool {
    LABEL_NAME_RE.is_match(name)
}

/// One DNS label: 1..=63 alphanumerics or hyphens, not starting or ending with a hyphen.
fn is_dns_label(label: &str) -> bool {
    (1..=63).contains(&label.len())
        && label.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
        && !label.starts_with('-')
        && !label.ends_with('-')
}

fn is_hostname(value: &str) -> bool {
    let value = value.strip_suffix('.').unwrap_or(value);
    !value.is_empty() && value.len() <= 253 && value.split('.').all(is_dns_label)
}

/// Frequency and timeout bounds of one variant, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Timing {
    pub min_frequency: u64,
    pub max_frequency: u64,
    pub max_timeout: u64,
}

pub(crate) fn root() -> FieldPath {
    FieldPath::root()
}

pub(crate) fn is_hostname_or_ip(value: &str) -> bool {
    value.parse::<IpAddr>().is_ok() || is_hostname(value)
}

/// `host:port`, with IPv6 hosts in brackets.
pub(crate) fn is_host_port(value: &str) -> bool {
    let Some((host, port)) = value.rsplit_once(':') else {
        return false;
    };
    let port_ok = port.parse::<u16>().is_ok_and(|p| p > 0);
    let host = host
        .strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(host);
    port_ok && !host.is_empty() && is_hostname_or_ip(host)
}

pub(crate) fn is_http_url(value: &str) -> bool {
    url::Url::parse(value).is_ok_and(|url| {
        matches!(url.scheme(), "http" | "https") && url.host_str().is_some_and(|h| !h.is_empty())
    })
}

pub(crate) fn job(check: &Check, outcome: &mut ValidationOutcome) {
    let job = check.job.trim();
    if job.is_empty() {
        outcome.add(root().key("job"), "Job name is required");
    } else if job.chars().count() > MAX_JOB_LENGTH {
        outcome.add(
            root().key("job"),
            format!("Job name must be {MAX_JOB_LENGTH} characters or less"),
        );
    }
}

pub(crate) fn target_required(check: &Check, outcome: &mut ValidationOutcome) -> bool {
    if check.target.trim().is_empty() {
        outcome.add(root().key("target"), "Target is required");
        false
    } else {
        true
    }
}

pub(crate) fn probes(check: &Check, context: &ValidationContext, outcome: &mut ValidationOutcome) {
    if check.probes.is_empty() {
        outcome.add(root().key("probes"), "At least one probe is required");
        return;
    }
    if context.probes.is_empty() {
        return;
    }
    let known: HashSet<u64> = context.probes.iter().map(|p| p.id).collect();
    for (i, id) in check.probes.iter().enumerate() {
        if !known.contains(id) {
            outcome.add(root().key("probes").index(i), format!("Unknown probe {id}"));
        }
    }
}

pub(crate) fn timing(check: &Check, timing: Timing, outcome: &mut ValidationOutcome) {
    if check.frequency < timing.min_frequency || check.frequency > timing.max_frequency {
        outcome.add(
            root().key("frequency"),
            format!(
                "Frequency must be between {}s and {}s",
                timing.min_frequency / 1000,
                timing.max_frequency / 1000
            ),
        );
    }

    let max_timeout = timing.max_timeout.min(check.frequency.max(MIN_TIMEOUT_MS));
    if check.timeout < MIN_TIMEOUT_MS || check.timeout > max_timeout {
        outcome.add(
            root().key("timeout"),
            format!(
                "Timeout must be between {}s and {}s",
                MIN_TIMEOUT_MS / 1000,
                max_timeout / 1000
            ),
        );
    }
}

pub(crate) fn labels(labels: &[Label], context: &ValidationContext, outcome: &mut ValidationOutcome) {
    let path = root().key("labels");
    let limit = context.limits.max_labels_per_check;
    if labels.len() > limit {
        outcome.add(path.clone(), format!("A check may have at most {limit} labels"));
    }

    let mut seen = HashSet::new();
    for (i, label) in labels.iter().enumerate() {
        let row = path.index(i);
        if !is_label_name(&label.name) {
            outcome.add(
                row.key("name"),
                "Label names must start with a letter or underscore and contain only letters, digits and underscores",
            );
        } else if !seen.insert(label.name.as_str()) {
            outcome.add(row.key("name"), "Label names must be unique");
        }

        if label.value.trim().is_empty() {
            outcome.add(row.key("value"), "Label value is required");
        } else if label.value.chars().count() > MAX_LABEL_VALUE_LENGTH {
            outcome.add(
                row.key("value"),
                format!("Label value must be {MAX_LABEL_VALUE_LENGTH} characters or less"),
            );
        }
    }
}

pub(crate) fn alerts(alerts: &[CheckAlert], flags: &FeatureFlags, outcome: &mut ValidationOutcome) {
    if !flags.is_enabled(FeatureFlags::ALERTS_PER_CHECK) {
        return;
    }
    let path = root().key("alerts");
    for (i, alert) in alerts.iter().enumerate() {
        if alert.name.trim().is_empty() {
            outcome.add(path.index(i).key("name"), "Alert name is required");
        }
        if alert.threshold.is_nan() || alert.threshold <= 0.0 {
            outcome.add(path.index(i).key("threshold"), "Threshold must be greater than 0");
        }
        if alert.period == Some(0) {
            outcome.add(path.index(i).key("period"), "Period must be at least one minute");
        }
    }
}

pub(crate) fn regex_list(patterns: &[String], path: &FieldPath, outcome: &mut ValidationOutcome) {
    for (i, pattern) in patterns.iter().enumerate() {
        if pattern.is_empty() {
            outcome.add(path.index(i), "Expression is required");
        } else if let Err(err) = Regex::new(pattern) {
            outcome.add(path.index(i), format!("Invalid regular expression: {err}"));
        }
    }
}

pub(crate) fn script(script: &str, path: FieldPath, outcome: &mut ValidationOutcome) {
    if script.trim().is_empty() {
        outcome.add(path, "Script is required");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hostnames() {
        assert!(is_hostname_or_ip("grafana.com"));
        assert!(is_hostname_or_ip("10.0.0.1"));
        assert!(is_hostname_or_ip("::1"));
        assert!(!is_hostname_or_ip("-bad.example"));
        assert!(!is_hostname_or_ip("has space.com"));
    }

    #[test]
    fn test_label_names() {
        assert!(is_label_name("env"));
        assert!(is_label_name("_team_2"));
        assert!(!is_label_name("2team"));
        assert!(!is_label_name("team-name"));
        assert!(!is_label_name(""));
        assert!(!is_label_name("région"));
    }

    #[test]
    fn test_host_port() {
        assert!(is_host_port("grafana.com:443"));
        assert!(is_host_port("[::1]:8080"));
        assert!(!is_host_port("grafana.com"));
        assert!(!is_host_port("grafana.com:0"));
        assert!(!is_host_port(":80"));
    }

    #[test]
    fn test_http_urls() {
        assert!(is_http_url("https://grafana.com/path?q=1"));
        assert!(!is_http_url("ftp://grafana.com"));
        assert!(!is_http_url("grafana.com"));
    }
}
