//! The standard per-variant schemas.

use std::collections::HashSet;

use super::rules::{self, Timing, root};
use super::{CheckSchema, ValidationContext, ValidationOutcome};
use crate::check::{
    Check, CheckSettings, CheckType, DnsSettings, HttpSettings, MultiHttpSettings,
    TracerouteSettings,
};
use crate::path::FieldPath;

const API_TIMING: Timing = Timing {
    min_frequency: 10_000,
    max_frequency: 3_600_000,
    max_timeout: 60_000,
};

const TRACEROUTE_TIMING: Timing = Timing {
    min_frequency: 120_000,
    max_frequency: 3_600_000,
    max_timeout: 30_000,
};

const K6_TIMING: Timing = Timing {
    min_frequency: 60_000,
    max_frequency: 3_600_000,
    max_timeout: 180_000,
};

/// The built-in schema of one check type.
///
/// Common rules run for every variant; the settings rules are chosen by the
/// settings case actually present, so a check whose settings disagree with
/// `check_type` reports a root error on `settings`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StandardSchema {
    check_type: CheckType,
}

impl StandardSchema {
    pub fn new(check_type: CheckType) -> Self {
        Self { check_type }
    }

    pub fn check_type(&self) -> CheckType {
        self.check_type
    }

    fn timing(&self) -> Timing {
        match self.check_type {
            CheckType::Traceroute => TRACEROUTE_TIMING,
            CheckType::MultiHttp | CheckType::Scripted | CheckType::Browser => K6_TIMING,
            _ => API_TIMING,
        }
    }
}

impl CheckSchema for StandardSchema {
    fn validate(&self, check: &Check, context: &ValidationContext) -> ValidationOutcome {
        let mut outcome = ValidationOutcome::valid();

        rules::job(check, &mut outcome);
        rules::probes(check, context, &mut outcome);
        rules::timing(check, self.timing(), &mut outcome);
        rules::labels(&check.labels, context, &mut outcome);
        rules::alerts(&check.alerts, &context.flags, &mut outcome);

        if check.check_type() != self.check_type {
            outcome.add(
                root().key("settings"),
                format!("Settings must be {} settings", self.check_type.label()),
            );
            return outcome;
        }

        let settings = root().key("settings").key(self.check_type.tag());
        match &check.settings {
            CheckSettings::Http(http) => {
                if rules::target_required(check, &mut outcome) && !rules::is_http_url(&check.target) {
                    outcome.add(root().key("target"), "Target must be a valid http(s) URL");
                }
                validate_http(http, &settings, &mut outcome);
            }
            CheckSettings::Ping(_) => host_target(check, &mut outcome),
            CheckSettings::Traceroute(traceroute) => {
                host_target(check, &mut outcome);
                validate_traceroute(traceroute, &settings, &mut outcome);
            }
            CheckSettings::Dns(dns) => {
                host_target(check, &mut outcome);
                validate_dns(dns, &settings, &mut outcome);
            }
            CheckSettings::Tcp(_) | CheckSettings::Grpc(_) => {
                if rules::target_required(check, &mut outcome) && !rules::is_host_port(&check.target) {
                    outcome.add(root().key("target"), "Target must be in the form host:port");
                }
            }
            CheckSettings::MultiHttp(multihttp) => {
                rules::target_required(check, &mut outcome);
                validate_multihttp(multihttp, context, &settings, &mut outcome);
            }
            CheckSettings::Scripted(scripted) => {
                rules::target_required(check, &mut outcome);
                rules::script(&scripted.script, settings.key("script"), &mut outcome);
            }
            CheckSettings::Browser(browser) => {
                rules::target_required(check, &mut outcome);
                rules::script(&browser.script, settings.key("script"), &mut outcome);
            }
        }

        outcome
    }
}

fn host_target(check: &Check, outcome: &mut ValidationOutcome) {
    if rules::target_required(check, outcome) && !rules::is_hostname_or_ip(check.target.trim()) {
        outcome.add(root().key("target"), "Target must be a valid hostname or IP address");
    }
}

fn validate_http(http: &HttpSettings, path: &FieldPath, outcome: &mut ValidationOutcome) {
    for (i, header) in http.headers.iter().enumerate() {
        let valid = header
            .split_once(':')
            .is_some_and(|(name, _)| !name.trim().is_empty() && !name.contains(' '));
        if !valid {
            outcome.add(path.key("headers").index(i), "Headers must be in the form Name: value");
        }
    }

    for (i, code) in http.valid_status_codes.iter().enumerate() {
        if !(100..=599).contains(code) {
            outcome.add(
                path.key("validStatusCodes").index(i),
                "Status codes must be between 100 and 599",
            );
        }
    }

    rules::regex_list(
        &http.fail_if_body_matches_regexp,
        &path.key("failIfBodyMatchesRegexp"),
        outcome,
    );
    rules::regex_list(
        &http.fail_if_body_not_matches_regexp,
        &path.key("failIfBodyNotMatchesRegexp"),
        outcome,
    );

    if http.fail_if_ssl && http.fail_if_not_ssl {
        outcome.add(
            path.key("failIfSsl"),
            "A check cannot fail both with and without SSL",
        );
    }
}

fn validate_traceroute(
    traceroute: &TracerouteSettings,
    path: &FieldPath,
    outcome: &mut ValidationOutcome,
) {
    if !(1..=64).contains(&traceroute.max_hops) {
        outcome.add(path.key("maxHops"), "Max hops must be between 1 and 64");
    }
    if traceroute.max_unknown_hops > traceroute.max_hops {
        outcome.add(
            path.key("maxUnknownHops"),
            "Max unknown hops cannot exceed max hops",
        );
    }
}

fn validate_dns(dns: &DnsSettings, path: &FieldPath, outcome: &mut ValidationOutcome) {
    if dns.server.trim().is_empty() {
        outcome.add(path.key("server"), "DNS server is required");
    }
    if !(1..=65_535).contains(&dns.port) {
        outcome.add(path.key("port"), "Port must be between 1 and 65535");
    }
}

fn validate_multihttp(
    multihttp: &MultiHttpSettings,
    context: &ValidationContext,
    path: &FieldPath,
    outcome: &mut ValidationOutcome,
) {
    let entries = path.key("entries");
    let max_entries = context.limits.max_multihttp_entries;
    if multihttp.entries.is_empty() {
        outcome.add(entries.clone(), "At least one request is required");
    } else if multihttp.entries.len() > max_entries {
        outcome.add(
            entries.clone(),
            format!("A check may have at most {max_entries} requests"),
        );
    }

    let max_assertions = context.limits.max_assertions_per_entry;
    for (i, entry) in multihttp.entries.iter().enumerate() {
        let entry_path = entries.index(i);

        let request = entry_path.key("request");
        if !rules::is_http_url(&entry.request.url) {
            outcome.add(request.key("url"), "Request URL must be a valid http(s) URL");
        }
        for (j, header) in entry.request.headers.iter().enumerate() {
            if header.name.trim().is_empty() {
                outcome.add(
                    request.key("headers").index(j).key("name"),
                    "Header name is required",
                );
            }
        }

        let checks = entry_path.key("checks");
        if entry.checks.len() > max_assertions {
            outcome.add(
                checks.clone(),
                format!("A request may have at most {max_assertions} assertions"),
            );
        }
        for (j, assertion) in entry.checks.iter().enumerate() {
            if assertion.kind.requires_expression() && assertion.expression.trim().is_empty() {
                outcome.add(checks.index(j).key("expression"), "Expression is required");
            }
            if assertion.kind.requires_value() && assertion.value.is_empty() {
                outcome.add(checks.index(j).key("value"), "Value is required");
            }
        }

        let variables = entry_path.key("variables");
        let mut names = HashSet::new();
        for (j, variable) in entry.variables.iter().enumerate() {
            if variable.name.trim().is_empty() {
                outcome.add(variables.index(j).key("name"), "Variable name is required");
            } else if !names.insert(variable.name.as_str()) {
                outcome.add(variables.index(j).key("name"), "Variable names must be unique");
            }
            if variable.expression.trim().is_empty() {
                outcome.add(variables.index(j).key("expression"), "Expression is required");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::{Assertion, AssertionKind, CheckAlert, Label, MultiHttpEntry, default_check};
    use crate::validation::{FeatureFlags, Probe, TenantLimits};

    fn filled(check_type: CheckType, target: &str) -> Check {
        let mut check = default_check(check_type);
        check.job = "job".into();
        check.target = target.into();
        check.probes = vec![1];
        check
    }

    fn validate(check: &Check) -> Vec<String> {
        StandardSchema::new(check.check_type())
            .validate(check, &ValidationContext::default())
            .error_paths()
    }

    #[test]
    fn test_blank_http_check_reports_common_fields() {
        let check = default_check(CheckType::Http);
        assert_eq!(validate(&check), vec!["job", "probes", "target"]);
    }

    #[test]
    fn test_http_target_and_settings() {
        let mut check = filled(CheckType::Http, "not a url");
        if let CheckSettings::Http(http) = &mut check.settings {
            http.valid_status_codes = vec![200, 42];
            http.fail_if_body_matches_regexp = vec!["(open".into()];
            http.headers = vec!["Accept: */*".into(), "broken".into()];
        }
        assert_eq!(
            validate(&check),
            vec![
                "settings.http.failIfBodyMatchesRegexp.0",
                "settings.http.headers.1",
                "settings.http.validStatusCodes.1",
                "target",
            ]
        );

        let valid = filled(CheckType::Http, "https://grafana.com");
        assert!(validate(&valid).is_empty());
    }

    #[test]
    fn test_targets_per_variant() {
        assert!(validate(&filled(CheckType::Ping, "grafana.com")).is_empty());
        assert!(validate(&filled(CheckType::Dns, "grafana.com")).is_empty());
        assert!(validate(&filled(CheckType::Tcp, "grafana.com:443")).is_empty());
        assert!(validate(&filled(CheckType::Grpc, "grafana.com:443")).is_empty());
        assert_eq!(validate(&filled(CheckType::Tcp, "grafana.com")), vec!["target"]);
        assert_eq!(validate(&filled(CheckType::Ping, "http://x")), vec!["target"]);
    }

    #[test]
    fn test_timing_bounds() {
        let mut check = filled(CheckType::Http, "https://grafana.com");
        check.frequency = 5_000;
        check.timeout = 500;
        assert_eq!(validate(&check), vec!["frequency", "timeout"]);

        let mut check = filled(CheckType::Traceroute, "grafana.com");
        check.frequency = 60_000;
        assert_eq!(validate(&check), vec!["frequency"]);
    }

    #[test]
    fn test_labels_rules() {
        let mut check = filled(CheckType::Ping, "grafana.com");
        check.labels = vec![
            Label::new("env", "prod"),
            Label::new("env", "dev"),
            Label::new("1bad", "x"),
            Label::new("team", ""),
        ];
        assert_eq!(
            validate(&check),
            vec!["labels.1.name", "labels.2.name", "labels.3.value"]
        );

        let context = ValidationContext::default().with_limits(TenantLimits {
            max_labels_per_check: 1,
            ..TenantLimits::default()
        });
        check.labels = vec![Label::new("a", "1"), Label::new("b", "2")];
        let outcome = StandardSchema::new(CheckType::Ping).validate(&check, &context);
        assert_eq!(outcome.error_paths(), vec!["labels"]);
    }

    #[test]
    fn test_unknown_probes_only_with_probe_list() {
        let mut check = filled(CheckType::Ping, "grafana.com");
        check.probes = vec![1, 99];
        assert!(validate(&check).is_empty());

        let probe = Probe {
            id: 1,
            name: "Paris".into(),
            public: true,
            online: true,
        };
        let context = ValidationContext::default().with_probes(vec![probe]);
        let outcome = StandardSchema::new(CheckType::Ping).validate(&check, &context);
        assert_eq!(outcome.error_paths(), vec!["probes.1"]);
    }

    #[test]
    fn test_alerts_behind_flag() {
        let mut check = filled(CheckType::Ping, "grafana.com");
        check.alerts = vec![CheckAlert {
            name: String::new(),
            threshold: 0.0,
            period: None,
        }];
        assert!(validate(&check).is_empty());

        let context = ValidationContext::default()
            .with_flags(FeatureFlags::new([FeatureFlags::ALERTS_PER_CHECK]));
        let outcome = StandardSchema::new(CheckType::Ping).validate(&check, &context);
        assert_eq!(outcome.error_paths(), vec!["alerts.0.name", "alerts.0.threshold"]);
    }

    #[test]
    fn test_multihttp_nested_paths() {
        let mut check = filled(CheckType::MultiHttp, "https://grafana.com");
        if let CheckSettings::MultiHttp(multihttp) = &mut check.settings {
            let mut first = MultiHttpEntry::default();
            first.request.url = "https://grafana.com".into();
            first.checks = vec![Assertion {
                kind: AssertionKind::Text,
                value: "ok".into(),
                ..Assertion::default()
            }];
            let mut second = first.clone();
            second.checks = vec![Assertion {
                kind: AssertionKind::JsonPath,
                ..Assertion::default()
            }];
            multihttp.entries = vec![first, second];
        }
        assert_eq!(
            validate(&check),
            vec!["settings.multihttp.entries.1.checks.0.expression"]
        );
    }

    #[test]
    fn test_multihttp_root_error_on_empty_entries() {
        let mut check = filled(CheckType::MultiHttp, "https://grafana.com");
        check.settings = CheckSettings::MultiHttp(MultiHttpSettings::default());
        assert_eq!(validate(&check), vec!["settings.multihttp.entries"]);
    }

    #[test]
    fn test_scripts_required() {
        let mut check = filled(CheckType::Scripted, "my-script");
        assert!(validate(&check).is_empty());
        if let CheckSettings::Scripted(scripted) = &mut check.settings {
            scripted.script.clear();
        }
        assert_eq!(validate(&check), vec!["settings.scripted.script"]);
    }

    #[test]
    fn test_mismatched_settings_is_root_error() {
        let check = filled(CheckType::Ping, "grafana.com");
        let outcome =
            StandardSchema::new(CheckType::Dns).validate(&check, &ValidationContext::default());
        assert_eq!(outcome.error_paths(), vec!["settings"]);
    }
}
