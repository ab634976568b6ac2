//! Variant resolution.
//!
//! [`VariantResolver`] is the one place that knows "check type to behavior":
//! the schema, the default value, the section order, the field order and the
//! fields each section owns by default. [`VariantResolver::standard`] wires
//! every [`CheckType`]; a resolver built by hand may leave gaps, and asking it
//! for a missing check type is a configuration error rather than a silent
//! fallback.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use checkform_core::logging::targets;

use crate::check::{Check, CheckType, CheckTypeGroup, default_check};
use crate::error::{Error, Result};
use crate::path::FieldMatcher;
use crate::section::SectionId;
use crate::validation::{CheckSchema, StandardSchema};

/// Everything the engine needs to know about one check type.
#[derive(Clone)]
pub struct VariantProfile {
    pub check_type: CheckType,
    pub group: Option<CheckTypeGroup>,
    pub schema: Arc<dyn CheckSchema>,
    pub default_value: Check,
    /// Wizard steps, in order.
    pub section_order: Vec<SectionId>,
    /// Literal field paths in form order. Used to pick the field to focus
    /// after a failed submit.
    pub field_order: Vec<String>,
    /// Fields each section owns before its content registers its own.
    pub section_fields: Vec<(SectionId, Vec<FieldMatcher>)>,
}

impl VariantProfile {
    /// The built-in profile of `check_type`.
    pub fn standard(check_type: CheckType) -> Result<Self> {
        Ok(Self {
            check_type,
            group: Some(check_type.group()),
            schema: Arc::new(StandardSchema::new(check_type)),
            default_value: default_check(check_type),
            section_order: section_order(check_type),
            field_order: field_order(check_type),
            section_fields: section_fields(check_type)?,
        })
    }

    /// Replace the schema.
    pub fn with_schema(mut self, schema: impl CheckSchema + 'static) -> Self {
        self.schema = Arc::new(schema);
        self
    }

    /// Replace the section order.
    pub fn with_section_order(mut self, order: Vec<SectionId>) -> Self {
        self.section_order = order;
        self
    }

    /// Default fields of `id`; empty if the profile declares none.
    pub fn fields_for(&self, id: SectionId) -> &[FieldMatcher] {
        self.section_fields
            .iter()
            .find(|(section, _)| *section == id)
            .map(|(_, fields)| fields.as_slice())
            .unwrap_or_default()
    }
}

impl fmt::Debug for VariantProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VariantProfile")
            .field("check_type", &self.check_type)
            .field("group", &self.group)
            .field("section_order", &self.section_order)
            .field("field_order", &self.field_order)
            .finish_non_exhaustive()
    }
}

/// Check type to [`VariantProfile`].
#[derive(Debug, Clone, Default)]
pub struct VariantResolver {
    profiles: HashMap<CheckType, VariantProfile>,
}

impl VariantResolver {
    /// A resolver with no profiles.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A resolver covering every check type.
    pub fn standard() -> Result<Self> {
        let profiles = CheckType::ALL
            .into_iter()
            .map(|check_type| VariantProfile::standard(check_type).map(|p| (check_type, p)))
            .collect::<Result<HashMap<_, _>>>()?;
        Ok(Self { profiles })
    }

    /// Add or replace a profile.
    pub fn with_profile(mut self, profile: VariantProfile) -> Self {
        self.insert(profile);
        self
    }

    /// Add or replace a profile in place.
    pub fn insert(&mut self, profile: VariantProfile) -> Option<VariantProfile> {
        self.profiles.insert(profile.check_type, profile)
    }

    /// Whether `check_type` has a profile.
    pub fn contains(&self, check_type: CheckType) -> bool {
        self.profiles.contains_key(&check_type)
    }

    /// The profile of `check_type`.
    ///
    /// A profile with no sections cannot drive a wizard and resolves to
    /// [`Error::EmptySectionOrder`].
    pub fn resolve(&self, check_type: CheckType) -> Result<&VariantProfile> {
        let profile = self.profiles.get(&check_type).ok_or_else(|| {
            tracing::warn!(target: targets::VARIANT, variant = %check_type, "check type has no profile");
            Error::UnresolvedVariant {
                variant: check_type,
            }
        })?;
        if profile.section_order.is_empty() {
            tracing::warn!(target: targets::VARIANT, variant = %check_type, "profile has no sections");
            return Err(Error::EmptySectionOrder {
                variant: check_type,
            });
        }
        Ok(profile)
    }

    /// Parse `tag` and resolve it.
    pub fn resolve_tag(&self, tag: &str) -> Result<&VariantProfile> {
        let check_type = tag.parse::<CheckType>().inspect_err(|err| {
            tracing::warn!(target: targets::VARIANT, %err, "unresolvable check type tag");
        })?;
        self.resolve(check_type)
    }

    /// The presentation group of `check_type`.
    pub fn group(&self, check_type: CheckType) -> Result<CheckTypeGroup> {
        self.resolve(check_type)?.group.ok_or_else(|| {
            tracing::warn!(target: targets::VARIANT, variant = %check_type, "check type has no group");
            Error::UnmappedGroup {
                variant: check_type,
            }
        })
    }

    /// Parse `tag` and return its group.
    pub fn group_for_tag(&self, tag: &str) -> Result<CheckTypeGroup> {
        let check_type = tag.parse::<CheckType>()?;
        self.group(check_type)
    }
}

// ============================================================================
// Standard tables
// ============================================================================

fn section_order(check_type: CheckType) -> Vec<SectionId> {
    match check_type {
        CheckType::Scripted | CheckType::Browser => vec![
            SectionId::Check,
            SectionId::Labels,
            SectionId::Execution,
            SectionId::Alerting,
        ],
        _ => SectionId::ALL.to_vec(),
    }
}

/// Request-side settings fields, owned by the Check section.
fn request_fields(check_type: CheckType) -> &'static [&'static str] {
    match check_type {
        CheckType::Http => &[
            "method",
            "headers",
            "body",
            "ipVersion",
            "noFollowRedirects",
        ],
        CheckType::Ping => &["ipVersion", "dontFragment"],
        CheckType::Dns => &["recordType", "server", "port", "protocol", "ipVersion"],
        CheckType::Tcp => &["ipVersion", "tls"],
        CheckType::Traceroute => &["maxHops", "maxUnknownHops", "ptrLookup", "hopTimeout"],
        CheckType::Grpc => &["ipVersion", "service", "tls"],
        CheckType::MultiHttp => &["entries"],
        CheckType::Scripted | CheckType::Browser => &["script"],
    }
}

/// Response-side settings fields, owned by the Uptime section.
fn uptime_fields(check_type: CheckType) -> &'static [&'static str] {
    match check_type {
        CheckType::Http => &[
            "validStatusCodes",
            "validHttpVersions",
            "failIfSsl",
            "failIfNotSsl",
            "failIfBodyMatchesRegexp",
            "failIfBodyNotMatchesRegexp",
        ],
        CheckType::Dns => &["validRCodes"],
        CheckType::Tcp => &["queryResponse"],
        _ => &[],
    }
}

fn settings_path(check_type: CheckType, field: &str) -> String {
    format!("settings.{}.{field}", check_type.tag())
}

fn field_order(check_type: CheckType) -> Vec<String> {
    let mut order = vec!["job".to_string(), "target".to_string()];
    order.extend(
        request_fields(check_type)
            .iter()
            .chain(uptime_fields(check_type))
            .map(|field| settings_path(check_type, field)),
    );
    order.extend(
        ["labels", "probes", "frequency", "timeout", "alertSensitivity", "alerts"]
            .map(String::from),
    );
    order
}

fn section_fields(check_type: CheckType) -> Result<Vec<(SectionId, Vec<FieldMatcher>)>> {
    let mut check: Vec<FieldMatcher> = ["job", "target"].map(FieldMatcher::field).to_vec();
    let mut uptime: Vec<FieldMatcher> = uptime_fields(check_type)
        .iter()
        .map(|field| FieldMatcher::field(settings_path(check_type, field)))
        .collect();

    if check_type == CheckType::MultiHttp {
        // Root errors on the list itself (empty, over limit). A literal would
        // also claim every entry's descendants.
        check.push(FieldMatcher::pattern(r"settings\.multihttp\.entries(?:$|[^.])")?);
        check.push(FieldMatcher::field("settings.multihttp.entries.-1.request"));
        check.push(FieldMatcher::field("settings.multihttp.entries.-1.variables"));
        check.push(FieldMatcher::pattern(r"\.entries\.\d+\.request")?);
        uptime.push(FieldMatcher::field("settings.multihttp.entries.-1.checks"));
        uptime.push(FieldMatcher::pattern(r"\.entries\.\d+\.checks")?);
    } else {
        check.extend(
            request_fields(check_type)
                .iter()
                .map(|field| FieldMatcher::field(settings_path(check_type, field))),
        );
    }

    let mut fields = vec![(SectionId::Check, check)];
    if section_order(check_type).contains(&SectionId::Uptime) {
        fields.push((SectionId::Uptime, uptime));
    }
    fields.push((SectionId::Labels, vec![FieldMatcher::field("labels")]));
    fields.push((
        SectionId::Execution,
        ["probes", "frequency", "timeout"].map(FieldMatcher::field).to_vec(),
    ));
    fields.push((
        SectionId::Alerting,
        ["alerts", "alertSensitivity"].map(FieldMatcher::field).to_vec(),
    ));
    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::section::SectionRegistry;

    #[test]
    fn test_standard_resolver_is_total() {
        let resolver = VariantResolver::standard().unwrap();
        for check_type in CheckType::ALL {
            let profile = resolver.resolve(check_type).unwrap();
            assert_eq!(profile.check_type, check_type);
            assert_eq!(profile.default_value.check_type(), check_type);
            assert_eq!(profile.section_order[0], SectionId::Check);
            assert!(resolver.group(check_type).is_ok());
        }
    }

    #[test]
    fn test_unknown_tag_is_error() {
        let resolver = VariantResolver::standard().unwrap();
        assert!(matches!(
            resolver.resolve_tag("smtp"),
            Err(Error::UnknownVariant { tag }) if tag == "smtp"
        ));
        assert!(matches!(
            resolver.group_for_tag(""),
            Err(Error::UnknownVariant { .. })
        ));
        assert_eq!(resolver.group_for_tag("multihttp").unwrap(), CheckTypeGroup::MultiStep);
    }

    #[test]
    fn test_missing_profile_is_error() {
        let resolver = VariantResolver::empty()
            .with_profile(VariantProfile::standard(CheckType::Http).unwrap());
        assert!(matches!(
            resolver.resolve(CheckType::Dns),
            Err(Error::UnresolvedVariant { variant: CheckType::Dns })
        ));
    }

    #[test]
    fn test_missing_group_is_error() {
        let mut profile = VariantProfile::standard(CheckType::Grpc).unwrap();
        profile.group = None;
        let resolver = VariantResolver::standard().unwrap().with_profile(profile);
        assert!(matches!(
            resolver.group(CheckType::Grpc),
            Err(Error::UnmappedGroup { variant: CheckType::Grpc })
        ));
    }

    #[test]
    fn test_empty_section_order_is_error() {
        let profile = VariantProfile::standard(CheckType::Ping)
            .unwrap()
            .with_section_order(Vec::new());
        let resolver = VariantResolver::standard().unwrap().with_profile(profile);
        assert!(matches!(
            resolver.resolve_tag("ping"),
            Err(Error::EmptySectionOrder { variant: CheckType::Ping })
        ));
        assert!(resolver.resolve(CheckType::Http).is_ok());
    }

    #[test]
    fn test_scripted_has_no_uptime_section() {
        let profile = VariantProfile::standard(CheckType::Scripted).unwrap();
        assert!(!profile.section_order.contains(&SectionId::Uptime));
        assert!(profile.fields_for(SectionId::Uptime).is_empty());
    }

    #[test]
    fn test_multihttp_sections_own_entry_fields() {
        let profile = VariantProfile::standard(CheckType::MultiHttp).unwrap();
        let registry = SectionRegistry::default();
        let check = profile.fields_for(SectionId::Check);
        let uptime = profile.fields_for(SectionId::Uptime);

        let assertion = ["settings.multihttp.entries.1.checks.0.expression"];
        assert!(registry.has_section_error(uptime, &assertion));
        assert!(!registry.has_section_error(check, &assertion));

        let url = ["settings.multihttp.entries.3.request.url"];
        assert!(registry.has_section_error(check, &url));
        assert!(!registry.has_section_error(uptime, &url));

        let root = ["settings.multihttp.entries"];
        assert!(registry.has_section_error(check, &root));
        assert!(!registry.has_section_error(uptime, &root));
    }

    #[test]
    fn test_field_order_starts_with_job() {
        let profile = VariantProfile::standard(CheckType::Http).unwrap();
        assert_eq!(&profile.field_order[..3], ["job", "target", "settings.http.method"]);
        assert_eq!(profile.field_order.last().map(String::as_str), Some("alerts"));
    }
}
