//! Per-variant settings objects.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum IpVersion {
    #[default]
    Any,
    V4,
    V6,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    #[default]
    Get,
    Head,
    Post,
    Put,
    Patch,
    Delete,
    Options,
}

// ============================================================================
// HTTP
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpSettings {
    pub method: HttpMethod,
    /// Raw `Name: value` header lines.
    pub headers: Vec<String>,
    pub body: Option<String>,
    pub ip_version: IpVersion,
    pub no_follow_redirects: bool,
    pub fail_if_ssl: bool,
    pub fail_if_not_ssl: bool,
    pub valid_status_codes: Vec<u16>,
    pub valid_http_versions: Vec<String>,
    pub fail_if_body_matches_regexp: Vec<String>,
    pub fail_if_body_not_matches_regexp: Vec<String>,
}

// ============================================================================
// Ping / Traceroute
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PingSettings {
    pub ip_version: IpVersion,
    pub dont_fragment: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TracerouteSettings {
    pub max_hops: u32,
    pub max_unknown_hops: u32,
    pub ptr_lookup: bool,
    /// Milliseconds.
    pub hop_timeout: u64,
}

// ============================================================================
// DNS
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DnsRecordType {
    #[default]
    A,
    Aaaa,
    Cname,
    Mx,
    Ns,
    Soa,
    Srv,
    Txt,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DnsProtocol {
    #[default]
    Udp,
    Tcp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DnsSettings {
    pub record_type: DnsRecordType,
    pub server: String,
    pub port: u32,
    pub protocol: DnsProtocol,
    pub ip_version: IpVersion,
    pub valid_r_codes: Vec<String>,
}

// ============================================================================
// TCP / gRPC
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TcpQueryResponse {
    pub send: String,
    pub expect: String,
    pub start_tls: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TcpSettings {
    pub ip_version: IpVersion,
    pub tls: bool,
    pub query_response: Vec<TcpQueryResponse>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrpcSettings {
    pub ip_version: IpVersion,
    pub service: String,
    pub tls: bool,
}

// ============================================================================
// MultiHTTP
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpHeader {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryField {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiHttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<HttpHeader>,
    pub body: Option<String>,
    pub query_fields: Vec<QueryField>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AssertionKind {
    #[default]
    Text,
    JsonPathValue,
    JsonPath,
    Regex,
}

impl AssertionKind {
    /// Whether an assertion of this kind needs an expression.
    pub fn requires_expression(self) -> bool {
        !matches!(self, Self::Text)
    }

    /// Whether an assertion of this kind compares against a value.
    pub fn requires_value(self) -> bool {
        matches!(self, Self::Text | Self::JsonPathValue)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AssertionSubject {
    #[default]
    ResponseBody,
    ResponseHeaders,
    HttpStatusCode,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AssertionCondition {
    #[default]
    Contains,
    NotContains,
    Equals,
    StartsWith,
    EndsWith,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assertion {
    #[serde(rename = "type")]
    pub kind: AssertionKind,
    pub subject: AssertionSubject,
    pub condition: AssertionCondition,
    pub expression: String,
    pub value: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VariableKind {
    #[default]
    JsonPath,
    Regex,
    CssSelector,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiHttpVariable {
    #[serde(rename = "type")]
    pub kind: VariableKind,
    pub name: String,
    pub expression: String,
}

/// One request of a multi-step check with its assertions and extracted variables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiHttpEntry {
    pub request: MultiHttpRequest,
    pub checks: Vec<Assertion>,
    pub variables: Vec<MultiHttpVariable>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiHttpSettings {
    pub entries: Vec<MultiHttpEntry>,
}

// ============================================================================
// Scripted / Browser
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptedSettings {
    pub script: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowserSettings {
    pub script: String,
}
