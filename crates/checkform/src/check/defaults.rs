//! Default value table, one entry per check type.

use super::settings::*;
use super::{AlertSensitivity, Check, CheckSettings, CheckType};

const SCRIPTED_TEMPLATE: &str = r#"import { check } from 'k6'
import http from 'k6/http'

export default function main() {
  const res = http.get('https://example.com/')
  check(res, { 'is status 200': (r) => r.status === 200 })
}
"#;

const BROWSER_TEMPLATE: &str = r#"import { browser } from 'k6/browser'
import { check } from 'https://jslib.k6.io/k6-utils/1.5.0/index.js'

export const options = {
  scenarios: { ui: { options: { browser: { type: 'chromium' } } } },
}

export default async function () {
  const page = await browser.newPage()
  try {
    await page.goto('https://example.com/')
    await check(page.locator('h1'), { header: async (h) => (await h.textContent()) !== '' })
  } finally {
    await page.close()
  }
}
"#;

/// Default settings for a check type.
pub fn default_settings(check_type: CheckType) -> CheckSettings {
    match check_type {
        CheckType::Http => CheckSettings::Http(HttpSettings::default()),
        CheckType::Ping => CheckSettings::Ping(PingSettings::default()),
        CheckType::Dns => CheckSettings::Dns(DnsSettings {
            record_type: DnsRecordType::A,
            server: "dns.google".to_string(),
            port: 53,
            protocol: DnsProtocol::Udp,
            ip_version: IpVersion::V4,
            valid_r_codes: vec!["NOERROR".to_string()],
        }),
        CheckType::Tcp => CheckSettings::Tcp(TcpSettings::default()),
        CheckType::Traceroute => CheckSettings::Traceroute(TracerouteSettings {
            max_hops: 64,
            max_unknown_hops: 15,
            ptr_lookup: true,
            hop_timeout: 0,
        }),
        CheckType::MultiHttp => CheckSettings::MultiHttp(MultiHttpSettings {
            entries: vec![MultiHttpEntry::default()],
        }),
        CheckType::Scripted => CheckSettings::Scripted(ScriptedSettings {
            script: SCRIPTED_TEMPLATE.to_string(),
        }),
        CheckType::Browser => CheckSettings::Browser(BrowserSettings {
            script: BROWSER_TEMPLATE.to_string(),
        }),
        CheckType::Grpc => CheckSettings::Grpc(GrpcSettings::default()),
    }
}

/// The blank check a new wizard starts from.
pub fn default_check(check_type: CheckType) -> Check {
    let (frequency, timeout) = match check_type {
        CheckType::Traceroute => (120_000, 30_000),
        CheckType::MultiHttp => (120_000, 15_000),
        CheckType::Scripted | CheckType::Browser => (300_000, 60_000),
        _ => (60_000, 3_000),
    };

    Check {
        id: None,
        job: String::new(),
        target: String::new(),
        enabled: true,
        frequency,
        timeout,
        probes: Vec::new(),
        labels: Vec::new(),
        alert_sensitivity: AlertSensitivity::None,
        alerts: Vec::new(),
        settings: default_settings(check_type),
    }
}
