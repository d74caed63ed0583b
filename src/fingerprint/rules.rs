// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Built-in fingerprint rule table

use lazy_static::lazy_static;
use regex::Regex;

use super::FingerprintCategory;
use crate::error::Result;

/// Where a rule looks for its signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleSource {
    /// Value of the named response header (lowercase)
    Header(&'static str),
    /// Cookie names set for the page
    Cookie,
    /// URL of a resource referenced by the page
    Url,
    /// Script or page body text
    Body,
}

/// An immutable fingerprint rule
#[derive(Debug, Clone)]
pub struct FingerprintRule {
    pub category: FingerprintCategory,
    pub name: &'static str,
    pub source: RuleSource,
    pub pattern: Regex,
    /// Names of the capture groups, in order (`version`, `component`, ...)
    pub fields: &'static [&'static str],
    /// Implied fingerprint, e.g. Tomcat implies Java
    pub auxiliary: Option<(FingerprintCategory, &'static str)>,
}

impl FingerprintRule {
    /// Build a rule from a pattern string
    pub fn new(
        category: FingerprintCategory,
        name: &'static str,
        source: RuleSource,
        pattern: &str,
        fields: &'static [&'static str],
    ) -> Result<Self> {
        Ok(Self {
            category,
            name,
            source,
            pattern: Regex::new(pattern)?,
            fields,
            auxiliary: None,
        })
    }

    /// Attach an implied fingerprint
    pub fn implies(mut self, category: FingerprintCategory, name: &'static str) -> Self {
        self.auxiliary = Some((category, name));
        self
    }
}

use FingerprintCategory::*;

type RuleRow = (
    FingerprintCategory,
    &'static str,
    RuleSource,
    &'static str,
    &'static [&'static str],
    Option<(FingerprintCategory, &'static str)>,
);

const VERSION: &[&str] = &["version"];
const NONE: &[&str] = &[];

const RULE_TABLE: &[RuleRow] = &[
    // Server header
    (Server, "Apache", RuleSource::Header("server"), r"(?i)^apache/?([\d.]+)?$", VERSION, None),
    (
        Server,
        "Apache Tomcat",
        RuleSource::Header("server"),
        r"(?i)^apache-(coyote)/?([\d.]+)?$",
        &["component", "version"],
        Some((Technology, "Java")),
    ),
    (Server, "Nginx", RuleSource::Header("server"), r"(?i)^nginx/?([\d.]+)?$", VERSION, None),
    (
        Server,
        "IIS",
        RuleSource::Header("server"),
        r"(?i)^microsoft-iis/?([\d.]+)?$",
        VERSION,
        Some((Os, "Windows")),
    ),
    (Server, "LiteSpeed", RuleSource::Header("server"), r"(?i)^litespeed/?([\d.]+)?$", VERSION, None),
    (Server, "Resin", RuleSource::Header("server"), r"(?i)^resin/?([\d.]+)?$", VERSION, None),
    (Server, "Cloudflare", RuleSource::Header("server"), r"(?i)^cloudflare/?([\d.]+)?$", VERSION, None),
    (Server, "Varnish", RuleSource::Header("server"), r"(?i)^varnish/?([\d.]+)?$", VERSION, None),
    (Server, "OpenResty", RuleSource::Header("server"), r"(?i)^openresty/?([\d.]+)?$", VERSION, None),
    (Server, "Tengine", RuleSource::Header("server"), r"(?i)^tengine/?([\d.]+)?$", VERSION, None),
    (Server, "BWS", RuleSource::Header("server"), r"(?i)^bws/?([\d.]+)?$", VERSION, None),
    (Server, "Zeus", RuleSource::Header("server"), r"(?i)^zeus/?([\d.]+)?$", VERSION, None),
    (Server, "Server", RuleSource::Header("server"), r"(?i)^waf|server/?([\d.]+)?$", VERSION, None),
    (Os, "Windows", RuleSource::Header("server"), r"(?i)win64|win32|win10|win7|win8|win11", NONE, None),
    (Os, "Ubuntu", RuleSource::Header("server"), r"(?i)ubuntu", NONE, None),
    // Framework and language headers
    (
        Framework,
        "Spring",
        RuleSource::Header("x-application-context"),
        r"(?i)^([a-z0-9.\-]+):([a-z0-9\-]+):(\d+)$",
        &["app", "env", "port"],
        Some((Technology, "Java")),
    ),
    (Framework, "ASP.NET", RuleSource::Header("x-aspnet-version"), r"([0-9.]+)", VERSION, None),
    (Framework, "ASP.NET MVC", RuleSource::Header("x-aspnetmvc-version"), r"([0-9.]+)", VERSION, None),
    (Framework, "ASP.NET", RuleSource::Header("x-powered-by"), r"(?i)asp\.net", NONE, None),
    (Technology, "PHP", RuleSource::Header("x-powered-by"), r"(?i)^php/?([\d.]+)?$", VERSION, None),
    (Technology, "Java", RuleSource::Header("x-powered-by"), r"(?i)java", NONE, None),
    // Security products and policies
    (Security, "WAF", RuleSource::Header("x-powered-by"), r"(?i)^waf/?([\d.]+)?$", VERSION, None),
    (Security, "Janusec", RuleSource::Header("x-powered-by"), r"(?i)janusec", NONE, None),
    (
        Security,
        "360",
        RuleSource::Header("x-safe-firewall"),
        r"(?i)^([a-z0-9\-.]+)\s([0-9.]+)\s([a-z0-9]+)$",
        &["app", "version", "appType"],
        None,
    ),
    (Security, "HSTS", RuleSource::Header("strict-transport-security"), r"(?i)max-age=(\d+)", &["time"], None),
    // Cookies
    (Technology, "PHP", RuleSource::Cookie, r"(?i)PHPSESSID", NONE, None),
    (Framework, "ASP.NET", RuleSource::Cookie, r"(?i)ASP\.NET_SessionId|ASPSESSIONID", NONE, None),
    (Technology, "Java", RuleSource::Cookie, r"(?i)JSESSIONID|jeesite", NONE, None),
    // Analytics beacons referenced by the page
    (Analytics, "Baidu Analytics", RuleSource::Url, r"^[a-z]+://hm\.baidu\.com/hm\.js", NONE, None),
    (Analytics, "Yahoo Analytics", RuleSource::Url, r"^[a-z]+://analytics\.yahoo\.com/", NONE, None),
    (Analytics, "Google Analytics", RuleSource::Url, r"^[a-z]+://www\.google-analytics\.com/", NONE, None),
    // Bundlers and frameworks visible in script bodies
    (Builder, "Webpack", RuleSource::Body, r"__webpack_require__|webpackJsonp|webpackChunk", NONE, None),
    (Builder, "Vite", RuleSource::Body, r"/@vite/client|__vite_ssr_import__|__vitePreload", NONE, None),
    (Framework, "Vue", RuleSource::Body, r#"Vue\.version\s*=\s*["']([\d.]+)["']|__VUE_DEVTOOLS_GLOBAL_HOOK__"#, VERSION, None),
    (Framework, "React", RuleSource::Body, r"__REACT_DEVTOOLS_GLOBAL_HOOK__|_reactRootContainer", NONE, None),
    (Framework, "Angular", RuleSource::Body, r#"ng-version="([\d.]+)""#, VERSION, None),
];

lazy_static! {
    static ref DEFAULT_RULES: Vec<FingerprintRule> = RULE_TABLE
        .iter()
        .map(|(category, name, source, pattern, fields, auxiliary)| FingerprintRule {
            category: *category,
            name: *name,
            source: *source,
            pattern: Regex::new(pattern).unwrap(),
            fields: *fields,
            auxiliary: *auxiliary,
        })
        .collect();
}

/// The built-in rule table
pub fn default_rules() -> &'static [FingerprintRule] {
    &DEFAULT_RULES
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_table_compiles() {
        assert_eq!(default_rules().len(), RULE_TABLE.len());
    }

    #[test]
    fn test_field_counts_fit_patterns() {
        for rule in default_rules() {
            assert!(
                rule.fields.len() <= rule.pattern.captures_len() - 1,
                "{} declares more fields than groups",
                rule.name
            );
        }
    }

    #[test]
    fn test_custom_rule_reports_bad_pattern() {
        let rule = FingerprintRule::new(Server, "Broken", RuleSource::Body, "(", NONE);
        assert!(rule.is_err());
    }
}
