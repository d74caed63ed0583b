// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Per-family match filters
//!
//! Every filter has the same shape: it takes the raw match, normalizes and
//! validates it, commits accepted values to the [`ResultSet`] and returns
//! whether the match was accepted. Rejections are never errors.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use lazy_static::lazy_static;
use percent_encoding::percent_decode_str;
use regex::Regex;
use url::Url;

use crate::patterns::library::{
    digit_or_dot, COMPOUND_TLD, DOC_FILE, DOMAIN_FILTER, FONT_FILE, IMAGE_FILE, JS_FILE,
};
use crate::patterns::lists::{
    ALLOWED_TLDS, COMPANY_BLACKLIST, DOMAIN_BLACKLIST, FILTERED_CONTENT_TYPES, IDENTIFIER_WORDS,
    ID_KEY_KEY_BLACKLIST, LONG_VALUES, MEDIUM_VALUES, RELATIVE_API_NOISE, SHORT_VALUES,
    SPECIAL_SUFFIXES,
};
use crate::patterns::PatternKind;
use crate::results::{Category, ResultSet};

/// Where a match came from
#[derive(Debug, Clone, Copy)]
pub struct FilterContext<'a> {
    /// Resource URL, or `"page"`
    pub provenance: &'a str,
    /// `host[:port]` of the scanned page
    pub page_host: Option<&'a str>,
}

impl<'a> FilterContext<'a> {
    pub fn new(provenance: &'a str, page_host: Option<&'a str>) -> Self {
        Self {
            provenance,
            page_host,
        }
    }
}

/// Filter signature shared by every pattern family
pub type FilterFn = fn(&str, &FilterContext<'_>, &mut ResultSet) -> bool;

impl PatternKind {
    /// The filter for this family
    pub fn filter(&self) -> FilterFn {
        match self {
            PatternKind::Domain => domain,
            PatternKind::Ip => ip,
            PatternKind::Api => api,
            PatternKind::Phone => phone,
            PatternKind::Email => email,
            PatternKind::IdCard => id_card,
            PatternKind::Url => url,
            PatternKind::Jwt => jwt,
            PatternKind::AwsKey => aws_key,
            PatternKind::Company => company,
            PatternKind::Credential => credential,
            PatternKind::Cookie => cookie,
            PatternKind::IdKey => id_key,
        }
    }
}

lazy_static! {
    static ref IP_ADDR: Regex = Regex::new(r"(\d{1,3})\.(\d{1,3})\.(\d{1,3})\.(\d{1,3})(?::(\d{1,5}))?").unwrap();
    static ref VALUE_SHAPE: Regex = Regex::new(r"^/|true|false|register|signup|name|basic|http").unwrap();
    static ref CJK_ONLY: Regex = Regex::new(r"^[\x{4e00}-\x{9fa5}]+$").unwrap();
    static ref CAMEL_CASE: Regex = Regex::new(r"\b[_a-z]+(?:[A-Z][a-z]+)+\b").unwrap();
    static ref MEMBER_CHAIN: Regex = Regex::new(r"^[A-Za-z_$][\w$]*(?:\.[A-Za-z_$][\w$]*)+$").unwrap();
    static ref BRACKETED: Regex = Regex::new(r"（\S*）").unwrap();
    static ref HAS_EXTENSION: Regex = Regex::new(r"\.[a-zA-Z0-9]+$").unwrap();
    static ref SHORT_ABSOLUTE_NOISE: Regex = Regex::new(r"[A-Z./#+?23]").unwrap();
    static ref EMAIL_IMAGE: Regex = Regex::new(r"(?i)\.(?:png|jpe?g|gif|webp|svg|bmp|ico)$").unwrap();
}

fn strip_quotes(raw: &str) -> &str {
    raw.trim().trim_matches(|c| c == '"' || c == '\'' || c == '`')
}

fn url_decode(value: &str) -> String {
    let value = value.replace('+', " ");
    percent_decode_str(&value)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .unwrap_or(value)
}

/// Split `key:value` / `key=value` on the first delimiter
fn split_pair(raw: &str) -> Option<(String, String)> {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    let index = compact.find([':', '='])?;
    let (key, value) = compact.split_at(index);
    Some((key.to_string(), value[1..].to_string()))
}

fn contains_any(value: &str, words: &[&str]) -> bool {
    words.iter().any(|word| value.contains(word))
}

/// Tiered blacklist of minified-code artifacts
fn blacklisted_value(value: &str) -> bool {
    if value.len() < 16 {
        contains_any(value, SHORT_VALUES) || contains_any(value, MEDIUM_VALUES)
    } else {
        contains_any(value, MEDIUM_VALUES) || contains_any(value, LONG_VALUES)
    }
}

/// Sort a same-host path into the file and API buckets
fn classify_path(path: &str, ctx: &FilterContext<'_>, out: &mut ResultSet) -> bool {
    if FONT_FILE.is_match(path) {
        return false;
    }
    let category = if path.ends_with(".vue") {
        Category::VueFile
    } else if IMAGE_FILE.is_match(path) {
        Category::ImageFile
    } else if JS_FILE.is_match(path) {
        Category::JsFile
    } else if DOC_FILE.is_match(path) {
        Category::DocFile
    } else {
        return false;
    };
    out.insert(category, path, ctx.provenance);
    true
}

/// Host names and `host:port` pairs ending in an allowed TLD
pub fn domain(raw: &str, ctx: &FilterContext<'_>, out: &mut ResultSet) -> bool {
    let cleaned = url_decode(&strip_quotes(raw).to_lowercase());
    let Some(found) = DOMAIN_FILTER.find(&cleaned) else {
        return false;
    };
    let candidate = found.as_str();
    if COMPOUND_TLD.is_match(candidate) {
        return false;
    }

    let (host, port) = match candidate.split_once(':') {
        Some((host, port)) => (host, Some(port)),
        None => (candidate, None),
    };
    if let Some(port) = port {
        if !matches!(port.parse::<u32>(), Ok(1..=65535)) {
            return false;
        }
    }
    if host.len() > 253 || host.contains("..") || host.contains("--") || host.contains(".-") {
        return false;
    }

    let labels: Vec<&str> = host.split('.').collect();
    if labels.len() < 2 || labels.iter().any(|l| l.is_empty() || l.len() > 63) {
        return false;
    }
    if matches!(labels[0], "el" | "e" | "this") {
        return false;
    }
    // `options.config.top` is a property chain; `event.example.com` is a host
    if IDENTIFIER_WORDS.contains(&labels[0])
        && (labels.len() == 2 || IDENTIFIER_WORDS.contains(&labels[1]))
    {
        return false;
    }
    if contains_any(host, DOMAIN_BLACKLIST) {
        return false;
    }

    let special = SPECIAL_SUFFIXES
        .iter()
        .any(|suffix| host.ends_with(&format!(".{}", suffix)));
    let tld = labels[labels.len() - 1];
    if !special && !ALLOWED_TLDS.contains(&tld) {
        return false;
    }

    out.insert(Category::Domain, candidate, ctx.provenance);
    true
}

/// Dotted-quad IPv4 addresses with an optional port
pub fn ip(raw: &str, ctx: &FilterContext<'_>, out: &mut ResultSet) -> bool {
    let cleaned = strip_quotes(raw);
    let Some(caps) = IP_ADDR.captures_iter(cleaned).find(|caps| {
        let m = caps.get(0).map_or(0..0, |m| m.range());
        !cleaned[..m.start].chars().next_back().is_some_and(digit_or_dot)
            && !cleaned[m.end..].chars().next().is_some_and(digit_or_dot)
    }) else {
        return false;
    };
    let mut octets = [0u8; 4];
    for (i, octet) in octets.iter_mut().enumerate() {
        match caps[i + 1].parse::<u8>() {
            Ok(value) => *octet = value,
            Err(_) => return false,
        }
    }
    if octets == [0, 0, 0, 0] || octets == [255, 255, 255, 255] {
        return false;
    }
    if let Some(port) = caps.get(5) {
        if !matches!(port.as_str().parse::<u32>(), Ok(1..=65535)) {
            return false;
        }
    }

    out.insert(Category::Ip, &caps[0], ctx.provenance);
    true
}

/// Quoted paths: file buckets first, then absolute and relative APIs
pub fn api(raw: &str, ctx: &FilterContext<'_>, out: &mut ResultSet) -> bool {
    let path = strip_quotes(raw);
    if path.is_empty() {
        return false;
    }
    if let Some((first, _)) = path.split_once('/') {
        if !first.is_empty() && (first.ends_with("text") || first.ends_with("application")) {
            return false;
        }
    }
    if FONT_FILE.is_match(path) {
        return false;
    }
    if classify_path(path, ctx, out) {
        return true;
    }

    let lower = path.to_lowercase();
    if FILTERED_CONTENT_TYPES.iter().any(|t| lower == *t) {
        return false;
    }

    if path.starts_with("./") {
        out.insert(Category::ModuleFile, path, ctx.provenance);
        return true;
    }
    if path.starts_with('/') {
        if path.len() <= 4 && SHORT_ABSOLUTE_NOISE.is_match(&path[1..]) {
            return false;
        }
        out.insert(Category::AbsoluteApi, path, ctx.provenance);
        return true;
    }

    if RELATIVE_API_NOISE.iter().any(|noise| path.starts_with(noise)) {
        return false;
    }
    if path.len() <= 4 {
        return false;
    }
    out.insert(Category::Api, path, ctx.provenance);
    true
}

pub fn phone(raw: &str, ctx: &FilterContext<'_>, out: &mut ResultSet) -> bool {
    out.insert(Category::Phone, raw, ctx.provenance);
    true
}

pub fn email(raw: &str, ctx: &FilterContext<'_>, out: &mut ResultSet) -> bool {
    // `logo@2x.png` style asset names
    if EMAIL_IMAGE.is_match(raw) {
        return false;
    }
    out.insert(Category::Email, raw, ctx.provenance);
    true
}

pub fn id_card(raw: &str, ctx: &FilterContext<'_>, out: &mut ResultSet) -> bool {
    out.insert(Category::IdCard, raw, ctx.provenance);
    true
}

/// Absolute URLs; same-host URLs also feed the path buckets
pub fn url(raw: &str, ctx: &FilterContext<'_>, out: &mut ResultSet) -> bool {
    if raw.to_lowercase().contains("github.com/") {
        out.insert(Category::GithubUrl, raw, ctx.provenance);
        return true;
    }
    out.insert(Category::Url, raw, ctx.provenance);

    let (Ok(parsed), Some(page_host)) = (Url::parse(raw), ctx.page_host) else {
        return true;
    };
    let host = match (parsed.host_str(), parsed.port()) {
        (Some(host), Some(port)) => format!("{}:{}", host, port),
        (Some(host), None) => host.to_string(),
        (None, _) => return true,
    };
    if !host.eq_ignore_ascii_case(page_host) {
        return true;
    }

    let path = parsed.path();
    if classify_path(path, ctx, out) || FONT_FILE.is_match(path) {
        return true;
    }
    if path != "/" && !HAS_EXTENSION.is_match(path) {
        out.insert(Category::AbsoluteApi, path, ctx.provenance);
    }
    true
}

/// Quoted tokens whose header segment decodes to a JSON object
pub fn jwt(raw: &str, ctx: &FilterContext<'_>, out: &mut ResultSet) -> bool {
    let token = strip_quotes(raw);
    let header = token.split('.').next().unwrap_or_default();
    let normalized = header.replace('+', "-").replace('/', "_");
    let is_json = URL_SAFE_NO_PAD
        .decode(normalized.trim_end_matches('='))
        .ok()
        .and_then(|bytes| serde_json::from_slice::<serde_json::Value>(&bytes).ok())
        .is_some_and(|header| header.is_object());
    if !is_json {
        return false;
    }
    out.insert(Category::Jwt, token, ctx.provenance);
    true
}

pub fn aws_key(raw: &str, ctx: &FilterContext<'_>, out: &mut ResultSet) -> bool {
    out.insert(Category::AwsKey, raw, ctx.provenance);
    true
}

/// Chinese organisation names
pub fn company(raw: &str, ctx: &FilterContext<'_>, out: &mut ResultSet) -> bool {
    if (raw.contains('（') || raw.contains('）')) && !BRACKETED.is_match(raw) {
        return false;
    }
    if contains_any(raw, COMPANY_BLACKLIST) {
        return false;
    }
    out.insert(Category::Company, raw, ctx.provenance);
    true
}

/// Credential-looking assignments: `password: "admin123"`
pub fn credential(raw: &str, ctx: &FilterContext<'_>, out: &mut ResultSet) -> bool {
    let Some((key, value)) = split_pair(raw) else {
        return false;
    };
    let key = key.replace(['"', '\''], "").to_lowercase();
    let value: String = value
        .chars()
        .filter(|c| !"\"'{}[]，：。？、?!><".contains(*c))
        .collect::<String>()
        .to_lowercase();

    if value.is_empty() || key == value {
        return false;
    }
    if key.starts_with("coord") || value.starts_with("coord") {
        return false;
    }
    if VALUE_SHAPE.is_match(&value) || value.chars().count() <= 1 {
        return false;
    }
    if CJK_ONLY.is_match(&value) || blacklisted_value(&value) {
        return false;
    }

    out.insert(Category::Credential, raw.trim(), ctx.provenance);
    true
}

/// Session-token assignments: `token = "..."`, `JSESSIONID=...`
pub fn cookie(raw: &str, ctx: &FilterContext<'_>, out: &mut ResultSet) -> bool {
    let Some((key, value)) = split_pair(raw) else {
        return false;
    };
    let strip = |s: &str| s.replace(['"', '\'', '<', '>'], "").to_lowercase();
    let (key, value) = (strip(&key), strip(&value));

    if value.len() < 4 || key == value || value.starts_with("localstorage") {
        return false;
    }
    if contains_any(&value, SHORT_VALUES) || contains_any(&value, MEDIUM_VALUES) {
        return false;
    }

    out.insert(Category::Cookie, raw.trim(), ctx.provenance);
    true
}

/// App ids and API keys
pub fn id_key(raw: &str, ctx: &FilterContext<'_>, out: &mut ResultSet) -> bool {
    let Some((key, value)) = split_pair(raw) else {
        // A bare quoted identifier such as a WeChat app id
        let bare = strip_quotes(raw);
        if bare.len() < 8 || bare.chars().all(|c| c.is_ascii_alphabetic()) {
            return false;
        }
        let lower = bare.to_lowercase();
        if contains_any(&lower, MEDIUM_VALUES) || contains_any(&lower, LONG_VALUES) {
            return false;
        }
        out.insert(Category::IdKey, bare, ctx.provenance);
        return true;
    };

    let key = key.replace(['"', '\'', '<', '>'], "");
    let value = value.replace(['"', '\'', '<', '>'], "");
    let key_lower = key.to_lowercase();
    let value_lower = value.to_lowercase();

    if value.is_empty() || key_lower == value_lower {
        return false;
    }
    if contains_any(&key_lower, ID_KEY_KEY_BLACKLIST) {
        return false;
    }
    if blacklisted_value(&value_lower) || MEMBER_CHAIN.is_match(&value) {
        return false;
    }
    if key_lower == "key" && (value.len() <= 8 || CAMEL_CASE.is_match(&value)) {
        return false;
    }
    if value.len() <= 3 {
        return false;
    }

    out.insert(Category::IdKey, raw.trim(), ctx.provenance);
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: FilterContext<'static> = FilterContext {
        provenance: "page",
        page_host: Some("www.example.com"),
    };

    fn accepts(filter: FilterFn, raw: &str) -> Option<ResultSet> {
        let mut out = ResultSet::new();
        filter(raw, &PAGE, &mut out).then_some(out)
    }

    #[test]
    fn test_domain_protocol_relative() {
        let out = accepts(domain, "\"//api.example.top/config\"").unwrap();
        assert_eq!(out.values(Category::Domain), vec!["api.example.top"]);
    }

    #[test]
    fn test_domain_rejects_identifiers() {
        assert!(accepts(domain, "this.example.top").is_none());
        assert!(accepts(domain, "el.example.top").is_none());
        assert!(accepts(domain, "e.target.com").is_none());
        assert!(accepts(domain, "business.top-speed.top").is_none());
        assert!(accepts(domain, "obj.style.top").is_none());
    }

    #[test]
    fn test_domain_tld_and_port() {
        let out = accepts(domain, "cdn.example.com:8443").unwrap();
        assert!(out.contains(Category::Domain, "cdn.example.com:8443"));
        assert!(accepts(domain, "file.unknowntld").is_none());
        assert!(accepts(domain, "gov.example.org.cn").is_some());
    }

    #[test]
    fn test_domain_percent_decoded() {
        let out = accepts(domain, "%2F%2Fapi.example.net%2Fv1").unwrap();
        assert!(out.contains(Category::Domain, "api.example.net"));
    }

    #[test]
    fn test_ip_examples() {
        assert!(accepts(ip, "300.1.1.1").is_none());
        assert!(accepts(ip, "255.255.255.255").is_none());
        assert!(accepts(ip, "0.0.0.0").is_none());
        let out = accepts(ip, "10.0.0.5:8080").unwrap();
        assert!(out.contains(Category::Ip, "10.0.0.5:8080"));
        assert!(accepts(ip, "10.0.0.5:70000").is_none());
    }

    #[test]
    fn test_domain_identifier_leading_label() {
        let out = accepts(domain, "event.example.com").unwrap();
        assert!(out.contains(Category::Domain, "event.example.com"));
        assert!(accepts(domain, "node.example.org").is_some());
        assert!(accepts(domain, "options.config.top").is_none());
        assert!(accepts(domain, "config.top").is_none());
    }

    #[test]
    fn test_ip_rejects_longer_dotted_runs() {
        assert!(accepts(ip, "\"1.2.3.4.5\"").is_none());
        assert!(accepts(ip, "\"v9.1.2.3.4\"").is_none());
        assert!(accepts(ip, "\"1.2.3.45678\"").is_none());
        let out = accepts(ip, "\"//10.0.0.5:8080/api\"").unwrap();
        assert!(out.contains(Category::Ip, "10.0.0.5:8080"));
    }

    #[test]
    fn test_ip_resource_form() {
        let out = accepts(ip, "\"http://192.168.1.10/admin\"").unwrap();
        assert!(out.contains(Category::Ip, "192.168.1.10"));
    }

    #[test]
    fn test_api_buckets() {
        let out = accepts(api, "\"/api/user/list\"").unwrap();
        assert!(out.contains(Category::AbsoluteApi, "/api/user/list"));

        let out = accepts(api, "'api/v2/orders'").unwrap();
        assert!(out.contains(Category::Api, "api/v2/orders"));

        let out = accepts(api, "\"./components/Home\"").unwrap();
        assert!(out.contains(Category::ModuleFile, "./components/Home"));

        let out = accepts(api, "\"/static/logo.png\"").unwrap();
        assert!(out.contains(Category::ImageFile, "/static/logo.png"));

        let out = accepts(api, "\"/views/Login.vue\"").unwrap();
        assert!(out.contains(Category::VueFile, "/views/Login.vue"));

        let out = accepts(api, "\"/js/app.js?v=3\"").unwrap();
        assert!(out.contains(Category::JsFile, "/js/app.js?v=3"));
    }

    #[test]
    fn test_api_noise() {
        assert!(accepts(api, "\"/fonts/a.woff2\"").is_none());
        assert!(accepts(api, "\"multipart/form-data\"").is_none());
        assert!(accepts(api, "\"text/html\"").is_none());
        assert!(accepts(api, "\"application/json\"").is_none());
        assert!(accepts(api, "\"yyyy/MM/dd\"").is_none());
        assert!(accepts(api, "\"/A\"").is_none());
        assert!(accepts(api, "\"a/b\"").is_none());
        assert!(accepts(api, "\"themes/default/x\"").is_none());
    }

    #[test]
    fn test_credential_examples() {
        assert!(accepts(credential, "password: \"admin123\"").is_some());
        assert!(accepts(credential, "type: \"true\"").is_none());
        assert!(accepts(credential, "pos: \"coord1\"").is_none());
        assert!(accepts(credential, "username: \"\"").is_none());
        assert!(accepts(credential, "user: \"管理员\"").is_none());
        assert!(accepts(credential, "password=password").is_none());
    }

    #[test]
    fn test_cookie_filter() {
        assert!(accepts(cookie, "token=\"a8f5f167f44f4964e6c998dee827110c\"").is_some());
        assert!(accepts(cookie, "token: \"null\"").is_none());
        assert!(accepts(cookie, "token=abc").is_none());
    }

    #[test]
    fn test_id_key_filter() {
        assert!(accepts(id_key, "\"wx1234567890abcdef\"").is_some());
        assert!(accepts(id_key, "appKey: \"9f8e7d6c5b4a39281706\"").is_some());
        assert!(accepts(id_key, "appKey: this.options.appKey").is_none());
        assert!(accepts(id_key, "pageSize: \"20000000\"").is_none());
    }

    #[test]
    fn test_jwt_header_check() {
        let token = "\"eyJhbGciOiJIUzI1NiJ9.eyJzdWIiOiIxMjM0NTY3ODkwIn0.sig\"";
        assert!(accepts(jwt, token).is_some());
        assert!(accepts(jwt, "\"eyeballs-are-great.definitely-not-jwt\"").is_none());
    }

    #[test]
    fn test_url_same_host_reclassified() {
        let out = accepts(url, "https://www.example.com/api/getUser").unwrap();
        assert!(out.contains(Category::Url, "https://www.example.com/api/getUser"));
        assert!(out.contains(Category::AbsoluteApi, "/api/getUser"));

        let out = accepts(url, "https://www.example.com/files/report.pdf").unwrap();
        assert!(out.contains(Category::DocFile, "/files/report.pdf"));

        let out = accepts(url, "https://other.example.org/api/x").unwrap();
        assert_eq!(out.count(Category::AbsoluteApi), 0);
    }

    #[test]
    fn test_github_bucket() {
        let out = accepts(url, "https://github.com/acme/secrets").unwrap();
        assert!(out.contains(Category::GithubUrl, "https://github.com/acme/secrets"));
        assert_eq!(out.count(Category::Url), 0);
    }

    #[test]
    fn test_company_filter() {
        assert!(accepts(company, "北京某某科技有限公司").is_some());
        assert!(accepts(company, "请联系我们的客服中心").is_none());
        assert!(accepts(company, "某某（北京）科技公司").is_some());
    }

    #[test]
    fn test_email_skips_assets() {
        assert!(accepts(email, "logo@2x.png").is_none());
        assert!(accepts(email, "admin@example.com").is_some());
    }
}
