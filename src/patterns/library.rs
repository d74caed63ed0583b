// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Compiled extraction patterns
//!
//! The `regex` crate has no lookaround, so context the patterns cannot
//! express (a digit right before an IP, a dot right after a TLD, ...) is
//! declared as a [`Boundary`] and checked around each match.

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use super::lists::ALLOWED_TLDS;

/// Extraction pattern family; each family has one filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternKind {
    Domain,
    Ip,
    Api,
    Phone,
    Email,
    IdCard,
    Url,
    Jwt,
    AwsKey,
    Company,
    Credential,
    Cookie,
    IdKey,
}

/// Which kind of text a chunk came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    /// The page's own HTML and directly observed values
    Page,
    /// An external resource such as a script
    Resource,
}

/// Which content kinds a pattern applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    Both,
    PageOnly,
    ResourceOnly,
}

impl Variant {
    /// Check whether the variant covers a content kind
    pub fn applies_to(&self, kind: ContentKind) -> bool {
        match self {
            Variant::Both => true,
            Variant::PageOnly => kind == ContentKind::Page,
            Variant::ResourceOnly => kind == ContentKind::Resource,
        }
    }
}

/// Predicate on a neighbouring character that invalidates a match
pub type CharGuard = fn(char) -> bool;

/// Context checks around a capture group
#[derive(Debug, Clone, Copy)]
pub struct Boundary {
    /// Capture group the guards refer to (0 = whole match)
    pub group: usize,
    pub reject_before: Option<CharGuard>,
    pub reject_after: Option<CharGuard>,
}

impl Boundary {
    /// No context checks
    pub const NONE: Boundary = Boundary {
        group: 0,
        reject_before: None,
        reject_after: None,
    };

    /// Check a match against its surrounding characters
    pub fn allows(&self, haystack: &str, caps: &Captures<'_>) -> bool {
        let Some(m) = caps.get(self.group) else {
            return false;
        };
        if let Some(reject) = self.reject_before {
            if haystack[..m.start()].chars().next_back().is_some_and(reject) {
                return false;
            }
        }
        if let Some(reject) = self.reject_after {
            if haystack[m.end()..].chars().next().is_some_and(reject) {
                return false;
            }
        }
        true
    }
}

/// A named pattern of the library
#[derive(Debug, Clone)]
pub struct PatternDef {
    pub kind: PatternKind,
    pub name: &'static str,
    pub variant: Variant,
    pub regex: Regex,
    pub boundary: Boundary,
}

pub(crate) fn digit_or_dot(c: char) -> bool {
    c.is_ascii_digit() || c == '.'
}

fn digit(c: char) -> bool {
    c.is_ascii_digit()
}

fn host_continuation(c: char) -> bool {
    c.is_ascii_alphanumeric() || "._=>();!}-".contains(c)
}

fn label_continuation(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '.'
}

fn upper_alnum(c: char) -> bool {
    c.is_ascii_digit() || c.is_ascii_uppercase()
}

fn alnum(c: char) -> bool {
    c.is_ascii_alphanumeric()
}

fn company_tail(c: char) -> bool {
    "法点与查".contains(c)
}

const OCTETS: &str = r"(?:\d{1,3}\.){3}\d{1,3}";

/// Longest first, so `shopping` is tried before `shop`
fn tld_alternation() -> String {
    let mut tlds = ALLOWED_TLDS.to_vec();
    tlds.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
    tlds.join("|")
}

fn def(
    kind: PatternKind,
    name: &'static str,
    variant: Variant,
    pattern: &str,
    boundary: Boundary,
) -> PatternDef {
    PatternDef {
        kind,
        name,
        variant,
        regex: Regex::new(pattern).unwrap(),
        boundary,
    }
}

fn build_table() -> Vec<PatternDef> {
    use PatternKind::*;

    let tlds = tld_alternation();
    vec![
        def(
            Domain,
            "domain",
            Variant::PageOnly,
            &format!(r"\b(?:[a-z0-9%-]+\.)+(?:{})(?::\d{{1,5}})?\b", tlds),
            Boundary {
                group: 0,
                reject_before: None,
                reject_after: Some(host_continuation),
            },
        ),
        def(
            Domain,
            "domain_resource",
            Variant::ResourceOnly,
            &format!(
                r#"["'](?:(?:[a-z0-9]+:)?//)?((?:[a-z0-9%-]+\.)+(?:{}))(?::\d{{1,5}})?\S*?["']"#,
                tlds
            ),
            Boundary {
                group: 1,
                reject_before: None,
                reject_after: Some(label_continuation),
            },
        ),
        def(
            Ip,
            "ip",
            Variant::PageOnly,
            &format!(r"{}(?::\d{{1,5}})?", OCTETS),
            Boundary {
                group: 0,
                reject_before: Some(digit_or_dot),
                reject_after: Some(digit_or_dot),
            },
        ),
        def(
            Ip,
            "ip_resource",
            Variant::ResourceOnly,
            &format!(
                r#"["'](?:(?:[a-zA-Z0-9%-]+:)?//)?{}(?::\d{{1,5}}|/)?\S*?["']"#,
                OCTETS
            ),
            Boundary::NONE,
        ),
        def(
            Api,
            "api",
            Variant::Both,
            r#"["'`](?:/|\.\./|\./)[^/><\s)(},'"\\](?:[^\^><\s)({},'"\\])*?["'`]|["'`][a-zA-Z0-9_]+/(?:[^\^><\s)({},'"\\])*?["'`]"#,
            Boundary::NONE,
        ),
        def(
            Phone,
            "phone",
            Variant::Both,
            r"(?:13[0-9]|14[01456879]|15[0-35-9]|16[2567]|17[0-8]|18[0-9]|19[0-35-9])\d{8}",
            Boundary {
                group: 0,
                reject_before: Some(digit_or_dot),
                reject_after: Some(digit),
            },
        ),
        def(
            Email,
            "email",
            Variant::Both,
            r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}(?:\.[a-zA-Z]{2,})?",
            Boundary::NONE,
        ),
        def(
            IdCard,
            "idcard",
            Variant::Both,
            r"\d{6}(?:18|19|20)\d{2}(?:0[1-9]|10|11|12)(?:[0-2]\d|30|31)\d{3}[\dXx]|\d{8}(?:0\d|10|11|12)(?:[0-2]\d|30|31)\d{3}",
            Boundary {
                group: 0,
                reject_before: Some(digit),
                reject_after: Some(digit),
            },
        ),
        def(
            Url,
            "url",
            Variant::Both,
            r#"(?i)(?:https?|wss?|ftp)://(?:(?:[\w-]+\.)+[a-z]{2,}|(?:\d{1,3}\.){3}\d{1,3})(?::\d{2,5})?(?:/[^\s>)}<'"]*)?"#,
            Boundary::NONE,
        ),
        def(
            Jwt,
            "jwt",
            Variant::Both,
            r#"["'](?:ey[A-Za-z0-9_-]{10,}\.[A-Za-z0-9._-]{10,}|ey[A-Za-z0-9_/+-]{10,}\.[A-Za-z0-9._/+-]{10,})["']"#,
            Boundary::NONE,
        ),
        def(
            AwsKey,
            "aws_key",
            Variant::Both,
            r"AKIA[0-9A-Z]{16}",
            Boundary {
                group: 0,
                reject_before: Some(alnum),
                reject_after: Some(upper_alnum),
            },
        ),
        def(
            Company,
            "company",
            Variant::Both,
            r"[\x{4e00}-\x{9fa5}（）]{4,15}(?:公司|中心)|[\x{4e00}-\x{9fa5}]{2,15}(?:软件|科技|集团)",
            Boundary {
                group: 0,
                reject_before: None,
                reject_after: Some(company_tail),
            },
        ),
        def(
            Credential,
            "credentials",
            Variant::Both,
            r#"(?i)(?:"\w*(?:pwd|pass|user|member|secret|account|admin|root|system)[\w-]*"|'\w*(?:pwd|pass|user|member|secret|account|admin|root|system)[\w-]*'|\b\w*(?:pwd|pass|user|secret|account|admin|root|system)[\w-]*)\s*[:=]\s*(?:"[^,\s"(]*"|'[^,\s'(]*'|[\d\s]+)"#,
            Boundary::NONE,
        ),
        def(
            Cookie,
            "cookie",
            Variant::Both,
            r#"(?i)\b\w*(?:token|PHPSESSID|JSESSIONID)\s*[:=]\s*["']?[a-zA-Z0-9-]{4,}["']?"#,
            Boundary::NONE,
        ),
        def(
            IdKey,
            "wechat_appid",
            Variant::Both,
            r#"["'](wx[a-z0-9]{15,18})["']"#,
            Boundary::NONE,
        ),
        def(
            IdKey,
            "app_key",
            Variant::Both,
            r#"(?i)["']?\b\w*(?:access[_-]?key(?:[_-]?id)?|secret[_-]?key|app[_-]?key|app[_-]?secret|api[_-]?key|client[_-]?secret|corp[_-]?secret|appid|corpid)["']?\s*[:=]\s*["']?[\w\-/+=.]{8,}["']?"#,
            Boundary::NONE,
        ),
    ]
}

lazy_static! {
    static ref PATTERN_TABLE: Vec<PatternDef> = build_table();

    /// Extracts a bare host(:port) from a cleaned domain candidate
    pub static ref DOMAIN_FILTER: Regex =
        Regex::new(r"\b(?:[a-z0-9%-]+\.)+[a-z]{2,10}(?::\d{1,5})?\b").unwrap();
    /// `business.top-speed.top` style CSS/class chains
    pub static ref COMPOUND_TLD: Regex =
        Regex::new(r"\b[a-z]+\.(?:top|bottom)-[a-z]+\.top\b").unwrap();

    pub static ref IMAGE_FILE: Regex =
        Regex::new(r"(?i)\.(?:jpg|jpeg|png|gif|bmp|webp|svg|ico|mp3|mp4|m4a|wav)(?:\?[^'\x22]*)?$").unwrap();
    pub static ref JS_FILE: Regex =
        Regex::new(r"(?i)\.(?:js|jsx|ts|tsx|less)(?:\?[^'\x22]*)?$").unwrap();
    pub static ref DOC_FILE: Regex =
        Regex::new(r"(?i)\.(?:pdf|doc|docx|xls|xlsx|ppt|exe|apk|zip|7z|dll|dmg|pptx|txt|rar|md|swf|csv)(?:\?[^'\x22]*)?$").unwrap();
    pub static ref FONT_FILE: Regex =
        Regex::new(r"(?i)\.(?:ttf|eot|woff|woff2|otf|css)(?:\?[^'\x22]*)?$").unwrap();

    /// Well-known third-party library file names
    pub static ref THIRD_PARTY_JS: Vec<Regex> = [
        r"(?i)^jquery(?:[.-]?\d*\.?\d*\.?\d*)?(?:[.-]cookie)?(?:[.-]fancybox)?(?:[.-]validate)?(?:[.-]artdialog)?(?:[.-]blockui)?(?:[.-]pack)?(?:[.-]base64)?(?:[.-]md5)?(?:[.-]min)?\.js$",
        r"(?i)^(?:vue|vue-router|vuex)[.-]?\d*\.?\d*\.?\d*(?:\.min)?\.js$",
        r"(?i)^(?:react|react-dom)[.-]?\d*\.?\d*\.?\d*(?:\.min)?\.js$",
        r"(?i)^bootstrap(?:\.bundle)?[.-]?\d*\.?\d*\.?\d*(?:\.min)?\.js$",
        r"(?i)^(?:layui|layer|liger|h-ui|element-ui|ueditor|kindeditor|ant-design)[.-]?\d*\.?\d*\.?\d*(?:[.-]all)?(?:\.admin)?(?:\.config)?(?:[.-]min)?\.js$",
        r"(?i)^(?:echarts|chart|highcharts)[.-]?\d*\.?\d*\.?\d*(?:\.min)?\.js$",
        r"(?i)^(?:lodash|moment|tableexport|axios|plupload|pqgrid)[.-]?\d*\.?\d*\.?\d*(?:\.full)?(?:\.min)?\.js$",
        r"(?i)^(?:polyfill|modernizr|device|less|isotope\.pkgd|lhgdialog|kendo\.web|seajs-style|seajs-text|tinymce|jsencrypt|backbone|select2|underscore|ext-all|ext-unigui-min|exporter|v5_float_4)[.-]?\d*\.?\d*\.?\d*(?:[.-]dev)?(?:[.-]min)?\.js$",
        r"(?i)^(?:datepicker|datetimepicker|wdatepicker|laydate)[.-]?\d*\.?\d*\.?\d*(?:\.min)?\.js$",
        r"(?i)^(?:zh|en|zh-cn|zh-tw|ja|ko)[.-]?\d*\.?\d*\.?\d*(?:\.min)?\.js$",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect();
}

/// The ordered pattern table
pub fn pattern_table() -> &'static [PatternDef] {
    &PATTERN_TABLE
}

/// Check whether a script file name belongs to a trusted third-party library
pub fn is_third_party_script(url: &str) -> bool {
    let without_query = url.split(['?', '#']).next().unwrap_or(url);
    let file_name = without_query.rsplit('/').next().unwrap_or(without_query);
    if file_name.is_empty() {
        return false;
    }
    THIRD_PARTY_JS.iter().any(|re| re.is_match(file_name))
}
