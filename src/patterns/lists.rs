// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Allow-lists and deny-lists used by the filters

/// Top-level domains accepted by the domain filter
pub const ALLOWED_TLDS: &[&str] = &[
    "wang", "club", "xyz", "vip", "top", "beer", "work", "ren", "technology", "fashion", "luxe",
    "yoga", "red", "love", "online", "ltd", "chat", "group", "pub", "run", "city", "live", "kim",
    "pet", "space", "site", "tech", "host", "fun", "store", "pink", "ski", "design", "ink", "wiki",
    "video", "email", "company", "plus", "center", "cool", "fund", "gold", "guru", "life", "show",
    "team", "today", "world", "zone", "social", "bio", "black", "blue", "green", "lotto",
    "organic", "poker", "promo", "vote", "archi", "voto", "fit", "cn", "website", "press", "icu",
    "art", "law", "shop", "band", "media", "cab", "cash", "cafe", "games", "link", "fan", "net",
    "cc", "com", "fans", "cloud", "info", "pro", "mobi", "asia", "studio", "biz", "vin", "news",
    "fyi", "tax", "tv", "market", "shopping", "mba", "sale", "co", "org", "edu", "gov", "mil",
    "us", "uk", "jp", "de", "fr", "ru",
];

/// Two-level public suffixes accepted as-is
pub const SPECIAL_SUFFIXES: &[&str] = &["org.cn"];

/// Substrings that mark a "domain" as a property chain in code
pub const DOMAIN_BLACKLIST: &[&str] = &[
    "el.datepicker.today",
    "obj.style.top",
    "window.top",
    "mydragdiv.style.top",
    "container.style.top",
    "location.host",
];

/// Identifier words that open a property chain such as `options.config.top`
pub const IDENTIFIER_WORDS: &[&str] = &[
    "e", "el", "this", "prototype", "constructor", "function", "object", "array", "string",
    "number", "boolean", "error", "regexp", "promise", "proxy", "class", "super", "window",
    "document", "global", "process", "require", "module", "exports", "define", "import",
    "export", "default", "return", "yield", "async", "await", "event", "element", "node",
    "style", "scroll", "click", "mouse", "touch", "focus", "blur", "props", "state", "options",
    "config", "params", "length", "parent", "child", "target",
];

/// Exact literals that look like paths but are content types or formats
pub const FILTERED_CONTENT_TYPES: &[&str] = &[
    "multipart/form-data",
    "node_modules/",
    "pause/break",
    "partial/ajax",
    "chrome/",
    "firefox/",
    "edge/",
    "examples/element-ui",
    "static/js/",
    "static/css/",
    "stylesheet/less",
    "jpg/jpeg/png/pdf",
    "yyyy/mm/dd",
    "dd/mm/yyyy",
    "mm/dd/yy",
    "yy/mm/dd",
    "m/d/y",
    "xx/xx",
    "zrender/vml/vml",
];

/// Leading segments of relative paths that are editor/framework internals
pub const RELATIVE_API_NOISE: &[&str] = &[
    "audio",
    "blots",
    "core",
    "ace",
    "icon",
    "css",
    "formats",
    "image",
    "js",
    "modules",
    "text",
    "themes",
    "ui",
    "video",
    "static",
    "attributors",
    "application",
];

/// Value fragments typical of minified code, checked for short values
pub const SHORT_VALUES: &[&str] = &[
    "null",
    "undefined",
    "true",
    "false",
    "none",
    "this.",
    "window",
    "document",
    "function",
    "return",
    "typeof",
    "object",
    "string",
    "number",
    "length",
    "void0",
];

/// Value fragments of library internals and format strings
pub const MEDIUM_VALUES: &[&str] = &[
    "prototype",
    "constructor",
    "yyyy",
    "mm-dd",
    "hh:mm",
    "webpack",
    "jquery",
    "module",
    "exports",
    "require",
    "charcodeat",
    "fromcharcode",
    "tostring",
    "getelement",
    "addeventlistener",
    "localstorage",
    "sessionstorage",
    "placeholder",
    "example",
    "xxxxxx",
];

/// Alphabet tables and padding runs found in encoders
pub const LONG_VALUES: &[&str] = &[
    "abcdefghijklmnopqrstuvwxyz",
    "0123456789abcdef",
    "0123456789",
    "qwertyuiop",
    "aaaaaaaa",
    "00000000",
    "ffffffff",
];

/// Keys that name layout or indexing state, never secrets
pub const ID_KEY_KEY_BLACKLIST: &[&str] = &[
    "index", "length", "size", "width", "height", "mode", "style", "color", "font", "class",
    "sort", "order", "page", "column", "row",
];

/// Words that mark a CJK match as prose rather than an organisation name
pub const COMPANY_BLACKLIST: &[&str] = &[
    "请", "您", "我们", "如果", "点击", "选择", "输入", "登录", "注册", "查看", "是否",
];
