//! Static lookup tables consulted by the classifier. Built once, read-only afterwards.

use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};

const DISPOSABLE_DOMAINS_RAW: &str = include_str!("../../data/disposable_domains.txt");

pub(crate) static DISPOSABLE_DOMAINS: Lazy<HashSet<String>> = Lazy::new(|| {
    DISPOSABLE_DOMAINS_RAW
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_lowercase)
        .collect()
});

pub(crate) static FREE_PROVIDERS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "gmail.com", "googlemail.com", "yahoo.com", "yahoo.co.uk", "yahoo.co.in",
        "yahoo.ca", "yahoo.com.au", "hotmail.com", "hotmail.co.uk", "hotmail.fr",
        "outlook.com", "outlook.co.uk", "live.com", "live.co.uk", "msn.com",
        "aol.com", "aol.co.uk", "icloud.com", "me.com", "mac.com",
        "mail.com", "email.com", "protonmail.com", "proton.me", "pm.me",
        "zoho.com", "zohomail.com", "yandex.com", "yandex.ru", "ymail.com",
        "gmx.com", "gmx.net", "gmx.de", "web.de", "mail.ru",
        "inbox.com", "fastmail.com", "fastmail.fm", "tutanota.com", "tutanota.de",
        "qq.com", "163.com", "126.com", "sina.com", "sohu.com",
        "rediffmail.com", "rocketmail.com", "att.net", "sbcglobal.net", "bellsouth.net",
        "cox.net", "verizon.net", "earthlink.net", "juno.com", "netzero.net",
    ]
    .into_iter()
    .collect()
});

pub(crate) static ROLE_PREFIXES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "admin", "administrator", "webmaster", "postmaster", "hostmaster",
        "info", "information", "contact", "contacts", "support", "help",
        "helpdesk", "customerservice", "service", "sales", "marketing",
        "billing", "accounts", "accounting", "finance", "hr", "humanresources",
        "jobs", "careers", "recruiting", "recruitment", "press", "media",
        "pr", "news", "legal", "compliance", "privacy", "security",
        "abuse", "spam", "noc", "tech", "technical", "it", "itsupport",
        "feedback", "suggestions", "complaints", "orders", "returns",
        "shipping", "tracking", "subscribe", "unsubscribe", "newsletter",
        "notifications", "alerts", "noreply", "no-reply", "donotreply",
        "do-not-reply", "mailer-daemon", "daemon", "root", "system",
        "team", "staff", "office", "reception", "hello", "hi", "enquiries",
        "inquiries", "general", "all", "everyone", "group", "department",
    ]
    .into_iter()
    .collect()
});

/// Misspelled domain (or `.tld`) to its correction. Keys starting with `.` are TLD-only.
pub(crate) static DOMAIN_TYPOS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    let pairs: &[(&str, &str)] = &[
        // gmail
        ("gmial.com", "gmail.com"), ("gmal.com", "gmail.com"), ("gamil.com", "gmail.com"),
        ("gmil.com", "gmail.com"), ("gmaill.com", "gmail.com"), ("gmail.co", "gmail.com"),
        ("gmail.om", "gmail.com"), ("gnail.com", "gmail.com"), ("gmai.com", "gmail.com"),
        ("gmali.com", "gmail.com"), ("gmaik.com", "gmail.com"), ("gmaikl.com", "gmail.com"),
        ("hmail.com", "gmail.com"), ("fmail.com", "gmail.com"), ("gemail.com", "gmail.com"),
        ("gmsil.com", "gmail.com"), ("gmaiil.com", "gmail.com"), ("gmaol.com", "gmail.com"),
        ("gmaul.com", "gmail.com"), ("gmailc.om", "gmail.com"), ("gmail.cpm", "gmail.com"),
        ("gmail.con", "gmail.com"), ("gmail.vom", "gmail.com"), ("gmail.xom", "gmail.com"),
        ("g]mail.com", "gmail.com"), ("gmaail.com", "gmail.com"),
        // yahoo
        ("yaho.com", "yahoo.com"), ("yahooo.com", "yahoo.com"), ("yahoo.co", "yahoo.com"),
        ("yahho.com", "yahoo.com"), ("yhaoo.com", "yahoo.com"), ("yaoo.com", "yahoo.com"),
        ("yahooi.com", "yahoo.com"), ("yaboo.com", "yahoo.com"), ("tahoo.com", "yahoo.com"),
        ("uahoo.com", "yahoo.com"), ("yahoo.om", "yahoo.com"), ("yahoo.con", "yahoo.com"),
        // hotmail
        ("hotmal.com", "hotmail.com"), ("hotmial.com", "hotmail.com"), ("hotmai.com", "hotmail.com"),
        ("hotmil.com", "hotmail.com"), ("hotamil.com", "hotmail.com"), ("hotmaill.com", "hotmail.com"),
        ("hotmeil.com", "hotmail.com"), ("hotmsil.com", "hotmail.com"), ("hotmail.co", "hotmail.com"),
        ("hotmail.om", "hotmail.com"), ("jotmail.com", "hotmail.com"), ("hitmail.com", "hotmail.com"),
        // outlook
        ("outlok.com", "outlook.com"), ("outloo.com", "outlook.com"), ("outlool.com", "outlook.com"),
        ("outloook.com", "outlook.com"), ("outlokk.com", "outlook.com"), ("oultook.com", "outlook.com"),
        ("outlook.co", "outlook.com"), ("outlook.om", "outlook.com"), ("putlook.com", "outlook.com"),
        // icloud
        ("icloud.co", "icloud.com"), ("icloud.om", "icloud.com"), ("iclooud.com", "icloud.com"),
        ("iclould.com", "icloud.com"), ("icoud.com", "icloud.com"),
        // aol
        ("aol.co", "aol.com"), ("aol.om", "aol.com"), ("aaol.com", "aol.com"),
        // tld-only
        (".con", ".com"), (".cmo", ".com"), (".ocm", ".com"), (".vom", ".com"),
    ];
    pairs.iter().copied().collect()
});
