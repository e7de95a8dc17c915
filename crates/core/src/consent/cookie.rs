use chrono::{DateTime, NaiveDateTime, Utc};

// Same expiry format a browser renders for `document.cookie`.
const EXPIRES_FMT: &str = "%a, %d %b %Y %H:%M:%S GMT";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieRecord {
    pub name: String,
    pub value: String,
    pub expires: DateTime<Utc>,
}

pub fn format_set_cookie(record: &CookieRecord) -> String {
    format!(
        "{}={}; expires={}; path=/; SameSite=Lax; Secure",
        record.name,
        record.value,
        record.expires.format(EXPIRES_FMT)
    )
}

/// Recovers name, value and expiry from a stored cookie line. Lines without
/// a parsable expiry are rejected rather than treated as session cookies.
pub fn parse_set_cookie(line: &str) -> Option<CookieRecord> {
    let mut parts = line.split(';').map(str::trim);

    let (name, value) = parts.next()?.split_once('=')?;
    if name.is_empty() {
        return None;
    }

    let mut expires = None;
    for attribute in parts {
        if let Some((key, raw)) = attribute.split_once('=') {
            if key.eq_ignore_ascii_case("expires") {
                expires = NaiveDateTime::parse_from_str(raw, EXPIRES_FMT)
                    .ok()
                    .map(|naive| naive.and_utc());
            }
        }
    }

    Some(CookieRecord {
        name: name.to_string(),
        value: value.to_string(),
        expires: expires?,
    })
}
