/// Next user id: one past the largest integer among `live_ids`, or `"1"` when none parse.
///
/// Ids are read like `parseInt`: optional leading whitespace and sign, then the
/// leading run of digits; anything after the digits is ignored.
pub fn next_user_id<'a>(live_ids: impl IntoIterator<Item = &'a str>) -> String {
    let max = live_ids
        .into_iter()
        .filter_map(leading_int)
        .max()
        .unwrap_or(0);
    max.saturating_add(1).to_string()
}

fn leading_int(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let value: i64 = rest[..digits_end].parse().ok()?;
    Some(if negative { -value } else { value })
}
