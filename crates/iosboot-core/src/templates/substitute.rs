//! `{{TOKEN}}` placeholder substitution
//!
//! Single pass, left to right. Recognized tokens are replaced; anything else
//! between braces is copied through verbatim, and substituted values are never
//! rescanned.

/// Replace every recognized `{{KEY}}` in `input` with its value from `table`
pub fn substitute(input: &str, table: &[(&str, String)]) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after_open = &rest[start + 2..];

        let Some(end) = after_open.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };

        let key = &after_open[..end];
        match lookup(table, key.trim()) {
            Some(value) => {
                out.push_str(value);
                rest = &after_open[end + 2..];
            }
            None => {
                // Keep the opening braces and rescan from the next char so a
                // nested `{{{{KEY}}` still resolves its inner token.
                out.push_str("{{");
                rest = after_open;
            }
        }
    }

    out.push_str(rest);
    out
}

fn lookup<'a>(table: &'a [(&str, String)], key: &str) -> Option<&'a str> {
    table
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, value)| value.as_str())
}
