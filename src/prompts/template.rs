//! Non-strict `$placeholder` substitution.
//!
//! Placeholders are `$name` or `${name}` where `name` matches
//! `[_A-Za-z][_A-Za-z0-9]*`. `$$` renders a literal `$`. A placeholder whose
//! name is not in the value map is copied through unchanged, as is any `$`
//! that does not start a well-formed placeholder, so editing a template can
//! never make rendering fail.

use std::collections::HashMap;

fn is_ident_start(c: char) -> bool {
    c == '_' || c.is_ascii_alphabetic()
}

fn is_ident_char(c: char) -> bool {
    c == '_' || c.is_ascii_alphanumeric()
}

/// Length in bytes of the identifier at the start of `s`, or 0.
fn ident_len(s: &str) -> usize {
    let mut chars = s.char_indices();
    match chars.next() {
        Some((_, c)) if is_ident_start(c) => {}
        _ => return 0,
    }
    chars
        .find(|(_, c)| !is_ident_char(*c))
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

/// Substitute known placeholders in `template`, leaving everything else as is.
pub fn safe_substitute(template: &str, values: &HashMap<&str, String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        if let Some(tail) = after.strip_prefix('$') {
            out.push('$');
            rest = tail;
            continue;
        }

        if let Some(braced) = after.strip_prefix('{') {
            let len = ident_len(braced);
            if len > 0 && braced[len..].starts_with('}') {
                let name = &braced[..len];
                match values.get(name) {
                    Some(value) => out.push_str(value),
                    None => {
                        out.push_str("${");
                        out.push_str(name);
                        out.push('}');
                    }
                }
                rest = &braced[len + 1..];
                continue;
            }
            out.push('$');
            rest = after;
            continue;
        }

        let len = ident_len(after);
        if len > 0 {
            let name = &after[..len];
            match values.get(name) {
                Some(value) => out.push_str(value),
                None => {
                    out.push('$');
                    out.push_str(name);
                }
            }
            rest = &after[len..];
        } else {
            out.push('$');
            rest = after;
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn values() -> HashMap<&'static str, String> {
        HashMap::from([
            ("A_label", "Person".to_string()),
            ("p_label", "hasAddress".to_string()),
            ("few_shot_examples", String::new()),
        ])
    }

    #[rstest]
    #[case("Class $A_label", "Class Person")]
    #[case("Class ${A_label}s", "Class Persons")]
    #[case("$A_label.$p_label", "Person.hasAddress")]
    #[case("cost: $$5", "cost: $5")]
    #[case("$$A_label", "$A_label")]
    #[case("keep $unknown here", "keep $unknown here")]
    #[case("keep ${unknown} here", "keep ${unknown} here")]
    #[case("dangling $", "dangling $")]
    #[case("$ 5 and $9", "$ 5 and $9")]
    #[case("${A_label", "${A_label")]
    #[case("${}", "${}")]
    #[case("[$few_shot_examples]", "[]")]
    #[case("no placeholders", "no placeholders")]
    fn test_safe_substitute(#[case] template: &str, #[case] expected: &str) {
        assert_eq!(safe_substitute(template, &values()), expected);
    }

    #[test]
    fn test_identifier_is_greedy() {
        // `$A_labelX` names `A_labelX`, which is unknown
        assert_eq!(safe_substitute("$A_labelX", &values()), "$A_labelX");
    }

    #[test]
    fn test_substituted_values_are_not_rescanned() {
        let values = HashMap::from([("a", "$b".to_string()), ("b", "nope".to_string())]);
        assert_eq!(safe_substitute("$a", &values), "$b");
    }

    #[test]
    fn test_multibyte_text_around_placeholders() {
        assert_eq!(
            safe_substitute("Třída: $A_label → ok", &values()),
            "Třída: Person → ok"
        );
    }
}
