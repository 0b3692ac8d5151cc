/// Expand `${VAR}` and `$VAR` references.
///
/// Unknown `${VAR}` references expand to nothing; an unknown `$VAR` is left
/// as written. `$$` is a literal `$`.
pub fn expand_env_vars(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            result.push(c);
            continue;
        }

        match chars.peek() {
            Some('$') => {
                chars.next();
                result.push('$');
            }
            Some('{') => {
                chars.next();
                let mut name = String::new();
                let mut closed = false;
                for c in chars.by_ref() {
                    if c == '}' {
                        closed = true;
                        break;
                    }
                    name.push(c);
                }

                if closed {
                    result.push_str(&std::env::var(&name).unwrap_or_default());
                } else {
                    // No closing brace, keep the text untouched
                    result.push_str("${");
                    result.push_str(&name);
                }
            }
            Some(&next) if next.is_ascii_alphabetic() || next == '_' => {
                let mut name = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_ascii_alphanumeric() || c == '_' {
                        name.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }

                match std::env::var(&name) {
                    Ok(var_value) => result.push_str(&var_value),
                    Err(_) => {
                        result.push('$');
                        result.push_str(&name);
                    }
                }
            }
            _ => result.push('$'),
        }
    }

    result
}
