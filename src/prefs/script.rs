//! Config-script evaluator.
//!
//! Scripts arrive from the provisioning web form (`POST /config`) and,
//! historically, the serial console. Statements execute in order:
//!
//! ```text
//! # comment                         blank lines and #-lines are skipped
//! version 2.0.0                     refuse incompatible scripts
//! clear                             reset to factory defaults
//! set ssid1 "my network"            quoted values may contain spaces
//! cert mqtt-root-cert               followed by a PEM block
//! -----BEGIN CERTIFICATE-----
//! ...
//! -----END CERTIFICATE-----
//! save                              persist to NVS
//! end                               required terminator
//! ```
//!
//! Errors carry the line number plus a short (OLED) and long (log/HTTP)
//! message. On error the in-memory prefs may be partially mutated — a
//! script wanting a pristine base starts with `clear`.

use log::{info, warn};

use crate::error::ScriptError;
use crate::ports::StoragePort;

use super::{CONFIG_BUGFIX, CONFIG_MAJOR, CONFIG_MINOR, PrefStore};

/// Successful evaluation; `saved` reports whether the script persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub saved: bool,
}

/// Evaluate a configuration script against `prefs`, persisting through
/// `storage` when the script says `save`.
pub fn evaluate(
    input: &mut dyn Iterator<Item = String>,
    prefs: &mut PrefStore,
    storage: &mut impl StoragePort,
) -> Result<Outcome, ScriptError> {
    let mut lineno: u32 = 0;
    let mut saved = false;
    loop {
        lineno += 1;
        let Some(line) = input.next() else {
            return Err(ScriptError::new(
                lineno,
                "Missing END",
                format!("Line {lineno}: Configuration program did not end with `end`"),
            ));
        };
        let kwd = word(&line, 0).unwrap_or_default();
        match kwd.as_str() {
            "end" => return Ok(Outcome { saved }),
            "clear" => prefs.reset_to_factory(),
            "save" => {
                if let Err(e) = prefs.save(storage) {
                    warn!("config: unable to persist parameter store: {e}");
                } else {
                    info!("config: saved");
                }
                saved = true;
            }
            "version" => {
                let arg = word(&line, 1).unwrap_or_default();
                let Some((major, minor, bugfix)) = parse_version(&arg) else {
                    return Err(ScriptError::new(
                        lineno,
                        "Bad statement",
                        format!("Line {lineno}: Bad statement [{line}]"),
                    ));
                };
                // The bugfix number must parse but does not gate anything.
                if major != CONFIG_MAJOR || minor > CONFIG_MINOR {
                    return Err(ScriptError::new(
                        lineno,
                        "Bad version",
                        format!(
                            "Line {lineno}: Bad version {major}.{minor}.{bugfix}, \
                             I'm {CONFIG_MAJOR}.{CONFIG_MINOR}.{CONFIG_BUGFIX}"
                        ),
                    ));
                }
            }
            "set" => {
                let Some(name) = word(&line, 1) else {
                    return Err(ScriptError::new(
                        lineno,
                        "Missing name",
                        format!("Line {lineno}: Missing variable name for 'set'"),
                    ));
                };
                // "" is a legal value; having no value at all is not.
                let Some(value) = word(&line, 2) else {
                    return Err(ScriptError::new(
                        lineno,
                        "Missing value",
                        format!("Line {lineno}: Missing value for variable [{name}]"),
                    ));
                };
                let Some(p) = prefs.get_mut(&name).filter(|p| !p.is_cert()) else {
                    return Err(ScriptError::new(
                        lineno,
                        "Bad name",
                        format!(
                            "Line {lineno}: Unknown or inappropriate variable name for 'set': [{name}]"
                        ),
                    ));
                };
                if p.is_string() {
                    p.str_value = value;
                } else {
                    p.int_value = int_prefix(&value);
                }
            }
            "cert" => {
                let Some(name) = word(&line, 1) else {
                    return Err(ScriptError::new(
                        lineno,
                        "Missing name",
                        format!("Line {lineno}: Missing variable name for 'cert'"),
                    ));
                };
                let value = read_cert_body(input, &mut lineno)?;
                let Some(p) = prefs.get_mut(&name).filter(|p| p.is_cert()) else {
                    return Err(ScriptError::new(
                        lineno,
                        "Bad name",
                        format!(
                            "Line {lineno}: Unknown or inappropriate variable name for 'cert': [{name}]"
                        ),
                    ));
                };
                p.str_value = value;
            }
            _ => {
                let trimmed = line.trim_start();
                if trimmed.is_empty() || trimmed.starts_with('#') {
                    // Comment or blank.
                } else {
                    return Err(ScriptError::new(
                        lineno,
                        "Bad statement",
                        format!("Line {lineno}: Bad configuration statement [{line}]"),
                    ));
                }
            }
        }
    }
}

/// Collect a PEM block: one `-----BEGIN ` line, a body, one `-----END `
/// line, captured verbatim (trailing whitespace trimmed at the ends).
fn read_cert_body(
    input: &mut dyn Iterator<Item = String>,
    lineno: &mut u32,
) -> Result<String, ScriptError> {
    let eof = |lineno: u32| {
        ScriptError::new(
            lineno,
            "EOF in cert",
            format!("Line {lineno}: Unexpected end of input in config (certificate)"),
        )
    };
    *lineno += 1;
    let first = input.next().ok_or_else(|| eof(*lineno))?;
    if !first.starts_with("-----BEGIN ") {
        return Err(ScriptError::new(
            *lineno,
            "Missing BEGIN",
            format!("Line {}: Expected -----BEGIN at the beginning of cert", *lineno),
        ));
    }
    let mut value = first;
    value.push('\n');
    loop {
        *lineno += 1;
        let line = input.next().ok_or_else(|| eof(*lineno))?;
        let done = line.starts_with("-----END ");
        value.push_str(&line);
        value.push('\n');
        if done {
            return Ok(value.trim().to_string());
        }
    }
}

/// The `n`th whitespace-separated word of `line` (0-based), honouring
/// single- and double-quoted words that may contain spaces. A word with an
/// unterminated quote is re-read as if unquoted. `None` past the last word.
pub fn word(line: &str, n: usize) -> Option<String> {
    let chars: Vec<char> = line.chars().collect();
    let lim = chars.len();
    let mut i = 0;
    let mut remaining = n;
    while i < lim {
        while i < lim && chars[i].is_whitespace() {
            i += 1;
        }
        let start = i;
        let mut quote = None;
        if i < lim && (chars[i] == '"' || chars[i] == '\'') {
            quote = Some(chars[i]);
            i += 1;
        }
        loop {
            if i == lim {
                if quote.is_some() {
                    // Missing closing quote: redo the scan without quoting.
                    i = start;
                    quote = None;
                    continue;
                }
                break;
            }
            match quote {
                Some(q) if chars[i] == q => {
                    i += 1;
                    break;
                }
                None if chars[i].is_whitespace() => break,
                _ => i += 1,
            }
        }
        if i == start {
            break; // End of input.
        }
        if remaining == 0 {
            let (from, to) = if quote.is_some() { (start + 1, i - 1) } else { (start, i) };
            return Some(chars[from..to].iter().collect());
        }
        remaining -= 1;
    }
    None
}

/// Leading-integer parse with optional sign; 0 when there are no digits.
fn int_prefix(s: &str) -> i32 {
    let s = s.trim_start();
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => (-1i64, rest),
        None => (1i64, s.strip_prefix('+').unwrap_or(s)),
    };
    let mut value: i64 = 0;
    for c in digits.chars() {
        let Some(d) = c.to_digit(10) else { break };
        value = (value * 10 + i64::from(d)).min(i64::from(i32::MAX));
    }
    (sign * value).clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Parse "M.m.p" into three unsigned components.
fn parse_version(s: &str) -> Option<(u32, u32, u32)> {
    let mut parts = s.split('.');
    let major = parts.next()?.parse().ok()?;
    let minor = parts.next()?.parse().ok()?;
    let bugfix = parts.next()?.parse().ok()?;
    Some((major, minor, bugfix))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::nvs::MemStorage;

    fn run(script: &str) -> (PrefStore, MemStorage, Result<Outcome, ScriptError>) {
        let mut prefs = PrefStore::new();
        let mut storage = MemStorage::new();
        let mut lines = script.lines().map(String::from);
        let result = evaluate(&mut lines, &mut prefs, &mut storage);
        (prefs, storage, result)
    }

    #[test]
    fn empty_script_is_missing_end() {
        let (_, _, result) = run("");
        let err = result.unwrap_err();
        assert_eq!(err.line, 1);
        assert_eq!(err.short, "Missing END");
    }

    #[test]
    fn end_alone_succeeds_without_save() {
        let (_, _, result) = run("end");
        assert_eq!(result.unwrap(), Outcome { saved: false });
    }

    #[test]
    fn set_and_save_persists() {
        let (prefs, storage, result) = run("set ssid1 homenet\nsave\nend");
        assert_eq!(result.unwrap(), Outcome { saved: true });
        assert_eq!(prefs.get_str("ssid1"), "homenet");
        assert!(storage.exists(super::super::PREFS_NAMESPACE, "s1"));
    }

    #[test]
    fn without_save_storage_is_untouched() {
        let (prefs, storage, result) = run("set ssid1 homenet\nend");
        assert!(result.is_ok());
        assert_eq!(prefs.get_str("ssid1"), "homenet");
        assert!(storage.is_empty());
    }

    #[test]
    fn quoted_values_keep_spaces() {
        let (prefs, _, result) = run("set ssid1 \"cafe wifi 2.4\"\nset ssid2 'a b'\nend");
        assert!(result.is_ok());
        assert_eq!(prefs.get_str("ssid1"), "cafe wifi 2.4");
        assert_eq!(prefs.get_str("ssid2"), "a b");
    }

    #[test]
    fn quoted_empty_value_is_legal() {
        let (prefs, _, result) = run("set ssid1 before\nset ssid1 \"\"\nend");
        assert!(result.is_ok());
        assert_eq!(prefs.get_str("ssid1"), "");
    }

    #[test]
    fn missing_value_is_an_error() {
        let (_, _, result) = run("set ssid1\nend");
        let err = result.unwrap_err();
        assert_eq!(err.line, 1);
        assert_eq!(err.short, "Missing value");
    }

    #[test]
    fn unknown_name_is_an_error() {
        let (_, _, result) = run("set frobnicate 7\nend");
        assert_eq!(result.unwrap_err().short, "Bad name");
    }

    #[test]
    fn set_refuses_cert_names() {
        let (_, _, result) = run("set mqtt-root-cert xyz\nend");
        assert_eq!(result.unwrap_err().short, "Bad name");
    }

    #[test]
    fn int_prefs_parse_leading_digits() {
        let (prefs, _, result) = run("set mqtt-endpoint-port 8883\nset enabled 0\nend");
        assert!(result.is_ok());
        assert_eq!(prefs.get_int("mqtt-endpoint-port"), 8883);
        assert_eq!(prefs.get_int("enabled"), 0);
    }

    #[test]
    fn version_match_passes() {
        let (_, _, result) = run("version 2.0.0\nend");
        assert!(result.is_ok());
        let (_, _, result) = run("version 2.0.9\nend");
        assert!(result.is_ok(), "bugfix is ignored but must parse");
    }

    #[test]
    fn newer_major_is_rejected_on_line_one() {
        let (_, _, result) = run("version 3.0.0\nend");
        let err = result.unwrap_err();
        assert_eq!(err.line, 1);
        assert_eq!(err.short, "Bad version");
        assert!(err.long.contains("3.0.0"));
    }

    #[test]
    fn newer_minor_is_rejected() {
        let (_, _, result) = run("version 2.1.0\nend");
        assert_eq!(result.unwrap_err().short, "Bad version");
    }

    #[test]
    fn unparsable_version_is_bad_statement() {
        let (_, _, result) = run("version two\nend");
        assert_eq!(result.unwrap_err().short, "Bad statement");
    }

    #[test]
    fn comments_and_blanks_are_skipped() {
        let (prefs, _, result) = run("# hello\n\n   # indented\nset ssid1 x\nend");
        assert!(result.is_ok());
        assert_eq!(prefs.get_str("ssid1"), "x");
    }

    #[test]
    fn stray_token_is_bad_statement() {
        let (_, _, result) = run("frobnicate\nend");
        let err = result.unwrap_err();
        assert_eq!(err.short, "Bad statement");
        assert_eq!(err.line, 1);
    }

    #[test]
    fn clear_resets_earlier_sets() {
        let (prefs, _, result) = run("set ssid1 gone\nclear\nend");
        assert!(result.is_ok());
        assert_eq!(prefs.get_str("ssid1"), "");
    }

    const CERT: &str = "-----BEGIN CERTIFICATE-----\nMIIBabc\nMIIBdef\n-----END CERTIFICATE-----";

    #[test]
    fn cert_captures_begin_to_end_verbatim() {
        let script = format!("cert mqtt-root-cert\n{CERT}\nend");
        let (prefs, _, result) = run(&script);
        assert!(result.is_ok());
        assert_eq!(prefs.get_str("mqtt-root-cert"), CERT);
    }

    #[test]
    fn cert_without_begin_fails() {
        let (_, _, result) = run("cert mqtt-root-cert\nnot a pem\nend");
        let err = result.unwrap_err();
        assert_eq!(err.short, "Missing BEGIN");
        assert_eq!(err.line, 2);
    }

    #[test]
    fn cert_eof_before_end_fails() {
        let (_, _, result) = run("cert mqtt-root-cert\n-----BEGIN CERTIFICATE-----\nMIIB");
        assert_eq!(result.unwrap_err().short, "EOF in cert");
    }

    #[test]
    fn cert_on_non_cert_name_fails_after_body() {
        let script = format!("cert ssid1\n{CERT}\nend");
        let (_, _, result) = run(&script);
        let err = result.unwrap_err();
        assert_eq!(err.short, "Bad name");
        // The body was consumed; the error points past it.
        assert_eq!(err.line, 5);
    }

    #[test]
    fn error_leaves_partial_mutation() {
        let (prefs, _, result) = run("set ssid1 kept\nset bogus x\nend");
        assert!(result.is_err());
        assert_eq!(prefs.get_str("ssid1"), "kept");
    }

    #[test]
    fn word_tokenizer_corner_cases() {
        assert_eq!(word("a b c", 1).as_deref(), Some("b"));
        assert_eq!(word("  a  ", 0).as_deref(), Some("a"));
        assert_eq!(word("a", 1), None);
        assert_eq!(word("'x y' z", 0).as_deref(), Some("x y"));
        assert_eq!(word("'x y' z", 1).as_deref(), Some("z"));
        // Unterminated quote falls back to an unquoted scan.
        assert_eq!(word("'abc", 0).as_deref(), Some("'abc"));
        assert_eq!(word("", 0), None);
    }

    #[test]
    fn int_prefix_matches_c_atoi_habits() {
        assert_eq!(int_prefix("123"), 123);
        assert_eq!(int_prefix("-5"), -5);
        assert_eq!(int_prefix("12ab"), 12);
        assert_eq!(int_prefix("abc"), 0);
        assert_eq!(int_prefix(""), 0);
    }
}
