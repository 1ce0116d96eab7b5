//! Provisioning HTTP routes.
//!
//! Four routes on the soft access point, all pure functions from request
//! to response so the whole surface tests on the host:
//!
//! - `GET /`        — the end-user form, pre-filled with the three
//!                    SSID/password pairs.
//! - `POST /`       — url-encoded form submit; persists on success.
//! - `GET /show`    — the redacted configuration dump.
//! - `POST /config` — a full config script for factory provisioning.
//!
//! Responses carry an optional screen text; the AP loop mirrors outcomes
//! on the OLED so a device without a serial cable is still observable.

use crate::ports::StoragePort;
use crate::prefs::{PrefStore, script};

/// What goes back to the HTTP client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebReply {
    /// Status line tail, e.g. "200 OK".
    pub status: String,
    pub content_type: Option<&'static str>,
    pub body: String,
}

impl WebReply {
    fn html(status: &str, body: String) -> Self {
        Self { status: status.into(), content_type: Some("text/html"), body }
    }

    fn bare(status: String) -> Self {
        Self { status, content_type: None, body: String::new() }
    }
}

/// A handled request: the reply, plus text to mirror on the OLED.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpOutcome {
    pub reply: WebReply,
    pub screen: Option<String>,
}

impl HttpOutcome {
    fn reply_only(reply: WebReply) -> Self {
        Self { reply, screen: None }
    }
}

/// Dispatch one request. `request_line` is the first line ("METHOD /path
/// HTTP/1.1"); `body` is the decoded request body.
pub fn handle_request(
    request_line: &str,
    body: &str,
    prefs: &mut PrefStore,
    storage: &mut impl StoragePort,
) -> HttpOutcome {
    if request_line.starts_with("GET / ") {
        HttpOutcome::reply_only(WebReply::html("200 OK", render_form(prefs, "")))
    } else if request_line.starts_with("GET /show ") {
        let mut out = String::new();
        let _ = prefs.show(&mut out);
        HttpOutcome::reply_only(WebReply::html("200 OK", format!("<pre>{out}</pre>")))
    } else if request_line.starts_with("POST / ") {
        handle_form_post(body, prefs, storage)
    } else if request_line.starts_with("POST /config ") {
        handle_config_script(body, prefs, storage)
    } else {
        log::warn!("web: invalid method or URL {request_line}");
        HttpOutcome::reply_only(WebReply::bare("405 Bad request".into()))
    }
}

/// The reply for a request that never parsed far enough to route.
pub fn failed_request(request_line: &str) -> WebReply {
    log::warn!("web: incomplete request [{request_line}]");
    WebReply::bare("405 Bad request".into())
}

// ---------------------------------------------------------------------------
// Form
// ---------------------------------------------------------------------------

// Eight slots: a status line, then the three SSID/password pairs, with the
// style block up top so the form is usable on a phone.
const FORM_TEMPLATE: &str = r#"<html>
  <head>
    <style>
      table { width: 100%; font-size: 2em }
      input { font-size: 0.7em }
      button { font-size: 2em }
      .status { font-size: 2em }
    </style>
    <title>SnappySense configuration</title>
  </head>
  <body>
    <h1>SnappySense configuration</h1>
    <div class="status">@status@&nbsp;</div>
    <div>&nbsp;</div>
    <div>
      <form method="POST" action="/">
        <table>
          <tr> <td>SSID1</td> <td><input name=ssid1 type="text" value="@ssid1@"/></td>
            <td>Password</td> <td><input name=password1 type="text" value="@password1@"/></td></tr>
          <tr> <td>SSID2</td> <td><input name=ssid2 type="text" value="@ssid2@"/></td>
            <td>Password</td> <td><input name=password2 type="text" value="@password2@"/></td></tr>
          <tr> <td>SSID3</td> <td><input name=ssid3 type="text" value="@ssid3@"/></td>
            <td>Password</td> <td><input name=password3 type="text" value="@password3@"/></td></tr>
        </table>
        <button>Submit</button>
      </form>
    </div>
  </body>
</html>
"#;

fn render_form(prefs: &PrefStore, status: &str) -> String {
    let mut page = FORM_TEMPLATE.replace("@status@", status);
    for n in 1..=3 {
        page = page
            .replace(&format!("@ssid{n}@"), &escape_html(prefs.access_point_ssid(n)))
            .replace(&format!("@password{n}@"), &escape_html(prefs.access_point_password(n)));
    }
    page
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

fn handle_form_post(
    body: &str,
    prefs: &mut PrefStore,
    storage: &mut impl StoragePort,
) -> HttpOutcome {
    let mut updated = false;
    for field in parse_form_urlencoded(body) {
        let Some((key, value)) = field else {
            log::warn!("web: bad request from client, malformed field");
            return HttpOutcome::reply_only(WebReply::bare(
                "405 Bad request - unexpected field".into(),
            ));
        };
        let (slot, is_password) = match key.as_str() {
            "ssid1" => (1, false),
            "ssid2" => (2, false),
            "ssid3" => (3, false),
            "password1" => (1, true),
            "password2" => (2, true),
            "password3" => (3, true),
            _ => {
                log::warn!("web: bad request from client, unexpected field {key}");
                return HttpOutcome::reply_only(WebReply::bare(
                    "405 Bad request - unexpected field".into(),
                ));
            }
        };
        if is_password {
            prefs.set_access_point_password(slot, &value);
        } else {
            prefs.set_access_point_ssid(slot, &value);
        }
        updated = true;
    }
    if updated {
        if let Err(e) = prefs.save(storage) {
            log::warn!("web: save failed: {e}");
        }
    }
    HttpOutcome::reply_only(WebReply::html(
        "202 Accepted",
        render_form(prefs, "VALUES UPDATED!"),
    ))
}

// ---------------------------------------------------------------------------
// Config script
// ---------------------------------------------------------------------------

fn handle_config_script(
    body: &str,
    prefs: &mut PrefStore,
    storage: &mut impl StoragePort,
) -> HttpOutcome {
    let mut lines = body.lines().map(String::from);
    match script::evaluate(&mut lines, prefs, storage) {
        Ok(outcome) => {
            let screen = if outcome.saved {
                "Config accepted\n\nConfig saved"
            } else {
                "Config accepted\n\n*** NOT SAVED ***"
            };
            HttpOutcome {
                reply: WebReply::html("200 OK", "Config accepted\n".into()),
                screen: Some(screen.into()),
            }
        }
        Err(e) => {
            log::warn!("web: invalid factory config: {}", e.long);
            HttpOutcome {
                reply: WebReply::bare(format!("405 Invalid config {}", e.long)),
                screen: Some(format!("Bad config\nLine {}\n{}", e.line, e.short)),
            }
        }
    }
}

// ---------------------------------------------------------------------------
// URL-encoded form parsing
// ---------------------------------------------------------------------------

/// Split `a=1&b=2` into decoded pairs; a `None` item marks a field without
/// an `=`.
fn parse_form_urlencoded(body: &str) -> impl Iterator<Item = Option<(String, String)>> + '_ {
    body.split('&').filter(|f| !f.is_empty()).map(|field| {
        let (key, value) = field.split_once('=')?;
        Some((url_decode(key), url_decode(value)))
    })
}

fn url_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b'%' => {
                let hex = |b: u8| -> Option<u8> {
                    match b {
                        b'0'..=b'9' => Some(b - b'0'),
                        b'a'..=b'f' => Some(b - b'a' + 10),
                        b'A'..=b'F' => Some(b - b'A' + 10),
                        _ => None,
                    }
                };
                if i + 2 < bytes.len() {
                    if let (Some(hi), Some(lo)) = (hex(bytes[i + 1]), hex(bytes[i + 2])) {
                        out.push((hi << 4) | lo);
                        i += 3;
                        continue;
                    }
                }
                // Stray percent: keep it literal.
                out.push(b'%');
                i += 1;
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::nvs::MemStorage;
    use crate::prefs::PREFS_NAMESPACE;

    fn rig() -> (PrefStore, MemStorage) {
        (PrefStore::new(), MemStorage::new())
    }

    #[test]
    fn get_root_renders_prefilled_form() {
        let (mut prefs, mut storage) = rig();
        prefs.set_access_point_ssid(1, "homenet");
        let outcome = handle_request("GET / HTTP/1.1", "", &mut prefs, &mut storage);
        assert_eq!(outcome.reply.status, "200 OK");
        assert!(outcome.reply.body.contains("value=\"homenet\""));
        assert!(outcome.screen.is_none());
    }

    #[test]
    fn form_values_are_html_escaped() {
        let (mut prefs, mut storage) = rig();
        prefs.set_access_point_ssid(1, "a\"b<c>&");
        let outcome = handle_request("GET / HTTP/1.1", "", &mut prefs, &mut storage);
        assert!(outcome.reply.body.contains("a&quot;b&lt;c&gt;&amp;"));
    }

    #[test]
    fn post_root_updates_and_persists() {
        let (mut prefs, mut storage) = rig();
        let body = "ssid1=cafe+wifi&password1=p%40ss&ssid2=&password2=&ssid3=&password3=";
        let outcome = handle_request("POST / HTTP/1.1", body, &mut prefs, &mut storage);
        assert_eq!(outcome.reply.status, "202 Accepted");
        assert!(outcome.reply.body.contains("VALUES UPDATED!"));
        assert_eq!(prefs.access_point_ssid(1), "cafe wifi");
        assert_eq!(prefs.access_point_password(1), "p@ss");
        assert!(storage.exists(PREFS_NAMESPACE, "s1"), "saved to NVS");
    }

    #[test]
    fn post_root_rejects_unknown_field() {
        let (mut prefs, mut storage) = rig();
        let outcome =
            handle_request("POST / HTTP/1.1", "ssid1=x&bogus=1", &mut prefs, &mut storage);
        assert!(outcome.reply.status.starts_with("405"));
        assert!(storage.is_empty(), "nothing persisted on a bad request");
    }

    #[test]
    fn get_show_redacts() {
        let (mut prefs, mut storage) = rig();
        prefs.set_access_point_password(1, "secretive");
        let outcome = handle_request("GET /show HTTP/1.1", "", &mut prefs, &mut storage);
        assert!(outcome.reply.body.contains("s....."));
        assert!(!outcome.reply.body.contains("secretive"));
    }

    #[test]
    fn post_config_saved_and_unsaved_screens() {
        let (mut prefs, mut storage) = rig();
        let outcome = handle_request(
            "POST /config HTTP/1.1",
            "set ssid1 net\nsave\nend",
            &mut prefs,
            &mut storage,
        );
        assert_eq!(outcome.reply.status, "200 OK");
        assert_eq!(outcome.screen.as_deref(), Some("Config accepted\n\nConfig saved"));

        let outcome = handle_request(
            "POST /config HTTP/1.1",
            "set ssid1 other\nend",
            &mut prefs,
            &mut storage,
        );
        assert_eq!(outcome.screen.as_deref(), Some("Config accepted\n\n*** NOT SAVED ***"));
    }

    #[test]
    fn post_config_error_reports_line_and_short_message() {
        let (mut prefs, mut storage) = rig();
        let outcome = handle_request(
            "POST /config HTTP/1.1",
            "version 9.0.0\nend",
            &mut prefs,
            &mut storage,
        );
        assert!(outcome.reply.status.starts_with("405 Invalid config "));
        assert!(outcome.reply.status.contains("Bad version"));
        assert_eq!(outcome.screen.as_deref(), Some("Bad config\nLine 1\nBad version"));
    }

    #[test]
    fn unknown_route_is_405() {
        let (mut prefs, mut storage) = rig();
        let outcome = handle_request("DELETE /x HTTP/1.1", "", &mut prefs, &mut storage);
        assert_eq!(outcome.reply.status, "405 Bad request");
    }

    #[test]
    fn url_decode_cases() {
        assert_eq!(url_decode("a+b"), "a b");
        assert_eq!(url_decode("a%2Fb"), "a/b");
        assert_eq!(url_decode("%41%622"), "Ab2");
        assert_eq!(url_decode("100%"), "100%");
        assert_eq!(url_decode("%G1"), "%G1");
    }
}
