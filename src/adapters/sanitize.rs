//! Log sanitization for names and credentials.
//!
//! The looked-up name is personal data. It travels as the `name` query
//! parameter, so any URL that reaches a log line would leak it. Formatted
//! log output passes through a [`Redactor`] that rewrites:
//! - `name=` and `apikey=` query parameter values
//! - e-mail addresses (users paste them into the name field)
//! - `key=value` style tokens and long hex strings
//!
//! Call sites log the query length, never the query. Redaction covers text
//! we don't control, such as error messages from dependencies.
//!
//! Each line is scanned up to a byte limit (`NAMEPROBE_SANITIZE_MAX_BYTES`,
//! default 16 KiB); anything past it is dropped and marked `[TRUNCATED]`.

use std::borrow::Cow;
use std::io::Write;
use std::sync::OnceLock;

use regex::{Regex, RegexSet};
use tracing_subscriber::fmt::MakeWriter;

const DEFAULT_LIMIT: usize = 16 * 1024;
const TRUNCATED: &str = " [TRUNCATED]";

/// (pattern, replacement). Replacements may reference `${1}`.
///
/// Query parameters come first so the broader rules below never see their
/// values.
const RULES: &[(&str, &str)] = &[
    (r"(?i)([?&]name=)[^&\s#)]+", "${1}[REDACTED-NAME]"),
    (r"(?i)([?&]apikey=)[^&\s#)]+", "${1}[REDACTED-KEY]"),
    (
        r"(?i)\b[a-z0-9][a-z0-9._%+-]*@(?:[a-z0-9-]+\.)+[a-z]{2,}\b",
        "[REDACTED-EMAIL]",
    ),
    (
        r"(?i)\b(?:api[_-]?key|token|secret|password)\s*[:=]\s*[A-Za-z0-9+/_-]{16,}={0,2}",
        "[REDACTED-SECRET]",
    ),
    (r"\b[0-9a-fA-F]{32,}\b", "[REDACTED-KEY]"),
];

/// Compiled redaction rules with a per-input scan limit.
pub struct Redactor {
    any: RegexSet,
    rules: Vec<(Regex, &'static str)>,
    limit: usize,
}

impl Redactor {
    /// Compile the rules with the given byte limit (0 means the default).
    #[must_use]
    pub fn new(limit: usize) -> Self {
        let any = RegexSet::new(RULES.iter().map(|(p, _)| *p)).expect("Valid regex set");
        let rules = RULES
            .iter()
            .map(|(p, r)| (Regex::new(p).expect("Valid regex"), *r))
            .collect();

        Self {
            any,
            rules,
            limit: if limit == 0 { DEFAULT_LIMIT } else { limit },
        }
    }

    /// Process-wide instance, configured from the environment on first use.
    pub fn global() -> &'static Redactor {
        static GLOBAL: OnceLock<Redactor> = OnceLock::new();
        GLOBAL.get_or_init(|| {
            let limit = std::env::var("NAMEPROBE_SANITIZE_MAX_BYTES")
                .ok()
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(0);
            Redactor::new(limit)
        })
    }

    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Redact `input`, borrowing it unchanged when nothing matches.
    #[must_use]
    pub fn redact<'a>(&self, input: &'a str) -> Cow<'a, str> {
        let head = clip(input, self.limit);
        let clipped = head.len() < input.len();

        let hits = self.any.matches(head);
        if !hits.matched_any() && !clipped {
            return Cow::Borrowed(input);
        }

        let mut text = head.to_string();
        for idx in hits.iter() {
            let (regex, replacement) = &self.rules[idx];
            let replaced = regex.replace_all(&text, *replacement).into_owned();
            text = replaced;
        }
        if clipped {
            text.push_str(TRUNCATED);
        }
        Cow::Owned(text)
    }

    #[must_use]
    pub fn is_sensitive(&self, input: &str) -> bool {
        self.any.is_match(clip(input, self.limit))
    }
}

/// Longest prefix of `input` no longer than `max` bytes that ends on a char
/// boundary.
fn clip(input: &str, max: usize) -> &str {
    if input.len() <= max {
        return input;
    }
    let end = (0..=max).rev().find(|&i| input.is_char_boundary(i)).unwrap_or(0);
    &input[..end]
}

/// Redact with the process-wide rules.
#[must_use]
pub fn sanitize(input: &str) -> String {
    Redactor::global().redact(input).into_owned()
}

/// Whether `sanitize` would change anything in `input`.
#[must_use]
pub fn contains_sensitive(input: &str) -> bool {
    Redactor::global().is_sensitive(input)
}

/// `MakeWriter` wrapper that redacts each formatted log line before it
/// reaches the inner writer.
#[derive(Debug, Clone)]
pub struct SanitizingMakeWriter<M> {
    inner: M,
}

impl<M> SanitizingMakeWriter<M> {
    #[must_use]
    pub fn new(inner: M) -> Self {
        Self { inner }
    }
}

impl<'a, M> MakeWriter<'a> for SanitizingMakeWriter<M>
where
    M: MakeWriter<'a>,
{
    type Writer = LineRedactingWriter<'static, M::Writer>;

    fn make_writer(&'a self) -> Self::Writer {
        LineRedactingWriter::new(self.inner.make_writer(), Redactor::global())
    }
}

/// Buffers partial lines and forwards complete, redacted ones.
pub struct LineRedactingWriter<'r, W> {
    inner: W,
    redactor: &'r Redactor,
    pending: Vec<u8>,
}

impl<'r, W: Write> LineRedactingWriter<'r, W> {
    fn new(inner: W, redactor: &'r Redactor) -> Self {
        Self {
            inner,
            redactor,
            pending: Vec::new(),
        }
    }

    fn emit(&mut self, bytes: &[u8]) -> std::io::Result<()> {
        let (body, newline) = match bytes.strip_suffix(b"\n") {
            Some(body) => (body, true),
            None => (bytes, false),
        };
        let text = String::from_utf8_lossy(body);
        self.inner.write_all(self.redactor.redact(&text).as_bytes())?;
        if newline {
            self.inner.write_all(b"\n")?;
        }
        Ok(())
    }

    fn drain_complete_lines(&mut self) -> std::io::Result<()> {
        let Some(last_newline) = self.pending.iter().rposition(|&b| b == b'\n') else {
            return Ok(());
        };
        let complete: Vec<u8> = self.pending.drain(..=last_newline).collect();
        for line in complete.split_inclusive(|&b| b == b'\n') {
            self.emit(line)?;
        }
        Ok(())
    }
}

impl<W: Write> Write for LineRedactingWriter<'_, W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.pending.extend_from_slice(buf);
        self.drain_complete_lines()?;

        // No newline in sight: don't let one runaway line grow unbounded.
        if self.pending.len() > self.redactor.limit().saturating_mul(2) {
            let overflow = std::mem::take(&mut self.pending);
            self.emit(&overflow)?;
            self.inner.write_all(b"\n")?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.drain_complete_lines()?;
        if !self.pending.is_empty() {
            let rest = std::mem::take(&mut self.pending);
            self.emit(&rest)?;
        }
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn redactor() -> Redactor {
        Redactor::new(0)
    }

    #[test]
    fn test_redacts_name_parameter() {
        let input = "error sending request for url (https://api.agify.io/?name=Marta%20Ruiz&x=1)";
        let out = redactor().redact(input);
        assert!(out.contains("?name=[REDACTED-NAME]&x=1"));
        assert!(!out.contains("Marta"));
    }

    #[test]
    fn test_redacts_name_at_end_of_url_in_parens() {
        let out = redactor().redact("(https://api.agify.io/?name=Bo)");
        assert_eq!(out, "(https://api.agify.io/?name=[REDACTED-NAME])");
    }

    #[test]
    fn test_redacts_api_key_parameter() {
        let out = redactor().redact("GET https://api.genderize.io/?name=bo&apikey=abc123def");
        assert!(out.contains("&apikey=[REDACTED-KEY]"));
        assert!(!out.contains("abc123def"));
        assert!(!out.contains("=bo"));
    }

    #[test]
    fn test_plain_text_is_borrowed() {
        let input = "age lookup returned HTTP 503";
        assert!(matches!(redactor().redact(input), Cow::Borrowed(s) if s == input));
        assert!(!redactor().is_sensitive(input));
    }

    #[test]
    fn test_redacts_email() {
        let out = redactor().redact("lookup for jane.doe@example.com failed");
        assert_eq!(out, "lookup for [REDACTED-EMAIL] failed");
    }

    #[test]
    fn test_redacts_secrets() {
        let out = redactor().redact("token=QWxhZGRpbjpvcGVuIHNlc2FtZQ");
        assert_eq!(out, "[REDACTED-SECRET]");

        let hex = "d41d8cd98f00b204e9800998ecf8427e";
        assert_eq!(redactor().redact(hex), "[REDACTED-KEY]");
    }

    #[test]
    fn test_limit_truncates() {
        let out = Redactor::new(10).redact("abcdefghij klmnop");
        assert_eq!(out, "abcdefghij [TRUNCATED]");
    }

    #[test]
    fn test_clip_respects_char_boundaries() {
        assert_eq!(clip("ééé", 3), "é");
        assert_eq!(clip("abc", 10), "abc");
        assert_eq!(clip("é", 1), "");
    }

    #[test]
    fn test_global_helpers() {
        assert!(contains_sensitive("https://x/?name=Ana"));
        assert_eq!(sanitize("https://x/?name=Ana"), "https://x/?name=[REDACTED-NAME]");
    }

    #[derive(Clone, Default)]
    struct Sink(Arc<Mutex<Vec<u8>>>);

    impl Sink {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().expect("lock")).into_owned()
        }
    }

    impl Write for Sink {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0
                .lock()
                .map_err(|_| std::io::Error::other("poisoned"))?
                .extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_writer_redacts_complete_lines() {
        let redactor = redactor();
        let sink = Sink::default();
        let mut writer = LineRedactingWriter::new(sink.clone(), &redactor);

        writer
            .write_all(b"first ?name=Ana\nsecond ?name=Li")
            .expect("write");
        assert_eq!(sink.text(), "first ?name=[REDACTED-NAME]\n");

        writer.write_all(b"u\nthird").expect("write");
        assert_eq!(
            sink.text(),
            "first ?name=[REDACTED-NAME]\nsecond ?name=[REDACTED-NAME]\n"
        );

        writer.flush().expect("flush");
        assert!(sink.text().ends_with("\nthird"));
    }

    #[test]
    fn test_writer_bounds_runaway_line() {
        let redactor = Redactor::new(8);
        let sink = Sink::default();
        let mut writer = LineRedactingWriter::new(sink.clone(), &redactor);

        writer.write_all(b"0123456789abcdefXYZ").expect("write");
        assert_eq!(sink.text(), "01234567 [TRUNCATED]\n");
    }
}
