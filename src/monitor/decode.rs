//! Header decoding and plain-text body extraction.
//!
//! Both directions are best-effort: a malformed RFC 2047 segment or an
//! undecodable part degrades to partial output, never to an error the
//! scanner has to handle.

use mailparse::{MailHeaderMap, ParsedMail};
use tracing::debug;

/// From header with RFC 2047 encoded words collapsed to readable text.
pub fn decoded_from(mail: &ParsedMail) -> String {
    mail.get_headers().get_first_value("From").unwrap_or_default()
}

/// Subject header, decoded the same way.
pub fn decoded_subject(mail: &ParsedMail) -> String {
    mail.get_headers()
        .get_first_value("Subject")
        .unwrap_or_default()
}

/// From header exactly as transmitted, before any decoding. The sender
/// filter matches against this form.
pub fn raw_from(mail: &ParsedMail) -> String {
    mail.get_headers()
        .get_first_header("From")
        .map(|h| String::from_utf8_lossy(h.get_value_raw()).trim().to_string())
        .unwrap_or_default()
}

/// Seconds since the epoch from the Date header, if present and parsable.
pub fn header_timestamp(mail: &ParsedMail) -> Option<i64> {
    let raw = mail.get_headers().get_first_value("Date")?;
    match mailparse::dateparse(&raw) {
        Ok(ts) => Some(ts),
        Err(err) => {
            debug!(date = %raw, error = %err, "unparsable Date header");
            None
        }
    }
}

/// Extracted message text.
///
/// A multipart message yields the concatenated text of its text/plain
/// parts in traversal order, with non-text parts skipped entirely. A
/// single-part message has its payload decoded directly, whatever its
/// declared type. No extractable text yields an empty string, which is a
/// normal outcome and not an error.
pub fn message_body(mail: &ParsedMail) -> String {
    if mail.subparts.is_empty() {
        return match mail.get_body() {
            Ok(text) => text,
            Err(err) => {
                debug!(error = %err, "single-part body failed to decode");
                String::new()
            }
        };
    }

    let mut body = String::new();
    for sub in &mail.subparts {
        collect_plain_text(sub, &mut body);
    }
    body
}

fn collect_plain_text(part: &ParsedMail, out: &mut String) {
    if !part.subparts.is_empty() {
        for sub in &part.subparts {
            collect_plain_text(sub, out);
        }
        return;
    }

    if part.ctype.mimetype.eq_ignore_ascii_case("text/plain") {
        // get_body decodes the transfer encoding and the declared charset,
        // substituting replacement characters for bad byte sequences.
        match part.get_body() {
            Ok(text) => out.push_str(&text),
            Err(err) => debug!(error = %err, "text/plain part failed to decode"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mailparse::parse_mail;

    #[test]
    fn decodes_q_encoded_subject() {
        let raw = b"From: a@example.com\r\nSubject: =?utf-8?q?Caf=C3=A9_menu?=\r\n\r\nhi\r\n";
        let mail = parse_mail(raw).unwrap();
        assert_eq!(decoded_subject(&mail), "Caf\u{e9} menu");
    }

    #[test]
    fn decodes_b_encoded_from_but_keeps_raw_form() {
        let raw =
            b"From: =?utf-8?B?44GC44GE44GG?= <x@example.jp>\r\nSubject: hi\r\n\r\nhi\r\n";
        let mail = parse_mail(raw).unwrap();
        assert_eq!(decoded_from(&mail), "\u{3042}\u{3044}\u{3046} <x@example.jp>");
        assert!(raw_from(&mail).contains("=?utf-8?B?"));
        assert!(raw_from(&mail).contains("<x@example.jp>"));
    }

    #[test]
    fn missing_headers_decode_to_empty() {
        let mail = parse_mail(b"To: me@example.com\r\n\r\nhi\r\n").unwrap();
        assert_eq!(decoded_from(&mail), "");
        assert_eq!(decoded_subject(&mail), "");
        assert_eq!(raw_from(&mail), "");
    }

    #[test]
    fn parses_rfc2822_date() {
        let raw = b"Date: Tue, 1 Jul 2003 10:52:37 +0200\r\n\r\nhi\r\n";
        let mail = parse_mail(raw).unwrap();
        assert_eq!(header_timestamp(&mail), Some(1057049557));
    }

    #[test]
    fn bad_date_yields_none() {
        let raw = b"Date: not a date\r\n\r\nhi\r\n";
        let mail = parse_mail(raw).unwrap();
        assert_eq!(header_timestamp(&mail), None);
    }

    #[test]
    fn single_part_body_is_extracted() {
        let raw = b"From: a@example.com\r\nContent-Type: text/plain; charset=utf-8\r\n\r\nplain body here\r\n";
        let mail = parse_mail(raw).unwrap();
        assert!(message_body(&mail).contains("plain body here"));
    }

    #[test]
    fn single_part_body_is_extracted_regardless_of_content_type() {
        let raw = b"From: a@example.com\r\nContent-Type: text/html\r\n\r\n<p>urgent ticket</p>\r\n";
        let mail = parse_mail(raw).unwrap();
        assert!(message_body(&mail).contains("urgent ticket"));
    }

    #[test]
    fn base64_transfer_encoding_is_decoded() {
        let raw = b"Content-Type: text/plain; charset=utf-8\r\nContent-Transfer-Encoding: base64\r\n\r\naGVsbG8gd29ybGQ=\r\n";
        let mail = parse_mail(raw).unwrap();
        assert_eq!(message_body(&mail), "hello world");
    }

    #[test]
    fn multipart_concatenates_plain_parts_and_skips_html() {
        let raw = concat!(
            "From: a@example.com\r\n",
            "Content-Type: multipart/mixed; boundary=\"sep\"\r\n",
            "\r\n",
            "--sep\r\n",
            "Content-Type: text/plain; charset=utf-8\r\n",
            "\r\n",
            "first chunk\r\n",
            "--sep\r\n",
            "Content-Type: text/html\r\n",
            "\r\n",
            "<p>markup only</p>\r\n",
            "--sep\r\n",
            "Content-Type: text/plain\r\n",
            "\r\n",
            "second chunk\r\n",
            "--sep--\r\n",
        );
        let mail = parse_mail(raw.as_bytes()).unwrap();
        let body = message_body(&mail);

        assert!(!body.contains("markup only"));
        let first = body.find("first chunk").expect("first part present");
        let second = body.find("second chunk").expect("second part present");
        assert!(first < second, "parts kept in traversal order");
    }

    #[test]
    fn multipart_without_plain_text_yields_empty_body() {
        let raw = concat!(
            "Content-Type: multipart/alternative; boundary=\"sep\"\r\n",
            "\r\n",
            "--sep\r\n",
            "Content-Type: text/html\r\n",
            "\r\n",
            "<p>hi</p>\r\n",
            "--sep--\r\n",
        );
        let mail = parse_mail(raw.as_bytes()).unwrap();
        assert_eq!(message_body(&mail), "");
    }
}
