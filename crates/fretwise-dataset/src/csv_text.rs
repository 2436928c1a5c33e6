//! CSV field quoting shared by the note table, dataset, and variation writers.

use std::borrow::Cow;

/// Quote `field` when it holds a separator, a quote, or a line break.
pub(crate) fn quote(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

/// Join fields into one CSV line.
pub(crate) fn join<I, S>(fields: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    fields
        .into_iter()
        .map(|f| quote(f.as_ref()).into_owned())
        .collect::<Vec<_>>()
        .join(",")
}

/// Split one CSV line into fields.
///
/// Unquoted fields are trimmed. Quoted fields keep their content verbatim,
/// with `""` read as a literal quote. `None` means a quote was never closed.
pub(crate) fn split(line: &str) -> Option<Vec<String>> {
    let mut fields = Vec::new();
    let mut chars = line.chars().peekable();

    loop {
        while chars.next_if(|c| *c == ' ' || *c == '\t').is_some() {}

        let mut field = String::new();
        if chars.next_if_eq(&'"').is_some() {
            loop {
                match chars.next() {
                    Some('"') if chars.next_if_eq(&'"').is_some() => field.push('"'),
                    Some('"') => break,
                    Some(c) => field.push(c),
                    None => return None,
                }
            }
            let mut rest = String::new();
            while let Some(c) = chars.next_if(|c| *c != ',') {
                rest.push(c);
            }
            field.push_str(rest.trim());
        } else {
            while let Some(c) = chars.next_if(|c| *c != ',') {
                field.push(c);
            }
            field = field.trim().to_string();
        }
        fields.push(field);

        // either a separator or the end of the line
        if chars.next().is_none() {
            return Some(fields);
        }
    }
}
