//! Splits a free-form course subject ("CS 101", "MATH-201") into the short
//! department code and the course number shown side by side on a widget row.

// ─── Data types ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedSubject {
    pub department: String,
    pub number:     String,
}

// ─── Public API ───────────────────────────────────────────────────────────────

/// Never fails: anything without a space or hyphen becomes the department.
///
/// A space wins over a hyphen, so `"CS 101-A"` is `("CS", "101-A")`.
///
/// The space split is a plain split on every single space, so repeated
/// spaces leave empty tokens that survive the rejoin: `"A  B"` is
/// `("A", " B")`. `number` is always exactly the text after the first space.
pub fn parse_subject(subject: &str) -> ParsedSubject {
    if subject.contains(' ') {
        // Everything after the first space, tokens rejoined with single spaces.
        let mut parts = subject.split(' ');
        let department = parts.next().unwrap_or_default().to_owned();
        let number     = parts.collect::<Vec<_>>().join(" ");
        return ParsedSubject { department, number };
    }

    if subject.contains('-') {
        let mut parts = subject.split('-');
        let department = parts.next().unwrap_or_default().to_owned();
        let number     = parts.next().unwrap_or_default().to_owned();
        return ParsedSubject { department, number };
    }

    ParsedSubject { department: subject.to_owned(), number: String::new() }
}
