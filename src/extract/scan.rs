//! Delimiter-pair tokenizer
//!
//! Wiki markup in the wild is not regular enough to parse structurally, so
//! links are recovered by scanning for literal delimiter pairs.

/// Iterator over the fragments enclosed by `open` .. `close`
///
/// Scan semantics:
///
/// - the leftmost `open` is matched with the first `close` after it
/// - the next search for `open` resumes one character past the start of the
///   previous `open`, so nested or adjacent openers are still visited
/// - an `open` with no `close` after it ends the scan
#[derive(Debug, Clone)]
pub struct Between<'a> {
    text: &'a str,
    open: &'a str,
    close: &'a str,
    next_open: Option<usize>,
}

/// Returns the fragments of `text` enclosed by `open` and `close`
///
/// # Examples
///
/// ```
/// use wiki_mirror::extract::find_between;
///
/// let fragments: Vec<&str> = find_between("[[a]] x [[b|c]]", "[[", "]]").collect();
/// assert_eq!(fragments, vec!["a", "b|c"]);
///
/// // Nested openers are visited separately
/// let nested: Vec<&str> = find_between("[[a [[b]] c]]", "[[", "]]").collect();
/// assert_eq!(nested, vec!["a [[b", "b"]);
/// ```
pub fn find_between<'a>(text: &'a str, open: &'a str, close: &'a str) -> Between<'a> {
    let next_open = if open.is_empty() || close.is_empty() {
        None
    } else {
        text.find(open)
    };
    Between {
        text,
        open,
        close,
        next_open,
    }
}

impl<'a> Iterator for Between<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let pos = self.next_open?;
        let start = pos + self.open.len();

        let Some(rel_end) = self.text[start..].find(self.close) else {
            self.next_open = None;
            return None;
        };
        let end = start + rel_end;

        // One character past the opener's start, kept on a char boundary
        let step = self.open.chars().next().map_or(1, char::len_utf8);
        let resume = pos + step;
        self.next_open = self.text[resume..].find(self.open).map(|p| resume + p);

        Some(&self.text[start..end])
    }
}
