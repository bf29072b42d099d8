use std::fmt;

/// An indirect object identifier: object number plus generation number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IndirectRef {
    pub number: u32,
    pub generation: u32,
}

impl IndirectRef {
    pub fn new(number: u32, generation: u32) -> IndirectRef {
        IndirectRef { number, generation }
    }
}

impl fmt::Display for IndirectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} R", self.number, self.generation)
    }
}

/// Operand of a text showing operator as it appeared in the content stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// Bytes from `<...>` operands, still in the font's own encoding.
    Bytes(Vec<u8>),
    /// Text from `(...)` operands, already decoded from the stream.
    Text(String),
}

/// One unresolved `Tj`/`TJ` payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    /// Position of the operator in the document, shared by both payload kinds.
    pub sequence: u64,
    /// Resource name selected when the operator ran (`F1`), if any.
    pub font: Option<String>,
    pub payload: Payload,
}

/// A fragment after resolution against the document's fonts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextFragment {
    pub text: String,
    pub sequence: u64,
    pub font: String,
}

/// Output of PDF text extraction: resolved fragments in document order.
///
/// Fragments are fine grained (often one per operator), so [`TextOutput::joined`]
/// is usually what a caller wants for the document text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextOutput {
    fragments: Vec<TextFragment>,
}

impl TextOutput {
    /// Get a reference to the resolved fragments.
    pub fn fragments(&self) -> &[TextFragment] {
        &self.fragments
    }

    /// Iterate over the decoded strings in order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.fragments.iter().map(|f| f.text.as_str())
    }

    /// Consume self and return the ordered decoded strings.
    pub fn into_strings(self) -> Vec<String> {
        self.fragments.into_iter().map(|f| f.text).collect()
    }

    /// The full extracted text: every fragment concatenated.
    pub fn joined(&self) -> String {
        self.texts().collect()
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}

impl fmt::Display for TextOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for fragment in &self.fragments {
            writeln!(f, "{}", fragment.text)?;
        }
        Ok(())
    }
}

impl From<Vec<TextFragment>> for TextOutput {
    fn from(mut fragments: Vec<TextFragment>) -> Self {
        fragments.sort_by_key(|f| f.sequence);
        TextOutput { fragments }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fragment(sequence: u64, text: &str) -> TextFragment {
        TextFragment {
            text: text.to_string(),
            sequence,
            font: "F1".to_string(),
        }
    }

    #[test_log::test]
    fn output_is_ordered_by_sequence() {
        let output = TextOutput::from(vec![fragment(3, "c"), fragment(1, "a"), fragment(2, "b")]);
        assert_eq!(output.texts().collect::<Vec<_>>(), ["a", "b", "c"]);
        assert_eq!(output.joined(), "abc");
        assert_eq!(output.to_string(), "a\nb\nc\n");
        assert_eq!(output.into_strings(), ["a", "b", "c"]);
    }

    #[test_log::test]
    fn indirect_ref_display() {
        assert_eq!(IndirectRef::new(6, 0).to_string(), "6 0 R");
    }
}
