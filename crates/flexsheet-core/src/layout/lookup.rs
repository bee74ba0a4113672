use crate::extraction::TextFragment;

/// The fragment following the first fragment whose text equals `label` exactly.
pub fn fragment_after<'a>(label: &str, fragments: &'a [TextFragment]) -> Option<&'a TextFragment> {
    let index = fragments.iter().position(|f| f.text == label)?;
    fragments.get(index + 1)
}

/// Text of the fragment following `label`, or `None` if the label is absent or last.
pub fn value_after<'a>(label: &str, fragments: &'a [TextFragment]) -> Option<&'a str> {
    fragment_after(label, fragments).map(|f| f.text.as_str())
}
