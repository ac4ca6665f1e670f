//! Inputs accepted by [`crate::parse`].

use pycomments_syntax::Module;

/// Source text, raw bytes, or an already parsed tree.
#[derive(Debug, Clone)]
pub enum Source<'a> {
    Text(&'a str),
    /// UTF-8 bytes; a leading byte order mark is ignored.
    Bytes(&'a [u8]),
    /// Returned unchanged by `parse`.
    Tree(Module),
}

impl<'a> From<&'a str> for Source<'a> {
    fn from(text: &'a str) -> Self {
        Source::Text(text)
    }
}

impl<'a> From<&'a String> for Source<'a> {
    fn from(text: &'a String) -> Self {
        Source::Text(text)
    }
}

impl<'a> From<&'a [u8]> for Source<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Source::Bytes(bytes)
    }
}

impl<'a> From<&'a Vec<u8>> for Source<'a> {
    fn from(bytes: &'a Vec<u8>) -> Self {
        Source::Bytes(bytes)
    }
}

impl From<Module> for Source<'_> {
    fn from(module: Module) -> Self {
        Source::Tree(module)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversions() {
        let owned = String::from("x = 1");
        assert!(matches!(Source::from("x = 1"), Source::Text("x = 1")));
        assert!(matches!(Source::from(&owned), Source::Text("x = 1")));
        assert!(matches!(Source::from(&b"x"[..]), Source::Bytes(b"x")));
        assert!(matches!(Source::from(Module::default()), Source::Tree(_)));
    }
}
