//! Tag-style component registry.
//!
//! The builder asks an injected [`ComponentRegistry`] whether a name denotes a
//! component; it never consults global state.

use std::collections::HashSet;

/// Resolves tag-style component names.
pub trait ComponentRegistry: Send + Sync {
    /// Case-insensitive membership test.
    fn is_component(&self, name: &str) -> bool;
}

/// Components every runtime ships with.
pub const BUILTIN_COMPONENTS: &[&str] = &[
    "abort",
    "application",
    "associate",
    "cache",
    "content",
    "cookie",
    "dbinfo",
    "directory",
    "dump",
    "execute",
    "exit",
    "file",
    "flush",
    "header",
    "htmlhead",
    "http",
    "httpparam",
    "include",
    "invoke",
    "invokeargument",
    "location",
    "lock",
    "log",
    "loop",
    "mail",
    "mailparam",
    "module",
    "object",
    "output",
    "param",
    "procparam",
    "procresult",
    "query",
    "queryparam",
    "savecontent",
    "setting",
    "silent",
    "sleep",
    "storedproc",
    "thread",
    "timer",
    "trace",
    "transaction",
    "xml",
    "zip",
];

/// The stock registry: a case-folded name set.
#[derive(Debug, Clone, Default)]
pub struct ComponentSet {
    names: HashSet<String>,
}

impl ComponentSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn builtin() -> Self {
        let mut set = Self::empty();
        set.extend(BUILTIN_COMPONENTS.iter().copied());
        set
    }

    pub fn register(&mut self, name: &str) {
        self.names.insert(name.to_ascii_lowercase());
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<'a> Extend<&'a str> for ComponentSet {
    fn extend<I: IntoIterator<Item = &'a str>>(&mut self, iter: I) {
        for name in iter {
            self.register(name);
        }
    }
}

impl ComponentRegistry for ComponentSet {
    fn is_component(&self, name: &str) -> bool {
        self.names.contains(&name.to_ascii_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookups_ignore_case() {
        let set = ComponentSet::builtin();
        assert!(set.is_component("Lock"));
        assert!(set.is_component("SAVECONTENT"));
        assert!(!set.is_component("frobnicate"));
    }

    #[test]
    fn registration_extends_the_builtin_set() {
        let mut set = ComponentSet::builtin();
        let before = set.len();
        set.register("Frobnicate");
        assert!(set.is_component("frobnicate"));
        assert_eq!(set.len(), before + 1);
    }
}
