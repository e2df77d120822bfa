use serde::Serialize;
use std::{collections::BTreeSet, fmt};

/// Represents the store-defined textual labels attached to one
/// message. Labels are normalized on insertion: surrounding whitespace
/// is trimmed and the name is lowercased, so membership and equality
/// are stable across runs regardless of the casing the store reports.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq, Serialize)]
pub struct CustomFlags(BTreeSet<String>);

impl CustomFlags {
    pub fn normalize<F: AsRef<str>>(flag: F) -> String {
        flag.as_ref().trim().to_lowercase()
    }

    pub fn insert<F: AsRef<str>>(&mut self, flag: F) {
        let flag = Self::normalize(flag);
        if !flag.is_empty() {
            self.0.insert(flag);
        }
    }

    pub fn contains<F: AsRef<str>>(&self, flag: F) -> bool {
        self.0.contains(&Self::normalize(flag))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for CustomFlags {
    fn from(flags: &str) -> Self {
        flags.split_whitespace().collect()
    }
}

impl<F: AsRef<str>> FromIterator<F> for CustomFlags {
    fn from_iter<T: IntoIterator<Item = F>>(iter: T) -> Self {
        let mut flags = CustomFlags::default();
        for flag in iter {
            flags.insert(flag);
        }
        flags
    }
}

impl fmt::Display for CustomFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut glue = "";
        for flag in self.iter() {
            write!(f, "{glue}{flag}")?;
            glue = " ";
        }
        Ok(())
    }
}

#[cfg(test)]
mod custom_flags {
    use super::CustomFlags;

    #[test]
    fn normalizes_on_insertion() {
        let mut flags = CustomFlags::default();
        flags.insert(" Work ");
        flags.insert("WORK");
        flags.insert("");

        assert_eq!(1, flags.len());
        assert!(flags.contains("work"));
        assert!(flags.contains("Work"));
    }

    #[test]
    fn equality_ignores_casing_and_order() {
        assert_eq!(
            CustomFlags::from_iter(["b", "A"]),
            CustomFlags::from("a B"),
        );
    }

    #[test]
    fn display_is_stable() {
        let flags = CustomFlags::from_iter(["urgent", "archived"]);
        assert_eq!("archived urgent", flags.to_string());
    }
}
