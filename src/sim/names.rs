//! Entity name allocation, scoped to one world

use std::collections::{HashMap, HashSet};

use crate::error::{Result, SimError};

/// Hands out unique entity names
///
/// Generated names are `<base><n>` with `n` counting up per base name.
/// Explicit names are claimed as-is and must not collide with any name
/// handed out before, generated or explicit.
#[derive(Debug, Clone, Default)]
pub struct NameAllocator {
    used: HashSet<String>,
    counters: HashMap<String, u32>,
}

impl NameAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate a fresh name from `base`
    pub fn generate(&mut self, base: &str) -> Result<String> {
        if base.trim().is_empty() {
            return Err(SimError::EmptyBaseName);
        }

        let counter = self.counters.entry(base.to_string()).or_insert(0);
        loop {
            *counter += 1;
            let name = format!("{base}{counter}");
            if self.used.insert(name.clone()) {
                return Ok(name);
            }
        }
    }

    /// Claim an explicit name, failing if it is already taken
    pub fn claim(&mut self, name: &str) -> Result<String> {
        if !self.used.insert(name.to_string()) {
            return Err(SimError::DuplicateName(name.to_string()));
        }
        Ok(name.to_string())
    }

    /// Claim `name` if given, otherwise generate one from `base`
    pub fn assign(&mut self, base: &str, name: Option<&str>) -> Result<String> {
        if base.trim().is_empty() {
            return Err(SimError::EmptyBaseName);
        }
        match name {
            Some(name) => self.claim(name),
            None => self.generate(base),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.used.contains(name)
    }

    pub fn len(&self) -> usize {
        self.used.len()
    }

    pub fn is_empty(&self) -> bool {
        self.used.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_names_count_up() {
        let mut names = NameAllocator::new();
        assert_eq!(names.generate("Ball").unwrap(), "Ball1");
        assert_eq!(names.generate("Ball").unwrap(), "Ball2");
        assert_eq!(names.generate("Platform").unwrap(), "Platform1");
        assert_eq!(names.len(), 3);
    }

    #[test]
    fn test_duplicate_explicit_name_fails() {
        let mut names = NameAllocator::new();
        names.claim("Main Ball").unwrap();
        assert!(matches!(
            names.claim("Main Ball"),
            Err(SimError::DuplicateName(n)) if n == "Main Ball"
        ));
    }

    #[test]
    fn test_generated_skips_claimed() {
        let mut names = NameAllocator::new();
        names.claim("Ball1").unwrap();
        assert_eq!(names.generate("Ball").unwrap(), "Ball2");
        // Explicit name colliding with a generated one
        assert!(names.claim("Ball2").is_err());
    }

    #[test]
    fn test_empty_base_rejected() {
        let mut names = NameAllocator::new();
        assert!(matches!(names.generate("  "), Err(SimError::EmptyBaseName)));
        assert!(matches!(names.assign("", Some("x")), Err(SimError::EmptyBaseName)));
    }

    #[test]
    fn test_allocators_are_independent() {
        let mut a = NameAllocator::new();
        let mut b = NameAllocator::new();
        a.claim("FinalPlatform").unwrap();
        assert!(b.claim("FinalPlatform").is_ok());
    }
}
