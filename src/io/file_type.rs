use std::path::Path;

use regex::{Regex, RegexBuilder};

use crate::error::{AssetError, AssetResult};

struct Candidate<T> {
    pattern: String,
    regex: Regex,
    value: T,
}

/// Picks a file type from its name using case-insensitive regex patterns.
///
/// When several patterns match, the longest pattern string is taken as the
/// most specific one. Patterns of equal length resolve to whichever was
/// registered first.
pub struct FileTypeResolver<T> {
    candidates: Vec<Candidate<T>>,
}

impl<T> FileTypeResolver<T> {
    pub fn new() -> Self {
        Self {
            candidates: Vec::new(),
        }
    }

    pub fn register(&mut self, pattern: &str, value: T) -> AssetResult<()> {
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|source| AssetError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })?;

        self.candidates.push(Candidate {
            pattern: pattern.to_string(),
            regex,
            value,
        });
        Ok(())
    }

    pub fn with(mut self, pattern: &str, value: T) -> AssetResult<Self> {
        self.register(pattern, value)?;
        Ok(self)
    }

    /// Matches against the base name of `file_name`; directories never take part.
    pub fn resolve(&self, file_name: impl AsRef<Path>) -> Option<&T> {
        let path = file_name.as_ref();
        let base_name = path
            .file_name()
            .map(|name| name.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());

        let mut best: Option<&Candidate<T>> = None;
        for candidate in &self.candidates {
            if !candidate.regex.is_match(&base_name) {
                continue;
            }
            let longer = best.is_none_or(|current| candidate.pattern.len() > current.pattern.len());
            if longer {
                best = Some(candidate);
            }
        }

        best.map(|candidate| &candidate.value)
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

impl<T> Default for FileTypeResolver<T> {
    fn default() -> Self {
        Self::new()
    }
}
