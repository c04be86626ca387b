//! Source preprocessor.
//!
//! Replaces every `import "path";` directive with the preprocessed contents
//! of the named file before scanning. A path already imported during the same
//! run (compared as the literal string) is dropped instead of spliced again.
//! String literals and comments pass through untouched.

use std::collections::HashSet;
use std::fs;
use std::io;

use log::{debug, info};
use memchr::{memchr, memchr_iter, memmem};

use crate::error::{BasilError, Diagnostics};

/// Where imported source text comes from.
pub trait SourceLoader {
    fn load(&self, path: &str) -> io::Result<String>;
}

/// Reads imports from the filesystem, relative to the working directory.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsLoader;

impl SourceLoader for FsLoader {
    fn load(&self, path: &str) -> io::Result<String> {
        fs::read_to_string(path)
    }
}

pub struct Importer<'l> {
    loader: &'l dyn SourceLoader,
    seen: HashSet<String>,
}

impl<'l> Importer<'l> {
    pub fn new(loader: &'l dyn SourceLoader) -> Self {
        Self {
            loader,
            seen: HashSet::new(),
        }
    }

    /// Expand all imports in `source`, recursively.
    pub fn process(&mut self, source: &str) -> std::result::Result<String, Diagnostics> {
        info!("Preprocessing {} bytes of source", source.len());

        let mut errors: Diagnostics = Vec::new();
        let out: String = self.expand(source, &mut errors);

        if errors.is_empty() {
            Ok(out)
        } else {
            Err(errors)
        }
    }

    fn expand(&mut self, source: &str, errors: &mut Diagnostics) -> String {
        let bytes: &[u8] = source.as_bytes();
        let mut out = String::with_capacity(source.len());

        // start of text not yet copied to `out`
        let mut copied: usize = 0;
        let mut curr: usize = 0;
        let mut line: usize = 1;

        while curr < bytes.len() {
            match bytes[curr] {
                b'\n' => {
                    line += 1;
                    curr += 1;
                }

                b'"' => {
                    let end: usize = memchr(b'"', &bytes[curr + 1..])
                        .map_or(bytes.len(), |i| curr + 1 + i + 1);
                    line += count_lines(&bytes[curr..end]);
                    curr = end;
                }

                b'/' if bytes.get(curr + 1) == Some(&b'/') => {
                    curr = memchr(b'\n', &bytes[curr..]).map_or(bytes.len(), |i| curr + i);
                }

                b'/' if bytes.get(curr + 1) == Some(&b'*') => {
                    let end: usize = memmem::find(&bytes[curr + 2..], b"*/")
                        .map_or(bytes.len(), |i| curr + 2 + i + 2);
                    line += count_lines(&bytes[curr..end]);
                    curr = end;
                }

                c if is_alpha(c) => {
                    let start: usize = curr;
                    while curr < bytes.len() && is_alpha_numeric(bytes[curr]) {
                        curr += 1;
                    }

                    if &source[start..curr] != "import" {
                        continue;
                    }

                    out.push_str(&source[copied..start]);
                    curr = self.directive(source, curr, &mut line, &mut out, errors);
                    copied = curr;
                }

                _ => curr += 1,
            }
        }

        out.push_str(&source[copied..]);
        out
    }

    /// Handle the directive whose `import` keyword ends at `curr`. Returns the
    /// offset just past it.
    fn directive(
        &mut self,
        source: &str,
        mut curr: usize,
        line: &mut usize,
        out: &mut String,
        errors: &mut Diagnostics,
    ) -> usize {
        let bytes: &[u8] = source.as_bytes();

        while curr < bytes.len() && bytes[curr].is_ascii_whitespace() {
            if bytes[curr] == b'\n' {
                *line += 1;
            }
            curr += 1;
        }

        if bytes.get(curr) != Some(&b'"') {
            errors.push(BasilError::import(*line, "Expect path string after 'import'."));
            return curr;
        }

        let Some(len) = memchr(b'"', &bytes[curr + 1..]) else {
            errors.push(BasilError::import(*line, "Unterminated import path."));
            return bytes.len();
        };

        let path: &str = &source[curr + 1..curr + 1 + len];
        *line += count_lines(path.as_bytes());
        curr += len + 2;

        // optional trailing `;`
        let mut after: usize = curr;
        while after < bytes.len() && matches!(bytes[after], b' ' | b'\t') {
            after += 1;
        }
        if bytes.get(after) == Some(&b';') {
            curr = after + 1;
        }

        if !self.seen.insert(path.to_string()) {
            debug!("Skipping repeated import of '{}'", path);
            return curr;
        }

        debug!("Importing '{}'", path);

        match self.loader.load(path) {
            Ok(text) => {
                let expanded: String = self.expand(&text, errors);
                out.push_str(&expanded);
            }
            Err(e) => errors.push(BasilError::import(
                *line,
                format!("Could not import '{}': {}", path, e),
            )),
        }

        curr
    }
}

fn count_lines(bytes: &[u8]) -> usize {
    memchr_iter(b'\n', bytes).count()
}

fn is_alpha(c: u8) -> bool {
    c.is_ascii_alphabetic() || c == b'_'
}

fn is_alpha_numeric(c: u8) -> bool {
    is_alpha(c) || c.is_ascii_digit()
}
