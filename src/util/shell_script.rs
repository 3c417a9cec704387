use std::io;

/// Builder for single-line scripts passed to `sh -c`, `bash -c` or a remote `ssh` shell.
///
/// Invariants:
/// - Fragments must not contain `\n` or `\r`.
/// - Fragments are joined with `; `; use `strict()` when a failing step must abort the rest.
#[derive(Debug, Default)]
pub struct ShellScript {
    parts: Vec<String>,
}

impl ShellScript {
    pub fn new() -> Self {
        Self { parts: Vec::new() }
    }

    /// Script that starts with `set -e`.
    pub fn strict() -> Self {
        let mut s = Self::new();
        s.push("set -e");
        s
    }

    pub fn push(&mut self, cmd: impl Into<String>) -> &mut Self {
        self.parts.push(cmd.into());
        self
    }

    /// Push a command built from words, shell-escaping each one.
    pub fn push_words<I, S>(&mut self, words: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let line = words
            .into_iter()
            .map(|w| super::shell_escape(w.as_ref()))
            .collect::<Vec<_>>()
            .join(" ");
        self.parts.push(line);
        self
    }

    pub fn build(&self) -> io::Result<String> {
        for (i, p) in self.parts.iter().enumerate() {
            if p.contains('\n') || p.contains('\r') {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("shell script fragment {i} contains a newline; use atomic fragments"),
                ));
            }
        }
        Ok(self.parts.join("; "))
    }
}
