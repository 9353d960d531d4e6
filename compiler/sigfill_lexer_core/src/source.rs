//! Line sources.

/// Pull-based access to source lines.
///
/// `line(index)` returns the full text of the 0-based line including its
/// terminator. `None` or an empty string means the source is exhausted.
/// Lines are requested strictly in increasing order, each at most once.
pub trait LineSource {
    fn line(&mut self, index: usize) -> Option<String>;
}

impl<F> LineSource for F
where
    F: FnMut(usize) -> Option<String>,
{
    #[inline]
    fn line(&mut self, index: usize) -> Option<String> {
        self(index)
    }
}

/// An in-memory source split into lines that keep their terminators.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SourceLines {
    lines: Vec<String>,
}

impl SourceLines {
    pub fn new(text: &str) -> Self {
        SourceLines {
            lines: text.split_inclusive('\n').map(str::to_string).collect(),
        }
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Join `count` lines starting at `start`.
    pub fn joined(&self, start: usize, count: usize) -> String {
        self.lines.iter().skip(start).take(count).map(String::as_str).collect()
    }
}

impl LineSource for SourceLines {
    fn line(&mut self, index: usize) -> Option<String> {
        self.lines.get(index).cloned()
    }
}
