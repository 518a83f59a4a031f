use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntoAsarPathError {
    UnrepresentableStr,
    AbsolutePath,
    EmptySegment,
    EmptyPath,
}

impl std::error::Error for IntoAsarPathError {}

impl fmt::Display for IntoAsarPathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl IntoAsarPathError {
    pub fn as_str(&self) -> &str {
        match self {
            IntoAsarPathError::UnrepresentableStr => "unrepresentable string found in path",
            IntoAsarPathError::AbsolutePath => "archive paths must be relative",
            IntoAsarPathError::EmptySegment => "empty segment found in path",
            IntoAsarPathError::EmptyPath => "no path provided",
        }
    }
}
