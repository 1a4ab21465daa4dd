//! Error types.
//!
//! Mirrors the value/reason shape of a hand-rolled error rather than
//! wrapping everything behind a derive macro: each error carries enough
//! context (the offending value, the artefact path) to be useful on its
//! own in a log line or a panic message.

use std::{error::Error as StdError, fmt, io, path::PathBuf};

/// The axis an out-of-range coordinate belongs to.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Axis {
    /// Longitude, valid range `[-180, 180]`.
    Longitude,
    /// Latitude, valid range `[-90, 90]`.
    Latitude,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Longitude => "longitude",
            Self::Latitude => "latitude",
        })
    }
}

/// A coordinate component outside its valid range.
///
/// Raised by [`crate::TimezoneFinder::timezone_at`] and friends before any
/// lookup is attempted; never raised during data loading.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InvalidCoordinate {
    /// The offending value, in degrees.
    pub value: f64,
    /// Which axis the value was meant to be.
    pub axis: Axis,
}

impl InvalidCoordinate {
    pub(crate) const fn new(value: f64, axis: Axis) -> Self {
        Self { value, axis }
    }
}

impl fmt::Display for InvalidCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (lo, hi) = match self.axis {
            Axis::Longitude => (-180., 180.),
            Axis::Latitude => (-90., 90.),
        };
        write!(
            f,
            "invalid {} (got {}): must lie in [{lo}, {hi}]",
            self.axis, self.value
        )
    }
}

impl StdError for InvalidCoordinate {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        None
    }
}

// -----------------------------------------------------------------------------

/// An on-disk artefact that is missing, truncated, or has an unexpected
/// schema, dtype, or magic.
///
/// Raised only while constructing a [`crate::TimezoneFinder`]; never at
/// query time (§7: loader errors are fatal for that engine instance, not
/// for the process).
#[derive(Debug)]
pub struct DataError {
    /// Path of the artefact that failed to load.
    pub path: PathBuf,
    /// Human-readable reason.
    pub reason: String,
}

impl DataError {
    pub(crate) fn new(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self { path: path.into(), reason: reason.into() }
    }
}

impl fmt::Display for DataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.reason)
    }
}

impl StdError for DataError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        None
    }
}

// -----------------------------------------------------------------------------

/// Failure while constructing a [`crate::TimezoneFinder`].
#[derive(Debug)]
pub enum LoadError {
    /// An artefact is missing, truncated, or malformed.
    Data(DataError),
    /// The underlying filesystem operation failed (open, mmap, read).
    Io {
        /// Path being operated on.
        path: PathBuf,
        /// Underlying OS error.
        source: io::Error,
    },
}

impl LoadError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }
}

impl From<DataError> for LoadError {
    fn from(err: DataError) -> Self {
        Self::Data(err)
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Data(err) => write!(f, "{err}"),
            Self::Io { path, source } => {
                write!(f, "{}: {source}", path.display())
            }
        }
    }
}

impl StdError for LoadError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Data(err) => Some(err),
            Self::Io { source, .. } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // All errors must have a non-empty display.
    #[test]
    fn display() {
        assert!(!InvalidCoordinate::new(200., Axis::Longitude)
            .to_string()
            .is_empty());
        assert!(!InvalidCoordinate::new(95., Axis::Latitude)
            .to_string()
            .is_empty());
        assert!(!DataError::new("zones.json", "truncated").to_string().is_empty());
        assert!(!LoadError::from(DataError::new("zones.json", "truncated"))
            .to_string()
            .is_empty());
    }

    #[test]
    fn invalid_coordinate_reports_value() {
        let err = InvalidCoordinate::new(181.5, Axis::Longitude);
        assert_eq!(err.value, 181.5);
        assert_eq!(err.axis, Axis::Longitude);
    }
}
