//! Area-code value type and the candidate enumerator.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Highest representable area code (`"999"`).
const MAX_CODE: u16 = 999;

/// A three-digit numbering-plan prefix, `"000"` through `"999"`.
///
/// Stored as an integer and always rendered zero-padded, so numeric and
/// lexicographic order agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AreaCode(u16);

impl AreaCode {
    /// Builds an area code from its numeric value.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidAreaCode`] if `value` exceeds 999.
    pub fn new(value: u16) -> Result<Self, CoreError> {
        if value > MAX_CODE {
            return Err(CoreError::InvalidAreaCode(value.to_string()));
        }
        Ok(Self(value))
    }

    #[must_use]
    pub fn value(self) -> u16 {
        self.0
    }

    /// Leading digit of the code (`2` for `"212"`).
    #[must_use]
    pub fn first_digit(self) -> u8 {
        // value <= 999, so the quotient always fits in a u8.
        u8::try_from(self.0 / 100).unwrap_or(9)
    }
}

impl fmt::Display for AreaCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03}", self.0)
    }
}

impl FromStr for AreaCode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 3 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CoreError::InvalidAreaCode(s.to_string()));
        }
        let value = s
            .parse::<u16>()
            .map_err(|_| CoreError::InvalidAreaCode(s.to_string()))?;
        Ok(Self(value))
    }
}

impl TryFrom<String> for AreaCode {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AreaCode> for String {
    fn from(code: AreaCode) -> Self {
        code.to_string()
    }
}

/// Closed interval of area codes to evaluate, `start..=end`.
///
/// A range whose `start` is greater than its `end` is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AreaCodeRange {
    start: AreaCode,
    end: AreaCode,
}

impl Default for AreaCodeRange {
    /// `200..=999`: codes starting with `0` or `1` are never assigned.
    fn default() -> Self {
        Self {
            start: AreaCode(200),
            end: AreaCode(MAX_CODE),
        }
    }
}

impl AreaCodeRange {
    #[must_use]
    pub fn new(start: AreaCode, end: AreaCode) -> Self {
        Self { start, end }
    }

    /// A range holding exactly one code.
    #[must_use]
    pub fn single(code: AreaCode) -> Self {
        Self::new(code, code)
    }

    /// Every code whose first digit lies in `first..=last`, with the middle
    /// and last digits spanning `0-9` (`[6, 9]` gives `600..=999`).
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidDigitRange`] if either digit exceeds 9.
    pub fn from_first_digits(first: u8, last: u8) -> Result<Self, CoreError> {
        if first > 9 || last > 9 {
            return Err(CoreError::InvalidDigitRange { first, last });
        }
        Ok(Self {
            start: AreaCode(u16::from(first) * 100),
            end: AreaCode(u16::from(last) * 100 + 99),
        })
    }

    #[must_use]
    pub fn start(&self) -> AreaCode {
        self.start
    }

    #[must_use]
    pub fn end(&self) -> AreaCode {
        self.end
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    /// Number of codes the range covers.
    #[must_use]
    pub fn len(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            usize::from(self.end.0 - self.start.0) + 1
        }
    }

    /// Lazily yields every code in ascending order. Each call starts over.
    #[must_use]
    pub fn iter(&self) -> AreaCodes {
        AreaCodes {
            next: self.start.0,
            end: self.end.0,
            done: self.is_empty(),
        }
    }
}

impl IntoIterator for AreaCodeRange {
    type Item = AreaCode;
    type IntoIter = AreaCodes;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for &AreaCodeRange {
    type Item = AreaCode;
    type IntoIter = AreaCodes;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for AreaCodeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}

/// Iterator over an [`AreaCodeRange`].
#[derive(Debug, Clone)]
pub struct AreaCodes {
    next: u16,
    end: u16,
    done: bool,
}

impl Iterator for AreaCodes {
    type Item = AreaCode;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let current = self.next;
        if current == self.end {
            self.done = true;
        } else {
            self.next += 1;
        }
        Some(AreaCode(current))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = if self.done {
            0
        } else {
            usize::from(self.end - self.next) + 1
        };
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for AreaCodes {}

impl std::iter::FusedIterator for AreaCodes {}
