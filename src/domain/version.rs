use std::cmp::Ordering;
use std::fmt;

/// Pre-release stage, ordered from earliest to latest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PreReleaseStage {
    Alpha,
    Beta,
    ReleaseCandidate,
}

impl PreReleaseStage {
    fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "a" | "alpha" => Some(Self::Alpha),
            "b" | "beta" => Some(Self::Beta),
            "c" | "rc" | "pre" | "preview" => Some(Self::ReleaseCandidate),
            _ => None,
        }
    }

    fn tag(self) -> &'static str {
        match self {
            Self::Alpha => "a",
            Self::Beta => "b",
            Self::ReleaseCandidate => "rc",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PreRelease {
    pub stage: PreReleaseStage,
    pub number: u64,
}

/// A version recovered from an artifact name (e.g. "1.6.0", "2.0rc1").
///
/// Release components compare numerically with implicit zero padding, so
/// `1.2 == 1.2.0`. Components may exceed any machine integer. A pre-release sorts before its final release. The
/// sentinel returned by [`Version::sentinel`] sorts below every parseable
/// version.
#[derive(Debug, Clone)]
pub struct Version {
    /// Decimal components without leading zeros ("0" for zero).
    release: Vec<String>,
    pre: Option<PreRelease>,
    sentinel: bool,
}

impl Version {
    /// Parse a single version-shaped token.
    ///
    /// Accepts an optional leading `v`, dot-separated numeric components and an
    /// optional pre-release suffix (`a`, `b`, `rc`, ...) with an optional number.
    /// Returns `None` for anything else.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.strip_prefix(['v', 'V']).unwrap_or(s);
        let split_at = s.find(|c: char| c.is_ascii_alphabetic()).unwrap_or(s.len());
        let (release_part, pre_part) = s.split_at(split_at);

        if release_part.is_empty() || release_part.ends_with('.') {
            return None;
        }
        let mut release = Vec::new();
        for segment in release_part.split('.') {
            if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            let trimmed = segment.trim_start_matches('0');
            release.push(if trimmed.is_empty() { "0" } else { trimmed }.to_string());
        }

        let pre = if pre_part.is_empty() { None } else { Some(parse_pre_release(pre_part)?) };

        Some(Self { release, pre, sentinel: false })
    }

    /// The lowest possible version, used when a name carries no parseable version.
    pub fn sentinel() -> Self {
        Self { release: Vec::new(), pre: None, sentinel: true }
    }

    pub fn is_sentinel(&self) -> bool {
        self.sentinel
    }

    pub fn release(&self) -> &[String] {
        &self.release
    }

    pub fn pre_release(&self) -> Option<PreRelease> {
        self.pre
    }
}

fn parse_pre_release(s: &str) -> Option<PreRelease> {
    let lower = s.to_ascii_lowercase();
    let digits_at = lower.find(|c: char| c.is_ascii_digit()).unwrap_or(lower.len());
    let (tag, number) = lower.split_at(digits_at);
    let stage = PreReleaseStage::from_tag(tag)?;
    let number = if number.is_empty() {
        0
    } else if number.bytes().all(|b| b.is_ascii_digit()) {
        number.parse::<u64>().unwrap_or(u64::MAX)
    } else {
        return None;
    };
    Some(PreRelease { stage, number })
}

/// Recover the version embedded in an artifact filename.
///
/// The basename is split into tokens and the first token that parses as a
/// version wins. A purely numeric date fragment placed before the real version
/// is picked up as a single-component version; callers that need strictness
/// should look at a fixed token position instead.
pub fn parse_version_from_name(name: &str) -> Version {
    name_tokens(basename(name))
        .into_iter()
        .find_map(Version::parse)
        .unwrap_or_else(Version::sentinel)
}

fn basename(name: &str) -> &str {
    name.rsplit(['/', '\\']).next().unwrap_or(name)
}

/// Split on `_`, `-`, whitespace, and on `.` unless it joins two digits.
fn name_tokens(name: &str) -> Vec<&str> {
    let bytes = name.as_bytes();
    let mut tokens = Vec::new();
    let mut start = 0;

    for (idx, ch) in name.char_indices() {
        let is_separator = match ch {
            '_' | '-' => true,
            '.' => {
                let prev_digit = idx > 0 && bytes[idx - 1].is_ascii_digit();
                let next_digit = bytes.get(idx + 1).is_some_and(|b| b.is_ascii_digit());
                !(prev_digit && next_digit)
            }
            c => c.is_whitespace(),
        };
        if is_separator {
            if start < idx {
                tokens.push(&name[start..idx]);
            }
            start = idx + ch.len_utf8();
        }
    }
    if start < name.len() {
        tokens.push(&name[start..]);
    }
    tokens
}

/// Order two canonical decimal strings numerically.
fn compare_decimal(left: &str, right: &str) -> Ordering {
    left.len().cmp(&right.len()).then_with(|| left.cmp(right))
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.sentinel, other.sentinel) {
            (true, true) => return Ordering::Equal,
            (true, false) => return Ordering::Less,
            (false, true) => return Ordering::Greater,
            (false, false) => {}
        }

        let max_len = self.release.len().max(other.release.len());
        for idx in 0..max_len {
            let left_value = self.release.get(idx).map_or("0", String::as_str);
            let right_value = other.release.get(idx).map_or("0", String::as_str);
            match compare_decimal(left_value, right_value) {
                Ordering::Equal => {}
                unequal => return unequal,
            }
        }

        match (self.pre, other.pre) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(left), Some(right)) => left.cmp(&right),
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.sentinel {
            return f.write_str("-");
        }
        f.write_str(&self.release.join("."))?;
        if let Some(pre) = self.pre {
            write!(f, "{}{}", pre.stage.tag(), pre.number)?;
        }
        Ok(())
    }
}
