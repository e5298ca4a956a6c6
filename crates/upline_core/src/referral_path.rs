//! Bounded ancestor path encoding for the referral graph.
//!
//! Each member row denormalizes its upline chain as an ordered list of at
//! most three ancestor ids, nearest first, so downline queries never recurse.
//! The persisted form is a `>`-delimited string.

use std::str::FromStr;

use uuid::Uuid;

/// Maximum number of ancestors encoded on a member row.
pub const MAX_REFERRAL_DEPTH: usize = 3;

/// Delimiter used in the persisted path string.
pub const PATH_DELIMITER: char = '>';

/// Ordered upline chain, nearest ancestor first, at most
/// [`MAX_REFERRAL_DEPTH`] entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferralPath(Vec<Uuid>);

impl ReferralPath {
    /// An empty path (member has no referrer).
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Build from an ancestor list, truncating to [`MAX_REFERRAL_DEPTH`].
    pub fn from_ancestors(ancestors: Vec<Uuid>) -> Self {
        let mut ids = ancestors;
        ids.truncate(MAX_REFERRAL_DEPTH);
        Self(ids)
    }

    /// Path for a new member bound to `referrer_id`: the referrer itself,
    /// followed by the referrer's own ancestors, truncated to depth 3.
    pub fn child_path(referrer_id: Uuid, referrer_path: &ReferralPath) -> Self {
        let mut ids = Vec::with_capacity(MAX_REFERRAL_DEPTH);
        ids.push(referrer_id);
        ids.extend(
            referrer_path
                .0
                .iter()
                .take(MAX_REFERRAL_DEPTH - 1)
                .copied(),
        );
        Self(ids)
    }

    /// Ancestor ids, nearest first.
    pub fn ancestors(&self) -> &[Uuid] {
        &self.0
    }

    /// Number of encoded ancestors.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the member has no referrer.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether `id` appears anywhere in the path.
    pub fn contains(&self, id: Uuid) -> bool {
        self.0.contains(&id)
    }

    /// Level of this member relative to `root`: 1 if `root` is the direct
    /// referrer, 2 or 3 further up, `None` if `root` is not in the path.
    pub fn level_of(&self, root: Uuid) -> Option<u8> {
        self.0
            .iter()
            .position(|id| *id == root)
            .map(|index| (index + 1) as u8)
    }

    /// Persisted `>`-delimited form; empty string for an empty path.
    pub fn encode(&self) -> String {
        self.0
            .iter()
            .map(Uuid::to_string)
            .collect::<Vec<_>>()
            .join(&PATH_DELIMITER.to_string())
    }
}

impl std::fmt::Display for ReferralPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.encode())
    }
}

impl FromStr for ReferralPath {
    type Err = uuid::Error;

    /// Parse the persisted form. Empty segments are skipped; extra depth is
    /// truncated. A malformed id is an error (corrupt path data).
    fn from_str(encoded: &str) -> Result<Self, Self::Err> {
        let mut ids = Vec::with_capacity(MAX_REFERRAL_DEPTH);
        for segment in encoded.split(PATH_DELIMITER) {
            let segment = segment.trim();
            if segment.is_empty() {
                continue;
            }
            ids.push(Uuid::parse_str(segment)?);
        }
        ids.truncate(MAX_REFERRAL_DEPTH);
        Ok(Self(ids))
    }
}
