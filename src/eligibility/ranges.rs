use std::collections::BTreeSet;

use super::classifier::Postcode;
use super::ruleset::RuleSetError;

/// The rule document's sentinel meaning "every postcode of this state".
/// Case-sensitive by convention.
const ALL_SENTINEL: &str = "ALL";

/// Expanded membership for one tier entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostcodeSet {
    All,
    Codes(BTreeSet<Postcode>),
}

/// Shared empty set used as the default when a state has no entries. A
/// `static` (rather than an associated `const`) so it has a genuine
/// `'static` lifetime — a `const` of a `Drop` type cannot be promoted to
/// a `'static` reference.
pub(crate) static EMPTY_POSTCODE_SET: PostcodeSet = PostcodeSet::Codes(BTreeSet::new());

impl PostcodeSet {
    pub fn contains(&self, postcode: &Postcode) -> bool {
        match self {
            PostcodeSet::All => true,
            PostcodeSet::Codes(codes) => codes.contains(postcode),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, PostcodeSet::All)
    }
}

/// Expands a list of range-specs ("2000", "4000-4002", "ALL") into a
/// membership set. The sentinel wins over everything else in the list,
/// but every spec is still validated so a malformed rule document cannot
/// hide behind an "ALL" entry.
pub(crate) fn expand_specs(specs: &[String]) -> Result<PostcodeSet, RuleSetError> {
    let mut saw_all = false;
    let mut codes = BTreeSet::new();

    for raw in specs {
        let spec = raw.trim();
        if spec.is_empty() {
            continue;
        }
        if spec == ALL_SENTINEL {
            saw_all = true;
            continue;
        }
        if let Some((low, high)) = spec.split_once('-') {
            let low = parse_bound(spec, low)?;
            let high = parse_bound(spec, high)?;
            // An inverted range is an empty sub-range, not an error.
            for code in low..=high {
                codes.insert(Postcode::from_numeric(code));
            }
        } else {
            let code = Postcode::parse(spec).map_err(|_| RuleSetError::InvalidRangeSpec {
                spec: spec.to_string(),
            })?;
            codes.insert(code);
        }
    }

    if saw_all {
        Ok(PostcodeSet::All)
    } else {
        Ok(PostcodeSet::Codes(codes))
    }
}

fn parse_bound(spec: &str, bound: &str) -> Result<u32, RuleSetError> {
    let bound = bound.trim();
    if bound.is_empty() || bound.len() > 4 || !bound.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(RuleSetError::InvalidRangeSpec {
            spec: spec.to_string(),
        });
    }
    bound.parse().map_err(|_| RuleSetError::InvalidRangeSpec {
        spec: spec.to_string(),
    })
}
