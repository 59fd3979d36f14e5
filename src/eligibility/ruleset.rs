use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::fs;
use std::path::Path;

use super::classifier::{Postcode, PostcodeError, State};
use super::ranges::{expand_specs, PostcodeSet, EMPTY_POSTCODE_SET};

/// Compiled 462 eligibility rules. Range-specs are validated and expanded
/// once at load time so classification never touches raw rule text.
#[derive(Debug, Clone)]
pub struct RuleSet {
    regional: BTreeMap<State, PostcodeSet>,
    remote_very_remote: BTreeMap<State, PostcodeSet>,
    northern: NorthernRule,
    tourism_extra: BTreeSet<Postcode>,
}

/// Northern Australia tier rule: the whole Northern Territory plus an
/// explicit list of postcodes in other states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NorthernRule {
    pub nt_all: bool,
    pub postcodes: BTreeSet<Postcode>,
}

impl RuleSet {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, RuleSetError> {
        let raw = fs::read_to_string(path.as_ref()).map_err(RuleSetError::Io)?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, RuleSetError> {
        let document: RuleSetDocument = serde_json::from_str(raw)?;
        let definitions = document
            .definitions
            .ok_or(RuleSetError::MissingSection("definitions"))?;

        let regional = compile_state_map(
            definitions
                .regional_australia
                .ok_or(RuleSetError::MissingSection("definitions.regionalAustralia"))?,
        )?;
        let remote_very_remote = compile_state_map(definitions.remote_very_remote_by_state.ok_or(
            RuleSetError::MissingSection("definitions.remoteVeryRemoteByState"),
        )?)?;

        let northern_raw = definitions
            .northern_australia
            .ok_or(RuleSetError::MissingSection("definitions.northernAustralia"))?;
        let northern = NorthernRule {
            nt_all: northern_raw.nt_all.ok_or(RuleSetError::MissingSection(
                "definitions.northernAustralia.ntAll",
            ))?,
            postcodes: parse_postcode_list(northern_raw.postcodes.ok_or(
                RuleSetError::MissingSection("definitions.northernAustralia.postcodes"),
            )?)?,
        };

        let tourism_extra = parse_postcode_list(definitions.tourism_extra_postcodes.ok_or(
            RuleSetError::MissingSection("definitions.tourismExtraPostcodes"),
        )?)?;

        Ok(Self {
            regional,
            remote_very_remote,
            northern,
            tourism_extra,
        })
    }

    /// Regional tier membership for a state; states absent from the rule
    /// document have no regional postcodes.
    pub fn regional(&self, state: State) -> &PostcodeSet {
        self.regional.get(&state).unwrap_or(&EMPTY_POSTCODE_SET)
    }

    pub fn remote_very_remote(&self, state: State) -> &PostcodeSet {
        self.remote_very_remote
            .get(&state)
            .unwrap_or(&EMPTY_POSTCODE_SET)
    }

    pub fn northern(&self) -> &NorthernRule {
        &self.northern
    }

    pub fn tourism_extra(&self) -> &BTreeSet<Postcode> {
        &self.tourism_extra
    }

    /// Every postal area the rules name explicitly: tourism and northern
    /// lists plus all enumerable regional and remote entries. States
    /// covered by the "ALL" sentinel contribute nothing enumerable here.
    pub fn candidate_postcodes(&self) -> BTreeSet<Postcode> {
        let mut candidates: BTreeSet<Postcode> = self.tourism_extra.iter().cloned().collect();
        candidates.extend(self.northern.postcodes.iter().cloned());
        for set in self
            .regional
            .values()
            .chain(self.remote_very_remote.values())
        {
            if let PostcodeSet::Codes(codes) = set {
                candidates.extend(codes.iter().cloned());
            }
        }
        candidates
    }
}

/// Raw document shape for `rules/eligibility-462.json`. Sections are
/// optional here so a missing one is reported by name instead of as a
/// generic decode error; metadata fields outside `definitions` are
/// ignored.
#[derive(Debug, Deserialize)]
struct RuleSetDocument {
    definitions: Option<RawDefinitions>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDefinitions {
    regional_australia: Option<BTreeMap<State, Vec<String>>>,
    remote_very_remote_by_state: Option<BTreeMap<State, Vec<String>>>,
    northern_australia: Option<RawNorthern>,
    tourism_extra_postcodes: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawNorthern {
    nt_all: Option<bool>,
    postcodes: Option<Vec<String>>,
}

fn compile_state_map(
    raw: BTreeMap<State, Vec<String>>,
) -> Result<BTreeMap<State, PostcodeSet>, RuleSetError> {
    raw.into_iter()
        .map(|(state, specs)| expand_specs(&specs).map(|set| (state, set)))
        .collect()
}

fn parse_postcode_list(raw: Vec<String>) -> Result<BTreeSet<Postcode>, RuleSetError> {
    raw.iter()
        .map(|value| Postcode::parse(value).map_err(RuleSetError::from))
        .collect()
}

/// Failures while loading the rule document. All of these are fatal:
/// nothing downstream can be trusted once the rules are suspect.
#[derive(Debug)]
pub enum RuleSetError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    MissingSection(&'static str),
    InvalidRangeSpec { spec: String },
    InvalidPostcode { value: String },
}

impl fmt::Display for RuleSetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleSetError::Io(err) => write!(f, "failed to read rule document: {err}"),
            RuleSetError::Parse(err) => write!(f, "invalid rule document: {err}"),
            RuleSetError::MissingSection(section) => {
                write!(f, "rule document is missing required section '{section}'")
            }
            RuleSetError::InvalidRangeSpec { spec } => {
                write!(f, "rule document contains malformed range spec '{spec}'")
            }
            RuleSetError::InvalidPostcode { value } => {
                write!(f, "rule document contains invalid postcode '{value}'")
            }
        }
    }
}

impl std::error::Error for RuleSetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RuleSetError::Io(err) => Some(err),
            RuleSetError::Parse(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for RuleSetError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err)
    }
}

impl From<PostcodeError> for RuleSetError {
    fn from(err: PostcodeError) -> Self {
        match err {
            PostcodeError::Unclassifiable { value } => Self::InvalidPostcode { value },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL_RULES: &str = r#"{
        "definitions": {
            "regionalAustralia": { "NSW": ["2311-2312"], "SA": ["ALL"] },
            "remoteVeryRemoteByState": { "QLD": ["4825"], "NT": ["ALL"] },
            "northernAustralia": { "ntAll": true, "postcodes": ["4825", "4870"] },
            "tourismExtraPostcodes": ["2450"]
        }
    }"#;

    #[test]
    fn compiles_a_minimal_document() {
        let rules = RuleSet::from_json(MINIMAL_RULES).expect("rules compile");
        assert!(rules.regional(State::Sa).is_all());
        assert!(rules
            .regional(State::Nsw)
            .contains(&Postcode::parse("2312").unwrap()));
        assert!(!rules
            .regional(State::Vic)
            .contains(&Postcode::parse("3550").unwrap()));
        assert!(rules.northern().nt_all);
    }

    #[test]
    fn missing_sections_are_named() {
        let raw = r#"{ "definitions": { "regionalAustralia": {} } }"#;
        let err = RuleSet::from_json(raw).expect_err("incomplete document");
        match err {
            RuleSetError::MissingSection(section) => {
                assert_eq!(section, "definitions.remoteVeryRemoteByState");
            }
            other => panic!("expected missing section, got {other:?}"),
        }
    }

    #[test]
    fn malformed_range_specs_abort_the_load() {
        let raw = MINIMAL_RULES.replace("2311-2312", "2311-23b2");
        let err = RuleSet::from_json(&raw).expect_err("malformed spec");
        match err {
            RuleSetError::InvalidRangeSpec { spec } => assert_eq!(spec, "2311-23b2"),
            other => panic!("expected invalid range spec, got {other:?}"),
        }
    }

    #[test]
    fn invalid_explicit_postcodes_abort_the_load() {
        let raw = MINIMAL_RULES.replace("\"2450\"", "\"24x0\"");
        let err = RuleSet::from_json(&raw).expect_err("invalid postcode");
        match err {
            RuleSetError::InvalidPostcode { value } => assert_eq!(value, "24x0"),
            other => panic!("expected invalid postcode, got {other:?}"),
        }
    }

    #[test]
    fn candidates_skip_all_states_and_union_explicit_entries() {
        let rules = RuleSet::from_json(MINIMAL_RULES).expect("rules compile");
        let candidates: Vec<String> = rules
            .candidate_postcodes()
            .iter()
            .map(|pc| pc.as_str().to_string())
            .collect();
        assert_eq!(candidates, vec!["2311", "2312", "2450", "4825", "4870"]);
    }
}
