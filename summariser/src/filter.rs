use serde::Serialize;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::collection::RunCollection;
use crate::model::{Implementation, RunRecord};

const ALL: &str = "all";

#[derive(Debug, thiserror::Error)]
pub enum SelectorParseError {
    #[error("Invalid implementation selector `{0}`, expected iframe, web-component, unknown or all")]
    Implementation(String),
    #[error("Invalid instance count selector `{0}`, expected a non-negative integer or all")]
    Instances(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(into = "String")]
pub enum ImplementationSelector {
    #[default]
    All,
    Only(Implementation),
}

impl ImplementationSelector {
    pub fn matches(&self, implementation: Implementation) -> bool {
        match self {
            ImplementationSelector::All => true,
            ImplementationSelector::Only(selected) => *selected == implementation,
        }
    }
}

impl FromStr for ImplementationSelector {
    type Err = SelectorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == ALL {
            return Ok(ImplementationSelector::All);
        }
        s.parse()
            .map(ImplementationSelector::Only)
            .map_err(|_| SelectorParseError::Implementation(s.to_string()))
    }
}

impl Display for ImplementationSelector {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ImplementationSelector::All => f.write_str(ALL),
            ImplementationSelector::Only(implementation) => write!(f, "{implementation}"),
        }
    }
}

impl From<ImplementationSelector> for String {
    fn from(value: ImplementationSelector) -> Self {
        value.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(into = "String")]
pub enum InstanceSelector {
    #[default]
    All,
    Only(u32),
}

impl InstanceSelector {
    /// A specific count never matches a run whose instance count is unresolved.
    pub fn matches(&self, instances: Option<u32>) -> bool {
        match self {
            InstanceSelector::All => true,
            InstanceSelector::Only(selected) => instances == Some(*selected),
        }
    }
}

impl FromStr for InstanceSelector {
    type Err = SelectorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == ALL {
            return Ok(InstanceSelector::All);
        }
        s.trim()
            .parse()
            .map(InstanceSelector::Only)
            .map_err(|_| SelectorParseError::Instances(s.to_string()))
    }
}

impl Display for InstanceSelector {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            InstanceSelector::All => f.write_str(ALL),
            InstanceSelector::Only(n) => write!(f, "{n}"),
        }
    }
}

impl From<InstanceSelector> for String {
    fn from(value: InstanceSelector) -> Self {
        value.to_string()
    }
}

/// The user's choice of which runs to look at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RunSelection {
    pub implementation: ImplementationSelector,
    pub instances: InstanceSelector,
}

impl RunSelection {
    pub fn new(implementation: ImplementationSelector, instances: InstanceSelector) -> Self {
        Self {
            implementation,
            instances,
        }
    }

    pub fn matches(&self, record: &RunRecord) -> bool {
        self.implementation.matches(record.implementation)
            && self.instances.matches(record.instances)
    }
}

/// The runs matching `selection`, in collection order.
pub fn select_runs<'a>(
    collection: &'a RunCollection,
    selection: &RunSelection,
) -> Vec<&'a RunRecord> {
    collection
        .iter()
        .filter(|record| selection.matches(record))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::tests::record;

    fn collection() -> RunCollection {
        RunCollection::from_records(vec![
            record(Implementation::Iframe, Some(1), 10),
            record(Implementation::WebComponent, Some(5), 20),
            record(Implementation::Unknown, None, 30),
            record(Implementation::Iframe, Some(5), 40),
        ])
    }

    fn timestamps(records: &[&RunRecord]) -> Vec<i64> {
        records.iter().map(|r| r.timestamp).collect()
    }

    #[test]
    fn select_all_returns_collection_unchanged() {
        let collection = collection();
        let selected = select_runs(&collection, &RunSelection::default());

        assert_eq!(selected.len(), collection.len());
        assert!(selected.iter().copied().eq(collection.iter()));
    }

    #[test]
    fn select_by_implementation() {
        let collection = collection();
        let selection = RunSelection::new(
            ImplementationSelector::Only(Implementation::Iframe),
            InstanceSelector::All,
        );

        assert_eq!(timestamps(&select_runs(&collection, &selection)), vec![40, 10]);

        let selection = RunSelection::new(
            ImplementationSelector::Only(Implementation::Unknown),
            InstanceSelector::All,
        );
        assert_eq!(timestamps(&select_runs(&collection, &selection)), vec![30]);
    }

    #[test]
    fn select_by_both() {
        let collection = collection();
        let selection = RunSelection::new(
            ImplementationSelector::Only(Implementation::Iframe),
            InstanceSelector::Only(5),
        );

        assert_eq!(timestamps(&select_runs(&collection, &selection)), vec![40]);
    }

    #[test]
    fn unresolved_instances_only_match_all() {
        assert!(InstanceSelector::All.matches(None));
        assert!(!InstanceSelector::Only(0).matches(None));
    }

    #[test]
    fn selection_is_idempotent() {
        let collection = collection();
        let selection = RunSelection::new(ImplementationSelector::All, InstanceSelector::Only(5));

        assert_eq!(
            select_runs(&collection, &selection),
            select_runs(&collection, &selection)
        );
    }

    #[test]
    fn parse_selectors() -> anyhow::Result<()> {
        assert_eq!("all".parse::<ImplementationSelector>()?, ImplementationSelector::All);
        assert_eq!(
            "web-component".parse::<ImplementationSelector>()?,
            ImplementationSelector::Only(Implementation::WebComponent)
        );
        assert!("react".parse::<ImplementationSelector>().is_err());

        assert_eq!("all".parse::<InstanceSelector>()?, InstanceSelector::All);
        assert_eq!("10".parse::<InstanceSelector>()?, InstanceSelector::Only(10));
        assert!("-1".parse::<InstanceSelector>().is_err());
        assert!("ten".parse::<InstanceSelector>().is_err());
        Ok(())
    }

    #[test]
    fn selection_serializes_as_strings() -> anyhow::Result<()> {
        let selection = RunSelection::new(
            ImplementationSelector::Only(Implementation::Iframe),
            InstanceSelector::All,
        );

        assert_eq!(
            serde_json::to_value(selection)?,
            serde_json::json!({ "implementation": "iframe", "instances": "all" })
        );
        Ok(())
    }
}
