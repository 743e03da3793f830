use clap::Parser;

use crate::datasets::{DatasetKind, SetName};

/// Draw a fixed-size sample of a dataset's dev split and remap its contexts
/// onto the dataset's reference corpus.
#[derive(Debug, Clone, Parser)]
#[command(name = "subsample", about = "Save and sample data")]
pub struct SubsampleArgs {
    /// Dataset name.
    pub dataset_name: DatasetKind,

    /// Set name.
    pub set_name: SetName,
}

pub fn parse() -> SubsampleArgs {
    SubsampleArgs::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_positional_dataset_and_set() {
        let args = SubsampleArgs::try_parse_from(["subsample", "2wikimultihopqa", "test"]).unwrap();
        assert_eq!(args.dataset_name, DatasetKind::TwoWikiMultihopQa);
        assert_eq!(args.set_name, SetName::Test);
    }

    #[test]
    fn rejects_unknown_values_and_missing_arguments() {
        assert!(SubsampleArgs::try_parse_from(["subsample", "squad", "dev"]).is_err());
        assert!(SubsampleArgs::try_parse_from(["subsample", "iirc", "train"]).is_err());
        assert!(SubsampleArgs::try_parse_from(["subsample", "iirc"]).is_err());
    }
}
