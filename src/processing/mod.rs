use std::path::PathBuf;

use thiserror::Error;

pub mod canonical;
pub mod category;
pub mod index;
pub mod matcher;
pub mod normalize;
pub mod pipeline;
pub mod similarity;

/// Work selected on the command line.
#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    /// Merge batch categories into the catalog named by the configuration.
    Merge,
    /// Whitespace-normalize the product names of a catalog file.
    Normalize { input: PathBuf, output: PathBuf },
    /// Reduce a storefront category dump to `{id, name, slug}` triples.
    Categories { input: PathBuf, output: PathBuf },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UsageError {
    #[error("unknown command '{0}' (expected merge, normalize or categories)")]
    UnknownCommand(String),
    #[error("usage: {0} <input.json> <output.json>")]
    MissingPaths(&'static str),
}

impl Command {
    /// Parses the arguments following the program name. No arguments means
    /// [`Command::Merge`].
    pub fn from_args<I>(args: I) -> Result<Self, UsageError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut args = args.into_iter();
        let Some(command) = args.next() else {
            return Ok(Command::Merge);
        };

        let mut paths = |name: &'static str| match (args.next(), args.next(), args.next()) {
            (Some(input), Some(output), None) => Ok((PathBuf::from(input), PathBuf::from(output))),
            _ => Err(UsageError::MissingPaths(name)),
        };

        match command.as_str() {
            "merge" => Ok(Command::Merge),
            "normalize" => {
                let (input, output) = paths("normalize")?;
                Ok(Command::Normalize { input, output })
            }
            "categories" => {
                let (input, output) = paths("categories")?;
                Ok(Command::Categories { input, output })
            }
            other => Err(UsageError::UnknownCommand(other.to_string())),
        }
    }
}
