use std::path::PathBuf;

use anyhow::{Result, bail};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Every property of a type.
    Generate { types: PathBuf, type_name: String },
    Property {
        types: PathBuf,
        type_name: String,
        property: String,
    },
    Selection {
        types: PathBuf,
        type_name: String,
        properties: Vec<String>,
    },
    /// List completed elements of interest in a markup file.
    Scan { file: PathBuf, elements: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub command: Command,
    pub profile: Option<String>,
    pub profiles_dir: Option<PathBuf>,
}

pub fn usage(program: &str) -> String {
    format!(
        "Usage:
  {program} generate <types.toml> <TypeName> [--profile NAME] [--profiles DIR]
  {program} property <types.toml> <TypeName> <PropertyName> [--profile NAME] [--profiles DIR]
  {program} selection <types.toml> <TypeName> <PropertyName>... [--profile NAME] [--profiles DIR]
  {program} scan <file.xaml> <ElementName>..."
    )
}

/// Parses everything after the program name.
pub fn parse_args(args: &[String]) -> Result<Invocation> {
    let mut profile = None;
    let mut profiles_dir = None;
    let mut positional: Vec<&str> = Vec::new();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--profile" => match iter.next() {
                Some(name) => profile = Some(name.clone()),
                None => bail!("--profile needs a profile name"),
            },
            "--profiles" => match iter.next() {
                Some(dir) => profiles_dir = Some(PathBuf::from(dir)),
                None => bail!("--profiles needs a directory"),
            },
            flag if flag.starts_with("--") => bail!("Unknown option {flag}"),
            other => positional.push(other),
        }
    }

    let command = match positional.as_slice() {
        ["generate", types, type_name] => Command::Generate {
            types: PathBuf::from(types),
            type_name: type_name.to_string(),
        },
        ["property", types, type_name, property] => Command::Property {
            types: PathBuf::from(types),
            type_name: type_name.to_string(),
            property: property.to_string(),
        },
        ["selection", types, type_name, properties @ ..] if !properties.is_empty() => {
            Command::Selection {
                types: PathBuf::from(types),
                type_name: type_name.to_string(),
                properties: properties.iter().map(|p| p.to_string()).collect(),
            }
        }
        ["scan", file, elements @ ..] if !elements.is_empty() => Command::Scan {
            file: PathBuf::from(file),
            elements: elements.iter().map(|e| e.to_string()).collect(),
        },
        [] => bail!("No command given"),
        [command, ..] => bail!("Wrong arguments for '{command}'"),
    };

    Ok(Invocation {
        command,
        profile,
        profiles_dir,
    })
}
