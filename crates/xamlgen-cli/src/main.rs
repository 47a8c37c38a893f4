use anyhow::{Context, Result, bail};
use std::env;
use std::path::Path;
use std::process;

use xamlgen_config::{Config, ProfileLibrary, load_type_table};
use xamlgen_engine::{
    GeneratedXaml, Profile, PropertyDescriptor, TypeTable, generate_for_property,
    generate_for_selection, generate_for_type,
};
use xamlgen_markup::{ElementMatch, HandlerTable, scan_markup};

mod args;

use args::{Command, Invocation, parse_args, usage};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("xamlgen");

    let invocation = match parse_args(args.get(1..).unwrap_or_default()) {
        Ok(invocation) => invocation,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("{}", usage(program));
            process::exit(1);
        }
    };

    match &invocation.command {
        Command::Scan { file, elements } => scan(file, elements),
        command => {
            let (library, configured) = load_profiles(&invocation)?;
            let profile = library.active(invocation.profile.as_deref(), configured.as_deref())?;
            log::info!("Using profile '{}'", profile.name);
            let generated = generate(profile, command)?;
            println!("{}", generated.output);
            Ok(())
        }
    }
}

/// Profiles from `--profiles`, else from the config file, with the configured active profile.
fn load_profiles(invocation: &Invocation) -> Result<(ProfileLibrary, Option<String>)> {
    let config = Config::load()?;
    let configured = config.as_ref().and_then(|c| c.active_profile.clone());

    let library = match (&invocation.profiles_dir, &config) {
        (Some(dir), _) => ProfileLibrary::load_dir(dir)?,
        (None, Some(config)) => config.profile_library()?,
        (None, None) => {
            let config_path = Config::config_path();
            bail!(
                "No profiles directory given and no config file found at {}",
                config_path.display()
            );
        }
    };
    log::info!(
        "Loaded {} profile(s) from {}",
        library.profiles().len(),
        library.profiles_path.display()
    );
    Ok((library, configured))
}

fn generate(profile: &Profile, command: &Command) -> Result<GeneratedXaml> {
    let generated = match command {
        Command::Generate { types, type_name } => {
            let (table, properties) = class_of(types, type_name)?;
            generate_for_type(profile, type_name, &properties, &table)?
        }
        Command::Property {
            types,
            type_name,
            property,
        } => {
            let (table, properties) = class_of(types, type_name)?;
            let Some(found) = properties.iter().find(|p| &p.name == property) else {
                bail!("{type_name} has no property named {property}");
            };
            generate_for_property(profile, found, &table)?
        }
        Command::Selection {
            types,
            type_name,
            properties: wanted,
        } => {
            let (table, properties) = class_of(types, type_name)?;
            for name in wanted {
                if !properties.iter().any(|p| &p.name == name) {
                    bail!("{type_name} has no property named {name}");
                }
            }
            let selected: Vec<PropertyDescriptor> = properties
                .into_iter()
                .filter(|p| wanted.contains(&p.name))
                .collect();
            generate_for_selection(profile, &selected, &table)?
        }
        Command::Scan { .. } => bail!("scan does not generate output"),
    };
    Ok(generated)
}

fn class_of(types: &Path, type_name: &str) -> Result<(TypeTable, Vec<PropertyDescriptor>)> {
    let table = load_type_table(types)
        .with_context(|| format!("Failed to load types from {}", types.display()))?;
    if table.get(type_name).is_none() {
        bail!("{} does not define a type named {type_name}", types.display());
    }
    let properties = table.class_properties(type_name);
    Ok((table, properties))
}

fn scan(file: &Path, elements: &[String]) -> Result<()> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let mut table = HandlerTable::new();
    for element in elements {
        table.register(element.as_str(), |m: &ElementMatch<'_>| {
            format!("{}..{} {} {:?}", m.span.start, m.span.end, m.name, m.indent)
        });
    }

    for record in scan_markup(&text, &table) {
        println!("{}", record.result);
    }
    Ok(())
}
