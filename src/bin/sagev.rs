// Sage view-configuration processor
//
//  Copyright (C) 2014-2023 Ryan Specialty Group, LLC.
//
//  This file is part of Sage.
//
//  This program is free software: you can redistribute it and/or modify
//  it under the terms of the GNU General Public License as published by
//  the Free Software Foundation, either version 3 of the License, or
//  (at your option) any later version.
//
//  This program is distributed in the hope that it will be useful,
//  but WITHOUT ANY WARRANTY; without even the implied warranty of
//  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//  GNU General Public License for more details.
//
//  You should have received a copy of the GNU General Public License
//  along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! This is `sagev`,
//!   a development tool that runs a view configuration through the
//!   pipeline outside of any hosting layer.
//!
//! No modules are registered
//!   (the module subsystem is disabled),
//!   so module elements pass through untouched;
//!     library references are collected and stripped,
//!     and the resulting envelope is written out for inspection.

extern crate sager;

use getopts::{Fail, Options};
use sager::context::Context;
use sager::fs::{self, LoadError};
use sager::module::ModuleRegistry;
use sager::resource::ResourceError;
use sager::view::{ConfigurationError, ViewConfiguration, ViewEnvelope};
use sager::xml::{self, writer::write_document};
use std::fmt::{self, Display};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::{env, error::Error};

/// Types of commands
enum Command {
    Process {
        input: String,
        output: Option<String>,
        controller: String,
        action: String,
        user_agent: Option<String>,
    },
    Usage,
}

/// Entrypoint for the processor
pub fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let program = args[0].clone();
    let opts = get_opts();
    let usage = opts.usage(&format!("Usage: {} [OPTIONS] INPUT", program));

    match parse_options(opts, args) {
        Ok(Command::Process {
            input,
            output,
            controller,
            action,
            user_agent,
        }) => {
            if let Err(e) =
                process(&input, output.as_deref(), controller, action, user_agent)
            {
                eprintln!("{}", e);
                eprintln!("fatal: failed to process `{}`", input);
                std::process::exit(exitcode::DATAERR);
            }
        }
        Ok(Command::Usage) => {
            println!("{}", usage);
            std::process::exit(exitcode::OK);
        }
        Err(e) => {
            eprintln!("{}", e);
            println!("{}", usage);
            std::process::exit(exitcode::USAGE);
        }
    }
}

/// Run the pipeline over the configuration at `input`,
///   writing the envelope to `output` (or standard output).
fn process(
    input: &str,
    output: Option<&str>,
    controller: String,
    action: String,
    user_agent: Option<String>,
) -> Result<(), SagevError> {
    let config = fs::load_document(input)?;

    let base = Path::new(input)
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut context = Context::new(controller, action, base);
    if let Some(user_agent) = user_agent {
        context = context.with_user_agent(user_agent);
    }

    let registry = ModuleRegistry::new();

    let result =
        ViewConfiguration::new(&registry, &context, config)?.process()?;

    let envelope = ViewEnvelope::new().build(
        &result,
        &context,
        context.to_xml(),
        Vec::new(),
    )?;

    match output {
        Some(path) => {
            let mut sink = BufWriter::new(File::create(path)?);
            write_document(&envelope, &mut sink)?;
            sink.flush()?;
        }
        None => {
            let stdout = io::stdout();
            let mut sink = stdout.lock();
            write_document(&envelope, &mut sink)?;
            sink.write_all(b"\n")?;
        }
    }

    Ok(())
}

/// Get 'Options'
fn get_opts() -> Options {
    let mut opts = Options::new();
    opts.optopt("o", "output", "set output file name", "NAME");
    opts.optopt("", "controller", "controller name for the envelope", "NAME");
    opts.optopt("", "action", "action name for the envelope", "NAME");
    opts.optopt("", "user-agent", "user agent id to filter resources", "ID");
    opts.optflag("h", "help", "print this help menu");

    opts
}

/// Option parser
fn parse_options(opts: Options, args: Vec<String>) -> Result<Command, Fail> {
    let matches = match opts.parse(&args[1..]) {
        Ok(m) => m,
        Err(f) => {
            return Err(f);
        }
    };

    if matches.opt_present("h") {
        return Ok(Command::Usage);
    }

    let input = match matches.free.len() {
        0 => return Err(Fail::OptionMissing(String::from("INPUT"))),
        1 => matches.free[0].clone(),
        _ => return Err(Fail::UnrecognizedOption(matches.free[1].clone())),
    };

    Ok(Command::Process {
        input,
        output: matches.opt_str("o"),
        controller: matches
            .opt_str("controller")
            .unwrap_or_else(|| String::from("home")),
        action: matches
            .opt_str("action")
            .unwrap_or_else(|| String::from("index")),
        user_agent: matches.opt_str("user-agent"),
    })
}

/// Processor (`sagev`) error.
///
/// This represents the aggregation of all possible errors that can occur
///   while processing a view configuration from the command line.
#[derive(Debug)]
pub enum SagevError {
    Io(io::Error),
    Load(LoadError),
    Config(ConfigurationError),
    Resource(ResourceError),
    Write(xml::Error),
}

impl From<io::Error> for SagevError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<LoadError> for SagevError {
    fn from(e: LoadError) -> Self {
        Self::Load(e)
    }
}

impl From<ConfigurationError> for SagevError {
    fn from(e: ConfigurationError) -> Self {
        Self::Config(e)
    }
}

impl From<ResourceError> for SagevError {
    fn from(e: ResourceError) -> Self {
        Self::Resource(e)
    }
}

impl From<xml::Error> for SagevError {
    fn from(e: xml::Error) -> Self {
        Self::Write(e)
    }
}

impl Display for SagevError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => Display::fmt(e, f),
            Self::Load(e) => Display::fmt(e, f),
            Self::Config(e) => Display::fmt(e, f),
            Self::Resource(e) => Display::fmt(e, f),
            Self::Write(e) => Display::fmt(e, f),
        }
    }
}

impl Error for SagevError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Load(e) => Some(e),
            Self::Config(e) => Some(e),
            Self::Resource(e) => Some(e),
            Self::Write(e) => Some(e),
        }
    }
}
