//! Configuration loading helpers for the callchain CLI.
//!
//! Leading configuration flags are peeled off for `ortho_config` so the
//! loader only sees flags it understands, while clap parses the remaining
//! subcommand tokens.

use std::ffi::{OsStr, OsString};

use callchain_config::{CONFIG_CLI_FLAGS, Config};
use ortho_config::OrthoConfig;

use crate::AppError;

pub(crate) trait ConfigLoader {
    /// Loads configuration for the CLI.
    ///
    /// # Flag Ordering
    ///
    /// Configuration flags (listed in `CONFIG_CLI_FLAGS`) must appear before
    /// the subcommand. Anything after the first non-configuration token is
    /// handed to the subcommand parser.
    fn load(&self, args: &[OsString]) -> Result<Config, AppError>;
}

pub(crate) struct OrthoConfigLoader;

#[derive(Debug, Clone, Copy)]
enum FlagAction {
    Include { needs_value: bool },
    Stop,
}

impl ConfigLoader for OrthoConfigLoader {
    fn load(&self, args: &[OsString]) -> Result<Config, AppError> {
        Config::load_from_iter(args.iter().cloned()).map_err(AppError::LoadConfiguration)
    }
}

fn process_config_flag(argument: &OsStr) -> FlagAction {
    let argument_text = argument.to_string_lossy();
    if !argument_text.starts_with("--") {
        return FlagAction::Stop;
    }

    let (flag, has_inline_value) = argument_text
        .split_once('=')
        .map_or((&*argument_text, false), |(flag, _)| (flag, true));

    if CONFIG_CLI_FLAGS.contains(&flag) {
        FlagAction::Include {
            needs_value: !has_inline_value,
        }
    } else {
        FlagAction::Stop
    }
}

pub(crate) struct ConfigArgumentSplit {
    pub(crate) config_arguments: Vec<OsString>,
    pub(crate) command_arguments: Vec<OsString>,
}

/// Splits `args` (including the program name) into loader and command
/// arguments. Both halves keep the program name first.
pub(crate) fn split_config_arguments(args: &[OsString]) -> ConfigArgumentSplit {
    let Some((program, rest)) = args.split_first() else {
        return ConfigArgumentSplit {
            config_arguments: Vec::new(),
            command_arguments: Vec::new(),
        };
    };

    let mut config_arguments = vec![program.clone()];
    let mut command_start = 0usize;
    let mut pending_value = false;

    for argument in rest {
        if pending_value {
            config_arguments.push(argument.clone());
            pending_value = false;
            command_start += 1;
            continue;
        }

        match process_config_flag(argument.as_os_str()) {
            FlagAction::Include { needs_value } => {
                config_arguments.push(argument.clone());
                pending_value = needs_value;
                command_start += 1;
            }
            FlagAction::Stop => break,
        }
    }

    let mut command_arguments = vec![program.clone()];
    command_arguments.extend(rest.iter().skip(command_start).cloned());
    ConfigArgumentSplit {
        config_arguments,
        command_arguments,
    }
}
