//! External converters for formats other than CTM.
//!
//! A converter is registered per file extension as a command template such
//! as `obj2ctm {input} {output}`. The template is split on whitespace and the
//! placeholders are substituted per argument, so paths with spaces survive.

use std::collections::BTreeMap;
use std::path::Path;
use std::process::Command;

use crate::error::{ToolError, ToolResult};

pub const INPUT_PLACEHOLDER: &str = "{input}";
pub const OUTPUT_PLACEHOLDER: &str = "{output}";

/// Runs one external program to completion.
pub trait CommandRunner {
    fn run(&self, program: &str, args: &[String]) -> ToolResult<()>;
}

/// Runs commands with [`std::process::Command`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemCommandRunner;

impl CommandRunner for SystemCommandRunner {
    fn run(&self, program: &str, args: &[String]) -> ToolResult<()> {
        log::debug!("running {} {:?}", program, args);
        let status = Command::new(program)
            .args(args)
            .status()
            .map_err(|e| ToolError::ConverterFailed {
                command: program.to_string(),
                message: e.to_string(),
            })?;
        if !status.success() {
            return Err(ToolError::ConverterFailed {
                command: program.to_string(),
                message: status.to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConverterRegistry {
    converters: BTreeMap<String, String>,
}

impl ConverterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a converter for `extension` (case-insensitive, leading dot
    /// optional). A later registration replaces an earlier one.
    pub fn register(&mut self, extension: &str, template: &str) -> ToolResult<()> {
        let ext = normalize_extension(extension);
        if ext.is_empty() || template.split_whitespace().next().is_none() {
            return Err(ToolError::BadConverterSpec(format!("{}={}", extension, template)));
        }
        self.converters.insert(ext, template.trim().to_string());
        Ok(())
    }

    /// Parses and registers an `EXT=COMMAND` spec.
    pub fn register_spec(&mut self, spec: &str) -> ToolResult<()> {
        let (ext, template) = spec
            .split_once('=')
            .ok_or_else(|| ToolError::BadConverterSpec(spec.to_string()))?;
        self.register(ext, template)
    }

    pub fn template(&self, extension: &str) -> Option<&str> {
        self.converters
            .get(&normalize_extension(extension))
            .map(String::as_str)
    }

    pub fn extensions(&self) -> impl Iterator<Item = &str> {
        self.converters.keys().map(String::as_str)
    }

    /// Program and arguments that convert `input` into `output`.
    pub fn command_for(&self, input: &Path, output: &Path) -> ToolResult<(String, Vec<String>)> {
        let ext = file_extension(input);
        let template = self
            .template(&ext)
            .ok_or_else(|| ToolError::UnknownExtension(ext.clone()))?;
        let input = input.to_string_lossy();
        let output = output.to_string_lossy();
        let mut parts = template.split_whitespace().map(|part| {
            part.replace(INPUT_PLACEHOLDER, &input)
                .replace(OUTPUT_PLACEHOLDER, &output)
        });
        let program = parts
            .next()
            .ok_or_else(|| ToolError::BadConverterSpec(template.to_string()))?;
        Ok((program, parts.collect()))
    }

    pub fn run(
        &self,
        runner: &dyn CommandRunner,
        input: &Path,
        output: &Path,
    ) -> ToolResult<()> {
        let (program, args) = self.command_for(input, output)?;
        runner.run(&program, &args)
    }
}

/// Lower-case extension of `path`, empty if it has none.
pub fn file_extension(path: &Path) -> String {
    path.extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default()
}

fn normalize_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_ascii_lowercase()
}
