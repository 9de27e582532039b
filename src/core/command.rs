//! Structured command lines
//!
//! A [`CommandLine`] is a program plus an ordered list of (flag, value)
//! pairs. It is serialised to an argv only when executed, so callers and
//! tests can ask for individual flags instead of matching substrings.

use serde::Serialize;
use std::fmt;

/// How a flag and its value are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ArgStyle {
    /// `--flag` with no value
    Bare,
    /// `-G value` as two arguments
    Separate,
    /// `-DKEY=value` as one argument
    Joined,
}

/// One flag with an optional value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandArg {
    flag: String,
    value: Option<String>,
    style: ArgStyle,
}

impl CommandArg {
    /// A flag without a value
    pub fn bare(flag: impl Into<String>) -> Self {
        Self {
            flag: flag.into(),
            value: None,
            style: ArgStyle::Bare,
        }
    }

    /// A flag followed by its value as a separate argument
    pub fn separate(flag: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            flag: flag.into(),
            value: Some(value.into()),
            style: ArgStyle::Separate,
        }
    }

    /// A `-D<key>=<value>` cache definition
    pub fn define(key: impl AsRef<str>, value: impl Into<String>) -> Self {
        Self {
            flag: format!("-D{}", key.as_ref()),
            value: Some(value.into()),
            style: ArgStyle::Joined,
        }
    }

    /// The flag text, e.g. `-G` or `-DCMAKE_BUILD_TYPE`
    pub fn flag(&self) -> &str {
        &self.flag
    }

    /// The value, if any
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    fn push_argv(&self, argv: &mut Vec<String>) {
        match (&self.value, self.style) {
            (Some(value), ArgStyle::Joined) => argv.push(format!("{}={value}", self.flag)),
            (Some(value), _) => {
                argv.push(self.flag.clone());
                argv.push(value.clone());
            }
            (None, _) => argv.push(self.flag.clone()),
        }
    }
}

/// Immutable program invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandLine {
    program: String,
    args: Vec<CommandArg>,
}

impl CommandLine {
    /// Start assembling a command for `program`
    pub fn builder(program: impl Into<String>) -> CommandLineBuilder {
        CommandLineBuilder {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Program to execute
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments in order
    pub fn args(&self) -> &[CommandArg] {
        &self.args
    }

    /// Whether a flag appears
    pub fn has_flag(&self, flag: &str) -> bool {
        self.args.iter().any(|arg| arg.flag == flag)
    }

    /// Value of the first occurrence of `flag`
    pub fn value_of(&self, flag: &str) -> Option<&str> {
        self.args
            .iter()
            .find(|arg| arg.flag == flag)
            .and_then(CommandArg::value)
    }

    /// Value of the `-D<key>` definition
    pub fn define(&self, key: &str) -> Option<&str> {
        self.value_of(&format!("-D{key}"))
    }

    /// Argument vector, without the program
    pub fn to_argv(&self) -> Vec<String> {
        let mut argv = Vec::with_capacity(self.args.len() * 2);
        for arg in &self.args {
            arg.push_argv(&mut argv);
        }
        argv
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&quote(&self.program))?;
        for token in self.to_argv() {
            write!(f, " {}", quote(&token))?;
        }
        Ok(())
    }
}

/// Quote a token for the log echo when it would otherwise be ambiguous
fn quote(token: &str) -> String {
    if token.is_empty() || token.chars().any(|c| c.is_whitespace() || c == '"') {
        format!("\"{}\"", token.replace('"', "\\\""))
    } else {
        token.to_string()
    }
}

/// Accumulates arguments; [`CommandLineBuilder::build`] freezes them
#[derive(Debug)]
pub struct CommandLineBuilder {
    program: String,
    args: Vec<CommandArg>,
}

impl CommandLineBuilder {
    /// Append an argument
    #[must_use]
    pub fn arg(mut self, arg: CommandArg) -> Self {
        self.args.push(arg);
        self
    }

    /// Append a bare flag
    #[must_use]
    pub fn flag(self, flag: impl Into<String>) -> Self {
        self.arg(CommandArg::bare(flag))
    }

    /// Append a flag and a separate value
    #[must_use]
    pub fn value(self, flag: impl Into<String>, value: impl Into<String>) -> Self {
        self.arg(CommandArg::separate(flag, value))
    }

    /// Append a `-D` definition
    #[must_use]
    pub fn define(self, key: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.arg(CommandArg::define(key, value))
    }

    /// Append arguments in order
    #[must_use]
    pub fn extend(mut self, args: impl IntoIterator<Item = CommandArg>) -> Self {
        self.args.extend(args);
        self
    }

    /// Freeze the command
    pub fn build(self) -> CommandLine {
        CommandLine {
            program: self.program,
            args: self.args,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CommandLine {
        CommandLine::builder("cmake")
            .value("-G", "Visual Studio 17 2022")
            .value("-S", "/src")
            .flag("-Wno-dev")
            .define("CMAKE_BUILD_TYPE", "Release")
            .build()
    }

    #[test]
    fn test_to_argv_renders_each_style() {
        assert_eq!(
            sample().to_argv(),
            vec![
                "-G",
                "Visual Studio 17 2022",
                "-S",
                "/src",
                "-Wno-dev",
                "-DCMAKE_BUILD_TYPE=Release"
            ]
        );
    }

    #[test]
    fn test_lookup_by_flag_and_define() {
        let command = sample();
        assert_eq!(command.value_of("-S"), Some("/src"));
        assert_eq!(command.define("CMAKE_BUILD_TYPE"), Some("Release"));
        assert!(command.has_flag("-Wno-dev"));
        assert!(!command.has_flag("-A"));
        assert_eq!(command.value_of("-Wno-dev"), None);
    }

    #[test]
    fn test_display_quotes_tokens_with_spaces() {
        assert_eq!(
            sample().to_string(),
            "cmake -G \"Visual Studio 17 2022\" -S /src -Wno-dev -DCMAKE_BUILD_TYPE=Release"
        );
    }

    #[test]
    fn test_display_quotes_empty_values() {
        let command = CommandLine::builder("cmake").define("EMPTY", "").build();
        assert_eq!(command.to_string(), "cmake -DEMPTY=");

        let command = CommandLine::builder("cmake").value("-G", "").build();
        assert_eq!(command.to_string(), "cmake -G \"\"");
    }
}
