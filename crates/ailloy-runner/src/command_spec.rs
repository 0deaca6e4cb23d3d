use camino::Utf8PathBuf;
use std::collections::HashMap;
use std::ffi::OsString;
use std::process::Command;

/// A process invocation specified entirely as discrete argv elements.
///
/// # Security
///
/// `ailloy` shells out to `git` and `gh` to resolve remote references and
/// search foundries. Every such invocation goes through `CommandSpec` and a
/// `ProcessRunner` rather than a shell string, so a crafted reference or
/// flux value (e.g. `main; rm -rf /`) can never be interpreted by a shell —
/// there is no shell in the loop.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    pub program: OsString,
    pub args: Vec<OsString>,
    pub cwd: Option<Utf8PathBuf>,
    pub env: Option<HashMap<OsString, OsString>>,
}

impl CommandSpec {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            env: None,
        }
    }

    #[must_use]
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    #[must_use]
    pub fn args(mut self, args: impl IntoIterator<Item = impl Into<OsString>>) -> Self {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn cwd(mut self, dir: impl Into<Utf8PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    #[must_use]
    pub fn env(mut self, key: impl Into<OsString>, value: impl Into<OsString>) -> Self {
        self.env
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Build a `std::process::Command` for this spec. Always argv-style;
    /// never passed through a shell.
    pub fn to_command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        if let Some(cwd) = &self.cwd {
            command.current_dir(cwd);
        }
        if let Some(env) = &self.env {
            command.envs(env.iter().map(|(k, v)| (k.as_os_str(), v.as_os_str())));
        }
        command
    }
}
