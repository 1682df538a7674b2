use clap::Parser;
use clap::error::ErrorKind;
use piekit::instance::{DEFAULT_INSTANCE, InstanceName};
use std::ffi::OsString;

#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "pieswitch", version, about, long_about = None, args_override_self = true)]
pub struct Args {
    /// Logical instance this daemon represents (selects config and marker files)
    #[arg(long, default_value = DEFAULT_INSTANCE, allow_hyphen_values = true)]
    pub instance: String,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            instance: DEFAULT_INSTANCE.to_string(),
        }
    }
}

impl Args {
    /// Hotkey tools pass along whatever they like, so anything but `--instance` (and the
    /// help/version flags) is dropped before clap sees it.
    pub fn parse_lenient<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        match Self::try_parse_from(recognized_args(args)) {
            Ok(args) => args,
            Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
                e.exit()
            }
            Err(_) => Self::default(),
        }
    }

    /// A blank name means the default instance.
    pub fn instance_name(&self) -> InstanceName {
        match self.instance.trim() {
            "" => InstanceName::default(),
            name => InstanceName::new(name),
        }
    }
}

fn recognized_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut iter = args.into_iter().map(Into::into);
    let mut kept: Vec<OsString> = iter.next().into_iter().collect();

    while let Some(arg) = iter.next() {
        let text = arg.to_string_lossy().into_owned();
        match text.as_str() {
            "--instance" => {
                if let Some(value) = iter.next() {
                    kept.push(arg);
                    kept.push(value);
                }
            }
            "-h" | "--help" | "-V" | "--version" => kept.push(arg),
            s if s.starts_with("--instance=") => kept.push(arg),
            _ => {}
        }
    }
    kept
}
