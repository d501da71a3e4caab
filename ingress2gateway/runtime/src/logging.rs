use anyhow::{anyhow, bail, Context, Error, Result};
use tracing_subscriber::EnvFilter;

/// How log lines are rendered on stderr.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Plain,
    Json,
}

// === impl LogFormat ===

impl LogFormat {
    /// Installs the global subscriber.
    ///
    /// Logs always go to stderr so that stdout carries only the converted
    /// resources.
    pub fn try_init(self, filter: &str) -> Result<()> {
        let filter =
            EnvFilter::try_new(filter).with_context(|| format!("invalid log filter: {filter}"))?;
        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr);

        match self {
            Self::Plain => builder.try_init(),
            Self::Json => builder.json().try_init(),
        }
        .map_err(|error| anyhow!("failed to initialize logging: {error}"))
    }
}

impl std::str::FromStr for LogFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "plain" => Ok(Self::Plain),
            "json" => Ok(Self::Json),
            s => bail!("invalid log format: {s}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse() {
        assert_eq!("plain".parse::<LogFormat>().ok(), Some(LogFormat::Plain));
        assert_eq!("json".parse::<LogFormat>().ok(), Some(LogFormat::Json));
        assert!("JSON".parse::<LogFormat>().is_err());
    }
}
