use std::io;
use std::io::BufRead;
use std::process::ExitCode;

use authcore::AuthConfig;
use authcore::AuthenticationError;
use authcore::Authenticator;
use authcore::ExpirySpec;
use authcore::PasswordError;
use clap::Args;
use clap::Parser;
use clap::Subcommand;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Operator tool for the credential authentication core.
///
/// Passwords are read from the first line of stdin so they stay out of
/// shell history and process listings.
#[derive(Debug, Parser)]
#[command(name = "authctl", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Hash a password read from stdin and print the digest
    Hash,

    /// Check a password read from stdin against a stored digest
    Verify {
        /// Digest in `salt:hash` form
        #[arg(long)]
        digest: String,
    },

    /// Issue a signed bearer token
    Issue {
        /// Subject identifier placed in the token
        #[arg(long)]
        subject: u64,

        /// Mark the subject as privileged
        #[arg(long)]
        admin: bool,

        #[command(flatten)]
        expiry: ExpiryArgs,
    },
}

/// Token lifetime. The largest non-zero unit wins; without any, the
/// configured session lifetime is used.
#[derive(Debug, Args)]
struct ExpiryArgs {
    #[arg(long, default_value_t = 0)]
    years: u32,
    #[arg(long, default_value_t = 0)]
    months: u32,
    #[arg(long, default_value_t = 0)]
    days: u32,
    #[arg(long, default_value_t = 0)]
    hours: u32,
    #[arg(long, default_value_t = 0)]
    minutes: u32,
    #[arg(long, default_value_t = 0)]
    seconds: u32,
}

impl ExpiryArgs {
    fn into_spec(self, fallback: ExpirySpec) -> ExpirySpec {
        let spec = ExpirySpec {
            years: self.years,
            months: self.months,
            days: self.days,
            hours: self.hours,
            minutes: self.minutes,
            seconds: self.seconds,
        };

        if spec == ExpirySpec::default() {
            fallback
        } else {
            spec
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode, anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "authctl=info,authcore=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    let config = AuthConfig::load()?;
    tracing::info!(
        salt_length = config.password.salt_length,
        memory_cost = config.password.kdf.memory_cost,
        time_cost = config.password.kdf.time_cost,
        parallelism = config.password.kdf.parallelism,
        output_length = config.password.kdf.output_length,
        algorithm = ?config.token.algorithm,
        "Configuration loaded"
    );

    let authenticator = Authenticator::from_config(&config)?;

    match cli.command {
        Command::Hash => {
            let password = read_password(io::stdin().lock())?;
            let digest = authenticator.hash_password(&password).await?;
            println!("{}", digest);
            Ok(ExitCode::SUCCESS)
        }
        Command::Verify { digest } => {
            let password = read_password(io::stdin().lock())?;
            match authenticator.verify_password(&password, &digest).await {
                Ok(true) => {
                    println!("match");
                    Ok(ExitCode::SUCCESS)
                }
                Ok(false) => {
                    println!("mismatch");
                    Ok(ExitCode::from(1))
                }
                Err(AuthenticationError::Password(PasswordError::MalformedDigest(e))) => {
                    tracing::error!(error = %e, "Stored credential digest is malformed");
                    Ok(ExitCode::from(2))
                }
                Err(e) => Err(e.into()),
            }
        }
        Command::Issue {
            subject,
            admin,
            expiry,
        } => {
            let expiry = expiry.into_spec(config.token.session_ttl);
            let token = authenticator.issue_token(subject, admin, &expiry)?;
            println!("{}", token);
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Read the first line of `reader`, without its line terminator.
fn read_password<R: BufRead>(mut reader: R) -> io::Result<String> {
    let mut line = String::new();
    reader.read_line(&mut line)?;

    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }

    Ok(line)
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_read_password_strips_terminator() {
        assert_eq!(read_password(&b"hunter2\n"[..]).unwrap(), "hunter2");
        assert_eq!(read_password(&b"hunter2\r\n"[..]).unwrap(), "hunter2");
        assert_eq!(read_password(&b"hunter2"[..]).unwrap(), "hunter2");
        assert_eq!(read_password(&b" spaced \nnext\n"[..]).unwrap(), " spaced ");
        assert_eq!(read_password(&b""[..]).unwrap(), "");
    }

    #[test]
    fn test_issue_args_parse() {
        let cli = Cli::try_parse_from([
            "authctl",
            "issue",
            "--subject",
            "7",
            "--years",
            "1",
            "--minutes",
            "30",
        ])
        .unwrap();

        let Command::Issue {
            subject,
            admin,
            expiry,
        } = cli.command
        else {
            panic!("expected issue command");
        };

        assert_eq!(subject, 7);
        assert!(!admin);
        let spec = expiry.into_spec(ExpirySpec::minutes(30));
        assert_eq!(spec.years, 1);
        assert_eq!(spec.minutes, 30);
    }

    #[test]
    fn test_expiry_falls_back_to_session_ttl() {
        let cli = Cli::try_parse_from(["authctl", "issue", "--subject", "1", "--admin"]).unwrap();

        let Command::Issue { admin, expiry, .. } = cli.command else {
            panic!("expected issue command");
        };

        assert!(admin);
        assert_eq!(
            expiry.into_spec(ExpirySpec::hours(2)),
            ExpirySpec::hours(2)
        );
    }
}
