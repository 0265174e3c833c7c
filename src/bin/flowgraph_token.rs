use clap::Parser;
use flowgraph::auth::{issue_token, SharedSecret, SigningAlgorithm, SubjectId, TokenClaims};
use flowgraph::ReferenceIdentity;
use std::path::PathBuf;

/// Issue a bearer token, optionally writing the matching identity file.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Subject id; digits are issued as a number
    #[arg(long)]
    user_id: String,
    /// Upstream data hashed into the authToken claim
    #[arg(long)]
    data: String,
    /// Shared secret
    #[arg(long, env = "TOKEN_SECRET", hide_env_values = true)]
    secret: String,
    /// Timestamp claim to use instead of the current time
    #[arg(long)]
    timestamp: Option<String>,
    /// Signing algorithm: HS256, HS384 or HS512
    #[arg(long, default_value = "HS256")]
    algorithm: String,
    /// Write a one-entry reference identity set for these claims
    #[arg(long)]
    write_identity: Option<PathBuf>,
}

fn subject(raw: &str) -> SubjectId {
    match raw.parse::<i64>() {
        Ok(id) => SubjectId::Numeric(id),
        Err(_) => SubjectId::Text(raw.to_string()),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let algorithm = SigningAlgorithm::from_name(&cli.algorithm)
        .ok_or_else(|| format!("unsupported algorithm '{}'", cli.algorithm))?;

    let mut claims = TokenClaims::new(subject(&cli.user_id), &cli.data);
    if let Some(timestamp) = cli.timestamp {
        claims.time_stamp = timestamp;
    }

    let token = issue_token(&claims, &SharedSecret::new(&cli.secret), algorithm)?;

    if let Some(path) = cli.write_identity {
        let identities = vec![ReferenceIdentity::from(claims.clone())];
        std::fs::write(&path, serde_json::to_string_pretty(&identities)?)?;
        eprintln!("Reference identity written to {}", path.display());
    }

    println!("{}", serde_json::to_string_pretty(&claims)?);
    println!("{}", token);
    Ok(())
}
