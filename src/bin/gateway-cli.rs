use clap::{Parser, Subcommand};

use chain_gateway::chain::wallet::PRIVATE_KEY_ENV_VAR;

#[derive(Parser)]
#[command(name = "gateway-cli")]
#[command(about = "Query client for the chain gateway", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:12345")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the latest block height
    LatestBlock,
    /// List the most recent transactions
    LastTxs,
    /// Show the balance of an account
    Balance {
        /// Account address (hex)
        acc: String,
    },
    /// Sign and submit a transfer
    Send {
        /// Recipient address (hex)
        #[arg(long)]
        to: String,
        /// Amount in display units, e.g. 0.25
        #[arg(long)]
        amount: String,
        /// Sender private key (hex)
        #[arg(long, env = PRIVATE_KEY_ENV_VAR, hide_env_values = true)]
        key: String,
    },
    /// Show the chain id
    ChainId,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let request = match cli.command {
        Commands::LatestBlock => client.get(format!("{}/latestBlock", base)),
        Commands::LastTxs => client.get(format!("{}/last10tx", base)),
        Commands::Balance { acc } => client
            .get(format!("{}/balance", base))
            .query(&[("acc", acc)]),
        Commands::ChainId => client.get(format!("{}/chainID", base)),
        Commands::Send { to, amount, key } => client
            .post(format!("{}/sendEth", base))
            .query(&[("pkeyFrom", key), ("accTo", to), ("amount", amount)]),
    };

    let res = request.send().await?;
    let status = res.status();
    let body = res.text().await?;

    if status.is_success() {
        print!("{}", body);
    } else {
        eprint!("{}", body);
        std::process::exit(1);
    }
    Ok(())
}
