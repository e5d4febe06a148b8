// ABOUTME: Entry point for the cert-manager-verifier CLI.
// ABOUTME: Loads config, connects to the cluster, runs verification, sets the exit code.

mod cli;

use clap::Parser;
use cli::Cli;
use tracing::instrument::WithSubscriber;

use cert_manager_verifier::cluster::KubeCluster;
use cert_manager_verifier::config::Config;
use cert_manager_verifier::error::Result;
use cert_manager_verifier::logging;
use cert_manager_verifier::output::Output;
use cert_manager_verifier::poll::Deadline;
use cert_manager_verifier::verify;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let mut output = Output::new(cli.output);
    output.start_timer();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            output.error(&e.to_string());
            std::process::exit(1);
        }
    };

    let dispatch = logging::dispatch(&config.log);
    let result = run(&cli, &config, &output).with_subscriber(dispatch).await;

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            output.error(&e.to_string());
            std::process::exit(1);
        }
    }
}

fn load_config(cli: &Cli) -> Result<Config> {
    let config = Config::load_or_default(cli.config.as_deref())?.with_overrides(cli.overrides());
    config.validate()?;
    Ok(config)
}

/// Returns whether verification succeeded.
async fn run(cli: &Cli, config: &Config, output: &Output) -> Result<bool> {
    let deadline = Deadline::after(config.timeout);
    let client = KubeCluster::connect(cli.kubeconfig.as_deref(), cli.context.as_deref()).await?;

    let result = verify(&client, deadline, &config.to_verify_options()).await;
    output.report(&result);
    Ok(result.success())
}
